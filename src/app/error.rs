use teloxide::RequestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("telegram request failed")]
    Telegram(#[from] RequestError),

    #[error("failed to encode avatar")]
    Image(#[from] image::ImageError),

    #[error("an internal error occurred")]
    Anyhow(#[from] anyhow::Error),
}
