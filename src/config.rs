use std::path::PathBuf;

use secrecy::SecretString;
use url::Url;

#[derive(clap::Parser, Debug)]
pub struct AppConfig {
    #[clap(long, env, default_value = "dev")]
    pub stage: Stage,

    // Telegram
    #[clap(long, env)]
    pub telegram_api_token: SecretString,

    /// Self-hosted Bot API server, defaults to api.telegram.org
    #[clap(long, env)]
    pub telegram_api_url: Option<Url>,

    // Avatar assets
    #[clap(long, env, default_value = "static/DejaVuSans-Bold.ttf")]
    pub assets_font_path: PathBuf,

    /// Composited with a multiply-and-add blend, black is transparent.
    /// The checked-in logo is a placeholder ring.
    #[clap(long, env, default_value = "static/logo.png")]
    pub assets_logo_path: PathBuf,

    #[clap(long, env, default_value_t = 95, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub avatar_jpeg_quality: u8,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "kebab_case")]
pub enum Stage {
    Dev,
    Prod,
}
