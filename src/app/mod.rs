use std::sync::Arc;

use anyhow::Context;
use secrecy::ExposeSecret;
use teloxide::{
    dispatching::Dispatcher,
    dptree,
    payloads::setters::*,
    prelude::*,
    types::{Chat, UserId},
};

pub mod avatar;
pub mod caption;
pub mod chat_name;
pub mod color;
pub mod command;
pub mod error;

use crate::{
    app::{
        avatar::{AvatarAssets, AvatarRenderer, AvatarRequest},
        error::AppError,
    },
    config::AppConfig,
    routes,
    telemetry::spawn_blocking_with_tracing,
};

pub struct Application {
    bot: Bot,
    context: BotContext,
}

/// Shared by every handler through dptree dependencies.
#[derive(Clone)]
pub struct BotContext {
    pub config: Arc<AppConfig>,
    pub renderer: Arc<AvatarRenderer>,
    pub bot_id: UserId,
    pub bot_username: Option<String>,
}

impl Application {
    pub async fn build(config: AppConfig) -> Result<Self, anyhow::Error> {
        let assets = AvatarAssets::load(&config.assets_font_path, &config.assets_logo_path)?;

        let bot = build_bot(&config);
        let me = bot
            .get_me()
            .await
            .context("failed to call getMe on Telegram")?;

        // Updates that queued up while we were offline are not worth acting on
        bot.delete_webhook()
            .drop_pending_updates(true)
            .await
            .context("failed to drop pending updates")?;

        tracing::info!(
            bot_name = %me.user.first_name,
            bot_username = ?me.user.username,
            "telegram connected"
        );

        let context = BotContext {
            config: Arc::new(config),
            renderer: Arc::new(AvatarRenderer::new(assets)),
            bot_id: me.user.id,
            bot_username: me.user.username.clone(),
        };

        Ok(Self { bot, context })
    }

    /// Used in main, run the bot until `close_rx` fires
    pub async fn run_gracefully(self, close_rx: tokio::sync::oneshot::Receiver<()>) {
        let mut dispatcher = Dispatcher::builder(self.bot, routes::schema())
            .dependencies(dptree::deps![self.context])
            .default_handler(|_| async {})
            .build();

        let shutdown_token = dispatcher.shutdown_token();
        tokio::spawn(async move {
            _ = close_rx.await;

            match shutdown_token.shutdown() {
                Ok(stopped) => stopped.await,
                Err(_) => tracing::info!("dispatcher was not running"),
            }
        });

        tracing::info!("polling for updates");
        dispatcher.dispatch().await;
        tracing::info!("dispatcher stopped");
    }
}

pub fn build_bot(config: &AppConfig) -> Bot {
    let bot = Bot::new(config.telegram_api_token.expose_secret());

    match &config.telegram_api_url {
        Some(url) => bot.set_api_url(url.clone()),
        None => bot,
    }
}

impl BotContext {
    /// Render on the blocking pool, the renderer is CPU bound.
    #[tracing::instrument(name = "Rendering avatar", skip_all, fields(title = %request.title))]
    pub async fn render_avatar(&self, request: AvatarRequest) -> Result<Vec<u8>, AppError> {
        let renderer = self.renderer.clone();
        let quality = self.config.avatar_jpeg_quality;

        let bytes = spawn_blocking_with_tracing(move || renderer.render_jpeg(&request, quality))
            .await
            .context("panic in rendering avatar")??;

        Ok(bytes)
    }
}

/// What Telegram clients show as the chat name.
pub fn chat_display_name(chat: &Chat) -> String {
    if let Some(title) = chat.title() {
        return title.to_string();
    }

    match (chat.first_name(), chat.last_name()) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        (Some(first), None) => first.to_string(),
        (None, Some(last)) => last.to_string(),
        (None, None) => String::new(),
    }
}
