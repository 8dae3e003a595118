use teloxide::{
    payloads::setters::*,
    prelude::*,
    types::{InputFile, ParseMode, ReplyParameters},
};

use crate::{
    app::{
        avatar::AvatarRequest,
        caption::{build_preview_caption, parse_avatar_lines, IMAGE_GENERATION_HELP, INVALID_COLOR},
        chat_display_name, BotContext,
    },
    routes::{is_chat_admin, preview_markup, HandlerResult, AVATAR_FILE_NAME},
};

/// Reply to `/set_image` with a rendered preview.
///
/// In groups only administrators get an answer, and the preview carries
/// buttons to apply or discard it. Without arguments the chat name is used.
#[tracing::instrument(name = "Set image command", skip_all, fields(has_args = args.is_some()))]
pub async fn handle_set_image(
    bot: Bot,
    ctx: BotContext,
    msg: Message,
    args: Option<String>,
) -> HandlerResult {
    let is_private = msg.chat.is_private();

    if is_private && args.is_none() {
        bot.send_message(msg.chat.id, IMAGE_GENERATION_HELP)
            .parse_mode(ParseMode::Html)
            .reply_parameters(ReplyParameters::new(msg.id))
            .await?;

        return Ok(());
    }

    if !is_private {
        let Some(user) = msg.from.as_ref() else {
            return Ok(());
        };

        if !is_chat_admin(&bot, msg.chat.id, user.id).await? {
            tracing::info!(user_id = user.id.0, "set_image from a non-admin, ignoring");
            return Ok(());
        }
    }

    let request = match args.as_deref().map(parse_avatar_lines) {
        Some(Ok(Some(request))) => request,
        Some(Ok(None)) | None => AvatarRequest::from_chat_name(&chat_display_name(&msg.chat)),
        Some(Err(error)) => {
            tracing::info!(%error, "set_image with a bad color");
            bot.send_message(msg.chat.id, INVALID_COLOR)
                .reply_parameters(ReplyParameters::new(msg.id))
                .await?;

            return Ok(());
        }
    };

    let caption = build_preview_caption(&request);
    let avatar = ctx.render_avatar(request).await?;

    let mut reply = bot
        .send_photo(msg.chat.id, InputFile::memory(avatar).file_name(AVATAR_FILE_NAME))
        .caption(caption)
        .parse_mode(ParseMode::Html)
        .reply_parameters(ReplyParameters::new(msg.id));

    if !is_private {
        reply = reply.reply_markup(preview_markup());
    }

    reply.await?;

    Ok(())
}
