use teloxide::{
    prelude::*,
    types::{InputFile, MessageEntityKind},
};
use uuid::Uuid;

use crate::{
    app::{avatar::AvatarRequest, caption::parse_avatar_lines, BotContext},
    routes::{
        delete_message_best_effort, is_chat_admin, CallbackAction, HandlerResult, AVATAR_FILE_NAME,
    },
};

#[tracing::instrument(
    name = "Handle callback query",
    skip_all,
    fields(
        data = ?q.data,
        user_id = q.from.id.0,
        request_id = %Uuid::new_v4()
    )
)]
pub async fn handle_callback_query(bot: Bot, ctx: BotContext, q: CallbackQuery) -> HandlerResult {
    bot.answer_callback_query(q.id.clone()).await?;

    let Some(action) = q.data.as_deref().and_then(|data| data.parse::<CallbackAction>().ok()) else {
        tracing::debug!("unknown callback data");
        return Ok(());
    };

    let Some(message) = q.message.as_ref().and_then(|m| m.regular_message()) else {
        tracing::debug!("callback message is no longer accessible");
        return Ok(());
    };

    if !is_chat_admin(&bot, message.chat.id, q.from.id).await? {
        tracing::info!("callback from a non-admin, ignoring");
        return Ok(());
    }

    match action {
        CallbackAction::SetPhoto => apply_preview(&bot, &ctx, message).await,
        CallbackAction::Delete => {
            delete_message_best_effort(&bot, message.chat.id, message.id).await;
            Ok(())
        }
    }
}

/// Set the preview as the chat photo, then clean up the preview and the
/// command it answered.
#[tracing::instrument(name = "Applying preview", skip_all, fields(chat_id = %preview.chat.id))]
async fn apply_preview(bot: &Bot, ctx: &BotContext, preview: &Message) -> HandlerResult {
    let Some(request) = preview_request(preview) else {
        tracing::warn!("preview caption carries no avatar parameters");
        return Ok(());
    };

    let avatar = ctx.render_avatar(request).await?;
    bot.set_chat_photo(preview.chat.id, InputFile::memory(avatar).file_name(AVATAR_FILE_NAME))
        .await?;
    tracing::info!("chat photo set from preview");

    if let Some(command) = preview.reply_to_message() {
        delete_message_best_effort(bot, command.chat.id, command.id).await;
    }
    delete_message_best_effort(bot, preview.chat.id, preview.id).await;

    Ok(())
}

/// Parameters stored in the first blockquote of the preview caption.
pub fn preview_request(preview: &Message) -> Option<AvatarRequest> {
    let entities = preview.parse_caption_entities()?;
    let quote = entities
        .iter()
        .find(|entity| matches!(entity.kind(), MessageEntityKind::Blockquote))?;

    parse_avatar_lines(quote.text()).ok().flatten()
}
