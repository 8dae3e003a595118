use teloxide::{payloads::setters::*, prelude::*, types::InputFile};

use crate::{
    app::{avatar::AvatarRequest, caption::build_greeting, chat_display_name, BotContext},
    routes::{delete_markup, delete_message_best_effort, is_chat_admin, HandlerResult, AVATAR_FILE_NAME},
};

/// Joins, leaves and chat photo changes are removed, and the bot introduces
/// itself when it is the one being added.
#[tracing::instrument(name = "Handle service message", skip_all)]
pub async fn handle_service_message(bot: Bot, ctx: BotContext, msg: Message) -> HandlerResult {
    let bot_was_added = msg
        .new_chat_members()
        .is_some_and(|members| members.iter().any(|member| member.id == ctx.bot_id));

    let greeting = if bot_was_added {
        greet_chat(&bot, &ctx, &msg).await
    } else {
        Ok(())
    };

    if is_membership_notice(&msg) {
        delete_message_best_effort(&bot, msg.chat.id, msg.id).await;
    }

    greeting
}

pub fn is_membership_notice(msg: &Message) -> bool {
    msg.left_chat_member().is_some()
        || msg.new_chat_members().is_some()
        || msg.new_chat_photo().is_some()
}

#[tracing::instrument(name = "Greeting chat", skip_all, fields(chat_id = %msg.chat.id))]
async fn greet_chat(bot: &Bot, ctx: &BotContext, msg: &Message) -> HandlerResult {
    let is_admin = is_chat_admin(bot, msg.chat.id, ctx.bot_id).await?;

    bot.send_message(msg.chat.id, build_greeting(is_admin))
        .reply_markup(delete_markup())
        .await?;

    if !is_admin {
        return Ok(());
    }

    let chat = bot.get_chat(msg.chat.id).await?;
    if chat.photo.is_some() {
        return Ok(());
    }

    let request = AvatarRequest::from_chat_name(&chat_display_name(&msg.chat));
    let avatar = ctx.render_avatar(request).await?;

    bot.set_chat_photo(msg.chat.id, InputFile::memory(avatar).file_name(AVATAR_FILE_NAME))
        .await?;
    tracing::info!("chat had no photo, set a generated one");

    Ok(())
}
