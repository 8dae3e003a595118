use std::{fmt, str::FromStr};

use teloxide::{
    dispatching::UpdateHandler,
    prelude::*,
    types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, UserId},
    RequestError,
};
use uuid::Uuid;

use crate::app::{
    caption::{DELETE_MESSAGE_BUTTON, SET_AS_CHAT_PHOTO_BUTTON},
    command::{parse_command, BotCommand},
    error::AppError,
    BotContext,
};

pub mod callback;
pub mod service;
pub mod set_image;

pub type HandlerResult = Result<(), AppError>;

/// File name avatars are uploaded under.
pub const AVATAR_FILE_NAME: &str = "avatar.jpeg";

pub fn schema() -> UpdateHandler<AppError> {
    dptree::entry()
        .branch(Update::filter_message().endpoint(handle_message))
        .branch(Update::filter_callback_query().endpoint(callback::handle_callback_query))
}

#[tracing::instrument(
    name = "Handle message",
    skip_all,
    fields(
        chat_id = %msg.chat.id,
        message_id = msg.id.0,
        request_id = %Uuid::new_v4()
    )
)]
pub async fn handle_message(bot: Bot, ctx: BotContext, msg: Message) -> HandlerResult {
    let command = msg
        .text()
        .and_then(|text| parse_command(text, ctx.bot_username.as_deref()));

    match command {
        Some(BotCommand::SetImage { args }) => {
            set_image::handle_set_image(bot, ctx, msg, args).await
        }
        None => service::handle_service_message(bot, ctx, msg).await,
    }
}

/// Payload of the inline buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackAction {
    SetPhoto,
    Delete,
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallbackAction::SetPhoto => write!(f, "set_photo"),
            CallbackAction::Delete => write!(f, "delete"),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "set_photo" => Ok(CallbackAction::SetPhoto),
            "delete" => Ok(CallbackAction::Delete),
            _ => Err(()),
        }
    }
}

impl CallbackAction {
    fn button(self) -> InlineKeyboardButton {
        let text = match self {
            CallbackAction::SetPhoto => SET_AS_CHAT_PHOTO_BUTTON,
            CallbackAction::Delete => DELETE_MESSAGE_BUTTON,
        };

        InlineKeyboardButton::callback(text, self.to_string())
    }
}

pub fn delete_markup() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[CallbackAction::Delete.button()]])
}

pub fn preview_markup() -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new([[
        CallbackAction::SetPhoto.button(),
        CallbackAction::Delete.button(),
    ]])
}

/// Administrators and the owner.
pub async fn is_chat_admin(
    bot: &Bot,
    chat_id: ChatId,
    user_id: UserId,
) -> Result<bool, RequestError> {
    let member = bot.get_chat_member(chat_id, user_id).await?;

    Ok(member.is_privileged())
}

/// One attempt, failures are only logged.
pub async fn delete_message_best_effort(bot: &Bot, chat_id: ChatId, message_id: MessageId) {
    match bot.delete_message(chat_id, message_id).await {
        Ok(_) => tracing::info!(message_id = message_id.0, "message deleted"),
        Err(error) => {
            tracing::warn!(%error, message_id = message_id.0, "message can't be deleted")
        }
    }
}
