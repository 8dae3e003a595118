use teloxide::utils::html;

use crate::app::{
    avatar::AvatarRequest,
    color::{pick_stable_random, ColorParseError},
};

pub const IMAGE_GENERATION_HELP: &str = "Для генерации персонализированной аватарки отправьте сообщение:
<pre><code>/set_image
<i>Заголовок</i>
<i>Подзаголовок (опционально)</i>
<i>Цвет в формате hex (опционально)</i></code></pre>";

pub const GREETING: &str = "Привет 👋 Я бот, который удаляет уведомления о входе и выходе участников в чатах. \
Также я умею генерировать аватарку для чата (/set_image).\n\n";

pub const GREETING_NOT_ADMIN: &str = "Пожалуйста, назначьте меня администратором, чтобы я мог удалять \
уведомления о входе и выходе участников.";

pub const GREETING_ADMIN: &str = "✅ Я администратор, для дальнейшей работы всё уже настроено.";

pub const INVALID_COLOR: &str = "Цвет должен быть в формате hex, например #1e90ff";

pub const SET_AS_CHAT_PHOTO_BUTTON: &str = "Задать как аватар чата";
pub const DELETE_MESSAGE_BUTTON: &str = "Удалить это сообщение";

/// Parse avatar parameters written one per line: title, subtitle, color.
///
/// Blank subtitle or color lines count as missing, a missing color is
/// derived from the title. Returns `None` when there is no title at all.
pub fn parse_avatar_lines(text: &str) -> Result<Option<AvatarRequest>, ColorParseError> {
    let mut lines = text.trim().lines().map(str::trim);

    let Some(title) = lines.next().filter(|line| !line.is_empty()) else {
        return Ok(None);
    };

    let subtitle = lines
        .next()
        .filter(|line| !line.is_empty())
        .map(str::to_string);

    let color = match lines.next().filter(|line| !line.is_empty()) {
        Some(hex) => hex.parse()?,
        None => pick_stable_random(title),
    };

    Ok(Some(AvatarRequest {
        title: title.to_string(),
        subtitle,
        color,
    }))
}

/// HTML caption of a preview photo.
///
/// The blockquote holds the parameters in the same line format
/// [`parse_avatar_lines`] reads, so the preview can be re-rendered later from
/// its caption alone.
pub fn build_preview_caption(request: &AvatarRequest) -> String {
    format!(
        "Текущие параметры:<blockquote><b>{}</b>\n{}\n{}</blockquote>\n\n{}",
        html::escape(&request.title),
        html::escape(request.subtitle.as_deref().unwrap_or_default()),
        request.color,
        IMAGE_GENERATION_HELP
    )
}

/// Greeting sent when the bot joins a chat.
pub fn build_greeting(is_admin: bool) -> String {
    let status = if is_admin {
        GREETING_ADMIN
    } else {
        GREETING_NOT_ADMIN
    };

    format!("{GREETING}{status}")
}
