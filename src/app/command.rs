/// Commands the bot answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/set_image`, arguments are everything after the command, newlines included.
    SetImage { args: Option<String> },
}

/// Parse a message text as a command.
///
/// `/cmd@name` is only ours when `name` matches `bot_username`. Unknown
/// commands and plain text give `None`.
pub fn parse_command(text: &str, bot_username: Option<&str>) -> Option<BotCommand> {
    let text = text.strip_prefix('/')?;
    let (head, rest) = match text.find(char::is_whitespace) {
        Some(idx) => text.split_at(idx),
        None => (text, ""),
    };

    let name = match head.split_once('@') {
        Some((name, mention)) => {
            let ours = bot_username.is_some_and(|username| username.eq_ignore_ascii_case(mention));
            if !ours {
                return None;
            }
            name
        }
        None => head,
    };

    let args = Some(rest.trim())
        .filter(|args| !args.is_empty())
        .map(str::to_string);

    match name {
        "set_image" => Some(BotCommand::SetImage { args }),
        _ => None,
    }
}
