//! Command-token extraction from message text.
//!
//! A command is the first whitespace-separated token when it starts with `/`. In groups
//! Telegram appends the bot's username (`/start@MyBot`); that suffix is stripped only when it
//! names this bot.

/// First whitespace-separated token of `text`, if any.
#[inline]
pub fn first_token(text: &str) -> Option<&str> {
    text.split_whitespace().next()
}

/// Returns the command token of `text`, or `None` when the text does not start with `/`.
///
/// - `"/start@MyBot hello"` with `bot_username = "MyBot"` → `/start`
/// - `"/start hello"` → `/start`
/// - `"/start@OtherBot"` → `/start@OtherBot` (kept as is)
pub fn extract_command(text: &str, bot_username: &str) -> Option<String> {
    let token = first_token(text)?;
    if !token.starts_with('/') {
        return None;
    }
    if !bot_username.is_empty() && token.ends_with(&format!("@{}", bot_username)) {
        if let Some((command, _)) = token.split_once('@') {
            return Some(command.to_string());
        }
    }
    Some(token.to_string())
}
