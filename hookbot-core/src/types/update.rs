//! Inbound webhook update.

use serde::{Deserialize, Serialize};

use super::{callback::CallbackQuery, chat::Chat, message::Message};
use crate::command::extract_command;

/// One webhook delivery. `command` is not on the wire; it is derived from the message text
/// by [`InboundUpdate::resolve_command`] before the update reaches the handler.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InboundUpdate {
    #[serde(default)]
    pub update_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub callback_query: Option<CallbackQuery>,
    #[serde(skip)]
    pub command: Option<String>,
}

impl InboundUpdate {
    /// Parses a raw webhook body.
    pub fn from_slice(body: &[u8]) -> crate::Result<Self> {
        Ok(serde_json::from_slice(body)?)
    }

    /// Raw message text; empty when the update has no text message.
    pub fn text(&self) -> &str {
        self.message.as_ref().map(Message::text).unwrap_or_default()
    }

    /// Chat the update belongs to: the message's chat, else the chat of the callback's message.
    pub fn chat(&self) -> Option<&Chat> {
        self.message
            .as_ref()
            .or_else(|| self.callback_query.as_ref().and_then(|q| q.message.as_ref()))
            .map(|m| &m.chat)
    }

    /// Sets `command` from the first token of the text, stripping `@<bot_username>`.
    pub fn resolve_command(&mut self, bot_username: &str) {
        self.command = extract_command(self.text(), bot_username);
    }

    /// Derived command token (e.g. `/start`), if the text starts with one.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }
}
