//! Bot API wire format: method paths, request bodies and the response envelope.

use hookbot_core::{BotError, InlineKeyboardMarkup, Result};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

pub(crate) const GET_ME: &str = "getMe";
pub(crate) const SEND_MESSAGE: &str = "sendMessage";
pub(crate) const EDIT_MESSAGE_TEXT: &str = "editMessageText";
pub(crate) const ANSWER_CALLBACK_QUERY: &str = "answerCallbackQuery";

/// Body of `sendMessage`. `chat_id` is sent as a string.
#[derive(Debug, Serialize)]
pub(crate) struct SendMessageBody<'a> {
    pub chat_id: String,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl<'a> SendMessageBody<'a> {
    pub fn new(chat_id: i64, text: &'a str, reply_markup: Option<InlineKeyboardMarkup>) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            text,
            reply_markup: reply_markup.filter(|m| !m.is_empty()),
        }
    }
}

/// Body of `editMessageText`.
#[derive(Debug, Serialize)]
pub(crate) struct EditMessageBody<'a> {
    pub chat_id: String,
    pub message_id: i64,
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<InlineKeyboardMarkup>,
}

impl<'a> EditMessageBody<'a> {
    pub fn new(
        chat_id: i64,
        message_id: i64,
        text: &'a str,
        reply_markup: Option<InlineKeyboardMarkup>,
    ) -> Self {
        Self {
            chat_id: chat_id.to_string(),
            message_id,
            text,
            reply_markup: reply_markup.filter(|m| !m.is_empty()),
        }
    }
}

/// Body of `answerCallbackQuery`.
#[derive(Debug, Serialize)]
pub(crate) struct AnswerCallbackBody<'a> {
    pub callback_query_id: &'a str,
}

/// Response envelope: `{ "ok": bool, "result": T, "description": str, "error_code": int }`.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub description: Option<String>,
    pub error_code: Option<u16>,
}

impl<T> ApiResponse<T> {
    /// Unwraps `result`, mapping `ok: false` or a missing result to a remote rejection.
    pub fn into_result(self, status: u16) -> Result<T> {
        match (self.ok, self.result) {
            (true, Some(result)) => Ok(result),
            _ => Err(BotError::RemoteRejection {
                status: self.error_code.unwrap_or(status),
                description: self
                    .description
                    .unwrap_or_else(|| "response carried no result".to_string()),
            }),
        }
    }
}

/// Pulls `description` out of an error body; falls back to the raw text.
pub(crate) fn rejection_description(body: &str) -> String {
    serde_json::from_str::<ApiResponse<serde_json::Value>>(body)
        .ok()
        .and_then(|r| r.description)
        .unwrap_or_else(|| body.trim().to_string())
}
