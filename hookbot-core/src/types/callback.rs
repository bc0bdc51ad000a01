//! Callback query produced by an inline keyboard button press.

use serde::{Deserialize, Serialize};

use super::{message::Message, user::User};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackQuery {
    /// Id to pass to `answerCallbackQuery`.
    pub id: String,
    pub from: User,
    /// The message carrying the pressed keyboard, when it is still available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<Message>,
    /// `callback_data` of the pressed button.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
}
