//! Chat reference embedded in messages.

use serde::{Deserialize, Serialize};

/// Chat (private, group or channel). Only `id` is required on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub chat_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl Chat {
    /// Chat reference carrying only the numeric id.
    pub fn new(id: i64) -> Self {
        Self {
            id,
            chat_type: None,
            title: None,
            username: None,
        }
    }
}

impl From<i64> for Chat {
    fn from(id: i64) -> Self {
        Self::new(id)
    }
}
