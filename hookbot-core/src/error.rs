//! Error types for the bot client.
//!
//! [`BotError`] covers initialization, JSON decoding, transport, remote rejection, config and IO.

use thiserror::Error;

/// Top-level error for hookbot.
#[derive(Error, Debug)]
pub enum BotError {
    /// `getMe` failed while constructing the client; wraps the underlying cause.
    #[error("Initialization error: {0}")]
    Initialization(#[source] Box<BotError>),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status or an `ok: false` envelope from the Bot API.
    #[error("Remote rejection (status {status}): {description}")]
    RemoteRejection { status: u16, description: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BotError {
    pub fn initialization(cause: BotError) -> Self {
        BotError::Initialization(Box::new(cause))
    }

    /// HTTP status of a remote rejection, looking through `Initialization`.
    pub fn status(&self) -> Option<u16> {
        match self {
            BotError::RemoteRejection { status, .. } => Some(*status),
            BotError::Initialization(cause) => cause.status(),
            _ => None,
        }
    }
}

/// Result type for hookbot operations; uses [`BotError`].
pub type Result<T> = std::result::Result<T, BotError>;
