//! Bot API wire types: user, chat, message, callback query and inbound update.
//!
//! One file per main type. Field names follow the Bot API JSON so the types deserialize
//! webhook payloads and API results directly.

mod callback;
mod chat;
mod message;
mod update;
mod user;

pub use callback::CallbackQuery;
pub use chat::Chat;
pub use message::Message;
pub use update::InboundUpdate;
pub use user::{BotIdentity, User};
