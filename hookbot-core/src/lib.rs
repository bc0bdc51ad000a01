//! # hookbot-core
//!
//! Telegram Bot API wire types ([`InboundUpdate`], [`Message`], [`Chat`], [`User`]), the inline
//! [`KeyboardBuilder`], command-token extraction, the [`BotError`] taxonomy and tracing setup.
//! Transport-agnostic; the HTTP client lives in hookbot-telegram.

pub mod command;
pub mod error;
pub mod keyboard;
pub mod logger;
pub mod types;

pub use command::{extract_command, first_token};
pub use error::{BotError, Result};
pub use keyboard::{InlineButton, InlineKeyboardMarkup, KeyboardBuilder};
pub use logger::init_tracing;
pub use types::{BotIdentity, CallbackQuery, Chat, InboundUpdate, Message, User};
