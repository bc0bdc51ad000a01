//! # hookbot-telegram
//!
//! [`BotClient`] wraps the Telegram Bot HTTP API: it fetches the bot identity on connect, sends
//! and edits messages (attaching the pending inline keyboard), answers callback queries, and
//! dispatches webhook updates to one registered [`UpdateHandler`].
//!
//! The webhook HTTP server is left to the embedding application; it passes request bodies to
//! [`BotClient::dispatch`].

mod api;
mod client;
mod config;
mod dispatch;

pub use api::{ApiResponse, DEFAULT_API_URL};
pub use client::BotClient;
pub use config::BotConfig;
pub use dispatch::{DispatchOutcome, UpdateHandler};

pub use hookbot_core::{
    BotError, BotIdentity, CallbackQuery, Chat, InboundUpdate, InlineButton,
    InlineKeyboardMarkup, KeyboardBuilder, Message, Result, User,
};
