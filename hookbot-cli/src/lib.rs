//! # hookbot-cli
//!
//! Embedding application for [`hookbot_telegram::BotClient`]: argument parsing, config loading,
//! the axum webhook receiver and the demo echo handler.

pub mod cli;
pub mod echo;
pub mod webhook;

pub use cli::{load_config, parse_button, Cli, Commands};
pub use echo::EchoHandler;
pub use webhook::{serve, webhook_router};
