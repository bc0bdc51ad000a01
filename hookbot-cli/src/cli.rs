//! CLI parser and config loading.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use hookbot_telegram::BotConfig;

#[derive(Parser)]
#[command(name = "hookbot")]
#[command(about = "Telegram Bot API client CLI: me, send, serve", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Connect and print the bot identity (getMe).
    Me {
        #[arg(short, long)]
        token: Option<String>,
    },
    /// Send one message; each --button becomes its own keyboard row.
    Send {
        #[arg(short, long)]
        token: Option<String>,
        #[arg(short, long, allow_negative_numbers = true)]
        chat_id: i64,
        #[arg(long)]
        text: String,
        /// Inline button as `text=callback_data`.
        #[arg(short, long, value_parser = parse_button)]
        button: Vec<(String, String)>,
    },
    /// Run the webhook server with the echo handler.
    Serve {
        #[arg(short, long)]
        token: Option<String>,
        /// Overrides WEBHOOK_LISTEN_ADDR.
        #[arg(short, long)]
        listen: Option<String>,
        /// Overrides WEBHOOK_PATH.
        #[arg(short, long)]
        path: Option<String>,
    },
}

/// Load BotConfig from environment. If `token` is provided it overrides BOT_TOKEN.
pub fn load_config(token: Option<String>) -> Result<BotConfig> {
    let config = BotConfig::load(token).context("Failed to load bot config")?;
    config.validate().context("Invalid bot config")?;
    Ok(config)
}

/// Parses `text=callback_data`. The split is on the first `=`, so data may contain `=`.
pub fn parse_button(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((text, data)) if !text.is_empty() && !data.is_empty() => {
            Ok((text.to_string(), data.to_string()))
        }
        _ => Err(format!("expected text=callback_data, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_button() {
        assert_eq!(
            parse_button("Yes=answer=y").unwrap(),
            ("Yes".to_string(), "answer=y".to_string())
        );
        assert!(parse_button("Yes").is_err());
        assert!(parse_button("=y").is_err());
        assert!(parse_button("Yes=").is_err());
    }

    #[test]
    fn test_send_args() {
        let cli = Cli::try_parse_from([
            "hookbot", "send", "--chat-id", "-100", "--text", "hi", "-b", "A=a", "-b", "B=b",
        ])
        .unwrap();
        match cli.command {
            Commands::Send {
                chat_id, button, ..
            } => {
                assert_eq!(chat_id, -100);
                assert_eq!(button.len(), 2);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
