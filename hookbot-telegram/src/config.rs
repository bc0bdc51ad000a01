//! Client configuration. Loaded from env: BOT_TOKEN, TELEGRAM_API_URL, MAX_CONCURRENT_HANDLERS,
//! REQUEST_TIMEOUT_SECS, LOG_FILE, WEBHOOK_LISTEN_ADDR, WEBHOOK_PATH, DISPATCH_CALLBACK_QUERIES.

use std::env;
use std::time::Duration;

use hookbot_core::{BotError, Result};

use crate::api::DEFAULT_API_URL;

const DEFAULT_MAX_CONCURRENT_HANDLERS: usize = 64;
const DEFAULT_WEBHOOK_LISTEN_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_WEBHOOK_PATH: &str = "/webhook";

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// BOT_TOKEN
    pub bot_token: String,
    /// TELEGRAM_API_URL; API host the `/bot<token>` base URL is built on
    pub api_url: String,
    /// MAX_CONCURRENT_HANDLERS; handler invocations allowed to run at once
    pub max_concurrent_handlers: usize,
    /// REQUEST_TIMEOUT_SECS; per-request timeout, transport default when unset
    pub request_timeout_secs: Option<u64>,
    /// LOG_FILE
    pub log_file: Option<String>,
    /// WEBHOOK_LISTEN_ADDR
    pub webhook_listen_addr: String,
    /// WEBHOOK_PATH
    pub webhook_path: String,
    /// DISPATCH_CALLBACK_QUERIES; hand callback-query updates without message text to the
    /// handler. Off by default: updates with no text tokens are discarded.
    pub dispatch_callback_queries: bool,
}

impl BotConfig {
    /// Load from environment variables. `token` overrides BOT_TOKEN if provided.
    pub fn load(token: Option<String>) -> Result<Self> {
        let bot_token = match token {
            Some(token) => token,
            None => env::var("BOT_TOKEN")
                .map_err(|_| BotError::Config("BOT_TOKEN not set".to_string()))?,
        };
        let api_url = env::var("TELEGRAM_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let max_concurrent_handlers = parse_env("MAX_CONCURRENT_HANDLERS")?
            .unwrap_or(DEFAULT_MAX_CONCURRENT_HANDLERS);
        let request_timeout_secs = parse_env("REQUEST_TIMEOUT_SECS")?;
        let log_file = env::var("LOG_FILE").ok();
        let webhook_listen_addr = env::var("WEBHOOK_LISTEN_ADDR")
            .unwrap_or_else(|_| DEFAULT_WEBHOOK_LISTEN_ADDR.to_string());
        let webhook_path =
            env::var("WEBHOOK_PATH").unwrap_or_else(|_| DEFAULT_WEBHOOK_PATH.to_string());
        let dispatch_callback_queries = parse_flag("DISPATCH_CALLBACK_QUERIES")?.unwrap_or(false);

        Ok(Self {
            bot_token,
            api_url,
            max_concurrent_handlers,
            request_timeout_secs,
            log_file,
            webhook_listen_addr,
            webhook_path,
            dispatch_callback_queries,
        })
    }

    /// Config with the given token and defaults for everything else.
    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_url: DEFAULT_API_URL.to_string(),
            max_concurrent_handlers: DEFAULT_MAX_CONCURRENT_HANDLERS,
            request_timeout_secs: None,
            log_file: None,
            webhook_listen_addr: DEFAULT_WEBHOOK_LISTEN_ADDR.to_string(),
            webhook_path: DEFAULT_WEBHOOK_PATH.to_string(),
            dispatch_callback_queries: false,
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_max_concurrent_handlers(mut self, max: usize) -> Self {
        self.max_concurrent_handlers = max;
        self
    }

    pub fn with_dispatch_callback_queries(mut self, enabled: bool) -> Self {
        self.dispatch_callback_queries = enabled;
        self
    }

    /// Validate config; call after load() to fail fast before connecting.
    pub fn validate(&self) -> Result<()> {
        if self.bot_token.trim().is_empty() {
            return Err(BotError::Config("bot token is empty".to_string()));
        }
        if reqwest::Url::parse(&self.api_url).is_err() {
            return Err(BotError::Config(format!(
                "TELEGRAM_API_URL is not a valid URL: {}",
                self.api_url
            )));
        }
        if self.max_concurrent_handlers == 0 {
            return Err(BotError::Config(
                "MAX_CONCURRENT_HANDLERS must be at least 1".to_string(),
            ));
        }
        if !self.webhook_path.starts_with('/') {
            return Err(BotError::Config(format!(
                "WEBHOOK_PATH must start with '/': {}",
                self.webhook_path
            )));
        }
        Ok(())
    }

    /// `<api_url>/bot<token>`; method paths are appended to this.
    pub fn base_url(&self) -> String {
        format!("{}/bot{}", self.api_url.trim_end_matches('/'), self.bot_token)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| BotError::Config(format!("{} is not a valid number: {}", key, raw))),
        Err(_) => Ok(None),
    }
}

fn parse_flag(key: &str) -> Result<Option<bool>> {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(Some(true)),
            "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
            _ => Err(BotError::Config(format!("{} is not a valid flag: {}", key, raw))),
        },
        Err(_) => Ok(None),
    }
}
