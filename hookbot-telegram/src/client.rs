//! [`BotClient`]: identity, outbound API calls, pending keyboard and update dispatch.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use hookbot_core::{
    first_token, BotError, BotIdentity, Chat, InboundUpdate, InlineKeyboardMarkup,
    KeyboardBuilder, Message, Result,
};
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::api::{
    rejection_description, AnswerCallbackBody, ApiResponse, EditMessageBody, SendMessageBody,
    ANSWER_CALLBACK_QUERY, EDIT_MESSAGE_TEXT, GET_ME, SEND_MESSAGE,
};
use crate::config::BotConfig;
use crate::dispatch::{DispatchOutcome, Dispatcher, UpdateHandler};

/// A connection to one bot account.
///
/// Keyboard and handler state sit behind locks, so the client can be shared as
/// `Arc<BotClient>` between the webhook server and handler tasks. The pending keyboard is
/// attached to every `send_message` / `edit_message` while it has committed rows and is only
/// reset by [`clear_keyboard`](Self::clear_keyboard).
pub struct BotClient {
    http: reqwest::Client,
    /// `<api_url>/bot<token>`. Never logged.
    base_url: String,
    identity: BotIdentity,
    keyboard: Mutex<KeyboardBuilder>,
    dispatcher: Dispatcher,
    dispatch_callback_queries: bool,
}

impl BotClient {
    /// Connects with default settings for `token`.
    pub async fn new(token: impl Into<String>) -> Result<Self> {
        Self::connect(&BotConfig::with_token(token)).await
    }

    /// Validates `config`, fetches the bot identity via `getMe` and returns a ready client.
    /// Any failure of the identity fetch is returned as [`BotError::Initialization`].
    #[instrument(skip(config))]
    pub async fn connect(config: &BotConfig) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(config).map_err(BotError::initialization)?;
        let base_url = config.base_url();

        let identity = match fetch_identity(&http, &base_url).await {
            Ok(identity) => identity,
            Err(e) => {
                error!(error = %e, "Fetch bot details failed");
                return Err(BotError::initialization(e));
            }
        };

        info!(
            bot_id = identity.id,
            username = %identity.username(),
            "Bot identity fetched"
        );
        Ok(Self::assemble(config, http, base_url, identity))
    }

    /// Builds a client around an already known identity, without calling `getMe`.
    #[cfg(any(test, feature = "test-util"))]
    pub fn from_identity(config: &BotConfig, identity: BotIdentity) -> Result<Self> {
        config.validate()?;
        let http = build_http_client(config)?;
        Ok(Self::assemble(config, http, config.base_url(), identity))
    }

    fn assemble(
        config: &BotConfig,
        http: reqwest::Client,
        base_url: String,
        identity: BotIdentity,
    ) -> Self {
        Self {
            http,
            base_url,
            identity,
            keyboard: Mutex::new(KeyboardBuilder::new()),
            dispatcher: Dispatcher::new(config.max_concurrent_handlers),
            dispatch_callback_queries: config.dispatch_callback_queries,
        }
    }

    pub fn identity(&self) -> &BotIdentity {
        &self.identity
    }

    /// Bot username without `@`; empty if the bot has none.
    pub fn username(&self) -> &str {
        self.identity.username()
    }

    // --- Pending keyboard ---

    fn keyboard(&self) -> MutexGuard<'_, KeyboardBuilder> {
        self.keyboard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a button to the current keyboard row.
    pub fn add_button(&self, text: impl Into<String>, callback_data: impl Into<String>) {
        self.keyboard().add_button(text, callback_data);
    }

    /// Commits the current row (even when empty) and starts a new one.
    pub fn commit_row(&self) {
        self.keyboard().commit_row();
    }

    /// Drops every committed row and the current row.
    pub fn clear_keyboard(&self) {
        self.keyboard().clear();
    }

    /// Snapshot of the committed rows; `None` when none are committed.
    pub fn keyboard_markup(&self) -> Option<InlineKeyboardMarkup> {
        self.keyboard().markup()
    }

    // --- Handler and dispatch ---

    /// Registers the update handler, replacing any previous one.
    pub fn set_handler<H: UpdateHandler>(&self, handler: H) {
        self.dispatcher.set_handler(Arc::new(handler));
        info!("Update handler registered");
    }

    pub fn has_handler(&self) -> bool {
        self.dispatcher.has_handler()
    }

    /// Entry point for a webhook body. Malformed bodies are logged and discarded; the handler
    /// runs in its own task and is not awaited. Must be called within a Tokio runtime.
    pub fn dispatch(&self, body: &[u8]) -> DispatchOutcome {
        match InboundUpdate::from_slice(body) {
            Ok(update) => self.dispatch_update(update),
            Err(e) => {
                warn!(error = %e, "Couldn't parse incoming update");
                DispatchOutcome::Malformed
            }
        }
    }

    /// Derives the command token and hands an already parsed update to the handler.
    ///
    /// Updates whose text has no tokens are discarded, unless the client was configured with
    /// `dispatch_callback_queries` and the update carries a callback query.
    pub fn dispatch_update(&self, mut update: InboundUpdate) -> DispatchOutcome {
        if first_token(update.text()).is_none() {
            let is_callback = update.callback_query.is_some();
            if !(is_callback && self.dispatch_callback_queries) {
                debug!(
                    update_id = update.update_id,
                    is_callback, "Update without text, discarded"
                );
                return DispatchOutcome::Empty;
            }
        }
        update.resolve_command(self.username());
        self.dispatcher.dispatch(update)
    }

    /// Handler tasks spawned and not yet finished.
    pub fn in_flight_handlers(&self) -> usize {
        self.dispatcher.in_flight()
    }

    /// Stops dispatching and waits for in-flight handlers to finish.
    ///
    /// Stop the webhook listener first: deliveries arriving after this call are rejected with
    /// [`DispatchOutcome::ShuttingDown`] and never reach the handler.
    pub async fn shutdown(&self) {
        info!(in_flight = self.in_flight_handlers(), "Draining update handlers");
        self.dispatcher.shutdown().await;
    }

    // --- Outbound operations ---

    /// Sends `text` to `chat`, attaching the pending keyboard if it has committed rows.
    pub async fn send_message(&self, chat: &Chat, text: &str) -> Result<Message> {
        let markup = self.keyboard_markup();
        self.send_message_with_markup(chat, text, markup).await
    }

    /// Sends `text` to `chat` with explicit markup; the pending keyboard is ignored.
    #[instrument(skip(self, text, markup), fields(chat_id = chat.id))]
    pub async fn send_message_with_markup(
        &self,
        chat: &Chat,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let body = SendMessageBody::new(chat.id, text, markup);
        let sent: Message = self.call(SEND_MESSAGE, &body).await?;
        debug!(message_id = sent.message_id, "Message sent");
        Ok(sent)
    }

    /// Replaces the text of `message`, attaching the pending keyboard if it has committed rows.
    pub async fn edit_message(&self, message: &Message, text: &str) -> Result<Message> {
        let markup = self.keyboard_markup();
        self.edit_message_with_markup(message, text, markup).await
    }

    /// Replaces the text of `message` with explicit markup.
    #[instrument(
        skip(self, message, text, markup),
        fields(chat_id = message.chat.id, message_id = message.message_id)
    )]
    pub async fn edit_message_with_markup(
        &self,
        message: &Message,
        text: &str,
        markup: Option<InlineKeyboardMarkup>,
    ) -> Result<Message> {
        let body = EditMessageBody::new(message.chat.id, message.message_id, text, markup);
        let edited: Message = self.call(EDIT_MESSAGE_TEXT, &body).await?;
        debug!("Message edited");
        Ok(edited)
    }

    /// Acknowledges a callback button press.
    #[instrument(skip(self))]
    pub async fn answer_callback(&self, callback_query_id: &str) -> Result<()> {
        let body = AnswerCallbackBody { callback_query_id };
        let _: bool = self.call(ANSWER_CALLBACK_QUERY, &body).await?;
        Ok(())
    }

    /// POSTs `body` as JSON to `method` and unwraps the response envelope.
    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| {
            error!(method, error = %e, "Couldn't serialize request body");
            BotError::Decode(e)
        })?;

        let response = self
            .http
            .post(method_url(&self.base_url, method))
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(|e| {
                warn!(method, error = %e, "Couldn't reach the Bot API");
                transport_error(e)
            })?;

        read_envelope(method, response).await
    }
}

fn build_http_client(config: &BotConfig) -> Result<reqwest::Client> {
    let mut builder = reqwest::Client::builder();
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    builder.build().map_err(transport_error)
}

async fn fetch_identity(http: &reqwest::Client, base_url: &str) -> Result<BotIdentity> {
    let response = http
        .get(method_url(base_url, GET_ME))
        .send()
        .await
        .map_err(transport_error)?;
    read_envelope(GET_ME, response).await
}

/// Maps non-success status to [`BotError::RemoteRejection`] and decodes the envelope otherwise.
async fn read_envelope<T: DeserializeOwned>(
    method: &str,
    response: reqwest::Response,
) -> Result<T> {
    let status = response.status();
    let text = response.text().await.map_err(transport_error)?;

    if !status.is_success() {
        let description = rejection_description(&text);
        warn!(
            method,
            status = status.as_u16(),
            description = %description,
            "Bot API rejected the request"
        );
        return Err(BotError::RemoteRejection {
            status: status.as_u16(),
            description,
        });
    }

    let envelope: ApiResponse<T> = serde_json::from_str(&text).map_err(|e| {
        warn!(method, error = %e, "Couldn't decode Bot API response");
        BotError::Decode(e)
    })?;
    envelope.into_result(status.as_u16())
}

fn method_url(base_url: &str, method: &str) -> String {
    format!("{}/{}", base_url, method)
}

/// reqwest errors embed the request URL, which carries the token; strip it before surfacing.
fn transport_error(e: reqwest::Error) -> BotError {
    BotError::Transport(e.without_url().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    const TOKEN: &str = "123:abc";

    fn identity() -> BotIdentity {
        BotIdentity {
            id: 1,
            is_bot: true,
            first_name: "Test".to_string(),
            username: Some("MyBot".to_string()),
        }
    }

    fn offline_client() -> BotClient {
        BotClient::from_identity(&BotConfig::with_token(TOKEN), identity()).unwrap()
    }

    /// Client whose API host refuses connections.
    fn unreachable_client() -> BotClient {
        let config = BotConfig::with_token(TOKEN).with_api_url("http://127.0.0.1:1");
        BotClient::from_identity(&config, identity()).unwrap()
    }

    fn counting_handler(client: &BotClient) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        client.set_handler(move |_update: InboundUpdate| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
        });
        calls
    }

    const CALLBACK_ONLY: &[u8] = br#"{
        "update_id": 1,
        "callback_query": { "id": "q", "from": { "id": 2, "first_name": "A" }, "data": "x" }
    }"#;

    fn assert_transport_without_token(result: Result<impl std::fmt::Debug>) {
        match result {
            Err(BotError::Transport(message)) => {
                assert!(!message.contains(TOKEN), "token leaked: {message}");
                assert!(!message.contains("bot123"), "URL leaked: {message}");
            }
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_method_url() {
        assert_eq!(
            method_url("https://api.telegram.org/bot1:x", SEND_MESSAGE),
            "https://api.telegram.org/bot1:x/sendMessage"
        );
    }

    #[test]
    fn test_keyboard_is_not_cleared_by_snapshot() {
        let client = offline_client();
        client.add_button("A", "a");
        client.commit_row();
        assert!(client.keyboard_markup().is_some());
        assert!(client.keyboard_markup().is_some());
        client.clear_keyboard();
        assert!(client.keyboard_markup().is_none());
    }

    #[test]
    fn test_from_identity_rejects_invalid_config() {
        let identity = BotIdentity {
            id: 1,
            is_bot: true,
            first_name: String::new(),
            username: None,
        };
        let config = BotConfig::with_token("t").with_api_url("nope");
        assert!(matches!(
            BotClient::from_identity(&config, identity),
            Err(BotError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_text_is_not_dispatched() {
        let client = offline_client();
        let calls = counting_handler(&client);
        let outcome =
            client.dispatch(br#"{"message":{"message_id":1,"chat":{"id":1},"text":"   "}}"#);
        assert_eq!(outcome, DispatchOutcome::Empty);
        client.shutdown().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_callback_only_update_is_discarded_by_default() {
        let client = offline_client();
        let calls = counting_handler(&client);

        assert_eq!(client.dispatch(CALLBACK_ONLY), DispatchOutcome::Empty);
        client.shutdown().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_callback_only_update_is_dispatched_when_enabled() {
        let config = BotConfig::with_token(TOKEN).with_dispatch_callback_queries(true);
        let client = BotClient::from_identity(&config, identity()).unwrap();
        let calls = counting_handler(&client);

        assert_eq!(client.dispatch(CALLBACK_ONLY), DispatchOutcome::Dispatched);
        // Still nothing to do for an update with neither text nor callback.
        assert_eq!(
            client.dispatch(br#"{"update_id":2,"message":{"message_id":1,"chat":{"id":1}}}"#),
            DispatchOutcome::Empty
        );
        client.shutdown().await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_outbound_transport_failure_hides_token() {
        let client = unreachable_client();
        let chat = Chat::new(42);
        let message = Message {
            message_id: 7,
            chat: chat.clone(),
            from: None,
            date: 0,
            text: None,
        };

        assert_transport_without_token(client.send_message(&chat, "hi").await);
        assert_transport_without_token(client.edit_message(&message, "edited").await);
        assert_transport_without_token(client.answer_callback("q").await);
    }
}
