//! Shared mockito fixtures for BotClient integration tests.

#![allow(dead_code)]

use hookbot_telegram::{BotClient, BotConfig};

/// Request paths are `/bot<token>/<method>`.
pub const TEST_BOT_TOKEN: &str = "test_bot_token_12345";

pub fn path(method: &str) -> String {
    format!("/bot{}/{}", TEST_BOT_TOKEN, method)
}

pub fn config_for(server: &mockito::ServerGuard) -> BotConfig {
    BotConfig::with_token(TEST_BOT_TOKEN).with_api_url(server.url())
}

/// Registers a successful getMe for bot `MyBot`. Hold the returned mock until connect completes.
pub async fn mock_get_me(server: &mut mockito::ServerGuard) -> mockito::Mock {
    server
        .mock("GET", path("getMe").as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
            "ok": true,
            "result": {
                "id": 123456789,
                "is_bot": true,
                "first_name": "TestBot",
                "username": "MyBot"
            }
        }"#,
        )
        .create_async()
        .await
}

/// Connected client against `server` with the given handler cap.
pub async fn connected_client(server: &mut mockito::ServerGuard, max_handlers: usize) -> BotClient {
    let config = config_for(server).with_max_concurrent_handlers(max_handlers);
    connect_with(server, &config).await
}

/// Connected client against `server` using `config`, which must point at `server`.
pub async fn connect_with(server: &mut mockito::ServerGuard, config: &BotConfig) -> BotClient {
    let _get_me = mock_get_me(server).await;
    BotClient::connect(config)
        .await
        .expect("connect against mock server")
}

pub fn sent_message_body(chat_id: i64, message_id: i64, text: &str) -> String {
    serde_json::json!({
        "ok": true,
        "result": {
            "message_id": message_id,
            "date": 1700000000,
            "chat": { "id": chat_id, "type": "private" },
            "text": text
        }
    })
    .to_string()
}
