//! Webhook receiver: one POST route that feeds request bodies to [`BotClient::dispatch`].
//! Always answers 200 so the Bot API does not redeliver updates the client chose to discard.

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::Router;
use hookbot_telegram::BotClient;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info};

pub fn webhook_router(client: Arc<BotClient>, path: &str) -> Router {
    Router::new()
        .route(path, post(receive_update))
        .with_state(client)
        .layer(TraceLayer::new_for_http())
}

async fn receive_update(State(client): State<Arc<BotClient>>, body: Bytes) -> StatusCode {
    let outcome = client.dispatch(&body);
    debug!(outcome = ?outcome, "Webhook delivery handled");
    StatusCode::OK
}

/// Serves the webhook until Ctrl-C, then drains in-flight handlers.
pub async fn serve(client: Arc<BotClient>, listen_addr: &str, path: &str) -> Result<()> {
    let app = webhook_router(Arc::clone(&client), path);
    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", listen_addr))?;
    info!(listen_addr, path, username = %client.username(), "Webhook server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Webhook server failed")?;

    client.shutdown().await;
    info!("Webhook server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for ctrl+c");
    }
}
