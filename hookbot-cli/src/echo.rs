//! Demo update handler used by `hookbot serve`: greets on `/start` with an inline keyboard,
//! echoes other text, and answers button presses.

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use hookbot_telegram::{BotClient, CallbackQuery, InboundUpdate, KeyboardBuilder, Message};
use tracing::{error, info};

/// Holds a weak reference because the client owns its handler.
pub struct EchoHandler {
    client: Weak<BotClient>,
}

impl EchoHandler {
    pub fn new(client: &Arc<BotClient>) -> Self {
        Self {
            client: Arc::downgrade(client),
        }
    }

    async fn on_callback(&self, client: &BotClient, query: CallbackQuery) {
        if let Err(e) = client.answer_callback(&query.id).await {
            error!(callback_query_id = %query.id, error = %e, "Failed to answer callback");
            return;
        }
        let Some(message) = query.message else {
            return;
        };
        let picked = query.data.unwrap_or_default();
        if let Err(e) = client
            .edit_message_with_markup(&message, &format!("You picked: {}", picked), None)
            .await
        {
            error!(chat_id = message.chat.id, error = %e, "Failed to edit message");
        }
    }

    async fn on_message(&self, client: &BotClient, message: &Message, command: Option<&str>) {
        let chat_id = message.chat.id;
        let result = match command {
            Some("/start") => {
                let name = message
                    .from
                    .as_ref()
                    .map(|u| u.first_name.as_str())
                    .unwrap_or("there");
                let keyboard = KeyboardBuilder::new()
                    .button("Option A", "opt_a")
                    .button("Option B", "opt_b")
                    .row()
                    .button("Help", "help")
                    .build();
                let greeting = format!("Hello, {}!", name);
                client
                    .send_message_with_markup(&message.chat, &greeting, Some(keyboard))
                    .await
            }
            _ => {
                client
                    .send_message(&message.chat, &format!("Echo: {}", message.text()))
                    .await
            }
        };
        match result {
            Ok(_) => info!(chat_id, command = ?command, "Sent reply"),
            Err(e) => error!(chat_id, error = %e, "Failed to send reply"),
        }
    }
}

#[async_trait]
impl hookbot_telegram::UpdateHandler for EchoHandler {
    async fn handle(&self, update: InboundUpdate) {
        let Some(client) = self.client.upgrade() else {
            return;
        };
        let command = update.command.clone();
        if let Some(query) = update.callback_query {
            self.on_callback(&client, query).await;
        } else if let Some(message) = update.message.as_ref() {
            self.on_message(&client, message, command.as_deref()).await;
        }
    }
}
