//! hookbot binary: `me`, `send`, `serve`. Config from env (`.env` loaded first) and CLI args.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hookbot_cli::{load_config, serve, Cli, Commands, EchoHandler};
use hookbot_core::init_tracing;
use hookbot_telegram::{BotClient, Chat};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Me { token } => {
            let config = load_config(token)?;
            init_tracing(config.log_file.as_deref())?;
            let client = BotClient::connect(&config).await?;
            let me = client.identity();
            println!("id:         {}", me.id);
            println!("username:   @{}", me.username());
            println!("first_name: {}", me.first_name);
            Ok(())
        }
        Commands::Send {
            token,
            chat_id,
            text,
            button,
        } => {
            let config = load_config(token)?;
            init_tracing(config.log_file.as_deref())?;
            let client = BotClient::connect(&config).await?;
            for (label, data) in button {
                client.add_button(label, data);
                client.commit_row();
            }
            let sent = client
                .send_message(&Chat::new(chat_id), &text)
                .await
                .context("sendMessage failed")?;
            println!("sent message {} to chat {}", sent.message_id, sent.chat.id);
            Ok(())
        }
        Commands::Serve {
            token,
            listen,
            path,
        } => {
            let mut config = load_config(token)?;
            if let Some(listen) = listen {
                config.webhook_listen_addr = listen;
            }
            if let Some(path) = path {
                config.webhook_path = path;
            }
            // The echo handler answers inline keyboard presses.
            config.dispatch_callback_queries = true;
            config.validate()?;
            init_tracing(config.log_file.as_deref())?;

            let client = Arc::new(BotClient::connect(&config).await?);
            client.set_handler(EchoHandler::new(&client));
            serve(client, &config.webhook_listen_addr, &config.webhook_path).await
        }
    }
}
