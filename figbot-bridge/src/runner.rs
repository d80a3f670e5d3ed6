//! Event loop: every inbound message is handed to the dispatcher in its own task.
//! Talks to the gateway via [`BridgeClient`] and to the commands via [`dispatcher::Dispatcher`].

use anyhow::{Context, Result};
use dispatcher::{BotSettings, Dispatcher};
use figbot_core::{InboundEvent, RandomDelay};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{info, instrument, warn};

use crate::bridge_client::BridgeClient;
use crate::config::BridgeConfig;

/// Connects to the gateway, subscribes, and serves messages until Ctrl-C or the gateway goes away.
#[instrument(skip_all, fields(bridge_addr = %config.bridge_addr))]
pub async fn run_bridge(config: BridgeConfig, settings: BotSettings) -> Result<()> {
    let (client, events) = BridgeClient::connect(&config.bridge_addr, config.request_timeout)
        .await
        .context("Connect to gateway (check BRIDGE_ADDR)")?;
    client
        .subscribe()
        .await
        .context("Subscribe to gateway messages")?;

    let dispatcher = Arc::new(Dispatcher::new(client, Arc::new(RandomDelay), settings));
    info!("Bot started, waiting for messages");

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };
    serve(events, dispatcher, shutdown).await
}

/// Dispatches each received event without waiting for earlier ones to finish. Returns `Ok` on
/// `shutdown`, an error if the event stream closes first.
pub async fn serve(
    mut events: mpsc::UnboundedReceiver<InboundEvent>,
    dispatcher: Arc<Dispatcher>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            received = events.recv() => match received {
                Some(event) => {
                    match &event.text {
                        Some(text) => info!(
                            chat = %event.chat,
                            sender = %event.sender,
                            message_id = %event.id,
                            message_content = %text,
                            "Received message"
                        ),
                        None => info!(
                            chat = %event.chat,
                            sender = %event.sender,
                            message_id = %event.id,
                            "Received non-text message"
                        ),
                    }
                    dispatcher.spawn(event);
                }
                None => {
                    warn!("Gateway event stream closed");
                    anyhow::bail!("gateway connection closed");
                }
            },
            _ = &mut shutdown => {
                info!("Shutdown requested");
                return Ok(());
            }
        }
    }
}
