//! Implements [`figbot_core::MessagingClient`] over a gateway daemon connection.
//!
//! One TCP connection carries both directions. Requests are written under a lock; a reader task
//! matches responses to waiting callers by id and forwards `message` notifications as core events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use figbot_core::{
    ChatPresence, ChatPresenceMedia, FigbotError, InboundEvent, Jid, MediaKind, MediaRef,
    MessagingClient, OutboundMessage, Presence, Result, SendReceipt, ToCoreEvent, UploadReceipt,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, instrument, warn};

use crate::adapters::WireEventWrapper;
use crate::protocol::{self, method, Frame, Request, RpcError};

type Waiters = HashMap<u64, oneshot::Sender<std::result::Result<Value, RpcError>>>;
/// Requests awaiting a response; `None` once the connection has ended.
type Pending = Arc<Mutex<Option<Waiters>>>;

pub struct BridgeClient {
    writer: tokio::sync::Mutex<OwnedWriteHalf>,
    pending: Pending,
    next_id: AtomicU64,
    request_timeout: Duration,
}

fn lock_error<T>(e: std::sync::PoisonError<T>) -> FigbotError {
    FigbotError::Client(format!("Lock error: {}", e))
}

impl BridgeClient {
    /// Connects to the gateway and starts the reader task. Inbound chat messages arrive on the
    /// returned receiver; it closes when the connection does. The receiver is unbounded: a backlog
    /// pushed before it is drained must not block response routing.
    #[instrument(skip(request_timeout))]
    pub async fn connect(
        addr: &str,
        request_timeout: Duration,
    ) -> Result<(Arc<Self>, mpsc::UnboundedReceiver<InboundEvent>)> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            FigbotError::Client(format!("Failed to connect to gateway at {}: {}", addr, e))
        })?;
        let (read_half, write_half) = stream.into_split();
        info!(addr = %addr, "Connected to gateway");

        let pending: Pending = Arc::new(Mutex::new(Some(HashMap::new())));
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(read_loop(read_half, Arc::clone(&pending), tx));

        let client = Arc::new(Self {
            writer: tokio::sync::Mutex::new(write_half),
            pending,
            next_id: AtomicU64::new(1),
            request_timeout,
        });
        Ok((client, rx))
    }

    /// Asks the gateway to start forwarding chat messages.
    pub async fn subscribe(&self) -> Result<()> {
        info!("Subscribing to messages...");
        self.request(method::SUBSCRIBE, json!({})).await?;
        Ok(())
    }

    async fn request(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = oneshot::channel();
        match self.pending.lock().map_err(lock_error)?.as_mut() {
            Some(waiters) => waiters.insert(id, tx),
            None => {
                return Err(FigbotError::Client(format!(
                    "{}: gateway connection closed",
                    method
                )))
            }
        };

        let line = serde_json::to_string(&Request::new(id, method, params))
            .map_err(|e| FigbotError::Client(format!("Failed to encode {}: {}", method, e)))?
            + "\n";
        debug!(id, method, bytes = line.len(), "Sending request");

        let written = {
            let mut writer = self.writer.lock().await;
            match writer.write_all(line.as_bytes()).await {
                Ok(()) => writer.flush().await,
                Err(e) => Err(e),
            }
        };
        if let Err(e) = written {
            self.forget(id);
            return Err(FigbotError::Client(format!("{} not sent: {}", method, e)));
        }

        let outcome = match tokio::time::timeout(self.request_timeout, rx).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => {
                return Err(FigbotError::Client(format!(
                    "{}: gateway connection closed",
                    method
                )))
            }
            Err(_) => {
                self.forget(id);
                return Err(FigbotError::Client(format!(
                    "{}: no response within {:?}",
                    method, self.request_timeout
                )));
            }
        };
        outcome.map_err(|e| FigbotError::Client(format!("{} failed: {}", method, e)))
    }

    async fn request_as<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let value = self.request(method, params).await?;
        serde_json::from_value(value)
            .map_err(|e| FigbotError::Client(format!("{}: unexpected result: {}", method, e)))
    }

    fn forget(&self, id: u64) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(waiters) = pending.as_mut() {
                waiters.remove(&id);
            }
        }
    }
}

/// Routes every line from the gateway until the connection ends, then fails all waiting requests.
async fn read_loop(
    read_half: OwnedReadHalf,
    pending: Pending,
    events: mpsc::UnboundedSender<InboundEvent>,
) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Error reading from gateway");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match protocol::parse_frame(&line) {
            Ok(Frame::Response { id, outcome }) => {
                let waiter = pending
                    .lock()
                    .ok()
                    .and_then(|mut p| p.as_mut().and_then(|waiters| waiters.remove(&id)));
                match waiter {
                    Some(waiter) => {
                        let _ = waiter.send(outcome);
                    }
                    None => debug!(id, "Response for unknown request"),
                }
            }
            Ok(Frame::Message(wire)) => {
                let event = WireEventWrapper(&wire).to_core();
                debug!(chat = %event.chat, message_id = %event.id, "Message from gateway");
                if events.send(event).is_err() {
                    warn!("Event receiver dropped, stopping reader");
                    break;
                }
            }
            Ok(Frame::Ignored(method)) => debug!(method = %method, "Ignoring notification"),
            Err(e) => warn!(error = %e, "Malformed frame from gateway"),
        }
    }

    if let Ok(mut pending) = pending.lock() {
        *pending = None;
    }
    warn!("Gateway receive loop ended");
}

#[async_trait]
impl MessagingClient for BridgeClient {
    async fn mark_read(
        &self,
        message_ids: &[String],
        timestamp: DateTime<Utc>,
        chat: &Jid,
        sender: &Jid,
    ) -> Result<()> {
        self.request(
            method::MARK_READ,
            protocol::mark_read_params(message_ids, timestamp, chat, sender),
        )
        .await?;
        Ok(())
    }

    async fn send_presence(&self, presence: Presence) -> Result<()> {
        self.request(method::SEND_PRESENCE, protocol::presence_params(presence))
            .await?;
        Ok(())
    }

    async fn send_chat_presence(
        &self,
        chat: &Jid,
        state: ChatPresence,
        media: ChatPresenceMedia,
    ) -> Result<()> {
        self.request(
            method::SEND_CHAT_PRESENCE,
            protocol::chat_presence_params(chat, state, media),
        )
        .await?;
        Ok(())
    }

    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt> {
        let sent: protocol::SendResult = self
            .request_as(method::SEND_MESSAGE, protocol::send_message_params(message))
            .await?;
        Ok(SendReceipt {
            id: sent.id,
            timestamp: protocol::from_unix_seconds(sent.timestamp),
        })
    }

    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>> {
        let downloaded: protocol::DownloadResult = self
            .request_as(method::DOWNLOAD, protocol::download_params(media))
            .await?;
        Ok(downloaded.data)
    }

    async fn upload(&self, data: &[u8], kind: MediaKind) -> Result<UploadReceipt> {
        let uploaded: protocol::UploadResult = self
            .request_as(method::UPLOAD, protocol::upload_params(data, kind))
            .await?;
        Ok(uploaded.into())
    }
}
