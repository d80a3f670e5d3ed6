//! Messaging client abstraction.
//!
//! [`MessagingClient`] is transport-agnostic and exposes exactly the operations the bot needs from the
//! underlying protocol client. Production uses the bridge adapter; tests substitute a fake.

use crate::error::Result;
use crate::types::{
    ChatPresence, ChatPresenceMedia, Jid, MediaKind, MediaRef, OutboundMessage, Presence,
    SendReceipt, UploadReceipt,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Sends read receipts for `message_ids` in `chat`, attributed to `sender`.
    async fn mark_read(
        &self,
        message_ids: &[String],
        timestamp: DateTime<Utc>,
        chat: &Jid,
        sender: &Jid,
    ) -> Result<()>;
    /// Sets the account-level presence.
    async fn send_presence(&self, presence: Presence) -> Result<()>;
    /// Sets the chat-level presence (typing indicator).
    async fn send_chat_presence(
        &self,
        chat: &Jid,
        state: ChatPresence,
        media: ChatPresenceMedia,
    ) -> Result<()>;
    /// Sends a message and returns the server receipt.
    async fn send_message(&self, message: &OutboundMessage) -> Result<SendReceipt>;
    /// Downloads and decrypts a media payload.
    async fn download(&self, media: &MediaRef) -> Result<Vec<u8>>;
    /// Encrypts and uploads a media payload.
    async fn upload(&self, data: &[u8], kind: MediaKind) -> Result<UploadReceipt>;
}
