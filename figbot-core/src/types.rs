//! Core types: addresses, inbound events, quoted context, media references, outbound messages.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::FigbotError;

/// Messaging address (`user@server`). The user part may carry a device suffix (`user:7@server`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Jid {
    pub user: String,
    pub server: String,
}

/// Server of group chats.
pub const GROUP_SERVER: &str = "g.us";

impl Jid {
    pub fn new(user: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            server: server.into(),
        }
    }

    /// Drops the device suffix from the user part, keeping the server.
    pub fn without_device(&self) -> Jid {
        let user = self.user.split(':').next().unwrap_or_default();
        Jid::new(user, self.server.clone())
    }

    /// True for group chat addresses.
    pub fn is_group(&self) -> bool {
        self.server == GROUP_SERVER
    }
}

impl FromStr for Jid {
    type Err = FigbotError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();
        match s.rsplit_once('@') {
            Some((user, server)) if !server.is_empty() => Ok(Jid::new(user, server)),
            Some(_) => Err(FigbotError::Client(format!("Invalid address: {}", s))),
            None if !s.is_empty() => Ok(Jid::new(s, "")),
            None => Err(FigbotError::Client("Empty address".to_string())),
        }
    }
}

impl TryFrom<String> for Jid {
    type Error = FigbotError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Jid> for String {
    fn from(jid: Jid) -> Self {
        jid.to_string()
    }
}

impl fmt::Display for Jid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.server.is_empty() {
            write!(f, "{}", self.user)
        } else {
            write!(f, "{}@{}", self.user, self.server)
        }
    }
}

/// Handle for downloading an encrypted media payload through the messaging client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub direct_path: String,
    pub url: Option<String>,
    pub media_key: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_length: u64,
    pub mimetype: String,
}

/// Payload of the message being replied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuotedPayload {
    Image(MediaRef),
    Text(String),
    /// Any other media (video, audio, sticker, document...), named by kind.
    OtherMedia { kind: String },
}

/// Reply context of an inbound message. Counts as a quotation only when `stanza_id` is non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuotedContext {
    pub stanza_id: String,
    pub participant: Option<Jid>,
    pub payload: Option<QuotedPayload>,
}

/// One received message. Lives for the duration of a single dispatch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InboundEvent {
    pub id: String,
    pub sender: Jid,
    pub chat: Jid,
    pub is_group: bool,
    pub timestamp: DateTime<Utc>,
    /// Plain conversation text, or the extended-text body. `None` for non-text messages.
    pub text: Option<String>,
    pub quoted: Option<QuotedContext>,
}

impl InboundEvent {
    /// Back-reference to this message, so a reply renders threaded under it.
    pub fn quote_ref(&self) -> QuoteRef {
        QuoteRef {
            stanza_id: self.id.clone(),
            participant: self.sender.without_device(),
            quoted_text: self.text.clone(),
        }
    }
}

/// Quote attached to an outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRef {
    pub stanza_id: String,
    pub participant: Jid,
    pub quoted_text: Option<String>,
}

/// What the upload step returns: everything a media message needs to reference the blob.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub url: String,
    pub direct_path: String,
    pub media_key: Vec<u8>,
    pub file_enc_sha256: Vec<u8>,
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerPayload {
    pub upload: UploadReceipt,
    pub mimetype: String,
    pub width: u32,
    pub height: u32,
    /// Preview image; the sticker before metadata injection.
    pub thumbnail: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutboundPayload {
    Text(String),
    Sticker(StickerPayload),
}

/// Message handed to [`crate::MessagingClient::send_message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub chat: Jid,
    pub payload: OutboundPayload,
    pub quote: Option<QuoteRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendReceipt {
    pub id: String,
    pub timestamp: DateTime<Utc>,
}

/// Account-level presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Presence {
    Available,
    Unavailable,
}

impl Presence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Available => "available",
            Presence::Unavailable => "unavailable",
        }
    }
}

/// Chat-level presence shown to the other party.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatPresence {
    Composing,
    Paused,
}

impl ChatPresence {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatPresence::Composing => "composing",
            ChatPresence::Paused => "paused",
        }
    }
}

/// Media class of a chat presence; `Text` is the plain typing indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChatPresenceMedia {
    Text,
}

impl ChatPresenceMedia {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChatPresenceMedia::Text => "",
        }
    }
}

/// Upload category; decides the encryption keys the client derives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaKind {
    Image,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Image => "image",
        }
    }
}

/// Converts a transport-specific message type to a core [`InboundEvent`].
pub trait ToCoreEvent: Send + Sync {
    fn to_core(&self) -> InboundEvent;
}
