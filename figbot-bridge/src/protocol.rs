//! Wire format spoken with the gateway daemon: newline-delimited JSON-RPC 2.0.
//!
//! Requests carry an `id`; the gateway answers each with a response of the same `id`. Inbound chat
//! messages arrive as `message` notifications (no `id`). Binary fields travel as standard base64.

use chrono::{DateTime, Utc};
use figbot_core::{
    ChatPresence, ChatPresenceMedia, Jid, MediaKind, MediaRef, OutboundMessage, OutboundPayload,
    Presence, UploadReceipt,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;

pub const JSONRPC_VERSION: &str = "2.0";
pub const MESSAGE_NOTIFICATION: &str = "message";

pub mod method {
    pub const SUBSCRIBE: &str = "subscribe";
    pub const MARK_READ: &str = "markRead";
    pub const SEND_PRESENCE: &str = "sendPresence";
    pub const SEND_CHAT_PRESENCE: &str = "sendChatPresence";
    pub const SEND_MESSAGE: &str = "sendMessage";
    pub const DOWNLOAD: &str = "download";
    pub const UPLOAD: &str = "upload";
}

mod base64_bytes {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD.decode(encoded).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Serialize)]
pub struct Request<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: Value,
}

impl<'a> Request<'a> {
    pub fn new(id: u64, method: &'a str, params: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

/// Any line read from the gateway before it is classified.
#[derive(Debug, Deserialize)]
struct RawFrame {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    method: Option<String>,
    #[serde(default)]
    params: Option<Value>,
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug)]
pub enum Frame {
    Response {
        id: u64,
        outcome: Result<Value, RpcError>,
    },
    Message(Box<WireEvent>),
    /// Notification we do not handle, by method name.
    Ignored(String),
}

/// Classifies one line from the gateway.
pub fn parse_frame(line: &str) -> Result<Frame, serde_json::Error> {
    let raw: RawFrame = serde_json::from_str(line)?;
    if let Some(id) = raw.id {
        let outcome = match raw.error {
            Some(error) => Err(error),
            None => Ok(raw.result.unwrap_or(Value::Null)),
        };
        return Ok(Frame::Response { id, outcome });
    }
    match raw.method.as_deref() {
        Some(MESSAGE_NOTIFICATION) => {
            let event: WireEvent = serde_json::from_value(raw.params.unwrap_or(Value::Null))?;
            Ok(Frame::Message(Box::new(event)))
        }
        Some(other) => Ok(Frame::Ignored(other.to_string())),
        None => Ok(Frame::Ignored(String::new())),
    }
}

/// Media handle as the gateway describes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMedia {
    pub direct_path: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(with = "base64_bytes", default)]
    pub media_key: Vec<u8>,
    #[serde(with = "base64_bytes", default)]
    pub file_sha256: Vec<u8>,
    #[serde(with = "base64_bytes", default)]
    pub file_enc_sha256: Vec<u8>,
    #[serde(default)]
    pub file_length: u64,
    #[serde(default)]
    pub mimetype: String,
}

impl From<&MediaRef> for WireMedia {
    fn from(media: &MediaRef) -> Self {
        Self {
            direct_path: media.direct_path.clone(),
            url: media.url.clone(),
            media_key: media.media_key.clone(),
            file_sha256: media.file_sha256.clone(),
            file_enc_sha256: media.file_enc_sha256.clone(),
            file_length: media.file_length,
            mimetype: media.mimetype.clone(),
        }
    }
}

/// Quoted message. `type` is `image`, `text`, or the name of any other media kind.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WireQuoted {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub image: Option<WireMedia>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireContextInfo {
    #[serde(default)]
    pub stanza_id: Option<String>,
    #[serde(default)]
    pub participant: Option<Jid>,
    #[serde(default)]
    pub quoted_message: Option<WireQuoted>,
}

/// Params of a `message` notification.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireEvent {
    pub id: String,
    pub sender: Jid,
    pub chat: Jid,
    #[serde(default)]
    pub is_group: bool,
    /// Unix seconds.
    pub timestamp: i64,
    #[serde(default)]
    pub conversation: Option<String>,
    #[serde(default)]
    pub extended_text: Option<String>,
    #[serde(default)]
    pub context_info: Option<WireContextInfo>,
}

#[derive(Debug, Deserialize)]
pub struct SendResult {
    pub id: String,
    /// Unix seconds.
    pub timestamp: i64,
}

#[derive(Debug, Deserialize)]
pub struct DownloadResult {
    #[serde(with = "base64_bytes")]
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub url: String,
    pub direct_path: String,
    #[serde(with = "base64_bytes")]
    pub media_key: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub file_enc_sha256: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub file_sha256: Vec<u8>,
    pub file_length: u64,
}

impl From<UploadResult> for UploadReceipt {
    fn from(r: UploadResult) -> Self {
        UploadReceipt {
            url: r.url,
            direct_path: r.direct_path,
            media_key: r.media_key,
            file_enc_sha256: r.file_enc_sha256,
            file_sha256: r.file_sha256,
            file_length: r.file_length,
        }
    }
}

fn encode(bytes: &[u8]) -> String {
    use base64::{engine::general_purpose::STANDARD, Engine as _};
    STANDARD.encode(bytes)
}

pub fn unix_seconds(ts: DateTime<Utc>) -> i64 {
    ts.timestamp()
}

pub fn from_unix_seconds(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or_else(Utc::now)
}

pub fn mark_read_params(ids: &[String], timestamp: DateTime<Utc>, chat: &Jid, sender: &Jid) -> Value {
    json!({
        "ids": ids,
        "timestamp": unix_seconds(timestamp),
        "chat": chat.to_string(),
        "sender": sender.to_string(),
    })
}

pub fn presence_params(presence: Presence) -> Value {
    json!({ "state": presence.as_str() })
}

pub fn chat_presence_params(chat: &Jid, state: ChatPresence, media: ChatPresenceMedia) -> Value {
    json!({
        "chat": chat.to_string(),
        "state": state.as_str(),
        "media": media.as_str(),
    })
}

pub fn send_message_params(message: &OutboundMessage) -> Value {
    let mut params = json!({ "chat": message.chat.to_string() });
    match &message.payload {
        OutboundPayload::Text(text) => {
            params["text"] = json!(text);
        }
        OutboundPayload::Sticker(sticker) => {
            params["sticker"] = json!({
                "url": sticker.upload.url,
                "directPath": sticker.upload.direct_path,
                "mediaKey": encode(&sticker.upload.media_key),
                "fileEncSha256": encode(&sticker.upload.file_enc_sha256),
                "fileSha256": encode(&sticker.upload.file_sha256),
                "fileLength": sticker.upload.file_length,
                "mimetype": sticker.mimetype,
                "width": sticker.width,
                "height": sticker.height,
                "pngThumbnail": encode(&sticker.thumbnail),
            });
        }
    }
    if let Some(quote) = &message.quote {
        params["contextInfo"] = json!({
            "stanzaId": quote.stanza_id,
            "participant": quote.participant.to_string(),
            "quotedMessage": { "conversation": quote.quoted_text },
        });
    }
    params
}

pub fn download_params(media: &MediaRef) -> Value {
    json!({
        "media": WireMedia::from(media),
        "mediaType": MediaKind::Image.as_str(),
    })
}

pub fn upload_params(data: &[u8], kind: MediaKind) -> Value {
    json!({
        "data": encode(data),
        "mediaType": kind.as_str(),
    })
}
