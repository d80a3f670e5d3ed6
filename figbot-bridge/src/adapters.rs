//! Adapters from gateway wire types to figbot_core types.
//! Depends only on the wire definitions in [`crate::protocol`] and figbot_core.

use figbot_core::{InboundEvent, MediaRef, QuotedContext, QuotedPayload, ToCoreEvent};

use crate::protocol::{WireContextInfo, WireEvent, WireMedia, WireQuoted};

/// Wraps a gateway media handle for conversion to core [`MediaRef`].
pub struct WireMediaWrapper<'a>(pub &'a WireMedia);

impl<'a> WireMediaWrapper<'a> {
    pub fn to_core(&self) -> MediaRef {
        MediaRef {
            direct_path: self.0.direct_path.clone(),
            url: self.0.url.clone(),
            media_key: self.0.media_key.clone(),
            file_sha256: self.0.file_sha256.clone(),
            file_enc_sha256: self.0.file_enc_sha256.clone(),
            file_length: self.0.file_length,
            mimetype: self.0.mimetype.clone(),
        }
    }
}

/// Wraps a `message` notification for conversion to core [`InboundEvent`].
pub struct WireEventWrapper<'a>(pub &'a WireEvent);

impl<'a> ToCoreEvent for WireEventWrapper<'a> {
    fn to_core(&self) -> InboundEvent {
        InboundEvent {
            id: self.0.id.clone(),
            sender: self.0.sender.clone(),
            chat: self.0.chat.clone(),
            is_group: self.0.is_group || self.0.chat.is_group(),
            timestamp: crate::protocol::from_unix_seconds(self.0.timestamp),
            text: self.get_text(),
            quoted: self.0.context_info.as_ref().and_then(quoted_context),
        }
    }
}

impl<'a> WireEventWrapper<'a> {
    /// Plain conversation text when non-empty, otherwise the extended-text body.
    fn get_text(&self) -> Option<String> {
        self.0
            .conversation
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.0.extended_text.as_deref())
            .map(str::to_string)
    }
}

/// Reply context, or `None` when the message does not quote anything (no stanza id).
fn quoted_context(info: &WireContextInfo) -> Option<QuotedContext> {
    let stanza_id = info.stanza_id.as_deref().unwrap_or_default();
    if stanza_id.is_empty() {
        return None;
    }
    Some(QuotedContext {
        stanza_id: stanza_id.to_string(),
        participant: info.participant.clone(),
        payload: info.quoted_message.as_ref().map(quoted_payload),
    })
}

fn quoted_payload(quoted: &WireQuoted) -> QuotedPayload {
    match (quoted.kind.as_str(), &quoted.image, &quoted.text) {
        ("image", Some(media), _) => QuotedPayload::Image(WireMediaWrapper(media).to_core()),
        ("text", _, text) => QuotedPayload::Text(text.clone().unwrap_or_default()),
        (kind, _, _) => QuotedPayload::OtherMedia {
            kind: kind.to_string(),
        },
    }
}
