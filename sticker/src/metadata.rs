//! Sticker-pack metadata container.
//!
//! Layout, byte for byte (downstream sticker clients read exactly this):
//!
//! | bytes | content |
//! |---|---|
//! | 0..14 | [`EXIF_HEADER`]: little-endian TIFF header with a single-entry IFD |
//! | 14..18 | JSON payload length, `u32` little-endian |
//! | 18..22 | [`EXIF_TRAILER`] |
//! | 22.. | UTF-8 JSON payload |

use serde::{Deserialize, Serialize};

use crate::error::{Result, StickerError};

/// Fixed container header.
pub const EXIF_HEADER: [u8; 14] = [
    0x49, 0x49, 0x2A, 0x00, 0x08, 0x00, 0x00, 0x00, 0x01, 0x00, 0x41, 0x57, 0x07, 0x00,
];

/// Fixed 4 bytes between the length field and the JSON payload.
pub const EXIF_TRAILER: [u8; 4] = [0x16, 0x00, 0x00, 0x00];

/// Offset of the JSON payload inside the container.
pub const PAYLOAD_OFFSET: usize = EXIF_HEADER.len() + 4 + EXIF_TRAILER.len();

pub const DEFAULT_EMOJI: &str = "😀";

/// Pack identity carried by each sticker. Field order is the JSON key order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StickerMetadata {
    #[serde(rename = "sticker-pack-id")]
    pub pack_id: String,
    #[serde(rename = "sticker-pack-name")]
    pub pack_name: String,
    #[serde(rename = "sticker-pack-publisher")]
    pub publisher: String,
    #[serde(default)]
    pub emojis: Vec<String>,
}

impl StickerMetadata {
    /// Metadata with the default emoji set.
    pub fn new(
        pack_id: impl Into<String>,
        pack_name: impl Into<String>,
        publisher: impl Into<String>,
    ) -> Self {
        Self {
            pack_id: pack_id.into(),
            pack_name: pack_name.into(),
            publisher: publisher.into(),
            emojis: vec![DEFAULT_EMOJI.to_string()],
        }
    }

    /// Replaces the emoji set; duplicates and blanks are dropped, first occurrence order is kept.
    pub fn with_emojis<I, S>(mut self, emojis: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for emoji in emojis {
            let emoji = emoji.into();
            let emoji = emoji.trim();
            if !emoji.is_empty() && !set.iter().any(|e| e == emoji) {
                set.push(emoji.to_string());
            }
        }
        self.emojis = set;
        self
    }
}

/// Serializes the JSON payload alone.
pub fn metadata_json(metadata: &StickerMetadata) -> Result<Vec<u8>> {
    serde_json::to_vec(metadata)
        .map_err(|e| StickerError::Embed(format!("failed to serialize metadata: {}", e)))
}

/// Builds the full metadata container.
pub fn build_exif(metadata: &StickerMetadata) -> Result<Vec<u8>> {
    let json = metadata_json(metadata)?;
    let len = u32::try_from(json.len())
        .map_err(|_| StickerError::Embed("metadata payload too large".to_string()))?;

    let mut out = Vec::with_capacity(PAYLOAD_OFFSET + json.len());
    out.extend_from_slice(&EXIF_HEADER);
    out.extend_from_slice(&len.to_le_bytes());
    out.extend_from_slice(&EXIF_TRAILER);
    out.extend_from_slice(&json);
    Ok(out)
}

/// Parses a container produced by [`build_exif`] (or any client writing the same layout).
pub fn parse_exif(data: &[u8]) -> Result<StickerMetadata> {
    if data.len() < PAYLOAD_OFFSET {
        return Err(StickerError::InvalidMetadata(format!(
            "container too short: {} bytes",
            data.len()
        )));
    }
    if data[..EXIF_HEADER.len()] != EXIF_HEADER {
        return Err(StickerError::InvalidMetadata("unexpected header".to_string()));
    }
    if data[18..PAYLOAD_OFFSET] != EXIF_TRAILER {
        return Err(StickerError::InvalidMetadata("unexpected trailer".to_string()));
    }

    let len = u32::from_le_bytes([data[14], data[15], data[16], data[17]]) as usize;
    let payload = data
        .get(PAYLOAD_OFFSET..PAYLOAD_OFFSET + len)
        .ok_or_else(|| {
            StickerError::InvalidMetadata(format!(
                "declared payload length {} exceeds container",
                len
            ))
        })?;

    serde_json::from_slice(payload)
        .map_err(|e| StickerError::InvalidMetadata(format!("invalid JSON payload: {}", e)))
}
