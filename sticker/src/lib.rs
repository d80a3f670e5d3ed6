//! # sticker
//!
//! Turns a JPEG into a sticker: [`transcode`] re-encodes it as WebP, [`embed_metadata`] writes the
//! sticker-pack metadata container into the WebP `EXIF` chunk. [`read_metadata`] reverses the latter.

pub mod error;
pub mod metadata;
pub mod transcode;
pub mod webp_mux;

pub use error::{Result, StickerError};
pub use metadata::{build_exif, parse_exif, StickerMetadata, EXIF_HEADER, EXIF_TRAILER};
pub use transcode::{transcode, StickerSize, TranscodeOptions, TranscodeResult, WEBP_MIME};

/// Writes `metadata` into the WebP container. The returned bytes are a complete container;
/// on error nothing is returned.
pub fn embed_metadata(webp: &[u8], metadata: &StickerMetadata) -> Result<Vec<u8>> {
    let exif = build_exif(metadata)?;
    webp_mux::set_exif(webp, &exif)
}

/// Reads the sticker-pack metadata back from a WebP container.
pub fn read_metadata(webp: &[u8]) -> Result<StickerMetadata> {
    let exif = webp_mux::get_exif(webp)?
        .ok_or_else(|| StickerError::InvalidMetadata("no EXIF chunk".to_string()))?;
    parse_exif(&exif)
}
