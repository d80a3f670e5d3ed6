//! JPEG → WebP transcoding.
//!
//! Decodes a JPEG and re-encodes it as a lossy WebP at the requested quality, either at the source
//! dimensions or stretched to a fixed square. Output is a complete RIFF/WebP container.

use image::{imageops::FilterType, DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

use crate::error::{Result, StickerError};

/// MIME type of every transcoded sticker.
pub const WEBP_MIME: &str = "image/webp";

/// Largest side a WebP bitstream can describe.
pub const MAX_WEBP_DIMENSION: u32 = 16383;

/// Output dimensions of a sticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StickerSize {
    /// Keep the source width and height.
    Native,
    /// Resize (without preserving aspect ratio) to `side × side`.
    Square(u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranscodeOptions {
    /// Lossy quality, 0–100; fractional values are allowed.
    pub quality: f32,
    pub size: StickerSize,
}

impl Default for TranscodeOptions {
    fn default() -> Self {
        Self {
            quality: 100.0,
            size: StickerSize::Native,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscodeResult {
    pub data: Vec<u8>,
    pub mimetype: &'static str,
    pub width: u32,
    pub height: u32,
}

/// Transcodes JPEG bytes into a WebP sticker.
///
/// Anything that is not a decodable JPEG is a [`StickerError::Decode`]; encoder failures, an
/// out-of-range quality or an unrepresentable size are [`StickerError::Encode`].
pub fn transcode(raw: &[u8], options: &TranscodeOptions) -> Result<TranscodeResult> {
    if !(0.0..=100.0).contains(&options.quality) {
        return Err(StickerError::Encode(format!(
            "quality must be within 0..=100, got {}",
            options.quality
        )));
    }

    match image::guess_format(raw) {
        Ok(ImageFormat::Jpeg) => {}
        Ok(other) => {
            return Err(StickerError::Decode(format!(
                "unsupported source format {:?}, expected JPEG",
                other
            )))
        }
        Err(e) => return Err(StickerError::Decode(e.to_string())),
    }

    let img = image::load_from_memory_with_format(raw, ImageFormat::Jpeg)
        .map_err(|e| StickerError::Decode(format!("failed to decode JPEG: {}", e)))?;
    let (src_width, src_height) = img.dimensions();

    let img = match options.size {
        StickerSize::Native => img,
        StickerSize::Square(0) => {
            return Err(StickerError::Encode("square size must be positive".to_string()))
        }
        StickerSize::Square(side) => img.resize_exact(side, side, FilterType::Lanczos3),
    };

    let data = encode_lossy(&img, options.quality)?;
    let (width, height) = img.dimensions();

    debug!(
        src_width,
        src_height,
        width,
        height,
        quality = options.quality,
        input_len = raw.len(),
        output_len = data.len(),
        "Transcoded JPEG to WebP"
    );

    Ok(TranscodeResult {
        data,
        mimetype: WEBP_MIME,
        width,
        height,
    })
}

fn encode_lossy(img: &DynamicImage, quality: f32) -> Result<Vec<u8>> {
    let (width, height) = img.dimensions();
    if width > MAX_WEBP_DIMENSION || height > MAX_WEBP_DIMENSION {
        return Err(StickerError::Encode(format!(
            "{}x{} exceeds the WebP limit of {}",
            width, height, MAX_WEBP_DIMENSION
        )));
    }

    // JPEG has no alpha; grayscale and CMYK sources are widened to RGB here.
    let rgb = img.to_rgb8();
    let memory = webp::Encoder::from_rgb(rgb.as_raw(), width, height)
        .encode_simple(false, quality)
        .map_err(|e| StickerError::Encode(format!("WebP encoder failed: {:?}", e)))?;

    Ok(memory.to_vec())
}
