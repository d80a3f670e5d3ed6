//! Integration tests for the JPEG → sticker pipeline: transcode, embed, decode back.

use std::io::Cursor;

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use sticker::{
    embed_metadata, read_metadata, transcode, StickerError, StickerMetadata, StickerSize,
    TranscodeOptions,
};

fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 3) as u8, (y * 3) as u8, ((x + y) * 2) as u8])
    });
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut out, ImageFormat::Jpeg)
        .unwrap();
    out.into_inner()
}

fn pack() -> StickerMetadata {
    StickerMetadata::new(
        "com.example.stickers 2f44112f-1143-49e7-8ff7-ba18595760a3",
        "kakaka",
        "Sticker.ly * someone",
    )
}

/// **Test: transcoded + embedded sticker decodes with the source dimensions and carries the pack metadata.**
#[test]
fn test_native_sticker_round_trip() {
    let webp = transcode(&sample_jpeg(120, 90), &TranscodeOptions::default()).unwrap();
    let sticker = embed_metadata(&webp.data, &pack()).unwrap();

    let decoded = image::load_from_memory_with_format(&sticker, ImageFormat::WebP).unwrap();
    assert_eq!(decoded.dimensions(), (120, 90));
    assert_eq!(decoded.dimensions(), (webp.width, webp.height));
    assert_eq!(read_metadata(&sticker).unwrap(), pack());
}

/// **Test: square target size is what a decoder sees after embedding.**
#[test]
fn test_square_sticker_round_trip() {
    let options = TranscodeOptions {
        quality: 75.0,
        size: StickerSize::Square(512),
    };
    let webp = transcode(&sample_jpeg(64, 48), &options).unwrap();
    let meta = pack().with_emojis(["😂", "🔥"]);
    let sticker = embed_metadata(&webp.data, &meta).unwrap();

    let decoded = image::load_from_memory_with_format(&sticker, ImageFormat::WebP).unwrap();
    assert_eq!(decoded.dimensions(), (512, 512));
    assert_eq!(read_metadata(&sticker).unwrap().emojis, vec!["😂", "🔥"]);
}

/// **Test: truncated JPEG fails at decode; nothing reaches the embedder.**
#[test]
fn test_truncated_source_is_decode_error() {
    let jpeg = sample_jpeg(32, 32);
    let err = transcode(&jpeg[..48], &TranscodeOptions::default()).unwrap_err();
    assert!(matches!(err, StickerError::Decode(_)));
}

/// **Test: embedding into something that is not a WebP container fails without output.**
#[test]
fn test_embed_into_jpeg_is_embed_error() {
    let err = embed_metadata(&sample_jpeg(8, 8), &pack()).unwrap_err();
    assert!(matches!(err, StickerError::Embed(_)));
}

/// **Test: a plain transcode has no pack metadata.**
#[test]
fn test_read_metadata_without_exif() {
    let webp = transcode(&sample_jpeg(16, 16), &TranscodeOptions::default()).unwrap();
    assert!(matches!(
        read_metadata(&webp.data),
        Err(StickerError::InvalidMetadata(_))
    ));
}
