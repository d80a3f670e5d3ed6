//! Offline sticker tooling: convert a local file, read metadata back. No gateway involved.

use anyhow::{Context, Result};
use dispatcher::BotSettings;
use sticker::{embed_metadata, read_metadata, transcode, StickerMetadata};
use std::path::Path;
use tracing::info;

/// What `convert_file` wrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertReport {
    pub width: u32,
    pub height: u32,
    pub bytes: usize,
}

/// Transcodes `input` and embeds the pack metadata from `settings`, writing the sticker to `output`.
pub fn convert_file(input: &Path, output: &Path, settings: &BotSettings) -> Result<ConvertReport> {
    let raw = std::fs::read(input).with_context(|| format!("Read {}", input.display()))?;
    let webp = transcode(&raw, &settings.transcode)
        .with_context(|| format!("Transcode {}", input.display()))?;
    let tagged = embed_metadata(&webp.data, &settings.metadata).context("Embed sticker metadata")?;
    std::fs::write(output, &tagged).with_context(|| format!("Write {}", output.display()))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        width = webp.width,
        height = webp.height,
        bytes = tagged.len(),
        "Sticker written"
    );
    Ok(ConvertReport {
        width: webp.width,
        height: webp.height,
        bytes: tagged.len(),
    })
}

/// Reads the sticker-pack metadata embedded in the WebP at `path`.
pub fn inspect_file(path: &Path) -> Result<StickerMetadata> {
    let data = std::fs::read(path).with_context(|| format!("Read {}", path.display()))?;
    read_metadata(&data).with_context(|| format!("No sticker metadata in {}", path.display()))
}
