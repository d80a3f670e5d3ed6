//! Bot behavior settings: sticker encoding, pack identity, choreography timing. Loaded from env.

use figbot_core::{FigbotError, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;
use sticker::{StickerMetadata, StickerSize, TranscodeOptions};

pub const DEFAULT_PACK_ID: &str =
    "com.snowcorp.stickerly.android.stickercontentprovider 2f44112f-1143-49e7-8ff7-ba18595760a3";
pub const DEFAULT_PACK_NAME: &str = "kakaka";
pub const DEFAULT_PACK_PUBLISHER: &str = "Sticker.ly * glauber_viniciusff";
pub const DEFAULT_EMOJIS: &str = "😀";
pub const DEFAULT_QUALITY: f32 = 100.0;

/// Delay budget of one choreography.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Lower bound (inclusive) of every sampled think delay.
    pub think_min: Duration,
    /// Upper bound (exclusive) of every sampled think delay.
    pub think_max: Duration,
    /// Fixed pause between `paused` and `unavailable` on `/ping`.
    pub ping_settle: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            think_min: Duration::from_millis(1000),
            think_max: Duration::from_millis(3000),
            ping_settle: Duration::from_millis(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BotSettings {
    pub transcode: TranscodeOptions,
    pub metadata: StickerMetadata,
    pub timing: Timing,
}

impl Default for BotSettings {
    fn default() -> Self {
        Self {
            // Stickers keep the photo's own dimensions in this deployment; STICKER_SIZE=512 gives
            // the 512x512 square some clients expect.
            transcode: TranscodeOptions {
                quality: DEFAULT_QUALITY,
                size: StickerSize::Native,
            },
            metadata: StickerMetadata::new(
                DEFAULT_PACK_ID,
                DEFAULT_PACK_NAME,
                DEFAULT_PACK_PUBLISHER,
            )
            .with_emojis(DEFAULT_EMOJIS.split(',')),
            timing: Timing::default(),
        }
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| FigbotError::Config(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

/// `native` or a positive square side length.
pub fn parse_size(raw: &str) -> Result<StickerSize> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("native") {
        return Ok(StickerSize::Native);
    }
    match raw.parse::<u32>() {
        Ok(side) if side > 0 => Ok(StickerSize::Square(side)),
        _ => Err(FigbotError::Config(format!(
            "STICKER_SIZE must be \"native\" or a positive side length, got: {}",
            raw
        ))),
    }
}

impl BotSettings {
    /// Loads from env: STICKER_QUALITY, STICKER_SIZE, STICKER_PACK_ID, STICKER_PACK_NAME,
    /// STICKER_PACK_PUBLISHER, STICKER_EMOJIS, THINK_DELAY_MIN_MS, THINK_DELAY_MAX_MS, PING_SETTLE_MS.
    /// Unset variables take the deployment defaults.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let quality = parse_var("STICKER_QUALITY", DEFAULT_QUALITY)?;
        let size = match env::var("STICKER_SIZE") {
            Ok(raw) => parse_size(&raw)?,
            Err(_) => defaults.transcode.size,
        };

        let emojis = env::var("STICKER_EMOJIS").unwrap_or_else(|_| DEFAULT_EMOJIS.to_string());
        let metadata = StickerMetadata::new(
            env::var("STICKER_PACK_ID").unwrap_or_else(|_| DEFAULT_PACK_ID.to_string()),
            env::var("STICKER_PACK_NAME").unwrap_or_else(|_| DEFAULT_PACK_NAME.to_string()),
            env::var("STICKER_PACK_PUBLISHER")
                .unwrap_or_else(|_| DEFAULT_PACK_PUBLISHER.to_string()),
        )
        .with_emojis(emojis.split(','));

        let timing = Timing {
            think_min: Duration::from_millis(parse_var("THINK_DELAY_MIN_MS", 1000u64)?),
            think_max: Duration::from_millis(parse_var("THINK_DELAY_MAX_MS", 3000u64)?),
            ping_settle: Duration::from_millis(parse_var("PING_SETTLE_MS", 1000u64)?),
        };

        let settings = Self {
            transcode: TranscodeOptions { quality, size },
            metadata,
            timing,
        };
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.transcode.quality) {
            return Err(FigbotError::Config(format!(
                "STICKER_QUALITY must be within 0..=100, got {}",
                self.transcode.quality
            )));
        }
        if self.timing.think_min >= self.timing.think_max {
            return Err(FigbotError::Config(format!(
                "THINK_DELAY_MIN_MS ({:?}) must be below THINK_DELAY_MAX_MS ({:?})",
                self.timing.think_min, self.timing.think_max
            )));
        }
        if self.metadata.emojis.is_empty() {
            return Err(FigbotError::Config(
                "STICKER_EMOJIS must name at least one emoji".to_string(),
            ));
        }
        Ok(())
    }
}
