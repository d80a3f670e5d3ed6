use figbot_core::FigbotError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StickerError {
    /// Source bytes are not a readable JPEG.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    /// The container cannot carry, or could not be rewritten with, the metadata chunk.
    #[error("Embed error: {0}")]
    Embed(String),

    /// A metadata container or sticker file that does not follow the pack layout.
    #[error("Invalid metadata: {0}")]
    InvalidMetadata(String),
}

pub type Result<T> = std::result::Result<T, StickerError>;

impl From<StickerError> for FigbotError {
    fn from(err: StickerError) -> Self {
        match err {
            StickerError::Decode(m) => FigbotError::Decode(m),
            StickerError::Encode(m) => FigbotError::Encode(m),
            StickerError::Embed(m) | StickerError::InvalidMetadata(m) => FigbotError::Embed(m),
        }
    }
}
