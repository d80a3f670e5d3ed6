use thiserror::Error;

#[derive(Error, Debug)]
pub enum FigbotError {
    /// Any failure reported by the messaging client collaborator.
    #[error("Client error: {0}")]
    Client(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Embed error: {0}")]
    Embed(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FigbotError>;
