//! Network error types

use thiserror::Error;

/// Network result type
pub type Result<T> = std::result::Result<T, Error>;

/// Network errors
#[derive(Debug, Error)]
pub enum Error {
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Turn submission failed: {0}")]
    SubmissionFailed(String),

    #[error("Live channel is not connected")]
    ChannelDisconnected,

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] podium_core::Error),
}
