//! Error types for Podium Core

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Score axis '{axis}' out of range: {value} (expected 0..=100)")]
    InvalidScoreRange { axis: &'static str, value: f64 },

    #[error("Invalid room code: {0}")]
    InvalidRoomCode(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
