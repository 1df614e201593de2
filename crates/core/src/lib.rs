//! Podium Core Library
//!
//! Domain models, LCR scoring, configuration, and invariants for the
//! Podium debate platform client.

pub mod config;
pub mod error;
pub mod invariants;
pub mod models;
pub mod scoring;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use models::*;
pub use scoring::{composite, decide_winner, ScoreCard, LCR_WEIGHTS};
