//! Turn model - one argument submission within a round
//!
//! Turns are append-only: created once, never mutated. The sequence
//! index is assigned by the backend and is strictly increasing per
//! room, which is what keeps all clients' transcripts consistent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::ScoreCard;

/// An ordered, immutable unit of debate content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub id: Uuid,
    pub room_id: Uuid,
    /// Participant id of the author
    pub speaker_id: Uuid,
    pub round_number: u32,
    /// Strictly increasing per room
    pub sequence: u64,
    pub content: String,
    /// Set for audio submissions after transcription
    #[serde(default)]
    pub audio_url: Option<String>,
    /// LCR feedback, attached once judging completes
    #[serde(default)]
    pub score: Option<ScoreCard>,
    pub timestamp: DateTime<Utc>,
}
