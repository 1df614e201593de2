//! Debate result - produced once per completed room

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::ScoreCard;

/// Final outcome of a debate. Created exactly once at room completion
/// and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebateResult {
    pub room_id: Uuid,
    /// Participant with the highest aggregate composite, if any turns
    /// were scored
    #[serde(default)]
    pub winner_id: Option<Uuid>,
    /// AI-generated verdict text
    pub summary: String,
    /// Aggregate LCR scores per participant
    #[serde(default)]
    pub scores: HashMap<Uuid, ScoreCard>,
}
