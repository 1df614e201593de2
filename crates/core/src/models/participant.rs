//! Participant and role models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::ScoreCard;

/// Role of a user within a room
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebateRole {
    Host,
    #[serde(alias = "participant")]
    Debater,
    Spectator,
}

impl DebateRole {
    /// Spectators have read/react-only privileges
    pub fn can_submit_turns(self) -> bool {
        !matches!(self, DebateRole::Spectator)
    }

    pub fn display_name(self) -> &'static str {
        match self {
            DebateRole::Host => "Host",
            DebateRole::Debater => "Debater",
            DebateRole::Spectator => "Spectator",
        }
    }
}

impl std::fmt::Display for DebateRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// A user's membership in a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub room_id: Uuid,
    pub role: DebateRole,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    /// Aggregate LCR score, filled in once results exist
    #[serde(default)]
    pub score: Option<ScoreCard>,
    #[serde(default)]
    pub joined_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(user_id: Uuid, room_id: Uuid, role: DebateRole) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            room_id,
            role,
            username: None,
            team: None,
            score: None,
            joined_at: Some(Utc::now()),
        }
    }
}
