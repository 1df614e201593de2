//! Room model - a debate session instance

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::RoomCode;
use crate::error::{Error, Result};

/// Room lifecycle status. Transitions are one-directional:
/// `Upcoming -> Ongoing -> Completed`. A completed room never re-opens.
///
/// The wire vocabulary is `upcoming`/`ongoing`/`completed`; legacy
/// synonyms used by older clients are accepted as aliases on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    #[serde(alias = "scheduled", alias = "waiting")]
    Upcoming,
    #[serde(alias = "in_progress")]
    Ongoing,
    Completed,
}

impl RoomStatus {
    pub fn is_terminal(self) -> bool {
        self == RoomStatus::Completed
    }

    /// Whether moving to `next` is a legal lifecycle step
    pub fn can_transition_to(self, next: RoomStatus) -> bool {
        matches!(
            (self, next),
            (RoomStatus::Upcoming, RoomStatus::Ongoing)
                | (RoomStatus::Ongoing, RoomStatus::Completed)
        )
    }

    /// Query-parameter value for directory filtering
    pub fn as_query(self) -> &'static str {
        match self {
            RoomStatus::Upcoming => "upcoming",
            RoomStatus::Ongoing => "ongoing",
            RoomStatus::Completed => "completed",
        }
    }
}

/// Debate mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RoomMode {
    #[default]
    Text,
    Audio,
    Both,
}

/// Room visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// A Room is a debate session with a topic, participants, and rounds.
///
/// `host_name` and `participant_count` are best-effort display fields
/// filled in by the directory; their absence must never fail a lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: Uuid,
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    #[serde(default)]
    pub mode: RoomMode,
    #[serde(default)]
    pub visibility: Visibility,
    pub rounds: u32,
    #[serde(default = "default_max_participants")]
    pub max_participants: u32,
    pub status: RoomStatus,
    pub host_id: Uuid,
    #[serde(default)]
    pub resources: Vec<String>,
    pub room_code: RoomCode,
    #[serde(default)]
    pub host_name: Option<String>,
    #[serde(default)]
    pub participant_count: Option<u32>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_max_participants() -> u32 {
    2
}

impl Room {
    /// Advance the lifecycle, rejecting backward or skipping moves
    pub fn transition_to(&mut self, next: RoomStatus) -> Result<()> {
        if !self.status.can_transition_to(next) {
            return Err(Error::InvalidTransition {
                from: format!("{:?}", self.status),
                to: format!("{:?}", next),
            });
        }
        self.status = next;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    /// Display name of the host, defaulting when the directory omitted it
    pub fn host_display_name(&self) -> &str {
        self.host_name.as_deref().unwrap_or("Anonymous")
    }
}

/// Payload for creating a room via the directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDraft {
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub scheduled_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
    pub mode: RoomMode,
    pub visibility: Visibility,
    pub rounds: u32,
    #[serde(default)]
    pub resources: Vec<String>,
}

impl RoomDraft {
    pub fn new(topic: impl Into<String>, rounds: u32) -> Self {
        Self {
            topic: topic.into(),
            description: None,
            scheduled_time: None,
            duration_minutes: None,
            mode: RoomMode::default(),
            visibility: Visibility::default(),
            rounds,
            resources: Vec::new(),
        }
    }

    /// Local validation, applied before any network call
    pub fn validate(&self) -> Result<()> {
        if self.topic.trim().is_empty() {
            return Err(Error::Validation("topic must not be empty".into()));
        }
        if self.rounds == 0 {
            return Err(Error::Validation("rounds must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(status: RoomStatus) -> Room {
        Room {
            id: Uuid::new_v4(),
            topic: "Test topic".into(),
            description: None,
            scheduled_time: None,
            duration_minutes: Some(30),
            mode: RoomMode::Text,
            visibility: Visibility::Public,
            rounds: 3,
            max_participants: 2,
            status,
            host_id: Uuid::new_v4(),
            resources: Vec::new(),
            room_code: RoomCode::parse("ABC123").unwrap(),
            host_name: None,
            participant_count: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_forward_transitions_allowed() {
        let mut r = room(RoomStatus::Upcoming);
        r.transition_to(RoomStatus::Ongoing).unwrap();
        r.transition_to(RoomStatus::Completed).unwrap();
        assert!(r.status.is_terminal());
    }

    #[test]
    fn test_backward_transitions_rejected() {
        let mut r = room(RoomStatus::Completed);
        assert!(r.transition_to(RoomStatus::Ongoing).is_err());
        assert!(r.transition_to(RoomStatus::Upcoming).is_err());

        let mut r = room(RoomStatus::Ongoing);
        assert!(r.transition_to(RoomStatus::Upcoming).is_err());
    }

    #[test]
    fn test_skip_transition_rejected() {
        let mut r = room(RoomStatus::Upcoming);
        assert!(r.transition_to(RoomStatus::Completed).is_err());
    }

    #[test]
    fn test_status_aliases() {
        let s: RoomStatus = serde_json::from_str("\"in_progress\"").unwrap();
        assert_eq!(s, RoomStatus::Ongoing);
        let s: RoomStatus = serde_json::from_str("\"scheduled\"").unwrap();
        assert_eq!(s, RoomStatus::Upcoming);
        let s: RoomStatus = serde_json::from_str("\"waiting\"").unwrap();
        assert_eq!(s, RoomStatus::Upcoming);
    }

    #[test]
    fn test_lenient_room_deserialization() {
        // Only contract-critical fields present
        let json = r#"{
            "id": "7f0c0e9e-59b7-4a6f-9a2a-3f0cf9a4a111",
            "topic": "AI regulation",
            "rounds": 3,
            "status": "upcoming",
            "host_id": "7f0c0e9e-59b7-4a6f-9a2a-3f0cf9a4a222",
            "room_code": "abc123"
        }"#;
        let room: Room = serde_json::from_str(json).unwrap();
        assert_eq!(room.host_display_name(), "Anonymous");
        assert_eq!(room.participant_count, None);
        assert_eq!(room.room_code.as_str(), "ABC123");
    }
}
