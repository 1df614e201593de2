//! Wire protocol message types
//!
//! All messages are JSON-serialized and carried as WebSocket text
//! frames. The `type` tag matches the backend's event names
//! (`join_room`, `new_turn`, ...).

use chrono::{DateTime, Utc};
use podium_core::ScoreCard;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A judged turn broadcast to every client in the room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnEvent {
    pub room_id: Uuid,
    /// Participant id of the author
    pub speaker_id: Uuid,
    pub round_number: u32,
    /// Strictly increasing per room; assigned by the backend
    pub sequence: u64,
    pub content: String,
    /// LCR feedback; absent while judging is still pending
    #[serde(default)]
    pub score: Option<ScoreCard>,
    pub timestamp: DateTime<Utc>,
}

/// Messages sent by the client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe to a room's events (idempotent per connection)
    JoinRoom { room_id: Uuid },

    /// Unsubscribe from a room's events
    LeaveRoom { room_id: Uuid },

    /// Keep-alive
    Ping,
}

/// Messages sent by the server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Room subscription acknowledged
    Joined { room_id: Uuid },

    /// A turn was judged and broadcast
    NewTurn(TurnEvent),

    /// Another participant joined the room
    ParticipantJoined {
        room_id: Uuid,
        user_id: Uuid,
        #[serde(default)]
        username: Option<String>,
    },

    /// Keep-alive response
    Pong,

    /// Server-reported failure (bad subscription, etc.)
    Error { message: String },
}

impl ClientMessage {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl ServerMessage {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}
