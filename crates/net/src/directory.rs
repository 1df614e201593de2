//! HTTP client for the room directory
//!
//! The directory is pull-only: freshness comes from re-querying, not
//! from push updates. Consumers that need a live view poll on a fixed
//! interval (see the client crate's poller).

use std::collections::HashMap;

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use podium_core::invariants::assert_room_invariants;
use podium_core::{
    ClientConfig, DebateResult, DebateRole, Room, RoomCode, RoomDraft, RoomStatus, ScoreCard, Turn,
};

use crate::error::{Error, Result};

/// Payload for submitting a turn
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnSubmission {
    pub content: String,
    pub round_number: u32,
    pub turn_number: u32,
}

/// One participant as reported by the room status endpoint.
/// Everything beyond the user id is best-effort display data.
#[derive(Debug, Clone, Deserialize)]
pub struct PresenceEntry {
    pub user_id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<DebateRole>,
}

#[derive(Debug, Deserialize)]
struct StatusEnvelope {
    #[serde(default)]
    participants: Vec<PresenceEntry>,
}

#[derive(Debug, Deserialize)]
struct SummaryEnvelope {
    result: SummaryBody,
}

#[derive(Debug, Deserialize)]
struct SummaryBody {
    summary: String,
    #[serde(default)]
    winner_id: Option<Uuid>,
    #[serde(default)]
    scores_json: HashMap<Uuid, ScoreCard>,
}

/// Room directory client over the backend HTTP API
#[derive(Clone)]
pub struct RoomDirectory {
    http: reqwest::Client,
    base_url: String,
}

impl RoomDirectory {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        url::Url::parse(&config.api_url)
            .map_err(|_| Error::InvalidUrl(config.api_url.clone()))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a human-entered room code. The code is canonicalized
    /// (trimmed, uppercased) before lookup.
    pub async fn room_by_code(&self, code: &str) -> Result<Room> {
        let code = RoomCode::parse(code)?;
        let url = format!("{}/api/rooms/code/{}", self.base_url, code);

        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::RoomNotFound(code.to_string()));
        }
        let room: Room = response.error_for_status()?.json().await?;
        assert_room_invariants(&room);
        debug!(room_id = %room.id, code = %code, "Resolved room by code");
        Ok(room)
    }

    /// List public rooms, optionally filtered by status.
    ///
    /// Summaries are best-effort: a malformed entry is skipped with a
    /// warning instead of failing the whole list, and missing display
    /// fields deserialize to defaults.
    pub async fn list_rooms(&self, filter: Option<RoomStatus>) -> Result<Vec<Room>> {
        let url = format!("{}/api/rooms/list", self.base_url);
        let mut request = self.http.get(&url);
        if let Some(status) = filter {
            request = request.query(&[("status", status.as_query())]);
        }

        let raw: Vec<serde_json::Value> =
            request.send().await?.error_for_status()?.json().await?;

        let mut rooms = Vec::with_capacity(raw.len());
        for entry in raw {
            match serde_json::from_value::<Room>(entry) {
                Ok(room) => rooms.push(room),
                Err(e) => warn!(error = %e, "Skipping malformed room summary"),
            }
        }
        Ok(rooms)
    }

    /// Create a room. The backend assigns the shareable code.
    pub async fn create_room(&self, draft: &RoomDraft) -> Result<Room> {
        draft.validate()?;

        let url = format!("{}/api/rooms/create", self.base_url);
        let room: Room = self
            .http
            .post(&url)
            .json(draft)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(room_id = %room.id, code = %room.room_code, "Created room");
        Ok(room)
    }

    /// Current participants of a room
    pub async fn room_status(&self, room_id: Uuid) -> Result<Vec<PresenceEntry>> {
        let url = format!("{}/api/debate/{}/status", self.base_url, room_id);
        let envelope: StatusEnvelope = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.participants)
    }

    /// Final result of a completed debate
    pub async fn result_summary(&self, room_id: Uuid) -> Result<DebateResult> {
        let url = format!("{}/api/ai/summary/{}", self.base_url, room_id);

        let response = self.http.get(&url).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(Error::RoomNotFound(room_id.to_string()));
        }
        let envelope: SummaryEnvelope = response.error_for_status()?.json().await?;

        Ok(DebateResult {
            room_id,
            winner_id: envelope.result.winner_id,
            summary: envelope.result.summary,
            scores: envelope.result.scores_json,
        })
    }

    /// Submit a turn for judging. Exactly one request per call; any
    /// failure surfaces as `SubmissionFailed` for manual resubmission.
    /// Automatic retry is deliberately absent, since retrying could
    /// create duplicate turns.
    ///
    /// Success acknowledges receipt only -- the score arrives later
    /// over the live channel's `new_turn` event.
    pub async fn submit_turn(&self, room_id: Uuid, submission: &TurnSubmission) -> Result<Turn> {
        let url = format!("{}/api/debate/{}/submit-turn", self.base_url, room_id);

        let response = self
            .http
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| Error::SubmissionFailed(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::SubmissionFailed(format!("{}: {}", status, detail)));
        }

        response
            .json()
            .await
            .map_err(|e| Error::SubmissionFailed(format!("bad acknowledgment: {}", e)))
    }
}
