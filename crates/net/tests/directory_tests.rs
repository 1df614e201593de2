//! Room directory tests against an in-process HTTP backend.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use uuid::Uuid;

use podium_core::{ClientConfig, RoomStatus};
use podium_net::{Error, RoomDirectory, TurnSubmission};

#[derive(Clone, Default)]
struct MockState {
    /// Request log: (method, path, query)
    hits: Arc<Mutex<Vec<String>>>,
}

impl MockState {
    fn record(&self, entry: impl Into<String>) {
        self.hits.lock().unwrap().push(entry.into());
    }

    fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

fn room_json(code: &str) -> Value {
    json!({
        "id": Uuid::new_v4(),
        "topic": "Should remote work be the default?",
        "rounds": 3,
        "status": "upcoming",
        "host_id": Uuid::new_v4(),
        "room_code": code,
        "host_name": "casey",
        "participant_count": 1
    })
}

async fn get_by_code(
    State(state): State<MockState>,
    Path(code): Path<String>,
) -> Result<Json<Value>, StatusCode> {
    state.record(format!("code:{code}"));
    if code == "ABC123" {
        Ok(Json(room_json("ABC123")))
    } else {
        Err(StatusCode::NOT_FOUND)
    }
}

async fn list(
    State(state): State<MockState>,
    Query(params): Query<HashMap<String, String>>,
) -> Json<Value> {
    state.record(format!(
        "list:{}",
        params.get("status").cloned().unwrap_or_default()
    ));

    // One full summary, one missing its display fields, one malformed
    let full = room_json("AAAAA1");
    let sparse = json!({
        "id": Uuid::new_v4(),
        "topic": "Minimal summary",
        "rounds": 1,
        "status": "ongoing",
        "host_id": Uuid::new_v4(),
        "room_code": "BBBBB2"
    });
    let malformed = json!({ "id": Uuid::new_v4() });
    Json(json!([full, sparse, malformed]))
}

async fn status(State(state): State<MockState>, Path(id): Path<String>) -> Json<Value> {
    state.record(format!("status:{id}"));
    Json(json!({
        "participants": [
            { "user_id": Uuid::new_v4(), "username": "casey", "role": "host" },
            { "user_id": Uuid::new_v4() }
        ]
    }))
}

async fn summary(State(state): State<MockState>, Path(id): Path<String>) -> Json<Value> {
    state.record(format!("summary:{id}"));
    let winner = Uuid::new_v4();
    let mut scores = serde_json::Map::new();
    scores.insert(
        winner.to_string(),
        json!({ "logic": 85.0, "credibility": 78.0, "rhetoric": 92.0 }),
    );
    Json(json!({
        "result": {
            "summary": "A close debate decided on credibility.",
            "winner_id": winner,
            "scores_json": scores
        }
    }))
}

async fn submit(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(body): Json<TurnSubmission>,
) -> Result<Json<Value>, (StatusCode, String)> {
    state.record(format!("submit:{id}:{}", body.content));
    if body.content == "reject me" {
        return Err((StatusCode::BAD_REQUEST, "debate has ended".to_string()));
    }
    Ok(Json(json!({
        "id": Uuid::new_v4(),
        "room_id": Uuid::new_v4(),
        "speaker_id": Uuid::new_v4(),
        "round_number": body.round_number,
        "sequence": 1,
        "content": body.content,
        "timestamp": chrono::Utc::now()
    })))
}

async fn spawn_backend() -> (MockState, RoomDirectory) {
    let state = MockState::default();
    let app = Router::new()
        .route("/api/rooms/code/{code}", get(get_by_code))
        .route("/api/rooms/list", get(list))
        .route("/api/debate/{id}/status", get(status))
        .route("/api/ai/summary/{id}", get(summary))
        .route("/api/debate/{id}/submit-turn", post(submit))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let config = ClientConfig::new(format!("http://{}", addr), "ws://localhost:8000");
    let directory = RoomDirectory::new(&config).unwrap();
    (state, directory)
}

#[tokio::test]
async fn lookup_canonicalizes_code() {
    let (state, directory) = spawn_backend().await;

    let room = directory.room_by_code(" abc123 ").await.unwrap();
    assert_eq!(room.room_code.as_str(), "ABC123");

    // The request carried the canonical form
    assert_eq!(state.hits(), vec!["code:ABC123".to_string()]);
}

#[tokio::test]
async fn lookup_missing_room_is_not_found() {
    let (_state, directory) = spawn_backend().await;

    match directory.room_by_code("ZZZZ99").await {
        Err(Error::RoomNotFound(code)) => assert_eq!(code, "ZZZZ99"),
        other => panic!("expected RoomNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_code_fails_locally() {
    let (state, directory) = spawn_backend().await;

    assert!(directory.room_by_code("nope!").await.is_err());
    assert!(directory.room_by_code("").await.is_err());

    // Local validation never reached the network
    assert!(state.hits().is_empty());
}

#[tokio::test]
async fn list_tolerates_partial_summaries() {
    let (state, directory) = spawn_backend().await;

    let rooms = directory.list_rooms(Some(RoomStatus::Ongoing)).await.unwrap();
    assert_eq!(rooms.len(), 2, "malformed entry should be skipped, not fatal");

    let sparse = rooms.iter().find(|r| r.host_name.is_none()).unwrap();
    assert_eq!(sparse.host_display_name(), "Anonymous");
    assert_eq!(sparse.participant_count, None);

    assert_eq!(state.hits(), vec!["list:ongoing".to_string()]);
}

#[tokio::test]
async fn status_and_summary_parse() {
    let (_state, directory) = spawn_backend().await;
    let room_id = Uuid::new_v4();

    let participants = directory.room_status(room_id).await.unwrap();
    assert_eq!(participants.len(), 2);
    assert_eq!(participants[0].username.as_deref(), Some("casey"));
    assert!(participants[1].username.is_none());

    let result = directory.result_summary(room_id).await.unwrap();
    assert!(result.winner_id.is_some());
    assert_eq!(result.scores.len(), 1);
    let card = result.scores.values().next().unwrap();
    assert_eq!(card.composite().unwrap(), 84.30);
}

#[tokio::test]
async fn submission_failure_is_explicit() {
    let (_state, directory) = spawn_backend().await;
    let room_id = Uuid::new_v4();

    let submission = TurnSubmission {
        content: "reject me".to_string(),
        round_number: 1,
        turn_number: 1,
    };
    match directory.submit_turn(room_id, &submission).await {
        Err(Error::SubmissionFailed(reason)) => assert!(reason.contains("400")),
        other => panic!("expected SubmissionFailed, got {other:?}"),
    }

    let submission = TurnSubmission {
        content: "a sound argument".to_string(),
        round_number: 1,
        turn_number: 2,
    };
    let turn = directory.submit_turn(room_id, &submission).await.unwrap();
    assert_eq!(turn.content, "a sound argument");
    // Submission acknowledges receipt; judging arrives later over the
    // live channel
    assert!(turn.score.is_none());
}
