//! Turn submission flow
//!
//! Validates locally, submits exactly once, and never retries on its
//! own -- an automatic retry could create duplicate turns. The score
//! arrives later over the live channel's `new_turn` event, not as the
//! response to the submission call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use podium_core::Turn;
use podium_net::{RoomDirectory, TurnSubmission};

use crate::error::{Error, Result};

/// Submits a participant's arguments for one room
pub struct TurnComposer {
    directory: Arc<RoomDirectory>,
    room_id: Uuid,
    /// In-flight guard: one pending submission at a time, no queue
    in_flight: AtomicBool,
}

/// Clears the in-flight flag on drop, so a `submit` future that gets
/// cancelled mid-request cannot wedge the composer.
struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl TurnComposer {
    pub fn new(directory: Arc<RoomDirectory>, room_id: Uuid) -> Self {
        Self {
            directory,
            room_id,
            in_flight: AtomicBool::new(false),
        }
    }

    /// Submit an argument for judging.
    ///
    /// Empty/whitespace input fails locally without a network call.
    /// While a submission is pending, further calls are rejected with
    /// `SubmissionPending`. On failure the guard clears and the caller
    /// may edit and resubmit; dropping a pending call (navigating away
    /// mid-request) clears it too.
    pub async fn submit(&self, round_number: u32, turn_number: u32, text: &str) -> Result<Turn> {
        let content = text.trim();
        if content.is_empty() {
            debug!("Rejecting empty argument before any network call");
            return Err(Error::EmptyArgument);
        }

        if self.in_flight.swap(true, Ordering::SeqCst) {
            warn!(room_id = %self.room_id, "Submission rejected: one already in flight");
            return Err(Error::SubmissionPending);
        }
        // Released on every exit path, including cancellation of this
        // future while the request is still pending
        let _guard = InFlightGuard(&self.in_flight);

        let submission = TurnSubmission {
            content: content.to_string(),
            round_number,
            turn_number,
        };

        match self.directory.submit_turn(self.room_id, &submission).await {
            Ok(turn) => {
                debug!(room_id = %self.room_id, sequence = turn.sequence, "Turn acknowledged");
                Ok(turn)
            }
            Err(e) => {
                warn!(room_id = %self.room_id, error = %e, "Turn submission failed");
                Err(e.into())
            }
        }
    }

    /// Whether a submission is currently awaiting acknowledgment
    pub fn is_pending(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use podium_core::ClientConfig;

    #[tokio::test]
    async fn empty_input_fails_without_network() {
        // Unroutable directory: any request would error differently
        let config = ClientConfig::new("http://127.0.0.1:9", "ws://127.0.0.1:9");
        let directory = Arc::new(RoomDirectory::new(&config).unwrap());
        let composer = TurnComposer::new(directory, Uuid::new_v4());

        assert!(matches!(
            composer.submit(1, 1, "").await,
            Err(Error::EmptyArgument)
        ));
        assert!(matches!(
            composer.submit(1, 1, "   \n\t ").await,
            Err(Error::EmptyArgument)
        ));
        assert!(!composer.is_pending());
    }

    #[tokio::test]
    async fn cancelled_submission_releases_guard() {
        use std::time::Duration;
        use tokio::time::timeout;

        // Backend that accepts connections but never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let config = ClientConfig::new(format!("http://{addr}"), "ws://127.0.0.1:9");
        let directory = Arc::new(RoomDirectory::new(&config).unwrap());
        let composer = TurnComposer::new(directory, Uuid::new_v4());

        // Drop the submit future while the request is still in flight
        let stalled = timeout(Duration::from_millis(100), composer.submit(1, 1, "stalled"));
        assert!(stalled.await.is_err(), "backend must not answer");
        assert!(
            !composer.is_pending(),
            "cancellation must release the guard"
        );

        // The next submission is admitted, not rejected as pending
        match timeout(Duration::from_millis(100), composer.submit(1, 2, "retry")).await {
            Err(_still_waiting) => {}
            Ok(Err(Error::SubmissionPending)) => panic!("guard stayed set after cancellation"),
            Ok(other) => panic!("unexpected outcome: {other:?}"),
        }
    }
}
