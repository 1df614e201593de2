//! Room session lifecycle
//!
//! A `RoomSession` ties one room visit together: it resolves the room,
//! subscribes to its live events, and keeps an authoritative local
//! view. Cleanup (handler deregistration and `leave_room`) runs on
//! every exit path -- explicit `leave`, error, or drop -- so room
//! visits never leak subscriptions.

use std::sync::{Arc, Mutex as StdMutex};

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use podium_core::invariants::assert_turn_order_invariants;
use podium_core::Room;
use podium_net::{
    ChannelEvent, EventKind, HandlerId, LiveChannel, PresenceEntry, RoomDirectory, TurnEvent,
};

use crate::composer::TurnComposer;
use crate::error::Result;

/// One client's visit to one room
pub struct RoomSession {
    channel: LiveChannel,
    directory: Arc<RoomDirectory>,
    room: Room,
    transcript: Arc<StdMutex<Vec<TurnEvent>>>,
    presence: Arc<StdMutex<Vec<PresenceEntry>>>,
    handlers: Vec<(EventKind, HandlerId)>,
    left: bool,
}

impl RoomSession {
    /// Resolve a room by code and join its live events.
    ///
    /// The channel connection is shared; entering a room reuses it
    /// (and auto-leaves a previously active room, which the channel
    /// warns about).
    pub async fn enter(
        channel: LiveChannel,
        directory: Arc<RoomDirectory>,
        code: &str,
    ) -> Result<Self> {
        let room = directory.room_by_code(code).await?;
        info!(room_id = %room.id, code = %room.room_code, "Entering room");

        channel.connect().await?;

        let transcript: Arc<StdMutex<Vec<TurnEvent>>> = Arc::new(StdMutex::new(Vec::new()));
        let presence: Arc<StdMutex<Vec<PresenceEntry>>> = Arc::new(StdMutex::new(Vec::new()));
        let mut handlers = Vec::new();

        // Append judged turns to the local transcript
        let transcript_sink = transcript.clone();
        let id = channel.on(EventKind::NewTurn, move |event| {
            if let ChannelEvent::NewTurn(turn) = event {
                let mut list = transcript_sink.lock().expect("transcript lock poisoned");
                list.push(turn.clone());
                // Backend ordering obligation, checked on receipt
                assert_turn_order_invariants(list.iter().map(|t| (t.room_id, t.sequence)));
            }
        });
        handlers.push((EventKind::NewTurn, id));

        // Events during a disconnected window are lost, so every
        // (re)connect triggers a re-fetch of authoritative state from
        // the directory. The handler only signals; the fetch runs on
        // its own task.
        let (refresh_tx, mut refresh_rx) = mpsc::unbounded_channel();
        let id = channel.on(EventKind::Connect, move |_| {
            let _ = refresh_tx.send(());
        });
        handlers.push((EventKind::Connect, id));

        let refresh_directory = directory.clone();
        let refresh_presence = presence.clone();
        let room_id = room.id;
        tokio::spawn(async move {
            while refresh_rx.recv().await.is_some() {
                match refresh_directory.room_status(room_id).await {
                    Ok(participants) => {
                        debug!(room_id = %room_id, count = participants.len(), "Refreshed presence");
                        *refresh_presence.lock().expect("presence lock poisoned") = participants;
                    }
                    Err(e) => warn!(room_id = %room_id, error = %e, "Presence refresh failed"),
                }
            }
            // Ends when the Connect handler is deregistered and dropped
        });

        channel.join_room(room.id).await?;

        // Initial snapshot; display-only, so absence is tolerated
        match directory.room_status(room.id).await {
            Ok(participants) => {
                *presence.lock().expect("presence lock poisoned") = participants;
            }
            Err(e) => warn!(room_id = %room.id, error = %e, "Initial presence fetch failed"),
        }

        Ok(Self {
            channel,
            directory,
            room,
            transcript,
            presence,
            handlers,
            left: false,
        })
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    /// Snapshot of the turns received during this visit
    pub fn transcript(&self) -> Vec<TurnEvent> {
        self.transcript
            .lock()
            .expect("transcript lock poisoned")
            .clone()
    }

    /// Last known participant list
    pub fn participants(&self) -> Vec<PresenceEntry> {
        self.presence.lock().expect("presence lock poisoned").clone()
    }

    /// Live-channel connectivity for this session
    pub fn is_live(&self) -> bool {
        self.channel.is_connected()
    }

    /// Submission flow bound to this room
    pub fn composer(&self) -> TurnComposer {
        TurnComposer::new(self.directory.clone(), self.room.id)
    }

    /// Leave the room: deregister handlers and unsubscribe
    pub async fn leave(mut self) -> Result<()> {
        self.deregister_handlers();
        self.left = true;
        self.channel.leave_room(self.room.id).await?;
        info!(room_id = %self.room.id, "Left room");
        Ok(())
    }

    fn deregister_handlers(&mut self) {
        for (kind, id) in self.handlers.drain(..) {
            self.channel.off(kind, id);
        }
    }
}

impl Drop for RoomSession {
    /// Guaranteed cleanup on non-`leave` exit paths (error, unmount)
    fn drop(&mut self) {
        self.deregister_handlers();
        if !self.left {
            if let Ok(handle) = tokio::runtime::Handle::try_current() {
                let channel = self.channel.clone();
                let room_id = self.room.id;
                handle.spawn(async move {
                    let _ = channel.leave_room(room_id).await;
                });
            }
        }
    }
}
