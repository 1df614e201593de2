//! Named-event handler registry
//!
//! Supports multiple handlers per event kind without overwriting each
//! other. Closures are not comparable, so deregistration uses the
//! `HandlerId` token returned by `on`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::channel::ChannelEvent;

/// Kinds of events a handler can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Transport established (or re-established)
    Connect,
    /// Transport lost
    Disconnect,
    /// Room subscription acknowledged
    Joined,
    /// A turn was judged and broadcast
    NewTurn,
    /// Another participant joined the room
    ParticipantJoined,
}

/// Token identifying a registered handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

pub(crate) type Handler = Arc<dyn Fn(&ChannelEvent) + Send + Sync>;

/// Handler registry. `emit` snapshots the handler list before invoking
/// so a handler may call `on`/`off` without deadlocking.
#[derive(Default)]
pub(crate) struct Dispatcher {
    next_id: u64,
    handlers: HashMap<EventKind, Vec<(HandlerId, Handler)>>,
}

impl Dispatcher {
    pub fn on(&mut self, kind: EventKind, handler: Handler) -> HandlerId {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers.entry(kind).or_default().push((id, handler));
        id
    }

    /// Remove one handler; returns whether it was registered
    pub fn off(&mut self, kind: EventKind, id: HandlerId) -> bool {
        match self.handlers.get_mut(&kind) {
            Some(list) => {
                let before = list.len();
                list.retain(|(hid, _)| *hid != id);
                before != list.len()
            }
            None => false,
        }
    }

    /// Snapshot the handlers registered for `kind`
    pub fn snapshot(&self, kind: EventKind) -> Vec<Handler> {
        self.handlers
            .get(&kind)
            .map(|list| list.iter().map(|(_, h)| h.clone()).collect())
            .unwrap_or_default()
    }
}
