//! Directory polling
//!
//! The directory is not push-updated; a dashboard that needs
//! freshness re-queries on a fixed interval. Snapshots go out over a
//! watch channel so consumers always see the latest complete list.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use podium_core::{Room, RoomStatus};
use podium_net::RoomDirectory;

/// Fixed re-query interval
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Background room-list poller. Stops when dropped.
pub struct DirectoryPoller {
    rx: watch::Receiver<Vec<Room>>,
    task: JoinHandle<()>,
}

impl DirectoryPoller {
    /// Start polling, optionally filtered by status category.
    /// The first query runs immediately; on failure the previous
    /// snapshot is kept rather than publishing an empty list.
    pub fn start(directory: Arc<RoomDirectory>, filter: Option<RoomStatus>) -> Self {
        Self::start_with_interval(directory, filter, POLL_INTERVAL)
    }

    /// Interval override, used by tests
    pub fn start_with_interval(
        directory: Arc<RoomDirectory>,
        filter: Option<RoomStatus>,
        interval: Duration,
    ) -> Self {
        let (tx, rx) = watch::channel(Vec::new());

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                match directory.list_rooms(filter).await {
                    Ok(rooms) => {
                        debug!(count = rooms.len(), "Room list refreshed");
                        if tx.send(rooms).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Room list refresh failed, keeping last snapshot");
                    }
                }
            }
        });

        Self { rx, task }
    }

    /// Subscribe to list snapshots
    pub fn subscribe(&self) -> watch::Receiver<Vec<Room>> {
        self.rx.clone()
    }

    /// Latest snapshot
    pub fn current(&self) -> Vec<Room> {
        self.rx.borrow().clone()
    }
}

impl Drop for DirectoryPoller {
    fn drop(&mut self) {
        self.task.abort();
    }
}
