//! Podium Client Library
//!
//! The session layer a UI embeds: room visits with guaranteed
//! cleanup, the turn submission flow, and directory polling. All
//! network access goes through `podium-net`; this crate only
//! orchestrates.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod composer;
pub mod error;
pub mod poller;
pub mod session;

pub use composer::TurnComposer;
pub use error::{Error, Result};
pub use poller::DirectoryPoller;
pub use session::RoomSession;

/// Initialize logging for an embedding application.
/// Respects `RUST_LOG` via the env filter.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();
}
