//! Podium Network Library
//!
//! Transport layer for the Podium debate client.
//!
//! # Architecture
//!
//! - **RoomDirectory**: pull-based HTTP client for room lookup,
//!   listing, creation, and turn submission
//! - **LiveChannel**: WebSocket channel delivering room-scoped events
//!   (new turns, joins) with auto-reconnect and re-subscription
//! - **Protocol**: tagged JSON messages
//!
//! # Usage
//!
//! ```ignore
//! let config = ClientConfig::load()?;
//! let directory = RoomDirectory::new(&config)?;
//! let channel = LiveChannel::new(&config);
//!
//! let room = directory.room_by_code("ABC123").await?;
//! channel.connect().await?;
//! channel.join_room(room.id).await?;
//!
//! let _id = channel.on(EventKind::NewTurn, |event| {
//!     if let ChannelEvent::NewTurn(turn) = event { /* handle */ }
//! });
//! ```

pub mod channel;
pub mod directory;
pub mod dispatch;
pub mod error;
pub mod protocol;

pub use channel::{ChannelEvent, ConnectionState, LiveChannel};
pub use directory::{PresenceEntry, RoomDirectory, TurnSubmission};
pub use dispatch::{EventKind, HandlerId};
pub use error::{Error, Result};
pub use protocol::{ClientMessage, ServerMessage, TurnEvent};
