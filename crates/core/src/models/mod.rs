//! Domain models

mod code;
mod participant;
mod result;
mod room;
mod turn;

pub use code::RoomCode;
pub use participant::{DebateRole, Participant};
pub use result::DebateResult;
pub use room::{Room, RoomDraft, RoomMode, RoomStatus, Visibility};
pub use turn::Turn;
