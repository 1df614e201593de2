//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{DebateRole, Participant, Room, RoomStatus};

/// Validate that a Room's state is internally consistent
pub fn assert_room_invariants(room: &Room) {
    debug_assert!(
        !room.topic.trim().is_empty(),
        "Room {} has empty topic",
        room.id
    );

    debug_assert!(room.rounds >= 1, "Room {} has zero rounds", room.id);

    // A completed room is terminal
    if room.status == RoomStatus::Completed {
        debug_assert!(
            !room.status.can_transition_to(RoomStatus::Ongoing)
                && !room.status.can_transition_to(RoomStatus::Upcoming),
            "Room {} completed but re-openable",
            room.id
        );
    }
}

/// Validate that a participant list is consistent with its room
pub fn assert_participant_list_invariants(participants: &[Participant], room: &Room) {
    let host_count = participants
        .iter()
        .filter(|p| p.role == DebateRole::Host)
        .count();
    debug_assert!(
        host_count <= 1,
        "Room {} has {} hosts, expected 0 or 1",
        room.id,
        host_count
    );

    let debater_count = participants
        .iter()
        .filter(|p| p.role.can_submit_turns())
        .count();
    debug_assert!(
        debater_count as u32 <= room.max_participants,
        "Room {} has {} debaters, max is {}",
        room.id,
        debater_count,
        room.max_participants
    );

    // Spectators never carry scores
    for p in participants {
        debug_assert!(
            p.role != DebateRole::Spectator || p.score.is_none(),
            "Spectator {} in room {} carries a score",
            p.id,
            room.id
        );
    }
}

/// Validate that a transcript's sequence indices are strictly
/// increasing (the backend's ordering obligation, checked on receipt).
/// Takes `(room_id, sequence)` pairs so any transcript representation
/// can be checked.
pub fn assert_turn_order_invariants<I>(turns: I)
where
    I: IntoIterator<Item = (Uuid, u64)>,
{
    let mut prev: Option<(Uuid, u64)> = None;
    for (room_id, sequence) in turns {
        if let Some((prev_room, prev_seq)) = prev {
            debug_assert_eq!(
                prev_room, room_id,
                "Transcript mixes rooms {} and {}",
                prev_room, room_id
            );
            debug_assert!(
                prev_seq < sequence,
                "Turn sequence not strictly increasing: {} then {}",
                prev_seq,
                sequence
            );
        }
        prev = Some((room_id, sequence));
    }
}
