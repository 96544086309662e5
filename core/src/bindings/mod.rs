//! Match-table resolution: picking the single binding record that governs
//! the tracked participant.

use sparrow_types::PlayerBindings;

use crate::events::Seat;

/// The participant this controller acts for. Immutable for the
/// controller's lifetime.
#[derive(Debug, Clone)]
pub struct TrackedParticipant {
    pub account_id: u64,
    pub nickname: String,
    pub seat: Seat,
}

/// Find the first table entry whose id matches the participant's account
/// id or whose name matches the participant's nickname. Either alone
/// satisfies the match.
pub fn resolve<'a>(
    table: &'a [PlayerBindings],
    participant: &TrackedParticipant,
) -> Option<&'a PlayerBindings> {
    table
        .iter()
        .find(|entry| entry.matches(participant.account_id, &participant.nickname))
}
