use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seat index within a match (0-based, wind order).
pub type Seat = u8;

/// One participant's line in a match-conclusion result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub seat: Seat,
    /// Final placement, 1-indexed.
    pub rank: u8,
    pub point: i32,
}

/// Semantic events emitted by the external game observer.
/// These represent "interesting things that happened" at a higher level
/// than the raw game protocol; the core never sees protocol frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameSignal {
    /// A seat called (chi/pon/kan) off another seat's discard.
    CallReceived {
        acting_seat: Seat,
        target_seat: Seat,
        timestamp: DateTime<Utc>,
    },

    /// A seat declared riichi.
    RiichiDeclared {
        seat: Seat,
        timestamp: DateTime<Utc>,
    },

    /// Win by discard: `loser_seat` dealt into `winner_seat`'s hand.
    RonDeclared {
        winner_seat: Seat,
        loser_seat: Seat,
        timestamp: DateTime<Utc>,
    },

    /// Win by self-draw.
    TsumoDeclared {
        winner_seat: Seat,
        timestamp: DateTime<Utc>,
    },

    /// Round ended with the wall exhausted; `ready_seats` were tenpai.
    ExhaustiveDraw {
        ready_seats: Vec<Seat>,
        timestamp: DateTime<Utc>,
    },

    /// The match's final round concluded.
    MatchConcluded {
        results: Vec<PlayerResult>,
        timestamp: DateTime<Utc>,
    },
}
