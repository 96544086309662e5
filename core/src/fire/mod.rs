//! Timed fire overlay: a temporary strength boost with reconciled reversal.
//!
//! ```text
//!            trigger(fire)                now >= expires_at
//!   Idle ───────────────────▶ Active ───────────────────────▶ Idle
//!    ▲                          │  ▲                            │
//!    │                          └──┘ re-trigger: extend window, │
//!    └──────────────────────────────  raise (never lower) boost ┘
//! ```
//!
//! The hub's strength value is shared with other, uncoordinated writers,
//! so the overlay never trusts its own request: it reads, applies, reads
//! again, and attributes only the measured diff to itself.

mod overlay;

#[cfg(test)]
mod overlay_tests;

pub use overlay::{FireOverlay, POLL_INTERVAL};
