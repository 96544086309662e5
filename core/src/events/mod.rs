//! Semantic game events and the bus that distributes them.
//!
//! The external observer publishes [`GameSignal`]s on an [`EventBus`];
//! each controller holds exactly one broadcast receiver, so dropping
//! that receiver releases every subscription in a single operation.

mod bus;
pub mod signal;

pub use bus::EventBus;
pub use signal::{GameSignal, PlayerResult, Seat};
