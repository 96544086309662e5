//! Shared configuration types for Sparrow.
//!
//! These types are the serde surface shared between the core engine,
//! the players-table TOML files, and the CLI shell. They carry no I/O
//! and no runtime state.

pub mod action;
pub mod bindings;

pub use action::{ActionConfig, ActionEffect, DEFAULT_FIRE_SECS, FireAction};
pub use bindings::PlayerBindings;
