pub mod actions;
pub mod bindings;
pub mod config;
pub mod controller;
pub mod device;
pub mod events;
pub mod fire;

// Re-exports for convenience
pub use bindings::TrackedParticipant;
pub use controller::{ControllerError, MatchController};
pub use device::{DeviceError, StrengthClient, StrengthPort};
pub use events::{EventBus, GameSignal, PlayerResult, Seat};
