//! Remote strength hub access.
//!
//! The hub stores a strength configuration per client id and may be
//! driven concurrently by other callers; nothing read from it is cached
//! beyond a single request/response. [`StrengthPort`] is the seam the
//! rest of the core talks through, so tests run against an in-memory hub.

mod client;
mod wire;

#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

use thiserror::Error;

pub use client::StrengthClient;
pub use wire::{ApiResponse, ChannelOp, StrengthConfig, StrengthPatch};

/// Failures talking to the hub. Logical rejections (the HTTP call
/// succeeded but the hub said no) and transport errors are handled
/// identically by callers: log, abandon the operation, never retry.
#[derive(Debug, Error)]
pub enum DeviceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("hub rejected request ({code}): {message}")]
    Rejected { code: String, message: String },

    #[error("hub response carried no strength config")]
    MissingConfig,
}

/// Read/mutate access to one client's strength configuration.
pub trait StrengthPort: Send + Sync + 'static {
    /// Fetch the current remote strength configuration.
    fn read_config(&self) -> impl Future<Output = Result<StrengthConfig, DeviceError>> + Send;

    /// Apply one mutation request.
    fn apply(&self, patch: StrengthPatch) -> impl Future<Output = Result<(), DeviceError>> + Send;
}
