//! Action execution: one configured response, one remote effect.

use std::sync::Arc;

use sparrow_types::{ActionConfig, ActionEffect};
use tracing::error;

use crate::device::{StrengthPatch, StrengthPort};
use crate::fire::FireOverlay;

/// Executes configured actions against the hub. Delta actions are
/// fire-and-forget: a failed request is logged and never retried, and no
/// local state tracks unacknowledged deltas. Fire actions hand off to the
/// overlay state machine.
pub struct ActionExecutor<P: StrengthPort> {
    port: Arc<P>,
    overlay: Arc<FireOverlay<P>>,
}

impl<P: StrengthPort> ActionExecutor<P> {
    pub fn new(port: Arc<P>) -> Self {
        let overlay = FireOverlay::new(port.clone());
        Self { port, overlay }
    }

    pub fn overlay(&self) -> &Arc<FireOverlay<P>> {
        &self.overlay
    }

    /// Execute one configured action. Absent or empty configs are no-ops;
    /// many triggers have no configured response.
    pub async fn execute(&self, action: Option<&ActionConfig>) {
        let Some(effect) = action.and_then(ActionConfig::effect) else {
            return;
        };
        match effect {
            ActionEffect::AddBase(v) => self.adjust(StrengthPatch::strength_add(v)).await,
            ActionEffect::SubBase(v) => self.adjust(StrengthPatch::strength_sub(v)).await,
            ActionEffect::AddRandom(v) => self.adjust(StrengthPatch::random_add(v)).await,
            ActionEffect::SubRandom(v) => self.adjust(StrengthPatch::random_sub(v)).await,
            ActionEffect::Fire(fire) => self.overlay.trigger(fire).await,
        }
    }

    async fn adjust(&self, patch: StrengthPatch) {
        if let Err(e) = self.port.apply(patch).await {
            error!(error = %e, "strength adjustment failed");
        }
    }
}
