use std::sync::{Arc, Weak};
use std::time::Duration;

use sparrow_types::FireAction;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, warn};

use crate::device::{StrengthPatch, StrengthPort};

/// Cadence of the expiry check while an overlay is active.
pub const POLL_INTERVAL: Duration = Duration::from_millis(100);

struct OverlayState {
    active: bool,
    expires_at: Instant,
    /// Net strength increase attributable to this overlay, as measured
    /// from the hub — not the requested value.
    applied_delta: i32,
    /// Handle of the single polling task. At most one exists per overlay.
    poll: Option<JoinHandle<()>>,
}

impl OverlayState {
    fn new() -> Self {
        Self {
            active: false,
            expires_at: Instant::now(),
            applied_delta: 0,
            poll: None,
        }
    }
}

/// One controller's fire overlay. The mutex is held across the whole
/// read-apply-read sequence, so overlapping triggers serialize instead of
/// racing the reconciliation.
pub struct FireOverlay<P: StrengthPort> {
    port: Arc<P>,
    state: Mutex<OverlayState>,
}

impl<P: StrengthPort> FireOverlay<P> {
    pub fn new(port: Arc<P>) -> Arc<Self> {
        Arc::new(Self {
            port,
            state: Mutex::new(OverlayState::new()),
        })
    }

    /// Start a new activation cycle, or extend and possibly raise the
    /// current one. Re-firing never lowers the boost.
    pub async fn trigger(self: &Arc<Self>, fire: &FireAction) {
        let mut st = self.state.lock().await;

        let window = Duration::from_secs_f32(fire.time.max(0.0));
        if st.active {
            // Additive extension, not reset-to.
            st.expires_at += window;
        } else {
            st.active = true;
            st.expires_at = Instant::now() + window;
            st.applied_delta = 0;
        }

        if st.poll.is_none() {
            let overlay = Arc::downgrade(self);
            st.poll = Some(tokio::spawn(poll_expiry(overlay)));
        }

        let requested = st.applied_delta.max(fire.strength.max(0));
        let step = requested - st.applied_delta;
        if step == 0 {
            // Nothing to raise; the window extension alone suffices.
            debug!(applied_delta = st.applied_delta, "fire overlay extended");
            return;
        }

        let before = match self.port.read_config().await {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!(error = %e, "pre-apply read failed, abandoning fire activation");
                st.applied_delta = 0;
                return;
            }
        };

        if let Err(e) = self.port.apply(StrengthPatch::strength_add(step)).await {
            error!(error = %e, step, "fire apply failed");
            return;
        }

        match self.port.read_config().await {
            Ok(after) => {
                // Other clients may have moved strength between the two
                // reads; the measured diff is the true attributable delta.
                st.applied_delta += after.strength - before.strength;
            }
            Err(e) => {
                warn!(error = %e, "post-apply read failed, attributing requested delta");
                st.applied_delta = requested;
            }
        }

        debug!(applied_delta = st.applied_delta, "fire overlay active");
    }

    /// Whether an activation cycle is currently running.
    pub async fn is_active(&self) -> bool {
        self.state.lock().await.active
    }

    /// Current attributed delta (0 while idle).
    pub async fn applied_delta(&self) -> i32 {
        self.state.lock().await.applied_delta
    }

    /// Stop the polling task and drop all overlay state without reversing
    /// the boost. Used by controller teardown.
    pub async fn shutdown(&self) {
        let mut st = self.state.lock().await;
        if let Some(poll) = st.poll.take() {
            poll.abort();
        }
        st.active = false;
        st.applied_delta = 0;
    }

    /// One expiry check. Returns true when the polling task should stop.
    async fn expire_if_due(&self) -> bool {
        let mut st = self.state.lock().await;
        if !st.active {
            st.poll = None;
            return true;
        }
        if Instant::now() < st.expires_at {
            return false;
        }

        let delta = std::mem::take(&mut st.applied_delta);
        st.active = false;
        st.poll = None;

        // Best-effort reversal, not retried; deliberately not clamped to
        // the remote value (a concurrent lowering is the hub's problem).
        if delta > 0
            && let Err(e) = self.port.apply(StrengthPatch::strength_sub(delta)).await
        {
            error!(error = %e, delta, "overlay reversal failed");
        }
        true
    }
}

async fn poll_expiry<P: StrengthPort>(overlay: Weak<FireOverlay<P>>) {
    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(overlay) = overlay.upgrade() else {
            return;
        };
        if overlay.expire_if_due().await {
            return;
        }
    }
}
