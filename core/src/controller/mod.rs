//! Match controller: the single owner of one (match, participant) pair.
//!
//! ```text
//!   EventBus ──▶ dispatcher loop ──▶ settle delay ──▶ ActionExecutor
//!                     │                                    │
//!                     │ MatchConcluded                     ├─▶ hub client
//!                     ▼                                    └─▶ fire overlay ──▶ hub client
//!               outcome handler (10s) ──▶ teardown
//! ```
//!
//! The dispatcher runs as one task; delayed handlers live in a `JoinSet`
//! it owns, so teardown aborts every pending timer at once. Dropping the
//! dispatcher's receiver releases all event subscriptions in a single
//! operation.


use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use sparrow_types::{ActionConfig, PlayerBindings};
use thiserror::Error;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{Notify, RwLock, broadcast};
use tokio::task::JoinSet;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::actions::ActionExecutor;
use crate::bindings::{self, TrackedParticipant};
use crate::device::StrengthPort;
use crate::events::{EventBus, GameSignal, PlayerResult};

/// Wait before reacting to call/riichi/win events, letting the game
/// client's own presentation settle first.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Wait after the final-round event before handling placements and
/// retiring the controller.
pub const OUTCOME_DELAY: Duration = Duration::from_secs(10);

/// A participant whose points end below this is "shot down" (jifei).
pub const SHOT_DOWN_THRESHOLD: i32 = 0;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("no binding record matches the tracked participant")]
    BindingsNotFound,
}

/// One controller per (match, tracked participant). Single-use: it retires
/// itself after the match concludes, or on explicit teardown.
pub struct MatchController<P: StrengthPort> {
    shared: Arc<Shared<P>>,
}

struct Shared<P: StrengthPort> {
    participant: TrackedParticipant,
    bindings: RwLock<PlayerBindings>,
    executor: ActionExecutor<P>,
    closed: AtomicBool,
    closed_notify: Notify,
}

impl<P: StrengthPort> MatchController<P> {
    /// Resolve the participant's bindings and start dispatching. Fails
    /// without creating any subscription when no table entry matches.
    pub fn start(
        table: &[PlayerBindings],
        participant: TrackedParticipant,
        port: Arc<P>,
        events: &EventBus,
    ) -> Result<Self, ControllerError> {
        let Some(found) = bindings::resolve(table, &participant) else {
            error!(
                account_id = participant.account_id,
                nickname = %participant.nickname,
                "no binding record for participant, controller not started"
            );
            return Err(ControllerError::BindingsNotFound);
        };

        let shared = Arc::new(Shared {
            participant,
            bindings: RwLock::new(found.clone()),
            executor: ActionExecutor::new(port),
            closed: AtomicBool::new(false),
            closed_notify: Notify::new(),
        });

        let rx = events.subscribe();
        tokio::spawn(dispatch_loop(shared.clone(), rx));

        Ok(Self { shared })
    }

    /// Re-resolve bindings from a fresh table (live config swap). A table
    /// with no match tears the controller down exactly as at construction.
    pub async fn refresh_bindings(
        &self,
        table: &[PlayerBindings],
    ) -> Result<(), ControllerError> {
        match bindings::resolve(table, &self.shared.participant) {
            Some(found) => {
                *self.shared.bindings.write().await = found.clone();
                debug!("bindings refreshed");
                Ok(())
            }
            None => {
                error!(
                    account_id = self.shared.participant.account_id,
                    "binding refresh found no match, tearing down"
                );
                self.shared.mark_closed();
                Err(ControllerError::BindingsNotFound)
            }
        }
    }

    /// Idempotent: stops the dispatcher, which aborts all pending delayed
    /// handlers and the overlay's polling task.
    pub fn teardown(&self) {
        self.shared.mark_closed();
    }

    pub fn is_closed(&self) -> bool {
        self.shared.is_closed()
    }

    /// Resolves once the controller has retired (conclusion or teardown).
    pub async fn wait_closed(&self) {
        let notified = self.shared.closed_notify.notified();
        tokio::pin!(notified);
        // Register before checking so a notify between the two is kept.
        notified.as_mut().enable();
        if self.shared.is_closed() {
            return;
        }
        notified.await;
    }
}

impl<P: StrengthPort> Shared<P> {
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn mark_closed(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.closed_notify.notify_waiters();
        }
    }

    /// Seat-filter one signal and schedule its configured response.
    fn route(self: &Arc<Self>, signal: GameSignal, pending: &mut JoinSet<()>) {
        let seat = self.participant.seat;
        match signal {
            GameSignal::CallReceived {
                acting_seat,
                target_seat,
                ..
            } => {
                if target_seat == seat && acting_seat != seat {
                    debug!(acting_seat, "call received against tracked seat");
                    self.schedule(pending, SETTLE_DELAY, |b| b.call_received.clone());
                }
            }
            GameSignal::RiichiDeclared { seat: declarer, .. } => {
                if declarer != seat {
                    self.schedule(pending, SETTLE_DELAY, |b| b.others_riichi.clone());
                }
            }
            GameSignal::RonDeclared {
                winner_seat,
                loser_seat,
                ..
            } => {
                if loser_seat == seat && winner_seat != seat {
                    debug!(winner_seat, "tracked seat dealt in");
                    self.schedule(pending, SETTLE_DELAY, |b| b.point_into.clone());
                }
            }
            GameSignal::TsumoDeclared { winner_seat, .. } => {
                if winner_seat != seat {
                    self.schedule(pending, SETTLE_DELAY, |b| b.others_tsumo.clone());
                }
            }
            GameSignal::ExhaustiveDraw { ready_seats, .. } => {
                // Draw outcomes are final; no settle delay.
                let ready = ready_seats.contains(&seat);
                self.schedule(pending, Duration::ZERO, move |b| {
                    if ready {
                        b.draw_ready.clone()
                    } else {
                        b.draw_not_ready.clone()
                    }
                });
            }
            GameSignal::MatchConcluded { results, .. } => {
                let shared = self.clone();
                pending.spawn(async move {
                    sleep(OUTCOME_DELAY).await;
                    shared.handle_outcome(&results).await;
                    // Single-use per match: retire unconditionally.
                    shared.mark_closed();
                });
            }
        }
    }

    fn schedule<F>(self: &Arc<Self>, pending: &mut JoinSet<()>, delay: Duration, select: F)
    where
        F: FnOnce(&PlayerBindings) -> Option<ActionConfig> + Send + 'static,
    {
        let shared = self.clone();
        pending.spawn(async move {
            if !delay.is_zero() {
                sleep(delay).await;
            }
            let action = select(&*shared.bindings.read().await);
            shared.executor.execute(action.as_ref()).await;
        });
    }

    /// Pick and dispatch the placement or shot-down action.
    async fn handle_outcome(&self, results: &[PlayerResult]) {
        let seat = self.participant.seat;
        let Some(record) = results.iter().find(|r| r.seat == seat) else {
            error!(seat, "tracked participant missing from match results");
            return;
        };

        let bindings = self.bindings.read().await;

        // Shot-down wins outright over placement when configured.
        let action = if record.point < SHOT_DOWN_THRESHOLD && bindings.shot_down.is_some() {
            info!(point = record.point, "participant shot down");
            bindings.shot_down.clone()
        } else {
            let ranks = match results.len() {
                3 => &bindings.rank_three,
                4 => &bindings.rank_four,
                n => {
                    warn!(players = n, "unexpected result-set size, skipping rank dispatch");
                    return;
                }
            };
            let slot = record.rank.checked_sub(1).map(usize::from);
            slot.and_then(|i| ranks.get(i)).cloned()
        };

        self.executor.execute(action.as_ref()).await;
    }
}

async fn dispatch_loop<P: StrengthPort>(
    shared: Arc<Shared<P>>,
    mut events: broadcast::Receiver<GameSignal>,
) {
    let mut pending: JoinSet<()> = JoinSet::new();

    loop {
        // Register the teardown waiter before checking the flag; a
        // mark_closed landing between the two would otherwise be lost and
        // leave the loop parked until the next event.
        let closed = shared.closed_notify.notified();
        tokio::pin!(closed);
        closed.as_mut().enable();
        if shared.is_closed() {
            break;
        }
        tokio::select! {
            _ = &mut closed => break,
            event = events.recv() => match event {
                Ok(signal) => {
                    debug!(?signal, "event received");
                    shared.route(signal, &mut pending);
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event feed lagged");
                }
                Err(RecvError::Closed) => break,
            },
            Some(_) = pending.join_next(), if !pending.is_empty() => {}
        }
    }

    // Pending settle/outcome timers die with the controller; the receiver
    // drop releases every event subscription at once.
    pending.abort_all();
    shared.executor.overlay().shutdown().await;
    shared.mark_closed();
    info!("controller retired");
}
