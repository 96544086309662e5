use tokio::sync::broadcast;

use super::GameSignal;

/// Broadcast fan-out for game signals.
///
/// Publishing never blocks; slow subscribers observe a lag error on their
/// receiver rather than back-pressuring the feed.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<GameSignal>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GameSignal> {
        self.tx.subscribe()
    }

    /// Publish a signal. A bus with no live subscribers drops it silently.
    pub fn publish(&self, signal: GameSignal) {
        let _ = self.tx.send(signal);
    }

    /// Number of live subscriptions.
    pub fn receiver_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
