//! Change notifications from the presence sources to the UI layer.
//!
//! Collaborators call [`PresenceHub::emit`] when their state changes;
//! every subscriber receives the event and is expected to re-snapshot
//! and re-resolve. Emission never blocks the emitter: a subscriber
//! whose channel is full or gone is skipped.

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Which source changed. Carries no payload — consumers re-read the
/// sources through a fresh snapshot rather than patching state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PresenceEvent {
    /// Network reachability flipped.
    NetworkChanged,
    /// Session connected or disconnected.
    SessionChanged,
    /// In-progress game list updated.
    GamesUpdated,
    /// Challenge list updated.
    ChallengesUpdated,
    /// Friend presence count updated.
    FriendsUpdated,
}

/// Fan-out point for presence change notifications.
#[derive(Default)]
pub struct PresenceHub {
    subscribers: Mutex<Vec<mpsc::Sender<PresenceEvent>>>,
}

impl PresenceHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new subscriber. The channel is bounded; a consumer
    /// that stops draining it misses events rather than stalling the
    /// sources.
    pub fn subscribe(&self) -> mpsc::Receiver<PresenceEvent> {
        let (tx, rx) = mpsc::channel(64);
        self.subscribers.lock().push(tx);
        rx
    }

    /// Notify all live subscribers. Closed subscribers are dropped.
    pub fn emit(&self, event: PresenceEvent) {
        let mut subs = self.subscribers.lock();
        subs.retain(|tx| match tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(?event, "presence subscriber lagging, event dropped");
                true
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_reaches_all_subscribers() {
        let hub = PresenceHub::new();
        let mut a = hub.subscribe();
        let mut b = hub.subscribe();

        hub.emit(PresenceEvent::NetworkChanged);
        assert_eq!(a.try_recv().unwrap(), PresenceEvent::NetworkChanged);
        assert_eq!(b.try_recv().unwrap(), PresenceEvent::NetworkChanged);
    }

    #[test]
    fn closed_subscriber_is_pruned() {
        let hub = PresenceHub::new();
        let rx = hub.subscribe();
        drop(rx);
        // Must not error or leak the dead sender.
        hub.emit(PresenceEvent::FriendsUpdated);
        assert!(hub.subscribers.lock().is_empty());
    }

    #[test]
    fn full_subscriber_drops_event_but_stays() {
        let hub = PresenceHub::new();
        let mut rx = hub.subscribe();
        for _ in 0..70 {
            hub.emit(PresenceEvent::GamesUpdated);
        }
        // Channel capacity is 64; the rest were dropped, not queued.
        let mut n = 0;
        while rx.try_recv().is_ok() {
            n += 1;
        }
        assert_eq!(n, 64);
        // Still subscribed.
        hub.emit(PresenceEvent::GamesUpdated);
        assert!(rx.try_recv().is_ok());
    }
}
