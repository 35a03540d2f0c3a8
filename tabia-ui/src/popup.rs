//! Single-popup lifecycle shared by every popup in the app.
//!
//! At most one popup is open process-wide. The rule is owned by an
//! explicit [`PopupCoordinator`] injected into every controller rather
//! than implied by view wiring, so there is exactly one place that can
//! break it. Opening while another popup holds the claim is a silent
//! no-op: no implicit eviction, since evicting would discard payloads
//! like a half-typed FEN.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

/// Lifecycle state of one popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopupState<P> {
    Closed,
    /// Claim taken, payload not yet installed. Only ever observed
    /// from inside the controller; `open()` leaves in `Open`.
    Opening,
    Open(P),
}

/// Process-wide open-popup claim table.
#[derive(Default)]
pub struct PopupCoordinator {
    open: Mutex<Option<u64>>,
    next_id: AtomicU64,
}

impl PopupCoordinator {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Whether any popup currently holds the claim.
    pub fn any_open(&self) -> bool {
        self.open.lock().is_some()
    }

    fn allocate_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    fn try_claim(&self, id: u64) -> bool {
        let mut open = self.open.lock();
        match *open {
            Some(holder) => {
                tracing::debug!(holder, rejected = id, "popup open rejected, another is open");
                false
            }
            None => {
                *open = Some(id);
                true
            }
        }
    }

    fn release(&self, id: u64) {
        let mut open = self.open.lock();
        if *open == Some(id) {
            *open = None;
        }
    }
}

/// Generic open/close controller for one popup, parameterized by its
/// payload. The payload lives exactly as long as the popup is open.
pub struct PopupController<P> {
    id: u64,
    coordinator: Arc<PopupCoordinator>,
    state: PopupState<P>,
}

impl<P> PopupController<P> {
    pub fn new(coordinator: Arc<PopupCoordinator>) -> Self {
        let id = coordinator.allocate_id();
        Self {
            id,
            coordinator,
            state: PopupState::Closed,
        }
    }

    /// Open with the given payload. Returns `false` without any state
    /// change if this or any other popup is already open.
    pub fn open(&mut self, payload: P) -> bool {
        if !self.coordinator.try_claim(self.id) {
            return false;
        }
        self.state = PopupState::Opening;
        self.state = PopupState::Open(payload);
        tracing::debug!(id = self.id, "popup opened");
        true
    }

    /// Close and discard the payload. Idempotent: closing a closed
    /// popup is a no-op.
    pub fn close(&mut self) {
        if matches!(self.state, PopupState::Closed) {
            return;
        }
        self.state = PopupState::Closed;
        self.coordinator.release(self.id);
        tracing::debug!(id = self.id, "popup closed");
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PopupState::Open(_))
    }

    pub fn payload(&self) -> Option<&P> {
        match &self.state {
            PopupState::Open(p) => Some(p),
            _ => None,
        }
    }

    pub fn payload_mut(&mut self) -> Option<&mut P> {
        match &mut self.state {
            PopupState::Open(p) => Some(p),
            _ => None,
        }
    }
}

impl<P> Drop for PopupController<P> {
    fn drop(&mut self) {
        self.coordinator.release(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_round_trip() {
        let coord = PopupCoordinator::new();
        let mut popup: PopupController<&str> = PopupController::new(coord.clone());

        assert!(!popup.is_open());
        assert!(popup.open("payload"));
        assert!(popup.is_open());
        assert!(coord.any_open());
        assert_eq!(popup.payload(), Some(&"payload"));

        popup.close();
        assert!(!popup.is_open());
        assert!(!coord.any_open());
        assert_eq!(popup.payload(), None);
    }

    #[test]
    fn second_popup_is_rejected_until_first_closes() {
        let coord = PopupCoordinator::new();
        let mut a: PopupController<u32> = PopupController::new(coord.clone());
        let mut b: PopupController<u32> = PopupController::new(coord.clone());

        assert!(a.open(1));
        assert!(!b.open(2));
        assert!(!b.is_open());
        // The rejected open left the first untouched.
        assert_eq!(a.payload(), Some(&1));

        a.close();
        assert!(b.open(2));
        assert_eq!(b.payload(), Some(&2));
    }

    #[test]
    fn reopen_while_open_is_a_no_op() {
        let coord = PopupCoordinator::new();
        let mut popup: PopupController<u32> = PopupController::new(coord);
        assert!(popup.open(1));
        assert!(!popup.open(2));
        assert_eq!(popup.payload(), Some(&1));
    }

    #[test]
    fn close_is_idempotent() {
        let coord = PopupCoordinator::new();
        let mut popup: PopupController<()> = PopupController::new(coord);
        popup.close();
        assert!(popup.open(()));
        popup.close();
        popup.close();
        assert!(!popup.is_open());
    }

    #[test]
    fn dropping_an_open_popup_releases_the_claim() {
        let coord = PopupCoordinator::new();
        let mut a: PopupController<u32> = PopupController::new(coord.clone());
        assert!(a.open(1));
        drop(a);

        let mut b: PopupController<u32> = PopupController::new(coord);
        assert!(b.open(2));
    }

    #[test]
    fn payload_mut_edits_only_while_open() {
        let coord = PopupCoordinator::new();
        let mut popup: PopupController<String> = PopupController::new(coord);
        assert!(popup.payload_mut().is_none());
        assert!(popup.open(String::from("4k3")));
        popup.payload_mut().unwrap().push_str("/8");
        assert_eq!(popup.payload().unwrap(), "4k3/8");
    }
}
