//! The remaining popups: continue-game, paste-FEN and friends list.
//!
//! Each is a thin specialization of [`PopupController`] with a typed
//! payload and the handful of operations its screen needs. They share
//! the coordinator with the mini-user card, so the one-popup-open rule
//! holds across all of them.

use std::sync::Arc;

use crate::popup::{PopupController, PopupCoordinator};

/// "Continue from here" popup: offers to start a game from a position
/// the user built elsewhere. The position is an opaque FEN string —
/// parsing and validation are owned by the board collaborator.
pub struct ContinuePopup {
    popup: PopupController<String>,
}

impl ContinuePopup {
    pub fn new(coordinator: Arc<PopupCoordinator>) -> Self {
        Self { popup: PopupController::new(coordinator) }
    }

    pub fn open(&mut self, fen: impl Into<String>) -> bool {
        self.popup.open(fen.into())
    }

    pub fn close(&mut self) {
        self.popup.close();
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    /// The position the popup was opened with.
    pub fn fen(&self) -> Option<&str> {
        self.popup.payload().map(String::as_str)
    }
}

/// Editable input buffer of the paste-FEN popup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenInput {
    pub text: String,
}

/// Paste-FEN popup: a small form the user types or pastes a position
/// into. Edits only land while the popup is open; closing discards
/// the buffer. This popup is the reason opening never evicts: an
/// implicit close here would eat a half-typed position.
pub struct PasteFenPopup {
    popup: PopupController<FenInput>,
}

impl PasteFenPopup {
    pub fn new(coordinator: Arc<PopupCoordinator>) -> Self {
        Self { popup: PopupController::new(coordinator) }
    }

    pub fn open(&mut self) -> bool {
        self.popup.open(FenInput::default())
    }

    pub fn close(&mut self) {
        self.popup.close();
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn input(&self) -> Option<&str> {
        self.popup.payload().map(|p| p.text.as_str())
    }

    /// Replace the buffer contents. Ignored while closed.
    pub fn set_input(&mut self, text: impl Into<String>) {
        if let Some(payload) = self.popup.payload_mut() {
            payload.text = text.into();
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(payload) = self.popup.payload_mut() {
            payload.text.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(payload) = self.popup.payload_mut() {
            payload.text.pop();
        }
    }

    /// Close and hand the typed position to the caller.
    pub fn submit(&mut self) -> Option<String> {
        let text = self.popup.payload().map(|p| p.text.clone())?;
        self.popup.close();
        Some(text)
    }
}

/// Friends-list popup: shows who is online, captured at open time.
pub struct FriendsPopup {
    popup: PopupController<Vec<String>>,
}

impl FriendsPopup {
    pub fn new(coordinator: Arc<PopupCoordinator>) -> Self {
        Self { popup: PopupController::new(coordinator) }
    }

    pub fn open(&mut self, names: Vec<String>) -> bool {
        self.popup.open(names)
    }

    pub fn close(&mut self) {
        self.popup.close();
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn names(&self) -> Option<&[String]> {
        self.popup.payload().map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continue_popup_carries_its_position() {
        let mut popup = ContinuePopup::new(PopupCoordinator::new());
        assert!(popup.open("r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq -"));
        assert!(popup.fen().unwrap().starts_with("r1bqkbnr"));
        popup.close();
        assert!(popup.fen().is_none());
    }

    #[test]
    fn paste_fen_edits_only_while_open() {
        let mut popup = PasteFenPopup::new(PopupCoordinator::new());
        popup.set_input("8/8/8/8/8/8/8/8 w - -");
        assert!(popup.input().is_none());

        assert!(popup.open());
        assert_eq!(popup.input(), Some(""));
        popup.set_input("4k3/8");
        popup.push_char('/');
        popup.push_char('9');
        popup.pop_char();
        assert_eq!(popup.input(), Some("4k3/8/"));

        assert_eq!(popup.submit().unwrap(), "4k3/8/");
        assert!(!popup.is_open());
        // Buffer did not survive the close.
        assert!(popup.open());
        assert_eq!(popup.input(), Some(""));
    }

    #[test]
    fn specialized_popups_share_the_single_open_rule() {
        let coord = PopupCoordinator::new();
        let mut paste = PasteFenPopup::new(coord.clone());
        let mut friends = FriendsPopup::new(coord.clone());
        let mut cont = ContinuePopup::new(coord);

        assert!(paste.open());
        assert!(!friends.open(vec!["ana".into()]));
        assert!(!cont.open("8/8/8/8/8/8/8/8 w - -"));

        paste.close();
        assert!(friends.open(vec!["ana".into(), "magnus".into()]));
        assert_eq!(friends.names().unwrap().len(), 2);
    }
}
