//! Mini-user card: a popup that enriches a known user with ratings and
//! a head-to-head record fetched after it opens.
//!
//! The identity line (name, online dot, title) is known before the
//! fetch starts, so the card opens immediately in a loading state and
//! the fetch only ever *adds* content. A failed fetch is deliberately
//! invisible: the card keeps spinning rather than closing or showing
//! an error. A fetch that resolves after the card was closed (or
//! re-opened for someone else) is discarded by ticket comparison.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Deserialize;

use crate::error::ProfileError;
use crate::popup::{PopupController, PopupCoordinator};

/// Minimal identity shown in the card title regardless of fetch state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserLite {
    pub id: String,
    pub username: String,
    pub online: bool,
    pub title: Option<String>,
    pub patron: bool,
}

impl UserLite {
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            online: true,
            title: None,
            patron: false,
        }
    }
}

/// Per-variant rating summary.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Perf {
    pub games: u32,
    pub rating: u32,
    /// Provisional rating (low game count).
    #[serde(default)]
    pub prov: bool,
}

/// Head-to-head record between the session user and the card's user,
/// scores keyed by user id. Draws count half a point.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Crosstable {
    #[serde(rename = "nbGames")]
    pub nb_games: u32,
    pub users: HashMap<String, f64>,
}

impl Crosstable {
    /// `"mine - theirs"` score line, or `None` when no games were
    /// played. Whole scores print without the trailing `.0`.
    pub fn score_line(&self, my_id: &str, their_id: &str) -> Option<String> {
        if self.nb_games == 0 {
            return None;
        }
        let mine = self.users.get(my_id).copied().unwrap_or(0.0);
        let theirs = self.users.get(their_id).copied().unwrap_or(0.0);
        Some(format!("{} - {}", fmt_score(mine), fmt_score(theirs)))
    }
}

fn fmt_score(s: f64) -> String {
    if s.fract() == 0.0 {
        format!("{}", s as i64)
    } else {
        format!("{s}")
    }
}

/// Enrichment data fetched after the card opens.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MiniProfile {
    #[serde(default)]
    pub perfs: BTreeMap<String, Perf>,
    #[serde(default)]
    pub crosstable: Option<Crosstable>,
}

impl MiniProfile {
    /// Chip text for one variant: rating with a `?` marker while
    /// provisional, a dash when the variant has zero games.
    pub fn chip(perf: &Perf) -> String {
        if perf.games == 0 {
            "-".to_string()
        } else if perf.prov {
            format!("{}?", perf.rating)
        } else {
            perf.rating.to_string()
        }
    }
}

/// Identifies one `open()` call; completions carrying a stale ticket
/// are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Card payload: the user plus the profile once it has arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct MiniUserPayload {
    pub user: UserLite,
    /// `None` while the fetch is outstanding (spinner state).
    pub profile: Option<MiniProfile>,
}

/// Popup controller specialization for the mini-user card.
pub struct MiniUserCard {
    popup: PopupController<MiniUserPayload>,
    generation: u64,
}

impl MiniUserCard {
    pub fn new(coordinator: Arc<PopupCoordinator>) -> Self {
        Self {
            popup: PopupController::new(coordinator),
            generation: 0,
        }
    }

    /// Open for `user`, in loading state. Returns the ticket the
    /// caller must present with the fetched profile, or `None` when
    /// another popup is already open.
    pub fn open(&mut self, user: UserLite) -> Option<FetchTicket> {
        let opened = self.popup.open(MiniUserPayload { user, profile: None });
        if !opened {
            return None;
        }
        self.generation += 1;
        Some(FetchTicket(self.generation))
    }

    /// Close and discard everything, forcing a fresh fetch next open.
    pub fn close(&mut self) {
        self.popup.close();
    }

    pub fn is_open(&self) -> bool {
        self.popup.is_open()
    }

    pub fn payload(&self) -> Option<&MiniUserPayload> {
        self.popup.payload()
    }

    /// Whether the card is open and still waiting for its profile.
    pub fn is_loading(&self) -> bool {
        matches!(self.popup.payload(), Some(p) if p.profile.is_none())
    }

    /// Apply a fetched profile. Returns `false` (and changes nothing)
    /// when the ticket is stale: the card was closed, or re-opened for
    /// another user, after the fetch started.
    pub fn resolve_profile(&mut self, ticket: FetchTicket, profile: MiniProfile) -> bool {
        if ticket.0 != self.generation || !self.popup.is_open() {
            tracing::debug!(ticket = ticket.0, current = self.generation, "stale profile fetch discarded");
            return false;
        }
        if let Some(payload) = self.popup.payload_mut() {
            payload.profile = Some(profile);
            true
        } else {
            false
        }
    }

    /// Record a failed fetch. The card stays open and loading; the
    /// identity header is already on screen and an error would add
    /// nothing the user can act on.
    pub fn fetch_failed(&mut self, ticket: FetchTicket, err: &ProfileError) {
        tracing::debug!(ticket = ticket.0, %err, "mini profile fetch failed, card stays loading");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> MiniUserCard {
        MiniUserCard::new(PopupCoordinator::new())
    }

    fn blitz_profile(rating: u32) -> MiniProfile {
        let mut perfs = BTreeMap::new();
        perfs.insert("blitz".to_string(), Perf { games: 10, rating, prov: false });
        MiniProfile { perfs, crosstable: None }
    }

    #[test]
    fn opens_loading_then_resolves() {
        let mut card = card();
        let ticket = card.open(UserLite::new("bob", "Bob")).unwrap();
        assert!(card.is_open());
        assert!(card.is_loading());

        assert!(card.resolve_profile(ticket, blitz_profile(1500)));
        assert!(!card.is_loading());
        let payload = card.payload().unwrap();
        let perf = payload.profile.as_ref().unwrap().perfs.get("blitz").unwrap();
        assert_eq!(MiniProfile::chip(perf), "1500");
    }

    #[test]
    fn resolution_after_close_is_discarded() {
        let mut card = card();
        let ticket = card.open(UserLite::new("bob", "Bob")).unwrap();
        card.close();

        assert!(!card.resolve_profile(ticket, blitz_profile(1500)));
        assert!(!card.is_open());
        assert!(card.payload().is_none());
    }

    #[test]
    fn resolution_for_previous_open_is_discarded() {
        let mut card = card();
        let old_ticket = card.open(UserLite::new("bob", "Bob")).unwrap();
        card.close();
        let _new_ticket = card.open(UserLite::new("alice", "Alice")).unwrap();

        // Bob's late fetch must not land on Alice's card.
        assert!(!card.resolve_profile(old_ticket, blitz_profile(1500)));
        assert!(card.is_loading());
        assert_eq!(card.payload().unwrap().user.username, "Alice");
    }

    #[test]
    fn failed_fetch_keeps_card_loading() {
        let mut card = card();
        let ticket = card.open(UserLite::new("bob", "Bob")).unwrap();
        card.fetch_failed(ticket, &ProfileError::Status(503));
        assert!(card.is_open());
        assert!(card.is_loading());
    }

    #[test]
    fn open_rejected_while_another_popup_is_open() {
        let coord = PopupCoordinator::new();
        let mut other: PopupController<()> = PopupController::new(coord.clone());
        assert!(other.open(()));

        let mut card = MiniUserCard::new(coord);
        assert!(card.open(UserLite::new("bob", "Bob")).is_none());
        assert!(!card.is_open());

        other.close();
        assert!(card.open(UserLite::new("bob", "Bob")).is_some());
    }

    #[test]
    fn chip_marks_provisional_and_empty_variants() {
        assert_eq!(MiniProfile::chip(&Perf { games: 3, rating: 1420, prov: true }), "1420?");
        assert_eq!(MiniProfile::chip(&Perf { games: 0, rating: 1500, prov: false }), "-");
    }

    #[test]
    fn crosstable_score_line() {
        let mut users = HashMap::new();
        users.insert("me".to_string(), 2.5);
        users.insert("them".to_string(), 1.0);
        let ct = Crosstable { nb_games: 4, users };
        assert_eq!(ct.score_line("me", "them").unwrap(), "2.5 - 1");

        let empty = Crosstable { nb_games: 0, users: HashMap::new() };
        assert!(empty.score_line("me", "them").is_none());
    }

    #[test]
    fn profile_deserializes_from_service_json() {
        let json = r#"{
            "perfs": {
                "blitz": { "games": 241, "rating": 1732 },
                "bullet": { "games": 5, "rating": 1500, "prov": true }
            },
            "crosstable": { "nbGames": 3, "users": { "me": 2, "bob": 1 } }
        }"#;
        let profile: MiniProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.perfs["blitz"].rating, 1732);
        assert!(profile.perfs["bullet"].prov);
        assert_eq!(profile.crosstable.unwrap().nb_games, 3);
    }
}
