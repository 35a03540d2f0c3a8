//! Header affordance resolution.
//!
//! [`resolve`] maps one [`PresenceSnapshot`] to the ordered list of
//! header controls. It is pure: same snapshot in, same affordances
//! out, no side effects. Activation is expressed as data ([`Action`],
//! [`Hint`]) which the view layer dispatches through whatever handler
//! it was built with, so the resolver never touches navigation, popups
//! or platform toasts itself.

use crate::snapshot::PresenceSnapshot;

/// Stable identity for an affordance, used by the view for diffing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AffordanceKey {
    Friends,
    GamesMenu,
    NewGameForm,
}

impl AffordanceKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            AffordanceKey::Friends => "friends",
            AffordanceKey::GamesMenu => "games-menu",
            AffordanceKey::NewGameForm => "new-game-form",
        }
    }

    /// Glyph shown on the control.
    pub fn icon(&self) -> &'static str {
        match self {
            AffordanceKey::Friends => "f",
            AffordanceKey::GamesMenu => "=",
            AffordanceKey::NewGameForm => "+",
        }
    }
}

/// What tapping an affordance should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    OpenFriendsPopup,
    OpenGamesMenu,
    OpenNewGameForm,
}

/// Transient informational hint surfaced on long-press. Presenting a
/// hint must never mutate state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    OnlineFriends,
    GamesInPlay(u32),
}

/// One interactive header control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Affordance {
    pub key: AffordanceKey,
    /// Pending count overlaid on the control, if any.
    pub badge: Option<u32>,
    /// New-challenge visual state. Set only alongside an
    /// incoming-challenge badge.
    pub highlight: bool,
    /// When false the control is rendered disabled/invisible but kept
    /// in the list for layout stability.
    pub visible: bool,
    pub action: Action,
    pub long_press: Option<Hint>,
}

impl Affordance {
    pub fn icon(&self) -> &'static str {
        self.key.icon()
    }
}

/// Resolve the header affordances for one snapshot.
///
/// Order: friends control (when present) first, then the primary
/// games/challenges control, which is always present.
pub fn resolve(snapshot: &PresenceSnapshot) -> Vec<Affordance> {
    let mut out = Vec::with_capacity(2);

    if snapshot.online && snapshot.session_connected && snapshot.friends_online > 0 {
        out.push(Affordance {
            key: AffordanceKey::Friends,
            badge: Some(snapshot.friends_online),
            highlight: false,
            visible: true,
            action: Action::OpenFriendsPopup,
            long_press: Some(Hint::OnlineFriends),
        });
    }

    out.push(primary(snapshot));
    out
}

/// The games/challenges control. Always emitted; invisible when the
/// user is offline with nothing cached to play.
fn primary(snapshot: &PresenceSnapshot) -> Affordance {
    let offline_games = !snapshot.online && snapshot.has_offline_games;
    let (key, action) = if snapshot.now_playing_count() > 0
        || snapshot.challenge_count() > 0
        || offline_games
    {
        (AffordanceKey::GamesMenu, Action::OpenGamesMenu)
    } else {
        (AffordanceKey::NewGameForm, Action::OpenNewGameForm)
    };

    let incoming = snapshot.incoming_challenges();
    let my_turns = snapshot.my_turn_count();
    // Incoming challenges always win over my-turn counts, never summed.
    let (badge, highlight) = if incoming > 0 {
        (Some(incoming), true)
    } else if my_turns > 0 {
        (Some(my_turns), false)
    } else {
        (None, false)
    };

    Affordance {
        key,
        badge,
        highlight,
        visible: snapshot.online || snapshot.has_offline_games,
        action,
        long_press: Some(Hint::GamesInPlay(snapshot.now_playing_count())),
    }
}
