//! Point-in-time aggregate of every presence-related input.
//!
//! A [`PresenceSnapshot`] is rebuilt from the sources on each change
//! notification and compared structurally; nothing in it is ever
//! mutated in place. The resolver consumes snapshots, never the
//! sources directly, so a resolution can't observe a half-updated
//! world.

/// A game the user is currently playing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameRef {
    /// Server-side game id.
    pub id: String,
    /// Whether it is the user's turn to move.
    pub my_turn: bool,
}

impl GameRef {
    pub fn new(id: impl Into<String>, my_turn: bool) -> Self {
        Self { id: id.into(), my_turn }
    }
}

/// Direction of a pending challenge relative to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChallengeDirection {
    Incoming,
    Outgoing,
}

/// A pending challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeRef {
    pub id: String,
    pub direction: ChallengeDirection,
}

impl ChallengeRef {
    pub fn incoming(id: impl Into<String>) -> Self {
        Self { id: id.into(), direction: ChallengeDirection::Incoming }
    }

    pub fn outgoing(id: impl Into<String>) -> Self {
        Self { id: id.into(), direction: ChallengeDirection::Outgoing }
    }
}

/// Immutable aggregate of all presence inputs at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresenceSnapshot {
    /// Network reachability.
    pub online: bool,
    /// Whether the server session is connected (authenticated socket up).
    pub session_connected: bool,
    /// Games in progress, in server order.
    pub in_progress_games: Vec<GameRef>,
    /// Pending challenges, both directions.
    pub challenges: Vec<ChallengeRef>,
    /// Number of friends currently online.
    pub friends_online: u32,
    /// Whether locally cached offline games exist.
    pub has_offline_games: bool,
}

impl PresenceSnapshot {
    /// Games where it is the user's turn.
    pub fn my_turn_count(&self) -> u32 {
        self.in_progress_games.iter().filter(|g| g.my_turn).count() as u32
    }

    pub fn now_playing_count(&self) -> u32 {
        self.in_progress_games.len() as u32
    }

    pub fn incoming_challenges(&self) -> u32 {
        self.challenges
            .iter()
            .filter(|c| c.direction == ChallengeDirection::Incoming)
            .count() as u32
    }

    pub fn outgoing_challenges(&self) -> u32 {
        self.challenges
            .iter()
            .filter(|c| c.direction == ChallengeDirection::Outgoing)
            .count() as u32
    }

    pub fn challenge_count(&self) -> u32 {
        self.challenges.len() as u32
    }
}
