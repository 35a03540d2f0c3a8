//! Read-only accessors for the external collaborators that feed the
//! header: network monitor, session store, challenge cache, friends
//! presence, offline game cache.
//!
//! Each collaborator is a small trait so consumers can plug in the real
//! client plumbing while tests use the in-memory implementations below.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::snapshot::{ChallengeRef, GameRef, PresenceSnapshot};

/// Network reachability.
pub trait NetworkSource: Send + Sync {
    fn has_network(&self) -> bool;
}

/// Server session: connection status and the user's game lists.
pub trait SessionSource: Send + Sync {
    fn is_connected(&self) -> bool;
    /// Id of the signed-in user, if any.
    fn user_id(&self) -> Option<String>;
    fn now_playing(&self) -> Vec<GameRef>;
    fn my_turn_games(&self) -> Vec<GameRef> {
        self.now_playing().into_iter().filter(|g| g.my_turn).collect()
    }
}

/// Pending challenge cache.
pub trait ChallengeSource: Send + Sync {
    fn all(&self) -> Vec<ChallengeRef>;
    fn incoming(&self) -> Vec<ChallengeRef> {
        self.all()
            .into_iter()
            .filter(|c| c.direction == crate::snapshot::ChallengeDirection::Incoming)
            .collect()
    }
}

/// Friend presence.
pub trait FriendsSource: Send + Sync {
    fn online_count(&self) -> u32;
    /// Names of friends currently online, for the friends popup.
    fn online_names(&self) -> Vec<String>;
}

/// Locally cached offline games.
pub trait OfflineSource: Send + Sync {
    fn has_offline_games(&self) -> bool;
}

/// Aggregates every collaborator and builds snapshots from them.
#[derive(Clone)]
pub struct PresenceSources {
    pub network: Arc<dyn NetworkSource>,
    pub session: Arc<dyn SessionSource>,
    pub challenges: Arc<dyn ChallengeSource>,
    pub friends: Arc<dyn FriendsSource>,
    pub offline: Arc<dyn OfflineSource>,
}

impl PresenceSources {
    /// Read every source once and freeze the result.
    pub fn snapshot(&self) -> PresenceSnapshot {
        PresenceSnapshot {
            online: self.network.has_network(),
            session_connected: self.session.is_connected(),
            in_progress_games: self.session.now_playing(),
            challenges: self.challenges.all(),
            friends_online: self.friends.online_count(),
            has_offline_games: self.offline.has_offline_games(),
        }
    }
}

// ── In-memory implementations ──
//
// Used by the TUI consumer (which simulates the collaborators) and by
// tests. Each is a Mutex around plain state with setter methods.

#[derive(Default)]
pub struct MemNetwork {
    online: Mutex<bool>,
}

impl MemNetwork {
    pub fn new(online: bool) -> Self {
        Self { online: Mutex::new(online) }
    }

    pub fn set_online(&self, online: bool) {
        *self.online.lock() = online;
    }
}

impl NetworkSource for MemNetwork {
    fn has_network(&self) -> bool {
        *self.online.lock()
    }
}

#[derive(Default)]
struct MemSessionState {
    connected: bool,
    user_id: Option<String>,
    games: Vec<GameRef>,
}

#[derive(Default)]
pub struct MemSession {
    state: Mutex<MemSessionState>,
}

impl MemSession {
    pub fn new(connected: bool, user_id: Option<&str>) -> Self {
        Self {
            state: Mutex::new(MemSessionState {
                connected,
                user_id: user_id.map(|s| s.to_string()),
                games: Vec::new(),
            }),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.state.lock().connected = connected;
    }

    pub fn set_games(&self, games: Vec<GameRef>) {
        self.state.lock().games = games;
    }
}

impl SessionSource for MemSession {
    fn is_connected(&self) -> bool {
        self.state.lock().connected
    }

    fn user_id(&self) -> Option<String> {
        self.state.lock().user_id.clone()
    }

    fn now_playing(&self) -> Vec<GameRef> {
        self.state.lock().games.clone()
    }
}

#[derive(Default)]
pub struct MemChallenges {
    challenges: Mutex<Vec<ChallengeRef>>,
}

impl MemChallenges {
    pub fn set(&self, challenges: Vec<ChallengeRef>) {
        *self.challenges.lock() = challenges;
    }

    pub fn push(&self, challenge: ChallengeRef) {
        self.challenges.lock().push(challenge);
    }

    pub fn clear(&self) {
        self.challenges.lock().clear();
    }
}

impl ChallengeSource for MemChallenges {
    fn all(&self) -> Vec<ChallengeRef> {
        self.challenges.lock().clone()
    }
}

#[derive(Default)]
pub struct MemFriends {
    names: Mutex<Vec<String>>,
}

impl MemFriends {
    pub fn set(&self, names: Vec<String>) {
        *self.names.lock() = names;
    }
}

impl FriendsSource for MemFriends {
    fn online_count(&self) -> u32 {
        self.names.lock().len() as u32
    }

    fn online_names(&self) -> Vec<String> {
        self.names.lock().clone()
    }
}

#[derive(Default)]
pub struct MemOffline {
    present: Mutex<bool>,
}

impl MemOffline {
    pub fn set(&self, present: bool) {
        *self.present.lock() = present;
    }
}

impl OfflineSource for MemOffline {
    fn has_offline_games(&self) -> bool {
        *self.present.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mem_sources() -> (PresenceSources, Arc<MemNetwork>, Arc<MemSession>) {
        let network = Arc::new(MemNetwork::new(true));
        let session = Arc::new(MemSession::new(true, Some("me")));
        let sources = PresenceSources {
            network: network.clone(),
            session: session.clone(),
            challenges: Arc::new(MemChallenges::default()),
            friends: Arc::new(MemFriends::default()),
            offline: Arc::new(MemOffline::default()),
        };
        (sources, network, session)
    }

    #[test]
    fn snapshot_reflects_sources() {
        let (sources, network, session) = mem_sources();
        session.set_games(vec![GameRef::new("g1", true)]);

        let snap = sources.snapshot();
        assert!(snap.online);
        assert!(snap.session_connected);
        assert_eq!(snap.now_playing_count(), 1);

        network.set_online(false);
        let snap2 = sources.snapshot();
        assert!(!snap2.online);
        // The earlier snapshot is unaffected.
        assert!(snap.online);
    }

    #[test]
    fn my_turn_games_default_filters() {
        let session = MemSession::new(true, None);
        session.set_games(vec![
            GameRef::new("a", false),
            GameRef::new("b", true),
        ]);
        let mine = session.my_turn_games();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].id, "b");
    }
}
