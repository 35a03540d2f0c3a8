//! Application state for the TUI harness.
//!
//! The harness plays both roles around the core: it simulates the
//! external collaborators (network monitor, session store, challenge
//! cache, friends presence, offline cache) behind the in-memory
//! sources, and it is the presentational consumer that renders the
//! resolved affordances and drives the popup controllers.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::mpsc;

use tabia_ui::sources::{
    FriendsSource, MemChallenges, MemFriends, MemNetwork, MemOffline, MemSession, NetworkSource,
    OfflineSource, SessionSource,
};
use tabia_ui::{
    Action, Affordance, ChallengeRef, ContinuePopup, FetchTicket, FriendsPopup, GameRef, Hint,
    MiniProfile, MiniUserCard, PasteFenPopup, PopupCoordinator, PresenceEvent, PresenceHub,
    PresenceSnapshot, PresenceSources, ProfileError, UserLite, resolve,
};

use crate::config::Config;

/// How long a long-press hint stays on screen.
const HINT_TTL: Duration = Duration::from_secs(2);
/// Maximum status log lines kept.
const MAX_LOG: usize = 100;
/// Simulated latency of the profile fetch.
const FETCH_DELAY: Duration = Duration::from_millis(600);

/// Starting position, used by the continue-game popup demo.
pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq -";

/// Results from background tasks, marshalled into the UI loop.
pub enum BgResult {
    MiniProfile(FetchTicket, Result<MiniProfile, ProfileError>),
}

pub struct App {
    pub config: Config,

    // Simulated collaborators behind the source traits.
    pub sources: PresenceSources,
    pub network: Arc<MemNetwork>,
    pub session: Arc<MemSession>,
    pub challenges: Arc<MemChallenges>,
    pub friends: Arc<MemFriends>,
    pub offline: Arc<MemOffline>,
    pub hub: Arc<PresenceHub>,

    /// Latest snapshot and the affordances resolved from it.
    pub snapshot: PresenceSnapshot,
    pub affordances: Vec<Affordance>,

    // Popups, all sharing one coordinator.
    pub mini_user: MiniUserCard,
    pub friends_popup: FriendsPopup,
    pub continue_popup: ContinuePopup,
    pub paste_fen: PasteFenPopup,

    /// Transient long-press hint and when it was shown.
    pub hint: Option<(String, Instant)>,
    /// Scrolling status log (stands in for navigation).
    pub log: Vec<String>,

    pub bg_tx: mpsc::Sender<BgResult>,
    pub bg_rx: Option<mpsc::Receiver<BgResult>>,

    /// Simulate enrichment fetch failure (soft-failure demo).
    pub fail_fetch: bool,
    pub should_quit: bool,

    next_game: u32,
    next_challenge: u32,
}

impl App {
    pub fn new(config: Config, fail_fetch: bool) -> Self {
        let network = Arc::new(MemNetwork::new(true));
        let session = Arc::new(MemSession::new(true, Some(config.user_id())));
        let challenges = Arc::new(MemChallenges::default());
        let friends = Arc::new(MemFriends::default());
        let offline = Arc::new(MemOffline::default());
        let sources = PresenceSources {
            network: network.clone(),
            session: session.clone(),
            challenges: challenges.clone(),
            friends: friends.clone(),
            offline: offline.clone(),
        };

        let coordinator = PopupCoordinator::new();
        let (bg_tx, bg_rx) = mpsc::channel(16);

        let snapshot = sources.snapshot();
        let affordances = resolve(&snapshot);

        Self {
            config,
            sources,
            network,
            session,
            challenges,
            friends,
            offline,
            hub: Arc::new(PresenceHub::new()),
            snapshot,
            affordances,
            mini_user: MiniUserCard::new(coordinator.clone()),
            friends_popup: FriendsPopup::new(coordinator.clone()),
            continue_popup: ContinuePopup::new(coordinator.clone()),
            paste_fen: PasteFenPopup::new(coordinator),
            hint: None,
            log: vec!["welcome to tabia. press ? keys listed below.".to_string()],
            bg_tx,
            bg_rx: Some(bg_rx),
            fail_fetch,
            should_quit: false,
            next_game: 0,
            next_challenge: 0,
        }
    }

    /// Re-snapshot and re-resolve. Skips resolution when the snapshot
    /// is structurally unchanged, mirroring the render-skip contract.
    pub fn refresh(&mut self) {
        let snapshot = self.sources.snapshot();
        if snapshot == self.snapshot {
            return;
        }
        self.snapshot = snapshot;
        self.affordances = resolve(&self.snapshot);
    }

    pub fn log_line(&mut self, text: impl Into<String>) {
        self.log.push(text.into());
        if self.log.len() > MAX_LOG {
            self.log.remove(0);
        }
    }

    /// Current hint, if still fresh.
    pub fn active_hint(&self) -> Option<&str> {
        match &self.hint {
            Some((text, at)) if at.elapsed() < HINT_TTL => Some(text),
            _ => None,
        }
    }

    pub fn any_popup_open(&self) -> bool {
        self.mini_user.is_open()
            || self.friends_popup.is_open()
            || self.continue_popup.is_open()
            || self.paste_fen.is_open()
    }

    pub fn close_popups(&mut self) {
        // Only one can be open; closing all is a set of no-ops plus
        // the real one.
        self.mini_user.close();
        self.friends_popup.close();
        self.continue_popup.close();
        self.paste_fen.close();
    }

    // ── Affordance dispatch ──

    /// Tap: dispatch the affordance's action.
    pub fn activate(&mut self, index: usize) {
        let Some(aff) = self.affordances.get(index) else { return };
        if !aff.visible {
            return;
        }
        let action = aff.action;
        self.dispatch(action);
    }

    /// Long-press: surface the hint without mutating anything.
    pub fn long_press(&mut self, index: usize) {
        let hint = self.affordances.get(index).and_then(|a| a.long_press);
        if let Some(hint) = hint {
            self.show_hint(hint);
        }
    }

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::OpenFriendsPopup => {
                let names = self.friends.online_names();
                if !self.friends_popup.open(names) {
                    tracing::debug!("friends popup rejected");
                }
            }
            Action::OpenGamesMenu => self.log_line("→ games menu"),
            Action::OpenNewGameForm => self.log_line("→ new game form"),
        }
    }

    fn show_hint(&mut self, hint: Hint) {
        let text = match hint {
            Hint::OnlineFriends => "Online friends".to_string(),
            Hint::GamesInPlay(n) => format!("{n} games in play"),
        };
        self.hint = Some((text, Instant::now()));
    }

    // ── Simulated collaborator mutations ──
    // Each mutation emits the matching hub event; the main loop reacts
    // by calling refresh(), the same path a real collaborator takes.

    pub fn toggle_network(&mut self) {
        let online = !self.sources.network.has_network();
        self.network.set_online(online);
        self.hub.emit(PresenceEvent::NetworkChanged);
        self.log_line(if online { "network up" } else { "network down" });
    }

    pub fn toggle_session(&mut self) {
        let connected = !self.sources.session.is_connected();
        self.session.set_connected(connected);
        self.hub.emit(PresenceEvent::SessionChanged);
        self.log_line(if connected { "session connected" } else { "session disconnected" });
    }

    pub fn add_game(&mut self) {
        self.next_game += 1;
        // Alternate whose move it is so badges vary.
        let my_turn = self.next_game % 2 == 0;
        let mut games = self.session.now_playing();
        games.push(GameRef::new(format!("g{}", self.next_game), my_turn));
        self.session.set_games(games);
        self.hub.emit(PresenceEvent::GamesUpdated);
    }

    pub fn clear_games(&mut self) {
        self.session.set_games(Vec::new());
        self.hub.emit(PresenceEvent::GamesUpdated);
    }

    pub fn add_challenge(&mut self, incoming: bool) {
        self.next_challenge += 1;
        let id = format!("c{}", self.next_challenge);
        self.challenges.push(if incoming {
            ChallengeRef::incoming(id)
        } else {
            ChallengeRef::outgoing(id)
        });
        self.hub.emit(PresenceEvent::ChallengesUpdated);
    }

    pub fn clear_challenges(&mut self) {
        self.challenges.clear();
        self.hub.emit(PresenceEvent::ChallengesUpdated);
    }

    pub fn set_friends(&mut self, n: usize) {
        let roster = ["ana", "ben", "cyrus", "dora", "emil", "fay"];
        let names = roster.iter().take(n.min(roster.len())).map(|s| s.to_string()).collect();
        self.friends.set(names);
        self.hub.emit(PresenceEvent::FriendsUpdated);
    }

    pub fn friends_count(&self) -> usize {
        self.friends.online_names().len()
    }

    pub fn toggle_offline_cache(&mut self) {
        let present = !self.sources.offline.has_offline_games();
        self.offline.set(present);
        // Offline cache changes don't have a dedicated event in the
        // live client either; piggyback on the games update.
        self.hub.emit(PresenceEvent::GamesUpdated);
    }

    // ── Mini-user card ──

    /// Open the card for the first online friend and start the
    /// (simulated) enrichment fetch in the background.
    pub fn open_mini_user(&mut self) {
        let name = self
            .friends
            .online_names()
            .first()
            .cloned()
            .unwrap_or_else(|| "ana".to_string());
        let user = UserLite::new(name.clone(), capitalize(&name));

        let Some(ticket) = self.mini_user.open(user) else {
            return;
        };

        let tx = self.bg_tx.clone();
        let fail = self.fail_fetch;
        let my_id = self.config.user_id().to_string();
        tokio::spawn(async move {
            tokio::time::sleep(FETCH_DELAY).await;
            let result = if fail {
                Err(ProfileError::Status(503))
            } else {
                Ok(fake_profile(&my_id, &name))
            };
            // Receiver gone means the app is shutting down.
            let _ = tx.send(BgResult::MiniProfile(ticket, result)).await;
        });
    }

    /// Apply one background result on the UI loop.
    pub fn on_bg_result(&mut self, result: BgResult) {
        match result {
            BgResult::MiniProfile(ticket, Ok(profile)) => {
                if !self.mini_user.resolve_profile(ticket, profile) {
                    self.log_line("(stale profile fetch discarded)");
                }
            }
            BgResult::MiniProfile(ticket, Err(err)) => {
                self.mini_user.fetch_failed(ticket, &err);
            }
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Deterministic fake profile so the demo renders something plausible.
fn fake_profile(my_id: &str, their_id: &str) -> MiniProfile {
    let seed: u32 = their_id.bytes().map(u32::from).sum();
    let mut perfs = BTreeMap::new();
    perfs.insert(
        "blitz".to_string(),
        tabia_ui::mini_user::Perf { games: 40 + seed % 200, rating: 1300 + seed % 700, prov: false },
    );
    perfs.insert(
        "bullet".to_string(),
        tabia_ui::mini_user::Perf { games: seed % 12, rating: 1500, prov: true },
    );
    perfs.insert(
        "rapid".to_string(),
        tabia_ui::mini_user::Perf { games: 0, rating: 1500, prov: false },
    );

    let mut users = std::collections::HashMap::new();
    users.insert(my_id.to_string(), f64::from(seed % 5) / 2.0 + 1.0);
    users.insert(their_id.to_string(), f64::from(seed % 3));
    let crosstable = tabia_ui::mini_user::Crosstable { nb_games: 3 + seed % 4, users };

    MiniProfile { perfs, crosstable: Some(crosstable) }
}
