//! End-to-end flows: sources change, events fire, a fresh snapshot is
//! resolved, popups open and close under the single-open rule.

use std::sync::Arc;

use tabia_ui::sources::{
    FriendsSource, MemChallenges, MemFriends, MemNetwork, MemOffline, MemSession,
};
use tabia_ui::{
    AffordanceKey, ChallengeRef, FriendsPopup, GameRef, MiniProfile, MiniUserCard,
    PopupCoordinator, PresenceEvent, PresenceHub, PresenceSources, UserLite, resolve,
};

struct World {
    sources: PresenceSources,
    network: Arc<MemNetwork>,
    session: Arc<MemSession>,
    challenges: Arc<MemChallenges>,
    friends: Arc<MemFriends>,
    offline: Arc<MemOffline>,
}

fn world() -> World {
    let network = Arc::new(MemNetwork::new(true));
    let session = Arc::new(MemSession::new(true, Some("me")));
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
    World { sources, network, session, challenges, friends, offline }
}

#[test]
fn friends_badge_and_turn_badge_scenario() {
    let w = world();
    w.session.set_games(vec![GameRef::new("1", true)]);
    w.friends.set(vec!["ana".into(), "ben".into(), "cy".into()]);

    let affs = resolve(&w.sources.snapshot());
    assert_eq!(affs.len(), 2);
    assert_eq!(affs[0].key, AffordanceKey::Friends);
    assert_eq!(affs[0].badge, Some(3));
    assert_eq!(affs[1].key, AffordanceKey::GamesMenu);
    assert_eq!(affs[1].badge, Some(1));
}

#[test]
fn offline_with_cached_games_scenario() {
    let w = world();
    w.network.set_online(false);
    w.offline.set(true);

    let affs = resolve(&w.sources.snapshot());
    assert_eq!(affs.len(), 1);
    assert_eq!(affs[0].key, AffordanceKey::GamesMenu);
    assert_eq!(affs[0].badge, None);
    assert!(affs[0].visible);
}

#[test]
fn network_flip_changes_resolution_through_the_hub() {
    let w = world();
    w.friends.set(vec!["ana".into()]);
    let hub = PresenceHub::new();
    let mut rx = hub.subscribe();

    // Friends visible while online and connected.
    assert_eq!(resolve(&w.sources.snapshot()).len(), 2);

    w.network.set_online(false);
    hub.emit(PresenceEvent::NetworkChanged);

    // The consumer reacts to the event by re-snapshotting.
    assert_eq!(rx.try_recv().unwrap(), PresenceEvent::NetworkChanged);
    let affs = resolve(&w.sources.snapshot());
    assert_eq!(affs.len(), 1);
    assert!(!affs[0].visible);
}

#[test]
fn challenge_arrives_while_playing() {
    let w = world();
    w.session.set_games(vec![GameRef::new("g1", true), GameRef::new("g2", true)]);

    // My-turn badge first.
    let affs = resolve(&w.sources.snapshot());
    assert_eq!(affs[0].badge, Some(2));
    assert!(!affs[0].highlight);

    // An incoming challenge takes the badge over, still games-menu.
    w.challenges.push(ChallengeRef::incoming("c1"));
    let affs = resolve(&w.sources.snapshot());
    assert_eq!(affs[0].key, AffordanceKey::GamesMenu);
    assert_eq!(affs[0].badge, Some(1));
    assert!(affs[0].highlight);

    // Challenge handled: back to the my-turn badge.
    w.challenges.clear();
    let affs = resolve(&w.sources.snapshot());
    assert_eq!(affs[0].badge, Some(2));
}

#[test]
fn mini_user_card_full_lifecycle_against_friends_popup() {
    let w = world();
    w.friends.set(vec!["ana".into()]);
    let coord = PopupCoordinator::new();
    let mut friends_popup = FriendsPopup::new(coord.clone());
    let mut card = MiniUserCard::new(coord);

    assert!(friends_popup.open(w.friends.online_names()));

    // Card can't open over the friends popup.
    assert!(card.open(UserLite::new("ana", "Ana")).is_none());

    // User closes the list, then taps the name again.
    friends_popup.close();
    let ticket = card.open(UserLite::new("ana", "Ana")).unwrap();
    assert!(card.is_loading());

    let profile: MiniProfile = serde_json::from_str(
        r#"{ "perfs": { "blitz": { "games": 10, "rating": 1500 } } }"#,
    )
    .unwrap();
    assert!(card.resolve_profile(ticket, profile));
    let payload = card.payload().unwrap();
    assert_eq!(
        MiniProfile::chip(&payload.profile.as_ref().unwrap().perfs["blitz"]),
        "1500"
    );

    // Closing destroys the payload; the next open refetches.
    card.close();
    let _ticket = card.open(UserLite::new("ana", "Ana")).unwrap();
    assert!(card.is_loading());
}
