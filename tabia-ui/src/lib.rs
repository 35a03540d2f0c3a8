//! Navigation-and-presence core of the tabia chess client.
//!
//! Decides which header affordances (friends indicator,
//! games/challenges button) and which transient popup (mini-user card,
//! continue-game, paste-FEN, friends list) should be visible, from a
//! set of independently-changing sources: network reachability, server
//! session, in-progress games, pending challenges, friend presence and
//! the offline game cache.
//!
//! The pieces:
//!
//! - [`sources`] — read traits for the external collaborators, plus
//!   in-memory implementations for consumers and tests.
//! - [`snapshot`] — the immutable aggregate the resolver consumes.
//! - [`event`] — change-notification hub; subscribers re-snapshot and
//!   re-resolve on every event.
//! - [`affordance`] — the pure resolver from snapshot to an ordered,
//!   badge-annotated affordance list.
//! - [`popup`] — single-open-at-a-time popup lifecycle, shared by
//!   every popup through an injected coordinator.
//! - [`mini_user`] — the asynchronous-enrichment popup, with its
//!   stale-completion and soft-failure rules.
//! - [`popups`] — continue-game, paste-FEN and friends-list popups.
//!
//! Everything runs on the consumer's single UI loop; the only
//! asynchronous operation is the mini-profile fetch, whose completion
//! the consumer marshals back in and applies with a ticket check.

pub mod affordance;
pub mod error;
pub mod event;
pub mod mini_user;
pub mod popup;
pub mod popups;
pub mod snapshot;
pub mod sources;

pub use affordance::{Action, Affordance, AffordanceKey, Hint, resolve};
pub use error::ProfileError;
pub use event::{PresenceEvent, PresenceHub};
pub use mini_user::{FetchTicket, MiniProfile, MiniUserCard, UserLite};
pub use popup::{PopupController, PopupCoordinator, PopupState};
pub use popups::{ContinuePopup, FriendsPopup, PasteFenPopup};
pub use snapshot::{ChallengeDirection, ChallengeRef, GameRef, PresenceSnapshot};
pub use sources::PresenceSources;
