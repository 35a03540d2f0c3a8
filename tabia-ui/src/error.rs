//! Error taxonomy for the mini-profile enrichment fetch.

/// Why a mini-profile fetch failed.
///
/// The core treats every variant the same way: the mini-user card
/// keeps showing its spinner and the identity header it already has.
/// Nothing here is ever surfaced to the user or fatal to the process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
    /// Connection-level failure (timeout, DNS, socket).
    #[error("network error: {0}")]
    Network(String),

    /// Server answered with a non-success status.
    #[error("server returned status {0}")]
    Status(u16),

    /// Response body was not valid profile JSON.
    #[error("malformed profile response: {0}")]
    Decode(String),
}
