//! Message types carried on the presence feed.

use serde::{Deserialize, Serialize};

/// A presence notification: a player path was subscribed or unsubscribed.
///
/// Paths follow the convention `status/<name>/<id>`; the feed itself does not
/// validate them; that is the consumer's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEvent {
    /// The event path, e.g. `status/mike/42`.
    pub path: String,
    /// `true` when the player connected, `false` when they disconnected.
    pub subscribed: bool,
}

impl PresenceEvent {
    /// A "player came online" notice for `path`.
    #[must_use]
    pub fn subscribed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subscribed: true,
        }
    }

    /// A "player went offline" notice for `path`.
    #[must_use]
    pub fn unsubscribed(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subscribed: false,
        }
    }
}
