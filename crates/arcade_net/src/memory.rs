//! In-process presence feed.
//!
//! [`MemoryPresenceFeed`] delivers events published through
//! [`MemoryPresenceFeed::publish`] to every matching listener. Clones share
//! the same listener set, so a test can keep one handle for publishing while
//! the session under test owns another.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;

use crate::error::NetError;
use crate::messages::PresenceEvent;
use crate::pattern::PathPattern;
use crate::presence::{PRESENCE_CHANNEL_CAPACITY, PresenceFeed, PresenceStream};

#[derive(Debug)]
struct Listener {
    pattern: PathPattern,
    tx: mpsc::Sender<PresenceEvent>,
}

/// A presence feed that lives entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPresenceFeed {
    listeners: Arc<Mutex<Vec<Listener>>>,
}

impl MemoryPresenceFeed {
    /// Create a feed with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Listener>> {
        self.listeners.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Deliver `event` to every live listener whose pattern matches.
    ///
    /// Returns the number of listeners the event was delivered to.
    pub async fn publish(&self, event: PresenceEvent) -> usize {
        let targets: Vec<mpsc::Sender<PresenceEvent>> = {
            let mut listeners = self.lock();
            listeners.retain(|l| !l.tx.is_closed());
            listeners
                .iter()
                .filter(|l| l.pattern.matches(&event.path))
                .map(|l| l.tx.clone())
                .collect()
        };

        let mut delivered = 0;
        for tx in targets {
            if tx.send(event.clone()).await.is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    /// Returns the number of listeners whose receiver is still alive.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.lock().iter().filter(|l| !l.tx.is_closed()).count()
    }
}

impl PresenceFeed for MemoryPresenceFeed {
    async fn listen(&self, pattern: &str) -> Result<PresenceStream, NetError> {
        let pattern: PathPattern = pattern.parse()?;
        let (tx, rx) = mpsc::channel(PRESENCE_CHANNEL_CAPACITY);
        self.lock().push(Listener { pattern, tx });
        Ok(rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_publish_reaches_matching_listener() {
        let feed = MemoryPresenceFeed::new();
        let mut rx = feed.listen("status/.*").await.unwrap();

        let delivered = feed.publish(PresenceEvent::subscribed("status/mike/42")).await;
        assert_eq!(delivered, 1);
        assert_eq!(rx.recv().await, Some(PresenceEvent::subscribed("status/mike/42")));
    }

    #[tokio::test]
    async fn test_non_matching_path_is_filtered() {
        let feed = MemoryPresenceFeed::new();
        let mut rx = feed.listen("status/.*").await.unwrap();

        assert_eq!(feed.publish(PresenceEvent::subscribed("chat/mike/42")).await, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_events_arrive_in_publish_order() {
        let feed = MemoryPresenceFeed::new();
        let mut rx = feed.listen("status/.*").await.unwrap();

        feed.publish(PresenceEvent::subscribed("status/mike/42")).await;
        feed.publish(PresenceEvent::unsubscribed("status/mike/42")).await;

        assert!(rx.recv().await.unwrap().subscribed);
        assert!(!rx.recv().await.unwrap().subscribed);
    }

    #[tokio::test]
    async fn test_dropped_listener_is_pruned() {
        let feed = MemoryPresenceFeed::new();
        let rx = feed.listen("status/.*").await.unwrap();
        assert_eq!(feed.listener_count(), 1);

        drop(rx);
        assert_eq!(feed.publish(PresenceEvent::subscribed("status/a/1")).await, 0);
        assert_eq!(feed.listener_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_pattern_rejected() {
        let feed = MemoryPresenceFeed::new();
        assert!(matches!(
            feed.listen("").await,
            Err(NetError::InvalidPattern { .. })
        ));
    }
}
