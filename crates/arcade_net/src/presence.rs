//! The presence feed abstraction.
//!
//! A [`PresenceFeed`] turns a listen pattern into an ordered stream of
//! [`PresenceEvent`]s. Consumers own the receiving end, so every event is
//! handled on the consumer's task, in arrival order.

use std::future::Future;

use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::connection::NatsConnection;
use crate::error::NetError;
use crate::messages::PresenceEvent;
use crate::pattern::PathPattern;
use crate::subjects;

/// Buffered presence events per listener before publishers are throttled.
pub const PRESENCE_CHANNEL_CAPACITY: usize = 256;

/// Receiving end of a presence subscription.
pub type PresenceStream = mpsc::Receiver<PresenceEvent>;

/// A source of presence notifications.
pub trait PresenceFeed {
    /// Start listening for events whose path matches `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::InvalidPattern`] for an unparseable pattern, or a
    /// transport error if the subscription cannot be established.
    fn listen(&self, pattern: &str) -> impl Future<Output = Result<PresenceStream, NetError>> + Send;
}

/// Presence feed backed by a NATS connection.
#[derive(Debug, Clone)]
pub struct NatsPresenceFeed {
    conn: NatsConnection,
}

impl NatsPresenceFeed {
    /// Wrap an established connection.
    #[must_use]
    pub fn new(conn: NatsConnection) -> Self {
        Self { conn }
    }

    /// Connect to the presence server at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Connect`] if the server is unreachable.
    pub async fn connect(endpoint: &str) -> Result<Self, NetError> {
        Ok(Self::new(NatsConnection::connect_to(endpoint).await?))
    }

    /// Publish a presence notice on the feed.
    ///
    /// # Errors
    ///
    /// Returns [`NetError`] if encoding or publishing fails.
    pub async fn announce(&self, event: &PresenceEvent) -> Result<(), NetError> {
        self.conn.publish(subjects::PRESENCE, event).await?;
        // Flush so short-lived publishers do not exit before delivery.
        if let Err(e) = self.conn.client().flush().await {
            warn!(error = %e, "failed to flush presence notice");
        }
        Ok(())
    }
}

impl PresenceFeed for NatsPresenceFeed {
    async fn listen(&self, pattern: &str) -> Result<PresenceStream, NetError> {
        let pattern: PathPattern = pattern.parse()?;
        let mut subscriber = self.conn.subscribe(subjects::PRESENCE).await?;
        let (tx, rx) = mpsc::channel(PRESENCE_CHANNEL_CAPACITY);
        info!(subject = subjects::PRESENCE, ?pattern, "listening for presence");

        tokio::spawn(async move {
            while let Some(message) = subscriber.next().await {
                let event: PresenceEvent = match crate::codec::decode(message.payload.as_ref()) {
                    Ok(event) => event,
                    Err(e) => {
                        warn!(error = %e, "dropping undecodable presence notice");
                        continue;
                    }
                };

                if !pattern.matches(&event.path) {
                    continue;
                }

                if tx.send(event).await.is_err() {
                    debug!("presence listener dropped, ending subscription");
                    break;
                }
            }
        });

        Ok(rx)
    }
}
