//! NATS connection management.
//!
//! Provides a thin wrapper around `async-nats` for connecting to the presence
//! server named by the session endpoint.

use tracing::info;

use crate::error::NetError;

/// Default presence server URL.
pub const DEFAULT_NATS_URL: &str = "nats://localhost:4222";

/// Environment variable the client reads the session endpoint from.
pub const ENDPOINT_ENV: &str = "ARCADE_ENDPOINT";

/// Turn a session endpoint into a NATS URL.
///
/// Endpoints are usually given as bare `host:port` pairs; those get the
/// `nats://` scheme. Endpoints that already carry a scheme are returned as-is.
#[must_use]
pub fn endpoint_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim();
    if endpoint.contains("://") {
        endpoint.to_string()
    } else {
        format!("nats://{endpoint}")
    }
}

/// A wrapper around an `async-nats` client with arcade-specific helpers.
#[derive(Debug, Clone)]
pub struct NatsConnection {
    /// The underlying NATS client.
    client: async_nats::Client,
}

impl NatsConnection {
    /// Connect to the presence server at `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Connect`] if the connection cannot be established.
    pub async fn connect_to(endpoint: &str) -> Result<Self, NetError> {
        let url = endpoint_url(endpoint);
        info!(%url, "connecting to presence server");
        let client = async_nats::connect(url.as_str()).await?;
        info!("presence server connection established");
        Ok(Self { client })
    }

    /// Returns a reference to the underlying `async-nats` client.
    #[must_use]
    pub fn client(&self) -> &async_nats::Client {
        &self.client
    }

    /// Publish a MessagePack-encoded message to a subject.
    ///
    /// # Errors
    ///
    /// Returns [`NetError`] if encoding or publishing fails.
    pub async fn publish<T: serde::Serialize>(
        &self,
        subject: &str,
        message: &T,
    ) -> Result<(), NetError> {
        let payload = crate::codec::encode(message)?;
        self.client
            .publish(subject.to_string(), payload.into())
            .await?;
        Ok(())
    }

    /// Subscribe to a subject.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Subscribe`] if the subscription fails.
    pub async fn subscribe(&self, subject: &str) -> Result<async_nats::Subscriber, NetError> {
        let sub = self.client.subscribe(subject.to_string()).await?;
        Ok(sub)
    }
}
