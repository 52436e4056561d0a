//! NATS subject hierarchy.
//!
//! All arcade subjects live under `arcade.` to namespace them within a
//! shared NATS cluster.

/// Presence notices for every player path. Publishers → clients.
///
/// The presence path travels in the payload rather than the subject because
/// paths are `/`-separated and may contain `.`.
pub const PRESENCE: &str = "arcade.presence";
