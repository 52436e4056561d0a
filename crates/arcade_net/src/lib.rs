//! # arcade_net
//!
//! Presence feed transport for the arcade client.
//!
//! This crate provides:
//!
//! - [`subjects`] — NATS subject constants.
//! - [`messages`] — The presence notice exchanged on the feed.
//! - [`codec`] — MessagePack serialisation/deserialisation helpers.
//! - [`connection`] — NATS connection management.
//! - [`pattern`] — Listen-pattern matching for presence paths.
//! - [`presence`] — The [`PresenceFeed`] abstraction and its NATS implementation.
//! - [`memory`] — An in-process feed for tests and offline sessions.
//! - [`error`] — Network-layer error types.

pub mod codec;
pub mod connection;
pub mod error;
pub mod memory;
pub mod messages;
pub mod pattern;
pub mod presence;
pub mod subjects;

pub use codec::{decode, encode};
pub use connection::NatsConnection;
pub use error::NetError;
pub use memory::MemoryPresenceFeed;
pub use messages::PresenceEvent;
pub use pattern::PathPattern;
pub use presence::{NatsPresenceFeed, PresenceFeed, PresenceStream};
