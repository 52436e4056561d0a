//! Session error types.
//!
//! Roster errors describe presence events that were dropped; they never end
//! the session. Everything else is fatal: startup aborts, or the run loop
//! returns.

use std::path::PathBuf;

use arcade_net::NetError;

/// A presence event that could not be applied to the roster.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RosterError {
    /// The path does not have the shape `status/<name>/<id>`.
    #[error("malformed presence path {path:?}")]
    MalformedPath {
        /// The offending path.
        path: String,
    },

    /// A subscribe event named an id that is already on the roster.
    #[error("player id {id:?} is already on the roster")]
    IdCollision {
        /// The duplicate id.
        id: String,
    },
}

/// Render surface failures.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The host viewport has a zero, negative or non-finite dimension.
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport {
        /// Requested width.
        width: f32,
        /// Requested height.
        height: f32,
    },

    /// The surface could not be created or has been lost.
    #[error("render surface unavailable: {0}")]
    Unavailable(String),
}

/// Asset loading failures. All of them are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The manifest or an asset file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The manifest is not valid JSON of the expected shape.
    #[error("invalid asset manifest {path}: {source}")]
    Manifest {
        /// The manifest path.
        path: PathBuf,
        /// The parse error.
        #[source]
        source: serde_json::Error,
    },

    /// A texture the session cannot run without is not listed.
    #[error("required texture {0:?} missing from manifest")]
    MissingTexture(String),
}

/// Errors that end a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Assets could not be loaded.
    #[error(transparent)]
    Load(#[from] LoadError),

    /// The render surface failed.
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    /// The presence feed could not be reached or subscribed to.
    #[error("presence feed error: {0}")]
    Presence(#[from] NetError),

    /// The presence stream ended while the session was running.
    #[error("presence feed closed")]
    PresenceClosed,

    /// The configured frame rate is not finite or out of range.
    #[error("frame rate {0} is outside {min}..={max} frames per second", min = crate::frame::MIN_FRAME_RATE, max = crate::frame::MAX_FRAME_RATE)]
    InvalidFrameRate(f64),

    /// `run` was called before the session listened on a presence feed.
    #[error("session is not connected to a presence feed")]
    NotConnected,
}
