//! Session configuration.

use arcade_math::Viewport;
use arcade_net::connection::DEFAULT_NATS_URL;

/// The listen pattern that selects player presence paths.
pub const DEFAULT_PRESENCE_PATTERN: &str = "status/.*";

/// Bullets preallocated by the pool.
pub const DEFAULT_BULLET_CAPACITY: usize = 200;

/// Target frames per second for the frame clock.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

/// What to do when a subscribe event names an id already on the roster.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Keep the existing entry and drop the event.
    #[default]
    Reject,
    /// Dispose the existing entry's ship and spawn a fresh one in its slot.
    Replace,
}

/// Configuration for a client session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Address of the presence server, e.g. `52.42.25.49:6020`.
    pub endpoint: String,
    /// Pattern handed to the presence feed.
    pub presence_pattern: String,
    /// Size of the render surface.
    pub viewport: Viewport,
    /// Number of bullets the pool preallocates.
    pub bullet_capacity: usize,
    /// Target frame rate of the frame clock.
    pub frame_rate: f64,
    /// Duplicate-id handling.
    pub collision_policy: CollisionPolicy,
}

impl SessionConfig {
    /// Create a config for `endpoint` with default settings.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            presence_pattern: DEFAULT_PRESENCE_PATTERN.to_string(),
            viewport: Viewport::default(),
            bullet_capacity: DEFAULT_BULLET_CAPACITY,
            frame_rate: DEFAULT_FRAME_RATE,
            collision_policy: CollisionPolicy::default(),
        }
    }

    /// Override the viewport size.
    #[must_use]
    pub fn with_viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = viewport;
        self
    }

    /// Override the bullet pool capacity.
    #[must_use]
    pub fn with_bullet_capacity(mut self, capacity: usize) -> Self {
        self.bullet_capacity = capacity;
        self
    }

    /// Override the frame rate.
    #[must_use]
    pub fn with_frame_rate(mut self, frame_rate: f64) -> Self {
        self.frame_rate = frame_rate;
        self
    }

    /// Override the presence listen pattern.
    #[must_use]
    pub fn with_presence_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.presence_pattern = pattern.into();
        self
    }

    /// Override the duplicate-id policy.
    #[must_use]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision_policy = policy;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_NATS_URL)
    }
}
