//! Command-line arguments.

use std::path::PathBuf;

use arcade_math::Viewport;
use arcade_net::connection::{DEFAULT_NATS_URL, ENDPOINT_ENV};
use arcade_session::config::{
    DEFAULT_BULLET_CAPACITY, DEFAULT_FRAME_RATE, DEFAULT_PRESENCE_PATTERN,
};
use arcade_session::frame::{MAX_FRAME_RATE, MIN_FRAME_RATE, is_valid_frame_rate};
use arcade_session::{CollisionPolicy, SessionConfig};
use clap::{Parser, Subcommand, ValueEnum};

pub const DEFAULT_MANIFEST: &str = "assets/manifest.json";

#[derive(Debug, Parser)]
#[command(name = "arcade_client", about = "Arcade shooter client session")]
pub struct Args {
    /// Presence server endpoint (`host:port` or a full `nats://` URL)
    #[arg(short, long, env = ENDPOINT_ENV, default_value = DEFAULT_NATS_URL)]
    pub endpoint: String,

    /// Asset manifest to load before the session starts
    #[arg(short, long, default_value = DEFAULT_MANIFEST)]
    pub manifest: PathBuf,

    /// Viewport width in pixels
    #[arg(long, default_value_t = 1280.0)]
    pub width: f32,

    /// Viewport height in pixels
    #[arg(long, default_value_t = 720.0)]
    pub height: f32,

    /// Target frames per second
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE, value_parser = parse_frame_rate)]
    pub fps: f64,

    /// Number of pooled bullets
    #[arg(long, default_value_t = DEFAULT_BULLET_CAPACITY)]
    pub bullets: usize,

    /// Presence paths to follow
    #[arg(long, default_value = DEFAULT_PRESENCE_PATTERN)]
    pub pattern: String,

    /// What to do when a player id is already on the roster
    #[arg(long, value_enum, default_value_t = Collision::Reject)]
    pub on_collision: Collision,

    /// Seed for spawn positions
    #[arg(long)]
    pub seed: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Publish a single presence event and exit
    Announce {
        /// Presence path, e.g. `status/mike/42`
        path: String,

        /// Announce a departure instead of an arrival
        #[arg(long)]
        leave: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Collision {
    Reject,
    Replace,
}

impl From<Collision> for CollisionPolicy {
    fn from(value: Collision) -> Self {
        match value {
            Collision::Reject => Self::Reject,
            Collision::Replace => Self::Replace,
        }
    }
}

fn parse_frame_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value.parse().map_err(|e| format!("{e}"))?;
    if is_valid_frame_rate(rate) {
        Ok(rate)
    } else {
        Err(format!(
            "expected {MIN_FRAME_RATE} to {MAX_FRAME_RATE} frames per second"
        ))
    }
}

impl Args {
    #[must_use]
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::new(&self.endpoint)
            .with_viewport(Viewport::new(self.width, self.height))
            .with_frame_rate(self.fps)
            .with_bullet_capacity(self.bullets)
            .with_presence_pattern(&self.pattern)
            .with_collision_policy(self.on_collision.into())
    }
}
