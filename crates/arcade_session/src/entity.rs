//! Contracts for the visual entities the roster spawns.

use arcade_math::{Tint, Vec2};

use crate::frame::TickSubscriber;
use crate::scene::Scene;

/// Opaque player identifier taken from the presence path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub String);

impl PlayerId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PlayerId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A player's ship on the stage.
///
/// Ships receive every frame tick and may only change their own scene nodes.
pub trait ShipEntity: TickSubscriber {
    /// The player name the ship was spawned for.
    fn name(&self) -> &str;

    /// The colour the ship is drawn in. The roster overlay uses it for the
    /// player's label.
    fn tint(&self) -> Tint;

    /// Release every scene node the ship owns. Called exactly once, when the
    /// player leaves the roster.
    fn remove(&mut self, scene: &mut Scene);
}

/// Creates ships for players joining the roster.
pub trait EntityFactory {
    fn spawn(
        &mut self,
        scene: &mut Scene,
        position: Vec2,
        name: &str,
        id: &PlayerId,
    ) -> Box<dyn ShipEntity>;
}
