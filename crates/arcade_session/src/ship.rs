//! The default ship implementation: one tinted sprite per player.

use std::f32::consts::TAU;

use arcade_math::{Tint, Vec2};
use tracing::debug;

use crate::entity::{EntityFactory, PlayerId, ShipEntity};
use crate::frame::{FrameTick, TickSubscriber};
use crate::scene::{Node, NodeId, Scene, Sprite, TextureId};

/// Tints handed out to ships, in order.
pub const PALETTE: [Tint; 8] = [
    Tint(0xFF_5E_5B),
    Tint(0x4E_C5_F1),
    Tint(0xF7_D0_4A),
    Tint(0x7B_E3_7A),
    Tint(0xC2_7B_F0),
    Tint(0xFF_A1_3D),
    Tint(0x5D_F2_D6),
    Tint(0xF0_7B_B8),
];

/// Idle rotation speed, in radians per millisecond.
const IDLE_SPIN: f32 = TAU / 8000.0;

/// A player ship drawn as a single sprite.
#[derive(Debug)]
pub struct Spaceship {
    id: PlayerId,
    name: String,
    tint: Tint,
    node: Option<NodeId>,
}

impl Spaceship {
    #[must_use]
    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    /// The ship's sprite node, or `None` once removed.
    #[must_use]
    pub fn node(&self) -> Option<NodeId> {
        self.node
    }
}

impl TickSubscriber for Spaceship {
    fn on_tick(&mut self, tick: &FrameTick, scene: &mut Scene) {
        if let Some(id) = self.node
            && let Some(sprite) = scene.sprite_mut(id)
        {
            sprite.rotation = (sprite.rotation + IDLE_SPIN * tick.delta_ms as f32) % TAU;
        }
    }
}

impl ShipEntity for Spaceship {
    fn name(&self) -> &str {
        &self.name
    }

    fn tint(&self) -> Tint {
        self.tint
    }

    fn remove(&mut self, scene: &mut Scene) {
        if let Some(id) = self.node.take() {
            scene.remove(id);
            debug!(player_id = %self.id, "ship removed");
        }
    }
}

/// Spawns [`Spaceship`]s, cycling through [`PALETTE`].
#[derive(Debug, Clone)]
pub struct SpaceshipFactory {
    texture: TextureId,
    spawned: usize,
}

impl SpaceshipFactory {
    #[must_use]
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            spawned: 0,
        }
    }
}

impl EntityFactory for SpaceshipFactory {
    fn spawn(
        &mut self,
        scene: &mut Scene,
        position: Vec2,
        name: &str,
        id: &PlayerId,
    ) -> Box<dyn ShipEntity> {
        let tint = PALETTE[self.spawned % PALETTE.len()];
        self.spawned += 1;

        let node = scene.add(Node::Sprite(Sprite {
            tint,
            ..Sprite::new(self.texture.clone(), position)
        }));
        debug!(player_id = %id, name, x = position.x, y = position.y, "ship spawned");

        Box::new(Spaceship {
            id: id.clone(),
            name: name.to_string(),
            tint,
            node: Some(node),
        })
    }
}
