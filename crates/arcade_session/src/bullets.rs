//! Preallocated bullet pool.
//!
//! Every bullet sprite is created up front and hidden. Firing reveals a free
//! sprite; expiry hides it again. No sprites are created or destroyed during
//! play.

use arcade_math::{Rect, Vec2, Viewport};
use tracing::{debug, warn};

use crate::entity::PlayerId;
use crate::frame::{FrameTick, TickSubscriber};
use crate::scene::{Node, NodeId, Scene, Sprite, TextureId};

/// Bullet speed in pixels per millisecond.
pub const BULLET_SPEED: f32 = 0.6;

/// How long a bullet flies before it is recycled.
pub const BULLET_LIFETIME_MS: f64 = 1500.0;

#[derive(Debug)]
struct Bullet {
    node: NodeId,
    owner: Option<PlayerId>,
    velocity: Vec2,
    remaining_ms: f64,
}

impl Bullet {
    fn is_active(&self) -> bool {
        self.owner.is_some()
    }
}

/// A fixed-capacity set of reusable bullets.
#[derive(Debug)]
pub struct BulletPool {
    bullets: Vec<Bullet>,
    bounds: Rect,
    active: usize,
}

impl BulletPool {
    /// Preallocate `capacity` hidden bullet sprites in `scene`.
    pub fn new(scene: &mut Scene, texture: TextureId, viewport: Viewport, capacity: usize) -> Self {
        let bullets = (0..capacity)
            .map(|_| {
                let node = scene.add(Node::Sprite(Sprite {
                    visible: false,
                    ..Sprite::new(texture.clone(), Vec2::ZERO)
                }));
                Bullet {
                    node,
                    owner: None,
                    velocity: Vec2::ZERO,
                    remaining_ms: 0.0,
                }
            })
            .collect();
        debug!(capacity, "bullet pool primed");
        Self {
            bullets,
            bounds: viewport.bounds(),
            active: 0,
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bullets.len()
    }

    /// Number of bullets in flight.
    #[must_use]
    pub fn active(&self) -> usize {
        self.active
    }

    /// Launch a bullet from `origin` heading along `rotation` (radians,
    /// clockwise from up). Returns the pool slot, or `None` when every
    /// bullet is already in flight.
    ///
    /// The session never fires on its own; the ship or input layer that
    /// owns a player's controls calls this.
    pub fn fire(
        &mut self,
        scene: &mut Scene,
        origin: Vec2,
        rotation: f32,
        owner: &PlayerId,
    ) -> Option<usize> {
        let Some(slot) = self.bullets.iter().position(|b| !b.is_active()) else {
            warn!(player_id = %owner, capacity = self.capacity(), "bullet pool exhausted");
            return None;
        };

        let bullet = &mut self.bullets[slot];
        bullet.owner = Some(owner.clone());
        bullet.velocity = Vec2::new(rotation.sin(), -rotation.cos()) * BULLET_SPEED;
        bullet.remaining_ms = BULLET_LIFETIME_MS;
        if let Some(sprite) = scene.sprite_mut(bullet.node) {
            sprite.position = origin;
            sprite.rotation = rotation;
            sprite.visible = true;
        }
        self.active += 1;
        Some(slot)
    }

    /// Hide every bullet fired by `owner`.
    pub fn recall(&mut self, scene: &mut Scene, owner: &PlayerId) {
        for bullet in &mut self.bullets {
            if bullet.owner.as_ref() == Some(owner) {
                Self::recycle(bullet, scene);
                self.active -= 1;
            }
        }
    }

    fn recycle(bullet: &mut Bullet, scene: &mut Scene) {
        bullet.owner = None;
        bullet.remaining_ms = 0.0;
        if let Some(sprite) = scene.sprite_mut(bullet.node) {
            sprite.visible = false;
        }
    }
}

impl TickSubscriber for BulletPool {
    fn on_tick(&mut self, tick: &FrameTick, scene: &mut Scene) {
        let step = tick.delta_ms as f32;
        for bullet in self.bullets.iter_mut().filter(|b| b.is_active()) {
            bullet.remaining_ms -= tick.delta_ms;
            let in_bounds = match scene.sprite_mut(bullet.node) {
                Some(sprite) => {
                    sprite.position += bullet.velocity * step;
                    self.bounds.contains(sprite.position)
                }
                None => false,
            };

            if bullet.remaining_ms <= 0.0 || !in_bounds {
                Self::recycle(bullet, scene);
                self.active -= 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(delta_ms: f64) -> FrameTick {
        FrameTick {
            frame: 1,
            delta_ms,
            absolute_ms: delta_ms,
        }
    }

    fn pool(scene: &mut Scene, capacity: usize) -> BulletPool {
        BulletPool::new(
            scene,
            TextureId("bullet".into()),
            Viewport::new(1000.0, 1000.0),
            capacity,
        )
    }

    #[test]
    fn test_pool_preallocates_hidden_sprites() {
        let mut scene = Scene::new();
        let pool = pool(&mut scene, 200);
        assert_eq!(pool.capacity(), 200);
        assert_eq!(scene.len(), 200);
        assert_eq!(scene.visible_sprites(), 0);
    }

    #[test]
    fn test_fire_reveals_without_allocating() {
        let mut scene = Scene::new();
        let mut pool = pool(&mut scene, 2);
        let owner = PlayerId::from("42");
        assert_eq!(pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &owner), Some(0));
        assert_eq!(scene.len(), 2);
        assert_eq!(scene.visible_sprites(), 1);
        assert_eq!(pool.active(), 1);
    }

    #[test]
    fn test_exhausted_pool_refuses() {
        let mut scene = Scene::new();
        let mut pool = pool(&mut scene, 1);
        let owner = PlayerId::from("42");
        assert!(pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &owner).is_some());
        assert!(pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &owner).is_none());
    }

    #[test]
    fn test_bullet_moves_and_expires() {
        let mut scene = Scene::new();
        let mut pool = pool(&mut scene, 1);
        pool.fire(&mut scene, Vec2::new(500.0, 900.0), 0.0, &"1".into());

        pool.on_tick(&tick(100.0), &mut scene);
        let (_, node) = scene.iter().next().unwrap();
        let y = node.as_sprite().unwrap().position.y;
        assert!((y - 840.0).abs() < 1e-3, "bullet should travel up, got y = {y}");
        assert_eq!(pool.active(), 1);

        pool.on_tick(&tick(BULLET_LIFETIME_MS), &mut scene);
        assert_eq!(pool.active(), 0);
        assert_eq!(scene.visible_sprites(), 0);
    }

    #[test]
    fn test_bullet_leaving_viewport_is_recycled() {
        let mut scene = Scene::new();
        let mut pool = pool(&mut scene, 1);
        pool.fire(&mut scene, Vec2::new(500.0, 10.0), 0.0, &"1".into());
        pool.on_tick(&tick(100.0), &mut scene);
        assert_eq!(pool.active(), 0);
        assert_eq!(pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &"1".into()), Some(0));
    }

    #[test]
    fn test_recall_hides_owner_bullets() {
        let mut scene = Scene::new();
        let mut pool = pool(&mut scene, 3);
        let mike = PlayerId::from("42");
        let anna = PlayerId::from("7");
        pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &mike);
        pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &anna);
        pool.fire(&mut scene, Vec2::new(500.0, 500.0), 0.0, &mike);

        pool.recall(&mut scene, &mike);
        assert_eq!(pool.active(), 1);
        assert_eq!(scene.visible_sprites(), 1);
    }
}
