//! Spawn placement strategies.

use arcade_math::{Vec2, Viewport};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Chooses where a new ship appears.
pub trait SpawnPlacement {
    fn next_position(&mut self, viewport: &Viewport) -> Vec2;
}

/// Uniformly random placement inside the viewport's spawn area.
#[derive(Debug, Clone)]
pub struct RandomPlacement<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomPlacement<R> {
    #[must_use]
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomPlacement<StdRng> {
    /// Placement seeded from the operating system.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// Reproducible placement.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> SpawnPlacement for RandomPlacement<R> {
    fn next_position(&mut self, viewport: &Viewport) -> Vec2 {
        let u: f32 = self.rng.r#gen();
        let v: f32 = self.rng.r#gen();
        viewport.spawn_point(u, v)
    }
}

impl<F: FnMut(&Viewport) -> Vec2> SpawnPlacement for F {
    fn next_position(&mut self, viewport: &Viewport) -> Vec2 {
        self(viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_positions_stay_in_spawn_area() {
        let viewport = Viewport::new(640.0, 480.0);
        let area = viewport.spawn_area();
        let mut placement = RandomPlacement::seeded(7);
        for _ in 0..500 {
            assert!(area.contains(placement.next_position(&viewport)));
        }
    }

    #[test]
    fn test_same_seed_same_positions() {
        let viewport = Viewport::default();
        let mut a = RandomPlacement::seeded(42);
        let mut b = RandomPlacement::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next_position(&viewport), b.next_position(&viewport));
        }
    }

    #[test]
    fn test_closure_placement() {
        let mut placement = |v: &Viewport| Vec2::new(v.width / 2.0, v.height / 2.0);
        let p = placement.next_position(&Viewport::new(100.0, 50.0));
        assert_eq!(p, Vec2::new(50.0, 25.0));
    }
}
