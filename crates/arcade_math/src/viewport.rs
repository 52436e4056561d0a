//! Viewport and screen-space rectangles.
//!
//! All coordinates are in pixels with the origin at the top-left corner of
//! the render surface.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Fraction of the viewport kept clear on every edge when spawning ships.
pub const SPAWN_MARGIN: f32 = 0.1;

/// An axis-aligned rectangle described by its minimum and maximum corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner.
    pub min: Vec2,
    /// Bottom-right corner.
    pub max: Vec2,
}

impl Rect {
    /// Returns `true` if `point` lies inside the rectangle (edges inclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Returns the rectangle's size.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// The size of the host viewport the render surface is created with.
///
/// The viewport is fixed for the lifetime of a session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport of the given size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns `true` if both dimensions are strictly positive and finite.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }

    /// The full viewport as a rectangle.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect {
            min: Vec2::ZERO,
            max: Vec2::new(self.width, self.height),
        }
    }

    /// The central region ships may spawn in: 10% to 90% on each axis.
    #[must_use]
    pub fn spawn_area(&self) -> Rect {
        let size = Vec2::new(self.width, self.height);
        Rect {
            min: size * SPAWN_MARGIN,
            max: size * (1.0 - SPAWN_MARGIN),
        }
    }

    /// Map unit coordinates (`0.0..=1.0` on each axis) into the spawn area.
    ///
    /// Inputs outside the unit range are clamped so the result never lands
    /// in the margin.
    #[must_use]
    pub fn spawn_point(&self, u: f32, v: f32) -> Vec2 {
        let area = self.spawn_area();
        let t = Vec2::new(u.clamp(0.0, 1.0), v.clamp(0.0, 1.0));
        area.min + area.size() * t
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280.0, 720.0)
    }
}
