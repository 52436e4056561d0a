//! # arcade_math
//!
//! Math types for the arcade client. Re-exports [`glam`] for linear algebra
//! and defines the screen-space types shared by the session and its
//! collaborators.

pub mod tint;
pub mod viewport;

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use tint::Tint;
pub use viewport::{Rect, Viewport};
