//! Packed RGB colours used to tint sprites and labels.

use serde::{Deserialize, Serialize};

/// A 24-bit RGB colour packed as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tint(pub u32);

impl Tint {
    /// No tint: sprites render with their texture colours.
    pub const WHITE: Tint = Tint(0xFF_FF_FF);

    /// Create a tint from its red, green and blue channels.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Returns the `(r, g, b)` channels.
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

impl Default for Tint {
    fn default() -> Self {
        Self::WHITE
    }
}

impl std::fmt::Display for Tint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0 & 0xFF_FF_FF)
    }
}
