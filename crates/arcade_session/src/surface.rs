//! Render surface contract and the headless implementation.
//!
//! A [`SurfaceHost`] owns the viewport and creates the [`RenderSurface`] the
//! session draws into. The headless surface performs a full traversal of the
//! scene each frame without producing pixels; it is what the client runs with
//! when no window system is wired in, and what tests render into.

use arcade_math::Viewport;
use tracing::{debug, info, trace};

use crate::error::SurfaceError;
use crate::scene::{Node, Scene};

/// Frames between headless render summaries at `debug` level.
const SUMMARY_INTERVAL: u64 = 600;

/// Parameters for creating a render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceOptions {
    /// Surface size. Resizing after creation is not supported.
    pub viewport: Viewport,
    /// Clear to a transparent background instead of black.
    pub transparent: bool,
}

/// Draws a scene once per call.
pub trait RenderSurface {
    /// The size the surface was created with.
    fn viewport(&self) -> Viewport;

    /// Perform one render pass of `scene`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::Unavailable`] if the surface has been lost.
    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError>;
}

/// The environment a surface is attached to (a window, a page, a test).
pub trait SurfaceHost {
    /// Current size of the host viewport.
    fn viewport(&self) -> Viewport;

    /// Create a surface and attach it to the host.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError`] if the surface cannot be created.
    fn create_surface(
        &mut self,
        options: SurfaceOptions,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError>;
}

/// Per-frame statistics gathered by the headless surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub sprites: usize,
    pub hidden_sprites: usize,
    pub labels: usize,
}

/// A host without a window system.
#[derive(Debug, Clone)]
pub struct HeadlessHost {
    viewport: Viewport,
    attached: usize,
}

impl HeadlessHost {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            attached: 0,
        }
    }

    /// Number of surfaces attached so far.
    #[must_use]
    pub fn attached(&self) -> usize {
        self.attached
    }
}

impl SurfaceHost for HeadlessHost {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn create_surface(
        &mut self,
        options: SurfaceOptions,
    ) -> Result<Box<dyn RenderSurface>, SurfaceError> {
        if !options.viewport.is_valid() {
            return Err(SurfaceError::InvalidViewport {
                width: options.viewport.width,
                height: options.viewport.height,
            });
        }
        self.attached += 1;
        info!(
            width = options.viewport.width,
            height = options.viewport.height,
            transparent = options.transparent,
            "headless surface attached"
        );
        Ok(Box::new(HeadlessSurface::new(options)))
    }
}

/// Render surface that traverses the scene without rasterising it.
#[derive(Debug)]
pub struct HeadlessSurface {
    options: SurfaceOptions,
    frames: u64,
    last: FrameStats,
}

impl HeadlessSurface {
    #[must_use]
    pub fn new(options: SurfaceOptions) -> Self {
        Self {
            options,
            frames: 0,
            last: FrameStats::default(),
        }
    }

    /// Number of render passes performed.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Statistics of the most recent render pass.
    #[must_use]
    pub fn last_frame(&self) -> FrameStats {
        self.last
    }
}

impl RenderSurface for HeadlessSurface {
    fn viewport(&self) -> Viewport {
        self.options.viewport
    }

    fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
        let mut stats = FrameStats::default();
        for (_, node) in scene.iter() {
            match node {
                Node::Sprite(sprite) if sprite.visible => stats.sprites += 1,
                Node::Sprite(_) => stats.hidden_sprites += 1,
                Node::Label(_) => stats.labels += 1,
            }
        }

        self.frames += 1;
        self.last = stats;
        trace!(frame = self.frames, ?stats, "rendered frame");
        if self.frames % SUMMARY_INTERVAL == 0 {
            debug!(
                frame = self.frames,
                sprites = stats.sprites,
                labels = stats.labels,
                "headless render summary"
            );
        }
        Ok(())
    }
}
