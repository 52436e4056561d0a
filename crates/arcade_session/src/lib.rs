//! # arcade_session
//!
//! Client session runtime for the arcade shooter.
//!
//! A session renders every player currently present on the presence feed as
//! a ship, and keeps an on-screen roster of their names. It:
//!
//! 1. Creates a render surface on the host and primes the bullet pool.
//! 2. Subscribes to `status/<name>/<id>` presence events.
//! 3. Adds or removes ships and rebuilds the roster overlay on each event.
//! 4. On each frame: broadcasts the tick to bullets and ships, then renders.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arcade_math::Viewport;
//! use arcade_net::NatsPresenceFeed;
//! use arcade_session::{
//!     AssetCatalog, HeadlessHost, IntervalClock, RandomPlacement, SessionConfig,
//!     SessionOrchestrator, SpaceshipFactory, SHIP_TEXTURE,
//! };
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SessionConfig::default();
//!     let assets = AssetCatalog::builtin();
//!     let mut host = HeadlessHost::new(Viewport::default());
//!
//!     let mut session = SessionOrchestrator::new(
//!         config.clone(),
//!         &mut host,
//!         &assets,
//!         Box::new(SpaceshipFactory::new(assets.require(SHIP_TEXTURE)?)),
//!         Box::new(RandomPlacement::from_entropy()),
//!     )?;
//!
//!     let feed = NatsPresenceFeed::connect(&config.endpoint).await?;
//!     session.listen(&feed).await?;
//!     session.run(&mut IntervalClock::new(config.frame_rate)).await?;
//!     Ok(())
//! }
//! ```

pub mod assets;
pub mod bullets;
pub mod config;
pub mod entity;
pub mod error;
pub mod frame;
pub mod overlay;
pub mod placement;
pub mod roster;
pub mod scene;
pub mod session;
pub mod ship;
pub mod surface;

pub use assets::{AssetCatalog, AssetLoader, ManifestLoader, BULLET_TEXTURE, SHIP_TEXTURE};
pub use bullets::BulletPool;
pub use config::{CollisionPolicy, SessionConfig};
pub use entity::{EntityFactory, PlayerId, ShipEntity};
pub use error::{LoadError, RosterError, SessionError, SurfaceError};
pub use frame::{
    FrameClock, FrameScheduler, FrameTarget, FrameTick, IntervalClock, StopHandle, TickSubscriber,
};
pub use overlay::RosterOverlay;
pub use placement::{RandomPlacement, SpawnPlacement};
pub use roster::{PlayerEntity, PresencePath, PresenceRoster, RosterChange};
pub use scene::{Label, Node, NodeId, Scene, Sprite, TextureId};
pub use session::SessionOrchestrator;
pub use ship::{Spaceship, SpaceshipFactory};
pub use surface::{HeadlessHost, HeadlessSurface, RenderSurface, SurfaceHost, SurfaceOptions};
