//! # arcade_client
//!
//! Runs one client session of the arcade shooter.
//!
//! ## Startup Sequence
//!
//! 1. Load the asset manifest (ship and bullet textures are required).
//! 2. Create the render surface and an empty roster.
//! 3. Connect to the presence server (`ARCADE_ENDPOINT`, default
//!    `nats://localhost:4222`) and follow `status/<name>/<id>` paths.
//! 4. Run the frame loop until interrupted.
//!
//! `arcade_client announce status/<name>/<id> [--leave]` publishes a single
//! presence event instead, which is handy for driving a running session.

mod cli;

use anyhow::{Context, Result};
use arcade_net::connection::endpoint_url;
use arcade_net::{NatsPresenceFeed, PresenceEvent};
use arcade_session::{
    AssetLoader, HeadlessHost, IntervalClock, ManifestLoader, RandomPlacement, SHIP_TEXTURE,
    SessionOrchestrator, SpaceshipFactory, SpawnPlacement,
};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cli::{Args, Command};

const DEFAULT_LOG_FILTER: &str = "arcade_client=info,arcade_session=info";

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .init();

    let args = Args::parse();

    if let Some(Command::Announce { path, leave }) = &args.command {
        return announce(&args.endpoint, path, *leave).await;
    }
    play(&args).await
}

async fn play(args: &Args) -> Result<()> {
    let config = args.session_config();

    let assets = ManifestLoader::new(&args.manifest)
        .load()
        .await
        .with_context(|| format!("loading assets from {}", args.manifest.display()))?;

    let mut host = HeadlessHost::new(config.viewport);
    let factory = SpaceshipFactory::new(assets.require(SHIP_TEXTURE)?);
    let placement: Box<dyn SpawnPlacement> = match args.seed {
        Some(seed) => Box::new(RandomPlacement::seeded(seed)),
        None => Box::new(RandomPlacement::from_entropy()),
    };

    let mut session =
        SessionOrchestrator::new(config.clone(), &mut host, &assets, Box::new(factory), placement)
            .context("creating session")?;
    info!(session_id = %session.session_id(), textures = assets.len(), "session ready");

    info!(url = %endpoint_url(&config.endpoint), "connecting to presence feed");
    let feed = NatsPresenceFeed::connect(&config.endpoint)
        .await
        .context("connecting to presence feed")?;
    session.listen(&feed).await?;

    let stop = session.stop_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("interrupt received, stopping session");
            stop.stop();
        }
    });

    session
        .run(&mut IntervalClock::new(config.frame_rate))
        .await
        .context("session aborted")?;

    info!("client shut down");
    Ok(())
}

async fn announce(endpoint: &str, path: &str, leave: bool) -> Result<()> {
    let feed = NatsPresenceFeed::connect(endpoint)
        .await
        .context("connecting to presence feed")?;

    let event = if leave {
        PresenceEvent::unsubscribed(path)
    } else {
        PresenceEvent::subscribed(path)
    };
    feed.announce(&event).await?;

    info!(path, subscribed = event.subscribed, "presence announced");
    Ok(())
}
