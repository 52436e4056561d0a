//! Session orchestrator, the composition root of a client session.
//!
//! The orchestrator owns the render surface, the scene, the bullet pool and
//! the presence roster, and drives them from a single task:
//!
//! 1. Presence events are applied to the roster as soon as they arrive.
//! 2. Each frame broadcasts the tick to the bullet pool, then to every ship
//!    in roster order, and then renders once.
//! 3. A stop request is honoured before the next frame is scheduled.
//!
//! Events and frames never interleave: a roster change always completes
//! before the next frame observes the roster.

use arcade_net::{PresenceEvent, PresenceFeed, PresenceStream};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::assets::{AssetCatalog, BULLET_TEXTURE};
use crate::bullets::BulletPool;
use crate::config::SessionConfig;
use crate::entity::EntityFactory;
use crate::error::{SessionError, SurfaceError};
use crate::frame::{
    FrameClock, FrameScheduler, FrameTarget, FrameTick, StopHandle, TickSubscriber,
    is_valid_frame_rate,
};
use crate::placement::SpawnPlacement;
use crate::roster::{PresenceRoster, RosterChange};
use crate::scene::Scene;
use crate::surface::{RenderSurface, SurfaceHost, SurfaceOptions};

/// Everything a frame touches.
struct Stage {
    scene: Scene,
    surface: Box<dyn RenderSurface>,
    bullets: BulletPool,
    roster: PresenceRoster,
}

impl FrameTarget for Stage {
    type Error = SurfaceError;

    fn update(&mut self, tick: &FrameTick) {
        self.bullets.on_tick(tick, &mut self.scene);
        self.roster.on_tick(tick, &mut self.scene);
    }

    fn render(&mut self) -> Result<(), SurfaceError> {
        self.surface.render(&self.scene)
    }
}

/// A running client session.
pub struct SessionOrchestrator {
    session_id: Uuid,
    config: SessionConfig,
    scheduler: FrameScheduler,
    stage: Stage,
    presence: Option<PresenceStream>,
}

impl SessionOrchestrator {
    /// Build the session: create and attach a transparent surface sized to
    /// the host viewport, prime the bullet pool, and set up an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidFrameRate`] for an unusable frame rate,
    /// [`SessionError::Surface`] if the surface cannot be created and
    /// [`SessionError::Load`] if the bullet texture was not loaded.
    pub fn new(
        config: SessionConfig,
        host: &mut dyn SurfaceHost,
        assets: &AssetCatalog,
        factory: Box<dyn EntityFactory>,
        placement: Box<dyn SpawnPlacement>,
    ) -> Result<Self, SessionError> {
        if !is_valid_frame_rate(config.frame_rate) {
            return Err(SessionError::InvalidFrameRate(config.frame_rate));
        }

        let session_id = Uuid::new_v4();
        let viewport = host.viewport();
        let surface = host.create_surface(SurfaceOptions {
            viewport,
            transparent: true,
        })?;

        let mut scene = Scene::new();
        let bullets = BulletPool::new(
            &mut scene,
            assets.require(BULLET_TEXTURE)?,
            viewport,
            config.bullet_capacity,
        );
        let roster = PresenceRoster::new(viewport, factory, placement, config.collision_policy);

        info!(
            %session_id,
            width = viewport.width,
            height = viewport.height,
            bullet_capacity = config.bullet_capacity,
            "session created"
        );

        Ok(Self {
            session_id,
            config,
            scheduler: FrameScheduler::new(),
            stage: Stage {
                scene,
                surface,
                bullets,
                roster,
            },
            presence: None,
        })
    }

    /// Subscribe to `feed` with the configured presence pattern.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Presence`] if the feed rejects the
    /// subscription.
    pub async fn listen<F: PresenceFeed>(&mut self, feed: &F) -> Result<(), SessionError> {
        let stream = feed.listen(&self.config.presence_pattern).await?;
        info!(
            session_id = %self.session_id,
            pattern = self.config.presence_pattern,
            "subscribed to presence feed"
        );
        self.presence = Some(stream);
        Ok(())
    }

    /// Apply one presence event to the roster.
    ///
    /// Malformed paths and rejected duplicates are logged and dropped;
    /// `None` is returned for them. Bullets in flight belong to the ship
    /// that fired them, so they are recalled whenever that ship is
    /// disposed: on removal and on replacement.
    pub fn handle_presence(&mut self, event: &PresenceEvent) -> Option<RosterChange> {
        let stage = &mut self.stage;
        match stage
            .roster
            .on_presence_event(&event.path, event.subscribed, &mut stage.scene)
        {
            Ok(change) => {
                match &change {
                    RosterChange::Removed(ids) => {
                        for id in ids {
                            stage.bullets.recall(&mut stage.scene, id);
                        }
                    }
                    RosterChange::Replaced(id) => stage.bullets.recall(&mut stage.scene, id),
                    RosterChange::Added(_) | RosterChange::Unchanged => {}
                }
                Some(change)
            }
            Err(e) => {
                warn!(error = %e, path = event.path, subscribed = event.subscribed, "dropping presence event");
                None
            }
        }
    }

    /// Run a single frame at `current_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Surface`] if the render pass fails.
    pub fn frame(&mut self, current_ms: f64) -> Result<FrameTick, SessionError> {
        Ok(self.scheduler.run_frame(current_ms, &mut self.stage)?)
    }

    /// Start the frame loop and run until stopped.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NotConnected`] if [`listen`](Self::listen)
    /// was never called, [`SessionError::PresenceClosed`] if the presence
    /// stream ends, and [`SessionError::Surface`] if rendering fails.
    pub async fn run<C: FrameClock>(&mut self, clock: &mut C) -> Result<(), SessionError> {
        let mut presence = self.presence.take().ok_or(SessionError::NotConnected)?;
        let mut stop = self.scheduler.stop_signal();
        self.scheduler.start();
        info!(session_id = %self.session_id, "session running");

        let result = loop {
            if stop.is_stopped() {
                break Ok(());
            }

            tokio::select! {
                biased;

                () = stop.stopped() => break Ok(()),

                event = presence.recv() => match event {
                    Some(event) => {
                        self.handle_presence(&event);
                    }
                    None => {
                        error!(session_id = %self.session_id, "presence feed closed");
                        break Err(SessionError::PresenceClosed);
                    }
                },

                now = clock.next_frame() => {
                    if let Err(e) = self.frame(now) {
                        error!(session_id = %self.session_id, error = %e, "frame failed");
                        break Err(e);
                    }
                }
            }
        };

        self.presence = Some(presence);
        self.scheduler.finish();
        info!(
            session_id = %self.session_id,
            frames = self.scheduler.frame(),
            players = self.stage.roster.len(),
            "session ended"
        );
        result
    }

    /// A handle that stops [`run`](Self::run) before its next frame. A stop
    /// requested before `run` is called makes `run` return before its first
    /// frame.
    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        self.scheduler.stop_handle()
    }

    #[must_use]
    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    #[must_use]
    pub fn roster(&self) -> &PresenceRoster {
        &self.stage.roster
    }

    #[must_use]
    pub fn scene(&self) -> &Scene {
        &self.stage.scene
    }

    #[must_use]
    pub fn bullets(&self) -> &BulletPool {
        &self.stage.bullets
    }

    /// Frames run by the current or most recent [`run`](Self::run).
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.scheduler.frame()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    use arcade_math::{Tint, Vec2, Viewport};
    use arcade_net::MemoryPresenceFeed;

    use super::*;
    use crate::config::CollisionPolicy;
    use crate::entity::{PlayerId, ShipEntity};
    use crate::error::LoadError;
    use crate::scene::TextureId;
    use crate::ship::SpaceshipFactory;
    use crate::surface::HeadlessHost;

    /// Records the number of visible sprites seen by each render pass.
    struct ProbeSurface {
        viewport: Viewport,
        seen: Rc<RefCell<Vec<usize>>>,
    }

    impl RenderSurface for ProbeSurface {
        fn viewport(&self) -> Viewport {
            self.viewport
        }

        fn render(&mut self, scene: &Scene) -> Result<(), SurfaceError> {
            self.seen.borrow_mut().push(scene.visible_sprites());
            Ok(())
        }
    }

    struct ProbeHost {
        seen: Rc<RefCell<Vec<usize>>>,
    }

    impl SurfaceHost for ProbeHost {
        fn viewport(&self) -> Viewport {
            Viewport::new(1000.0, 500.0)
        }

        fn create_surface(
            &mut self,
            options: SurfaceOptions,
        ) -> Result<Box<dyn RenderSurface>, SurfaceError> {
            Ok(Box::new(ProbeSurface {
                viewport: options.viewport,
                seen: Rc::clone(&self.seen),
            }))
        }
    }

    /// Yields scripted frame times, then requests a stop.
    struct ScriptedClock {
        times: VecDeque<f64>,
        stop: StopHandle,
    }

    impl FrameClock for ScriptedClock {
        async fn next_frame(&mut self) -> f64 {
            match self.times.pop_front() {
                Some(t) => t,
                None => {
                    self.stop.stop();
                    std::future::pending().await
                }
            }
        }
    }

    fn session_with(host: &mut dyn SurfaceHost) -> SessionOrchestrator {
        SessionOrchestrator::new(
            SessionConfig::default().with_bullet_capacity(4),
            host,
            &AssetCatalog::builtin(),
            Box::new(SpaceshipFactory::new(TextureId("ship".into()))),
            Box::new(|v: &Viewport| v.spawn_point(0.5, 0.5)),
        )
        .unwrap()
    }

    /// Logs the ship name and the y of the in-flight bullet on every tick.
    struct RecordingShip {
        name: String,
        log: Rc<RefCell<Vec<(String, f32)>>>,
    }

    impl TickSubscriber for RecordingShip {
        fn on_tick(&mut self, _tick: &FrameTick, scene: &mut Scene) {
            let bullet_y = scene
                .iter()
                .filter_map(|(_, node)| node.as_sprite())
                .find(|sprite| sprite.visible && sprite.texture.0 == BULLET_TEXTURE)
                .map_or(f32::NAN, |sprite| sprite.position.y);
            self.log.borrow_mut().push((self.name.clone(), bullet_y));
        }
    }

    impl ShipEntity for RecordingShip {
        fn name(&self) -> &str {
            &self.name
        }

        fn tint(&self) -> Tint {
            Tint::WHITE
        }

        fn remove(&mut self, _scene: &mut Scene) {}
    }

    struct RecordingFactory {
        log: Rc<RefCell<Vec<(String, f32)>>>,
    }

    impl EntityFactory for RecordingFactory {
        fn spawn(
            &mut self,
            _scene: &mut Scene,
            _position: Vec2,
            name: &str,
            _id: &PlayerId,
        ) -> Box<dyn ShipEntity> {
            Box::new(RecordingShip {
                name: name.to_string(),
                log: Rc::clone(&self.log),
            })
        }
    }

    fn session_with_config(config: SessionConfig) -> Result<SessionOrchestrator, SessionError> {
        SessionOrchestrator::new(
            config,
            &mut HeadlessHost::new(Viewport::new(1000.0, 500.0)),
            &AssetCatalog::builtin(),
            Box::new(SpaceshipFactory::new(TextureId("ship".into()))),
            Box::new(|v: &Viewport| v.spawn_point(0.5, 0.5)),
        )
    }

    fn session() -> SessionOrchestrator {
        session_with(&mut HeadlessHost::new(Viewport::new(1000.0, 500.0)))
    }

    fn overlay(session: &SessionOrchestrator) -> Vec<(String, f32)> {
        session
            .roster()
            .overlay()
            .labels(session.scene())
            .map(|l| (l.text.clone(), l.position.y))
            .collect()
    }

    fn roster(session: &SessionOrchestrator) -> Vec<(String, String)> {
        session
            .roster()
            .players()
            .map(|p| (p.id.to_string(), p.name.clone()))
            .collect()
    }

    fn pair(id: &str, name: &str) -> (String, String) {
        (id.to_string(), name.to_string())
    }

    #[test]
    fn test_join_join_leave_scenario() {
        let mut session = session();

        session.handle_presence(&PresenceEvent::subscribed("status/mike/42"));
        assert_eq!(roster(&session), vec![pair("42", "mike")]);
        assert_eq!(overlay(&session), vec![("mike".to_string(), 20.0)]);

        session.handle_presence(&PresenceEvent::subscribed("status/anna/7"));
        assert_eq!(roster(&session), vec![pair("42", "mike"), pair("7", "anna")]);
        assert_eq!(
            overlay(&session),
            vec![("mike".to_string(), 20.0), ("anna".to_string(), 35.0)]
        );

        session.handle_presence(&PresenceEvent::unsubscribed("status/mike/42"));
        assert_eq!(roster(&session), vec![pair("7", "anna")]);
        assert_eq!(overlay(&session), vec![("anna".to_string(), 20.0)]);
    }

    #[test]
    fn test_malformed_path_dropped() {
        let mut session = session();
        let change = session.handle_presence(&PresenceEvent::subscribed("status/onlyname"));
        assert!(change.is_none());
        assert!(session.roster().is_empty());
        assert!(session.roster().overlay().is_empty());
    }

    #[test]
    fn test_label_count_tracks_roster() {
        let mut session = session();
        let events = [
            PresenceEvent::subscribed("status/a/1"),
            PresenceEvent::subscribed("status/b/2"),
            PresenceEvent::subscribed("status/b/2"),
            PresenceEvent::unsubscribed("status/z/9"),
            PresenceEvent::subscribed("status/c/3"),
            PresenceEvent::unsubscribed("status/a/1"),
        ];
        for event in &events {
            session.handle_presence(event);
            assert_eq!(session.roster().overlay().len(), session.roster().len());
        }
        assert_eq!(session.roster().len(), 2);
    }

    #[test]
    fn test_leaving_player_bullets_recalled() {
        let mut session = session();
        session.handle_presence(&PresenceEvent::subscribed("status/mike/42"));
        let stage = &mut session.stage;
        stage
            .bullets
            .fire(&mut stage.scene, Vec2::new(500.0, 250.0), 0.0, &PlayerId::from("42"));
        assert_eq!(session.bullets().active(), 1);

        session.handle_presence(&PresenceEvent::unsubscribed("status/mike/42"));
        assert_eq!(session.bullets().active(), 0);
    }

    #[test]
    fn test_render_observes_updated_state() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = session_with(&mut ProbeHost {
            seen: Rc::clone(&seen),
        });
        let stage = &mut session.stage;
        stage
            .bullets
            .fire(&mut stage.scene, Vec2::new(500.0, 250.0), 0.0, &PlayerId::from("1"));
        assert_eq!(session.scene().visible_sprites(), 1);

        // The first delta covers the bullet's whole lifetime, so the update
        // recycles it and the render must not see it.
        session.scheduler.start();
        let tick = session.frame(5000.0).unwrap();
        assert!((tick.delta_ms - 5000.0).abs() < f64::EPSILON);
        assert_eq!(*seen.borrow(), vec![0]);
    }

    #[test]
    fn test_invalid_viewport_is_fatal() {
        let result = SessionOrchestrator::new(
            SessionConfig::default(),
            &mut HeadlessHost::new(Viewport::new(0.0, 0.0)),
            &AssetCatalog::builtin(),
            Box::new(SpaceshipFactory::new(TextureId("ship".into()))),
            Box::new(|v: &Viewport| v.spawn_point(0.5, 0.5)),
        );
        assert!(matches!(result, Err(SessionError::Surface(_))));
    }

    #[test]
    fn test_missing_bullet_texture_is_fatal() {
        let result = SessionOrchestrator::new(
            SessionConfig::default(),
            &mut HeadlessHost::new(Viewport::default()),
            &AssetCatalog::new(),
            Box::new(SpaceshipFactory::new(TextureId("ship".into()))),
            Box::new(|v: &Viewport| v.spawn_point(0.5, 0.5)),
        );
        assert!(matches!(
            result,
            Err(SessionError::Load(LoadError::MissingTexture(_)))
        ));
    }

    #[tokio::test]
    async fn test_run_requires_presence() {
        let mut session = session();
        let mut clock = ScriptedClock {
            times: VecDeque::new(),
            stop: session.stop_handle(),
        };
        assert!(matches!(
            session.run(&mut clock).await,
            Err(SessionError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_run_applies_events_before_frames() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut session = session_with(&mut ProbeHost {
            seen: Rc::clone(&seen),
        });
        let feed = MemoryPresenceFeed::new();
        session.listen(&feed).await.unwrap();
        feed.publish(PresenceEvent::subscribed("status/mike/42")).await;
        feed.publish(PresenceEvent::subscribed("status/anna/7")).await;
        feed.publish(PresenceEvent::subscribed("chat/ignored/1")).await;

        let mut clock = ScriptedClock {
            times: VecDeque::from([16.0, 33.0, 50.0]),
            stop: session.stop_handle(),
        };
        session.run(&mut clock).await.unwrap();

        assert_eq!(session.frames(), 3);
        assert_eq!(session.roster().len(), 2);
        // Both ships were on stage for every frame.
        assert_eq!(*seen.borrow(), vec![2, 2, 2]);
    }

    #[tokio::test]
    async fn test_stop_before_first_frame() {
        let mut session = session();
        let feed = MemoryPresenceFeed::new();
        session.listen(&feed).await.unwrap();

        // An empty script stops the loop the first time it asks for a frame.
        let mut clock = ScriptedClock {
            times: VecDeque::new(),
            stop: session.stop_handle(),
        };
        session.run(&mut clock).await.unwrap();
        assert_eq!(session.frames(), 0);
    }

    #[tokio::test]
    async fn test_closed_feed_ends_session() {
        let mut session = session();
        let feed = MemoryPresenceFeed::new();
        session.listen(&feed).await.unwrap();
        drop(feed);

        let mut clock = ScriptedClock {
            times: VecDeque::from([16.0]),
            stop: session.stop_handle(),
        };
        assert!(matches!(
            session.run(&mut clock).await,
            Err(SessionError::PresenceClosed)
        ));
    }

    fn drain(log: &Rc<RefCell<Vec<(String, f32)>>>) -> (Vec<String>, Vec<f32>) {
        log.borrow_mut().drain(..).unzip()
    }

    #[test]
    fn test_tick_reaches_bullets_then_ships_in_roster_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut session = SessionOrchestrator::new(
            SessionConfig::default().with_bullet_capacity(4),
            &mut HeadlessHost::new(Viewport::new(1000.0, 500.0)),
            &AssetCatalog::builtin(),
            Box::new(RecordingFactory {
                log: Rc::clone(&log),
            }),
            Box::new(|v: &Viewport| v.spawn_point(0.5, 0.5)),
        )
        .unwrap();
        for path in ["status/mike/42", "status/anna/7", "status/zoe/9"] {
            session.handle_presence(&PresenceEvent::subscribed(path));
        }
        let stage = &mut session.stage;
        stage
            .bullets
            .fire(&mut stage.scene, Vec2::new(500.0, 250.0), 0.0, &PlayerId::from("99"));

        // The bullet moves 0.6 px/ms upwards; every ship must already see
        // this frame's move.
        session.scheduler.start();
        session.frame(10.0).unwrap();
        let (names, ys) = drain(&log);
        assert_eq!(names, vec!["mike", "anna", "zoe"]);
        assert!(ys.iter().all(|y| (y - 244.0).abs() < 1e-3), "{ys:?}");

        session.handle_presence(&PresenceEvent::unsubscribed("status/mike/42"));
        session.frame(20.0).unwrap();
        let (names, ys) = drain(&log);
        assert_eq!(names, vec!["anna", "zoe"]);
        assert!(ys.iter().all(|y| (y - 238.0).abs() < 1e-3), "{ys:?}");
    }

    #[test]
    fn test_replaced_player_bullets_recalled() {
        let mut session = session_with_config(
            SessionConfig::default().with_collision_policy(CollisionPolicy::Replace),
        )
        .unwrap();
        session.handle_presence(&PresenceEvent::subscribed("status/mike/42"));
        let stage = &mut session.stage;
        stage
            .bullets
            .fire(&mut stage.scene, Vec2::new(500.0, 250.0), 0.0, &PlayerId::from("42"));
        stage
            .bullets
            .fire(&mut stage.scene, Vec2::new(500.0, 250.0), 0.0, &PlayerId::from("7"));

        let change = session.handle_presence(&PresenceEvent::subscribed("status/mike/42"));
        assert_eq!(change, Some(RosterChange::Replaced(PlayerId::from("42"))));
        assert_eq!(session.bullets().active(), 1);
    }

    #[test]
    fn test_unusable_frame_rate_is_fatal() {
        for rate in [f64::INFINITY, 1e12, 0.0, f64::NAN] {
            let result = session_with_config(SessionConfig::default().with_frame_rate(rate));
            assert!(
                matches!(result, Err(SessionError::InvalidFrameRate(_))),
                "rate {rate} accepted"
            );
        }
    }

    #[test]
    fn test_sessions_get_distinct_ids() {
        assert_ne!(session().session_id(), session().session_id());
    }

    #[tokio::test]
    async fn test_stop_requested_before_run() {
        let mut session = session();
        let feed = MemoryPresenceFeed::new();
        session.listen(&feed).await.unwrap();

        let mut clock = ScriptedClock {
            times: VecDeque::from([16.0, 33.0]),
            stop: session.stop_handle(),
        };
        session.stop_handle().stop();
        session.run(&mut clock).await.unwrap();
        assert_eq!(session.frames(), 0);

        // The stop ended that run only; the next run plays both frames.
        session.run(&mut clock).await.unwrap();
        assert_eq!(session.frames(), 2);
    }
}
