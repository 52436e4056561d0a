//! Frame scheduling.
//!
//! Every visual frame runs the same fixed sequence:
//!
//! 1. Compute the elapsed time since the previous frame.
//! 2. Broadcast the [`FrameTick`] to every tick subscriber, in order.
//! 3. Render the scene exactly once.
//! 4. Wait for the next frame, unless the loop has been stopped.
//!
//! The broadcast always completes before the render starts, so the render
//! observes every subscriber's post-update state.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{info, trace};

use crate::scene::Scene;

/// Timing for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Frame counter, starting at 1.
    pub frame: u64,
    /// Milliseconds since the previous frame.
    pub delta_ms: f64,
    /// Milliseconds since the session started.
    pub absolute_ms: f64,
}

/// Something updated once per frame, before the render pass.
///
/// Subscribers may change their own nodes in `scene`, nothing else.
pub trait TickSubscriber {
    fn on_tick(&mut self, tick: &FrameTick, scene: &mut Scene);
}

/// What the scheduler drives: an update broadcast followed by a render.
pub trait FrameTarget {
    type Error;

    /// Broadcast `tick` to every subscriber. Must not render.
    fn update(&mut self, tick: &FrameTick);

    /// Perform one render pass of the current scene.
    ///
    /// # Errors
    ///
    /// Implementation-defined; the scheduler passes it through.
    fn render(&mut self) -> Result<(), Self::Error>;
}

/// The host's "next visual frame" primitive.
pub trait FrameClock {
    /// Wait for the next frame and return the current time in milliseconds
    /// since the session started.
    fn next_frame(&mut self) -> impl Future<Output = f64>;
}

/// Slowest frame rate a clock will run at.
pub const MIN_FRAME_RATE: f64 = 1.0;

/// Fastest frame rate a clock will run at.
pub const MAX_FRAME_RATE: f64 = 1000.0;

/// Whether `frame_rate` is a rate a session may be configured with.
#[must_use]
pub fn is_valid_frame_rate(frame_rate: f64) -> bool {
    (MIN_FRAME_RATE..=MAX_FRAME_RATE).contains(&frame_rate)
}

/// Time between frames at `frame_rate`, clamped to the supported range.
/// NaN runs at the slowest rate.
#[must_use]
pub fn frame_period(frame_rate: f64) -> Duration {
    let rate = if frame_rate.is_nan() {
        MIN_FRAME_RATE
    } else {
        frame_rate.clamp(MIN_FRAME_RATE, MAX_FRAME_RATE)
    };
    Duration::from_secs_f64(1.0 / rate)
}

/// Frame clock driven by a tokio interval.
#[derive(Debug)]
pub struct IntervalClock {
    interval: Interval,
    origin: Instant,
}

impl IntervalClock {
    /// A clock firing `frame_rate` times per second, clamped to
    /// [`MIN_FRAME_RATE`]..=[`MAX_FRAME_RATE`]. The session start is the
    /// moment the clock is created.
    #[must_use]
    pub fn new(frame_rate: f64) -> Self {
        let period = frame_period(frame_rate);
        let origin = Instant::now();
        let mut interval = tokio::time::interval_at(origin + period, period);
        // A late frame is rendered late, never twice.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, origin }
    }
}

impl FrameClock for IntervalClock {
    async fn next_frame(&mut self) -> f64 {
        let at = self.interval.tick().await;
        at.duration_since(self.origin).as_secs_f64() * 1000.0
    }
}

/// Requests that a running frame loop stop before its next frame.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }
}

/// Observes a [`StopHandle`].
#[derive(Debug, Clone)]
pub struct StopSignal {
    rx: watch::Receiver<bool>,
}

impl StopSignal {
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once a stop has been requested.
    pub async fn stopped(&mut self) {
        // The sender lives in the scheduler; if it is gone nobody can stop us.
        if self.rx.wait_for(|stopped| *stopped).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives the update→render cycle and tracks frame timing.
#[derive(Debug)]
pub struct FrameScheduler {
    /// Absolute time of the previous frame. Starts at 0, so the first
    /// frame's delta is the time elapsed since the session started.
    last_frame_ms: f64,
    frame: u64,
    running: bool,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl FrameScheduler {
    #[must_use]
    pub fn new() -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            last_frame_ms: 0.0,
            frame: 0,
            running: false,
            stop_tx: Arc::new(stop_tx),
        }
    }

    /// Reset timing. A stop requested before the loop started stays
    /// pending, so the loop ends before its first frame.
    pub fn start(&mut self) {
        self.last_frame_ms = 0.0;
        self.frame = 0;
        self.running = true;
        info!(stop_pending = *self.stop_tx.borrow(), "frame loop started");
    }

    /// Mark the loop as no longer running and consume the stop request
    /// that ended it.
    pub fn finish(&mut self) {
        self.stop_tx.send_replace(false);
        if self.running {
            self.running = false;
            info!(frames = self.frame, "frame loop stopped");
        }
    }

    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running
    }

    #[must_use]
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            tx: Arc::clone(&self.stop_tx),
        }
    }

    #[must_use]
    pub fn stop_signal(&self) -> StopSignal {
        StopSignal {
            rx: self.stop_tx.subscribe(),
        }
    }

    /// Number of frames run since [`start`](Self::start).
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Compute the tick for a frame at `current_ms` and record it as the
    /// previous frame.
    pub fn advance(&mut self, current_ms: f64) -> FrameTick {
        self.frame += 1;
        let tick = FrameTick {
            frame: self.frame,
            delta_ms: current_ms - self.last_frame_ms,
            absolute_ms: current_ms,
        };
        self.last_frame_ms = current_ms;
        tick
    }

    /// Run one full frame against `target`: update broadcast, then render.
    ///
    /// # Errors
    ///
    /// Returns the target's render error.
    pub fn run_frame<T: FrameTarget>(
        &mut self,
        current_ms: f64,
        target: &mut T,
    ) -> Result<FrameTick, T::Error> {
        let tick = self.advance(current_ms);
        trace!(frame = tick.frame, delta_ms = tick.delta_ms, "frame");
        target.update(&tick);
        target.render()?;
        Ok(tick)
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
