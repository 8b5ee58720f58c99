//! Frame scheduling.
//!
//! The render loop asks a [`FrameScheduler`] for the current [`Tick`] once per
//! frame instead of reading a clock itself, so hosts and tests can substitute
//! their own notion of time. [`Ticker`] is the wall-clock implementation.

use instant::{Duration, Instant};

/// Global time of one frame, in seconds since the scheduler started.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub time: f64,
    /// Seconds since the previous tick.
    pub delta: f64,
    pub frame: u64,
}

pub trait FrameScheduler {
    /// Advance to the next frame.
    fn tick(&mut self) -> Tick;
}

/// Clamps long frame gaps (a backgrounded tab, a debugger pause) so animations
/// resume where they stopped instead of jumping ahead.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LagSmoothing {
    /// Gaps longer than this are treated as lag.
    pub threshold: Duration,
    /// How far time advances across a lagging gap.
    pub adjusted: Duration,
}

/// Wall-clock frame scheduler.
///
/// Without lag smoothing (the default) `Tick::time` is exactly the wall-clock
/// time since [`Ticker::new`]; a dropped frame makes the next delta larger but
/// never slows the animation down.
#[derive(Debug)]
pub struct Ticker {
    origin: Instant,
    lag_smoothing: Option<LagSmoothing>,
    last_wall: Duration,
    lag: Duration,
    last_time: f64,
    frame: u64,
}

impl Ticker {
    pub fn new(lag_smoothing: Option<LagSmoothing>) -> Self {
        Self {
            origin: Instant::now(),
            lag_smoothing,
            last_wall: Duration::ZERO,
            lag: Duration::ZERO,
            last_time: 0.0,
            frame: 0,
        }
    }

    pub fn lag_smoothing(&self) -> Option<LagSmoothing> {
        self.lag_smoothing
    }

    /// Advance to `wall`, the wall-clock time elapsed since the ticker started.
    ///
    /// A `wall` earlier than the previous one is treated as no time passing.
    pub fn tick_at(&mut self, wall: Duration) -> Tick {
        let wall = wall.max(self.last_wall);
        let gap = wall - self.last_wall;
        if let Some(smoothing) = self.lag_smoothing {
            if gap > smoothing.threshold {
                self.lag += gap.saturating_sub(smoothing.adjusted);
                log::debug!("lag of {:?} smoothed to {:?}", gap, smoothing.adjusted);
            }
        }
        self.last_wall = wall;

        let time = wall.saturating_sub(self.lag).as_secs_f64();
        let delta = time - self.last_time;
        self.last_time = time;
        self.frame += 1;

        Tick {
            time,
            delta,
            frame: self.frame,
        }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new(None)
    }
}

impl FrameScheduler for Ticker {
    fn tick(&mut self) -> Tick {
        let wall = self.origin.elapsed();
        self.tick_at(wall)
    }
}
