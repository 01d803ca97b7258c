//! The frame clock: one ticking source shared by every animation.
//!
//! There is no lag smoothing.  After a stalled frame the next tick reports
//! the true elapsed delta.

use std::time::{Duration, Instant};

use super::emitter::{Emitter, Subscription};

/// Timing information delivered to clock subscribers on every tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTime {
    /// Seconds since the clock started.
    pub time: f64,
    /// Seconds since the previous tick (0 on the first tick).
    pub delta: f64,
    /// Monotonic tick counter, starting at 0.
    pub frame: u64,
}

pub struct FrameClock {
    ticks: Emitter<FrameTime>,
    origin: Instant,
    last: Option<f64>,
    frame: u64,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            ticks: Emitter::new(),
            origin: Instant::now(),
            last: None,
            frame: 0,
        }
    }

    /// Attach a per-frame callback.
    pub fn subscribe(&self, callback: impl FnMut(&FrameTime) + 'static) -> Subscription {
        self.ticks.subscribe(callback)
    }

    /// Advance to `now` (time since the clock's origin) and notify
    /// subscribers.  A timestamp earlier than the previous one yields a zero
    /// delta rather than a negative one.
    pub fn tick(&mut self, now: Duration) -> FrameTime {
        let time = now.as_secs_f64();
        let delta = self.last.map_or(0.0, |last| (time - last).max(0.0));
        self.last = Some(time.max(self.last.unwrap_or(0.0)));
        let frame = FrameTime {
            time,
            delta,
            frame: self.frame,
        };
        self.frame += 1;
        self.ticks.emit(&frame);
        frame
    }

    /// Tick with the wall-clock time elapsed since construction.
    pub fn tick_now(&mut self) -> FrameTime {
        let now = self.origin.elapsed();
        self.tick(now)
    }

    /// Time of the most recent tick, in seconds.
    pub fn time(&self) -> f64 {
        self.last.unwrap_or(0.0)
    }

    #[cfg(test)]
    pub fn subscriber_count(&self) -> usize {
        self.ticks.len()
    }
}
