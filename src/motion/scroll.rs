//! Smooth-scroll driver.
//!
//! Raw input moves a *target* offset immediately; the *virtual* offset that
//! everything renders from chases it with an exponential ease-out curve over
//! a fixed duration.  Every new input restarts the chase from wherever the
//! virtual offset currently is, so rapid wheel notches blend into one long
//! deceleration instead of stuttering.
//!
//! The driver ticks from the frame clock and publishes a [`ScrollState`] on
//! the context's scroll emitter once per frame.  Consumers subscribe to that
//! emitter instead of reading the offset directly, so every consumer sees the
//! same value within a frame.

use std::cell::RefCell;
use std::rc::Rc;

use super::clock::FrameClock;
use super::easing::Ease;
use super::emitter::{Emitter, Subscription};
use super::tween::lerp;

/// Tuning for the driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollConfig {
    /// Seconds for the virtual offset to reach a new target.
    pub duration: f64,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
    /// When `false`, input moves the virtual offset immediately.
    pub smooth: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            duration: 1.2,
            wheel_multiplier: 1.0,
            touch_multiplier: 2.0,
            smooth: true,
        }
    }
}

/// Snapshot published every frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Where input has asked the page to be.
    pub raw_offset: f64,
    /// Where the page is drawn this frame.
    pub virtual_offset: f64,
    /// Change of `virtual_offset` since the previous frame.
    pub velocity: f64,
    /// Largest valid offset.
    pub limit: f64,
}

impl ScrollState {
    /// Position within the scrollable range, in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        if self.limit <= 0.0 {
            0.0
        } else {
            (self.virtual_offset / self.limit).clamp(0.0, 1.0)
        }
    }

    /// 1 when moving down the page, -1 when moving up, 0 at rest.
    pub fn direction(&self) -> i8 {
        if self.velocity > 0.0 {
            1
        } else if self.velocity < 0.0 {
            -1
        } else {
            0
        }
    }
}

/// Raw scroll input.  Only vertical gestures are supported.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    /// Wheel notch delta, in rows (positive scrolls down).
    Wheel(f64),
    /// Drag delta, in rows (positive scrolls down).
    Touch(f64),
}

#[derive(Debug, Clone, Copy)]
struct Chase {
    from: f64,
    elapsed: f64,
}

/// The smooth-scroll animator.
pub struct SmoothScroll {
    config: ScrollConfig,
    state: ScrollState,
    chase: Option<Chase>,
    frame_sub: Option<Subscription>,
    destroyed: bool,
}

impl SmoothScroll {
    pub fn new(config: ScrollConfig) -> Self {
        Self {
            config: ScrollConfig {
                duration: config.duration.max(0.0),
                ..config
            },
            state: ScrollState::default(),
            chase: None,
            frame_sub: None,
            destroyed: false,
        }
    }

    /// Drive `driver` from `clock`, publishing on `events` every frame.
    ///
    /// The clock only holds a weak reference, so dropping the last strong
    /// handle to the driver also silences it.
    pub fn attach(driver: &Rc<RefCell<Self>>, clock: &FrameClock, events: &Emitter<ScrollState>) {
        let weak = Rc::downgrade(driver);
        let events = events.clone();
        let sub = clock.subscribe(move |frame| {
            let Some(driver) = weak.upgrade() else {
                return;
            };
            // Release the borrow before listeners run.
            let published = driver.borrow_mut().raf(frame.delta);
            if let Some(state) = published {
                events.emit(&state);
            }
        });
        let mut driver = driver.borrow_mut();
        if let Some(mut old) = driver.frame_sub.replace(sub) {
            old.cancel();
        }
    }

    #[cfg(test)]
    pub fn config(&self) -> &ScrollConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: ScrollConfig) {
        self.config = config;
        if !config.smooth {
            self.settle();
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    #[cfg(test)]
    pub fn is_animating(&self) -> bool {
        self.chase.is_some()
    }

    #[cfg(test)]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Feed raw input.  Ignored after [`destroy`](Self::destroy).
    pub fn on_input(&mut self, input: ScrollInput) {
        let delta = match input {
            ScrollInput::Wheel(d) => d * self.config.wheel_multiplier,
            ScrollInput::Touch(d) => d * self.config.touch_multiplier,
        };
        self.scroll_by(delta);
    }

    /// Move the target by `delta` rows without any input multiplier.
    pub fn scroll_by(&mut self, delta: f64) {
        self.scroll_to(self.state.raw_offset + delta);
    }

    /// Animate toward an absolute offset (anchor navigation).
    pub fn scroll_to(&mut self, target: f64) {
        if self.destroyed {
            return;
        }
        let target = target.clamp(0.0, self.state.limit);
        self.state.raw_offset = target;
        if !self.config.smooth || self.config.duration <= 0.0 {
            self.jump_to(target);
            return;
        }
        if (target - self.state.virtual_offset).abs() < f64::EPSILON {
            self.chase = None;
            return;
        }
        self.chase = Some(Chase {
            from: self.state.virtual_offset,
            elapsed: 0.0,
        });
    }

    /// Jump to an offset with no animation.
    pub fn jump_to(&mut self, target: f64) {
        if self.destroyed {
            return;
        }
        self.state.raw_offset = target.clamp(0.0, self.state.limit);
        self.settle();
    }

    /// Update the scrollable extent (page height minus viewport height).
    /// Offsets beyond the new limit are pulled back immediately.
    pub fn set_limit(&mut self, limit: f64) {
        self.state.limit = limit.max(0.0);
        if self.state.raw_offset > self.state.limit {
            self.state.raw_offset = self.state.limit;
        }
        if self.state.virtual_offset > self.state.limit {
            self.state.virtual_offset = self.state.limit;
            if let Some(chase) = self.chase.as_mut() {
                chase.from = chase.from.min(self.state.limit);
            }
        }
    }

    fn settle(&mut self) {
        self.chase = None;
        self.state.velocity = self.state.raw_offset - self.state.virtual_offset;
        self.state.virtual_offset = self.state.raw_offset;
    }

    /// Advance by `delta` seconds.  Returns the state to publish, or `None`
    /// once destroyed.
    pub fn raf(&mut self, delta: f64) -> Option<ScrollState> {
        if self.destroyed {
            return None;
        }
        let previous = self.state.virtual_offset;
        if let Some(chase) = self.chase.as_mut() {
            chase.elapsed += delta.max(0.0);
            let t = chase.elapsed / self.config.duration;
            if t >= 1.0 {
                self.state.virtual_offset = self.state.raw_offset;
                self.chase = None;
            } else {
                let eased = Ease::ScrollExpo.apply(t);
                self.state.virtual_offset = lerp(chase.from, self.state.raw_offset, eased);
            }
        }
        self.state.velocity = self.state.virtual_offset - previous;
        Some(self.state)
    }

    /// Stop animating and release the frame subscription.  Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.chase = None;
        self.state.velocity = 0.0;
        if let Some(mut sub) = self.frame_sub.take() {
            sub.cancel();
        }
        tracing::debug!("smooth scroll destroyed at offset {:.1}", self.state.virtual_offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    const FRAME: f64 = 1.0 / 60.0;

    fn driver(limit: f64) -> SmoothScroll {
        let mut d = SmoothScroll::new(ScrollConfig::default());
        d.set_limit(limit);
        d
    }

    #[test]
    fn converges_on_target() {
        let mut d = driver(1000.0);
        d.on_input(ScrollInput::Wheel(120.0));
        for _ in 0..200 {
            d.raf(FRAME);
        }
        let s = d.state();
        assert_eq!(s.virtual_offset, 120.0);
        assert_eq!(s.velocity, 0.0);
        assert!(!d.is_animating());
    }

    #[test]
    fn approaches_monotonically_without_overshoot() {
        let mut d = driver(5000.0);
        let inputs = [30.0, 45.0, -10.0, 300.0, -120.0, 60.0];
        for (i, delta) in inputs.iter().enumerate() {
            d.on_input(ScrollInput::Wheel(*delta));
            // A few frames between inputs, varying to mimic real timing.
            for _ in 0..(3 + i * 2) {
                d.raf(FRAME);
            }
        }
        let target = d.state().raw_offset;
        let start = d.state().virtual_offset;
        let mut gap = (target - start).abs();
        let side = (target - start).signum();
        for _ in 0..120 {
            let s = d.raf(FRAME).unwrap();
            let new_gap = (target - s.virtual_offset).abs();
            assert!(new_gap <= gap + 1e-9, "gap grew: {gap} -> {new_gap}");
            // Never crosses to the other side of the target.
            assert!((target - s.virtual_offset) * side >= -1e-9);
            gap = new_gap;
        }
        assert!(gap < 1e-9);
    }

    #[test]
    fn multipliers_apply_per_input_kind() {
        let mut d = SmoothScroll::new(ScrollConfig {
            wheel_multiplier: 1.5,
            touch_multiplier: 2.0,
            ..ScrollConfig::default()
        });
        d.set_limit(1000.0);
        d.on_input(ScrollInput::Wheel(10.0));
        assert_eq!(d.state().raw_offset, 15.0);
        d.on_input(ScrollInput::Touch(10.0));
        assert_eq!(d.state().raw_offset, 35.0);
    }

    #[test]
    fn target_is_clamped_to_limit() {
        let mut d = driver(50.0);
        d.on_input(ScrollInput::Wheel(500.0));
        assert_eq!(d.state().raw_offset, 50.0);
        d.on_input(ScrollInput::Wheel(-900.0));
        assert_eq!(d.state().raw_offset, 0.0);
    }

    #[test]
    fn disabled_smoothing_jumps() {
        let mut d = SmoothScroll::new(ScrollConfig {
            smooth: false,
            ..ScrollConfig::default()
        });
        d.set_limit(100.0);
        d.on_input(ScrollInput::Wheel(40.0));
        assert_eq!(d.state().virtual_offset, 40.0);
        assert!(!d.is_animating());
    }

    #[test]
    fn shrinking_limit_pulls_offsets_back() {
        let mut d = driver(500.0);
        d.jump_to(400.0);
        d.set_limit(100.0);
        assert_eq!(d.state().virtual_offset, 100.0);
        assert_eq!(d.state().raw_offset, 100.0);
    }

    #[test]
    fn destroy_stops_emitting_and_releases_clock() {
        let mut clock = FrameClock::new();
        let events = Emitter::<ScrollState>::new();
        let driver = Rc::new(RefCell::new(driver(1000.0)));
        SmoothScroll::attach(&driver, &clock, &events);

        let seen = Rc::new(RefCell::new(0));
        let s = Rc::clone(&seen);
        let _sub = events.subscribe(move |_| *s.borrow_mut() += 1);

        driver.borrow_mut().on_input(ScrollInput::Wheel(100.0));
        clock.tick(Duration::from_millis(0));
        clock.tick(Duration::from_millis(16));
        assert_eq!(*seen.borrow(), 2);

        driver.borrow_mut().destroy();
        driver.borrow_mut().destroy();
        assert_eq!(clock.subscriber_count(), 0);
        clock.tick(Duration::from_millis(32));
        assert_eq!(*seen.borrow(), 2);

        // Input after teardown is ignored.
        let before = driver.borrow().state();
        driver.borrow_mut().on_input(ScrollInput::Wheel(10.0));
        assert_eq!(driver.borrow().state(), before);
    }
}
