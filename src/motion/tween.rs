//! Time-based tweens: a single value, or a whole [`Visual`].
//!
//! Tweens are plain values sampled with an explicit timestamp, so the same
//! tween can be driven by the frame clock at runtime and by hand in tests.

use super::easing::Ease;
use super::props::{Prop, Visual};

/// Linear interpolation.
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// A retargetable transition of one scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    from: f64,
    to: f64,
    /// Clock time (seconds) at which the tween was created.
    start: f64,
    delay: f64,
    duration: f64,
    ease: Ease,
}

impl Tween {
    pub fn new(from: f64, to: f64, start: f64, duration: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            start,
            delay: 0.0,
            duration: duration.max(0.0),
            ease,
        }
    }

    /// A tween that is already at rest on `value`.
    pub fn settled(value: f64) -> Self {
        Self::new(value, value, 0.0, 0.0, Ease::Linear)
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Eased progress in `[0, 1]` at clock time `now` (before easing).
    fn progress(&self, now: f64) -> f64 {
        let elapsed = now - self.start - self.delay;
        if elapsed <= 0.0 {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        (elapsed / self.duration).min(1.0)
    }

    pub fn sample(&self, now: f64) -> f64 {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        lerp(self.from, self.to, self.ease.apply(t))
    }

    #[cfg(test)]
    pub fn is_done(&self, now: f64) -> bool {
        self.progress(now) >= 1.0
    }

    /// Restart from wherever the tween currently is toward a new target.
    pub fn retarget(&mut self, now: f64, to: f64, duration: f64, ease: Ease) {
        let current = self.sample(now);
        *self = Self::new(current, to, now, duration, ease);
    }
}

/// A transition between two complete visual states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualTween {
    from: Visual,
    to: Visual,
    clock: Tween,
}

impl VisualTween {
    pub fn new(from: Visual, to: Visual, start: f64, duration: f64, ease: Ease) -> Self {
        Self {
            from,
            to,
            clock: Tween::new(0.0, 1.0, start, duration, ease),
        }
    }

    pub fn settled(visual: Visual) -> Self {
        Self {
            from: visual,
            to: visual,
            clock: Tween::settled(1.0),
        }
    }

    pub fn with_delay(mut self, delay: f64) -> Self {
        self.clock = self.clock.with_delay(delay);
        self
    }

    pub fn sample(&self, now: f64) -> Visual {
        let t = self.clock.sample(now);
        let mut out = self.from;
        for prop in Prop::ALL {
            out.set(prop, lerp(self.from.get(prop), self.to.get(prop), t));
        }
        out
    }

    /// Snap to the end state.
    pub fn finish(&mut self) {
        *self = Self::settled(self.to);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_endpoints_and_midpoint() {
        let t = Tween::new(10.0, 20.0, 1.0, 2.0, Ease::Linear);
        assert_eq!(t.sample(0.0), 10.0);
        assert_eq!(t.sample(2.0), 15.0);
        assert_eq!(t.sample(3.0), 20.0);
        assert!(t.is_done(3.0));
    }

    #[test]
    fn delay_holds_the_start_value() {
        let t = Tween::new(0.0, 1.0, 0.0, 1.0, Ease::Linear).with_delay(0.5);
        assert_eq!(t.sample(0.4), 0.0);
        assert_eq!(t.sample(1.0), 0.5);
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut t = Tween::new(0.0, 100.0, 0.0, 1.0, Ease::Linear);
        t.retarget(0.5, 0.0, 1.0, Ease::Linear);
        assert_eq!(t.sample(0.5), 50.0);
        assert_eq!(t.sample(1.5), 0.0);
    }

    #[test]
    fn zero_duration_jumps() {
        let t = Tween::new(0.0, 5.0, 0.0, 0.0, Ease::Linear);
        assert_eq!(t.sample(0.0), 0.0);
        assert_eq!(t.sample(0.001), 5.0);
    }

    #[test]
    fn visual_tween_interpolates_every_channel() {
        let from = Visual {
            opacity: 0.0,
            scale: 0.9,
            y: 4.0,
            ..Visual::default()
        };
        let tween = VisualTween::new(from, Visual::default(), 0.0, 1.0, Ease::Linear);
        let mid = tween.sample(0.5);
        assert!((mid.opacity - 0.5).abs() < 1e-9);
        assert!((mid.scale - 0.95).abs() < 1e-9);
        assert!((mid.y - 2.0).abs() < 1e-9);
    }
}
