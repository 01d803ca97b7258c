//! Easing curves.
//!
//! Every curve maps progress `t ∈ [0, 1]` to an eased value.  Inputs outside
//! the unit interval are clamped first, so callers never have to.  Elastic
//! curves overshoot 1 in the middle of the range but land exactly on 1.

use std::f64::consts::{FRAC_PI_2, TAU};

/// Named easing curves used by tweens, timelines and the scroll driver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ease {
    Linear,
    /// Smooth-scroll curve: `min(1, 1.001 - 2^(-10t))`.
    ScrollExpo,
    /// Cubic ease-in.
    Power2In,
    /// Cubic ease-out.
    Power2Out,
    /// Quartic ease-out.
    Power3Out,
    /// Exponential ease-out: `1 - 2^(-10t)`.
    ExpoOut,
    /// Circular ease-out: `sqrt(1 - (t - 1)²)`.
    CircOut,
    SineInOut,
    /// Damped sine oscillation around the target.
    ElasticOut { amplitude: f64, period: f64 },
}

impl Default for Ease {
    fn default() -> Self {
        Ease::Power2Out
    }
}

impl Ease {
    /// `elastic.out(1, 0.3)`, the spring-back curve of the magnetic button.
    pub const ELASTIC: Ease = Ease::ElasticOut {
        amplitude: 1.0,
        period: 0.3,
    };

    /// Apply the curve to a progress value.
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Ease::Linear => t,
            Ease::ScrollExpo => (1.001 - 2f64.powf(-10.0 * t)).min(1.0),
            Ease::Power2In => t * t * t,
            Ease::Power2Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv
            }
            Ease::Power3Out => {
                let inv = 1.0 - t;
                1.0 - inv * inv * inv * inv
            }
            Ease::ExpoOut => {
                if t >= 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Ease::CircOut => (1.0 - (t - 1.0) * (t - 1.0)).sqrt(),
            Ease::SineInOut => -((t * std::f64::consts::PI).cos() - 1.0) / 2.0,
            Ease::ElasticOut { amplitude, period } => elastic_out(t, amplitude, period),
        }
    }
}

fn elastic_out(t: f64, amplitude: f64, period: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }
    let p1 = amplitude.max(1.0);
    let p3 = period.max(f64::EPSILON) / amplitude.clamp(f64::EPSILON, 1.0);
    // asin(1/p1) is π/2 for the common amplitude of 1.
    let phase = if p1 <= 1.0 { FRAC_PI_2 } else { (1.0 / p1).asin() };
    let p2 = p3 / TAU * phase;
    p1 * 2f64.powf(-10.0 * t) * ((t - p2) * TAU / p3).sin() + 1.0
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[Ease] = &[
        Ease::Linear,
        Ease::ScrollExpo,
        Ease::Power2In,
        Ease::Power2Out,
        Ease::Power3Out,
        Ease::ExpoOut,
        Ease::CircOut,
        Ease::SineInOut,
        Ease::ELASTIC,
    ];

    #[test]
    fn endpoints() {
        for &ease in ALL {
            assert!((ease.apply(1.0) - 1.0).abs() < 1e-9, "{ease:?} at t=1");
            if ease != Ease::ScrollExpo {
                assert!(ease.apply(0.0).abs() < 1e-9, "{ease:?} at t=0");
            }
        }
        // The scroll curve starts a hair above zero by construction.
        assert!((Ease::ScrollExpo.apply(0.0) - 0.001).abs() < 1e-9);
    }

    #[test]
    fn monotonic_curves() {
        for &ease in ALL.iter().filter(|e| !matches!(e, Ease::ElasticOut { .. })) {
            let mut prev = ease.apply(0.0);
            for i in 1..=100 {
                let v = ease.apply(i as f64 / 100.0);
                assert!(v + 1e-12 >= prev, "{ease:?} not monotonic at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn scroll_expo_never_exceeds_one() {
        for i in 0..=1000 {
            assert!(Ease::ScrollExpo.apply(i as f64 / 1000.0) <= 1.0);
        }
        // Clamped inputs.
        assert_eq!(Ease::ScrollExpo.apply(7.0), 1.0);
    }

    #[test]
    fn elastic_overshoots_then_settles() {
        let peak = (1..100)
            .map(|i| Ease::ELASTIC.apply(i as f64 / 100.0))
            .fold(f64::MIN, f64::max);
        assert!(peak > 1.0, "elastic should overshoot, peak={peak}");
        assert!((Ease::ELASTIC.apply(0.95) - 1.0).abs() < 0.01);
    }

    #[test]
    fn out_of_range_is_clamped() {
        assert_eq!(Ease::Linear.apply(-3.0), 0.0);
        assert_eq!(Ease::Power2Out.apply(2.0), 1.0);
        assert_eq!(Ease::Linear.apply(f64::NAN), 0.0);
    }
}
