//! Magnetic pointer attraction.
//!
//! While the pointer is over the zone the target is pulled toward it by a
//! fixed fraction of the distance from the zone's centre.  When the pointer
//! leaves, the target springs back to rest with an elastic ease.

use super::easing::Ease;
use super::tween::Tween;

/// Seconds the spring-back takes.
const RELEASE_SECS: f64 = 1.0;

/// Axis-aligned zone in screen cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Zone {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Zone {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

#[derive(Debug, Clone)]
pub struct Magnetic {
    zone: Zone,
    strength: f64,
    hovered: bool,
    pull: (f64, f64),
    release: Option<(Tween, Tween)>,
    destroyed: bool,
}

impl Magnetic {
    pub fn new(zone: Zone, strength: f64) -> Self {
        Self {
            zone,
            strength,
            hovered: false,
            pull: (0.0, 0.0),
            release: None,
            destroyed: false,
        }
    }

    /// Move the zone (resize or scroll).  The current offset is kept.
    pub fn set_zone(&mut self, zone: Zone) {
        self.zone = zone;
    }

    #[cfg(test)]
    pub fn zone(&self) -> Zone {
        self.zone
    }

    pub fn set_strength(&mut self, strength: f64) {
        self.strength = strength;
    }

    #[cfg(test)]
    pub fn is_hovered(&self) -> bool {
        self.hovered
    }

    /// Feed a pointer position at clock time `now`.
    pub fn on_pointer(&mut self, px: f64, py: f64, now: f64) {
        if self.destroyed {
            return;
        }
        if self.zone.contains(px, py) {
            let (cx, cy) = self.zone.center();
            self.hovered = true;
            self.release = None;
            self.pull = ((px - cx) * self.strength, (py - cy) * self.strength);
        } else if self.hovered {
            self.on_leave(now);
        }
    }

    /// Start springing back to rest.
    pub fn on_leave(&mut self, now: f64) {
        if self.destroyed || !self.hovered {
            return;
        }
        self.hovered = false;
        let (x, y) = self.pull;
        self.release = Some((
            Tween::new(x, 0.0, now, RELEASE_SECS, Ease::ELASTIC),
            Tween::new(y, 0.0, now, RELEASE_SECS, Ease::ELASTIC),
        ));
        self.pull = (0.0, 0.0);
    }

    /// Offset to draw the target with at `now`.
    pub fn offset(&self, now: f64) -> (f64, f64) {
        match &self.release {
            Some((x, y)) => (x.sample(now), y.sample(now)),
            None => self.pull,
        }
    }

    #[cfg(test)]
    pub fn is_settling(&self, now: f64) -> bool {
        self.release.as_ref().is_some_and(|(x, _)| !x.is_done(now))
    }

    /// Detach from input and rest in place.  Idempotent.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.hovered = false;
        self.release = None;
        self.pull = (0.0, 0.0);
    }

    #[cfg(test)]
    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
