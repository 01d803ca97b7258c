//! Repeating interval timer driven by the frame clock.

/// Fires every `period` seconds of clock time until cleared.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    period: f64,
    next_due: f64,
    cleared: bool,
}

impl Interval {
    pub fn new(period: f64, now: f64) -> Self {
        Self {
            period,
            next_due: now + period,
            cleared: false,
        }
    }

    #[cfg(test)]
    pub fn period(&self) -> f64 {
        self.period
    }

    /// Change the period, restarting the countdown from `now`.
    pub fn set_period(&mut self, period: f64, now: f64) {
        self.period = period;
        self.next_due = now + period;
    }

    /// Whether the interval fired at `now`.  Fires at most once per call; a
    /// stalled clock does not produce a burst of catch-up firings.
    pub fn poll(&mut self, now: f64) -> bool {
        if self.cleared || self.period <= 0.0 || now < self.next_due {
            return false;
        }
        self.next_due += self.period;
        if self.next_due <= now {
            self.next_due = now + self.period;
        }
        true
    }

    pub fn clear(&mut self) {
        self.cleared = true;
    }

    #[cfg(test)]
    pub fn is_cleared(&self) -> bool {
        self.cleared
    }
}
