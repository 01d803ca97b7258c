//! Auto-rotating card carousel.
//!
//! One card is shown at a time.  Each interval the current card leaves
//! (fading, shrinking and drifting up) while the next one enters from below
//! after a short delay.  A transition still in flight when the next one is
//! due is finished first, so no more than two cards are ever visible.

use super::easing::Ease;
use super::props::Visual;
use super::timer::Interval;
use super::tween::VisualTween;

/// Rows a card drifts while entering or leaving.
const DRIFT_ROWS: f64 = 2.0;
const ENTER_SECS: f64 = 0.8;
const ENTER_DELAY_SECS: f64 = 0.3;
const LEAVE_SECS: f64 = 0.6;

fn waiting() -> Visual {
    Visual {
        opacity: 0.0,
        scale: 0.9,
        y: DRIFT_ROWS,
        ..Visual::default()
    }
}

fn departed() -> Visual {
    Visual {
        opacity: 0.0,
        scale: 0.9,
        y: -DRIFT_ROWS,
        ..Visual::default()
    }
}

fn entrance(now: f64) -> VisualTween {
    VisualTween::new(waiting(), Visual::default(), now, ENTER_SECS, Ease::Power3Out)
}

#[derive(Debug, Clone)]
pub struct Carousel {
    cards: Vec<VisualTween>,
    current: usize,
    interval: Option<Interval>,
}

impl Carousel {
    /// Mount `count` cards at clock time `now` and play the first entrance.
    /// Rotation starts only when there is more than one card.
    pub fn mount(count: usize, period: f64, now: f64) -> Self {
        let mut cards = vec![VisualTween::settled(waiting()); count];
        if let Some(first) = cards.first_mut() {
            *first = entrance(now);
        }
        let interval = (count > 1).then(|| Interval::new(period, now));
        Self {
            cards,
            current: 0,
            interval,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn current(&self) -> usize {
        self.current
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.interval.is_some_and(|iv| !iv.is_cleared())
    }

    pub fn set_period(&mut self, period: f64, now: f64) {
        if let Some(iv) = self.interval.as_mut() {
            iv.set_period(period, now);
        }
    }

    /// Poll the interval; rotates and returns `true` when it fired.
    pub fn tick(&mut self, now: f64) -> bool {
        let fired = self.interval.as_mut().is_some_and(|iv| iv.poll(now));
        if fired {
            self.advance(now);
        }
        fired
    }

    /// Rotate to the next card immediately.
    pub fn advance(&mut self, now: f64) {
        let count = self.cards.len();
        if count < 2 {
            return;
        }
        for card in &mut self.cards {
            card.finish();
        }
        let next = (self.current + 1) % count;
        let leaving = self.cards[self.current].sample(now);
        self.cards[self.current] =
            VisualTween::new(leaving, departed(), now, LEAVE_SECS, Ease::Power2In);
        self.cards[next] = entrance(now).with_delay(ENTER_DELAY_SECS);
        self.current = next;
    }

    pub fn visual(&self, index: usize, now: f64) -> Visual {
        self.cards
            .get(index)
            .map_or_else(waiting, |card| card.sample(now))
    }

    /// Stop rotating.  Cards keep whatever state they are in.
    pub fn destroy(&mut self) {
        if let Some(iv) = self.interval.as_mut() {
            iv.clear();
        }
    }
}
