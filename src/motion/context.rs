//! The motion context: one frame clock, one smooth-scroll driver, one
//! scroll event stream and one trigger registry, wired together.
//!
//! Construction order fixes the per-frame order: the driver advances and
//! publishes first, then every trigger updates against that frame's offset.
//! [`MotionContext::teardown`] unwinds all of it and is safe to call twice.

use std::cell::RefCell;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;

use super::clock::{FrameClock, FrameTime};
use super::emitter::{Emitter, Subscription};
use super::scroll::{ScrollConfig, ScrollState, SmoothScroll};
use super::trigger::{TriggerRegistry, Viewport};

pub struct MotionContext<K> {
    clock: FrameClock,
    scroll: Rc<RefCell<SmoothScroll>>,
    scroll_events: Emitter<ScrollState>,
    triggers: Rc<RefCell<TriggerRegistry<K>>>,
    subscriptions: Vec<Subscription>,
    torn_down: bool,
}

impl<K: Copy + Eq + Hash + Debug + 'static> MotionContext<K> {
    pub fn new(config: ScrollConfig, viewport: Viewport) -> Self {
        let clock = FrameClock::new();
        let scroll_events = Emitter::new();
        let scroll = Rc::new(RefCell::new(SmoothScroll::new(config)));
        SmoothScroll::attach(&scroll, &clock, &scroll_events);
        let triggers = Rc::new(RefCell::new(TriggerRegistry::new(viewport)));
        let subscriptions = TriggerRegistry::attach(&triggers, &clock, &scroll_events);
        tracing::debug!(?config, "motion context ready");
        Self {
            clock,
            scroll,
            scroll_events,
            triggers,
            subscriptions,
            torn_down: false,
        }
    }

    pub fn scroll(&self) -> &Rc<RefCell<SmoothScroll>> {
        &self.scroll
    }

    pub fn triggers(&self) -> &Rc<RefCell<TriggerRegistry<K>>> {
        &self.triggers
    }

    /// Listen to per-frame scroll state.
    pub fn on_scroll(&self, callback: impl FnMut(&ScrollState) + 'static) -> Subscription {
        self.scroll_events.subscribe(callback)
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.scroll.borrow().state()
    }

    /// Seconds of clock time so far.
    pub fn now(&self) -> f64 {
        self.clock.time()
    }

    /// Advance one frame at wall-clock time.
    pub fn frame(&mut self) -> FrameTime {
        self.clock.tick_now()
    }

    /// Advance one frame at an explicit time since the clock origin.
    #[cfg(test)]
    pub fn frame_at(&mut self, now: std::time::Duration) -> FrameTime {
        self.clock.tick(now)
    }

    #[cfg(test)]
    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Stop the driver, drop every trigger and release every subscription.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        for sub in &mut self.subscriptions {
            sub.cancel();
        }
        self.subscriptions.clear();
        self.scroll.borrow_mut().destroy();
        self.triggers.borrow_mut().clear();
        tracing::debug!("motion context torn down");
    }
}

impl<K> Drop for MotionContext<K> {
    fn drop(&mut self) {
        for sub in &mut self.subscriptions {
            sub.cancel();
        }
    }
}
