//! Scroll-position triggers.
//!
//! A trigger maps the scroll offset onto a progress value for one mounted
//! element.  Its start and end thresholds are written as edge strings such as
//! `"top 85%"` (the element's top meets the point 85% down the viewport) and
//! are resolved against the element's box and the viewport size.  Boxes and
//! the viewport can change at any time; thresholds are recomputed lazily on
//! the next frame.
//!
//! The registry is generic over the element key so the motion core knows
//! nothing about the page it animates.  Every registered trigger is updated
//! once per frame, in registration order, after the scroll driver has
//! published that frame's offset.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::rc::Rc;
use std::str::FromStr;

use thiserror::Error;

use super::clock::{FrameClock, FrameTime};
use super::emitter::{Emitter, Subscription};
use super::pin::Pin;
use super::props::Visual;
use super::scroll::ScrollState;
use super::timeline::Timeline;

/// Playheads closer than this to their target snap onto it.
const SNAP: f64 = 1e-4;

// ─── Edge strings ───────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum EdgeError {
    #[error("empty trigger edge")]
    Empty,
    #[error("unrecognised position `{0}` in trigger edge")]
    BadToken(String),
    #[error("trigger edge `{0}` has more than two parts")]
    TooManyParts(String),
    #[error("start edge `{0}` cannot be relative")]
    RelativeStart(String),
}

/// A point along one axis of a box: `fraction` of its size plus `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub fraction: f64,
    pub offset: f64,
}

impl Anchor {
    const ORIGIN: Anchor = Anchor {
        fraction: 0.0,
        offset: 0.0,
    };

    fn at(fraction: f64) -> Self {
        Self {
            fraction,
            offset: 0.0,
        }
    }

    fn resolve(&self, origin: f64, size: f64) -> f64 {
        origin + self.fraction * size + self.offset
    }
}

impl FromStr for Anchor {
    type Err = EdgeError;

    /// `top`, `center`, `bottom` (or `left`/`right`), `NN%`, a plain number of
    /// units, each optionally followed by `+=N` or `-=N`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let bad = || EdgeError::BadToken(token.to_string());

        let (base, adjust) = match token.find("+=").or_else(|| token.find("-=")) {
            Some(0) => return Err(bad()),
            Some(i) => {
                let sign = if token[i..].starts_with('-') { -1.0 } else { 1.0 };
                let amount: f64 = token[i + 2..].parse().map_err(|_| bad())?;
                (&token[..i], sign * amount)
            }
            None => (token, 0.0),
        };

        let mut anchor = match base {
            "top" | "left" => Anchor::at(0.0),
            "center" => Anchor::at(0.5),
            "bottom" | "right" => Anchor::at(1.0),
            _ => {
                if let Some(pct) = base.strip_suffix('%') {
                    let pct: f64 = pct.parse().map_err(|_| bad())?;
                    Anchor::at(pct / 100.0)
                } else {
                    let units: f64 = base.parse().map_err(|_| bad())?;
                    Anchor {
                        fraction: 0.0,
                        offset: units,
                    }
                }
            }
        };
        anchor.offset += adjust;
        Ok(anchor)
    }
}

/// A resolved-on-demand threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Edge {
    /// The scroll offset at which the `element` point meets the `viewport`
    /// point.  A lone token anchors against the viewport's leading edge.
    Meet { element: Anchor, viewport: Anchor },
    /// `"+=N"`: N units past the start edge.  Only meaningful as an end.
    AfterStart(f64),
}

impl Edge {
    /// Threshold for an element spanning `origin..origin + size` in a
    /// viewport `view` units long.  `None` for relative edges.
    fn threshold(&self, origin: f64, size: f64, view: f64) -> Option<f64> {
        match self {
            Edge::Meet { element, viewport } => {
                Some(element.resolve(origin, size) - viewport.resolve(0.0, view))
            }
            Edge::AfterStart(_) => None,
        }
    }
}

impl FromStr for Edge {
    type Err = EdgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(EdgeError::Empty);
        }
        if let Some(rest) = s.strip_prefix("+=") {
            let n: f64 = rest
                .trim()
                .parse()
                .map_err(|_| EdgeError::BadToken(s.to_string()))?;
            return Ok(Edge::AfterStart(n));
        }
        let parts: Vec<&str> = s.split_whitespace().collect();
        match parts.as_slice() {
            [element] => Ok(Edge::Meet {
                element: element.parse()?,
                viewport: Anchor::ORIGIN,
            }),
            [element, viewport] => Ok(Edge::Meet {
                element: element.parse()?,
                viewport: viewport.parse()?,
            }),
            _ => Err(EdgeError::TooManyParts(s.to_string())),
        }
    }
}

// ─── Geometry ───────────────────────────────────────────────────────────────

/// An element's box.  Page-scoped elements use page coordinates; elements
/// inside a horizontally scrolling container use the container's own
/// content coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ElementBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

/// Progress of `position` through `start..=end`.
///
/// Below the start the result is always 0.  Past the end it is clamped to 1
/// unless `clamp_end` is false.  A zero-length range acts as a step at
/// `start`.
pub fn progress_at(position: f64, start: f64, end: f64, clamp_end: bool) -> f64 {
    let span = end - start;
    if span <= f64::EPSILON {
        return if position >= start { 1.0 } else { 0.0 };
    }
    let p = ((position - start) / span).max(0.0);
    if clamp_end {
        p.min(1.0)
    } else {
        p
    }
}

// ─── Triggers ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerHandle(u64);

/// How a scrubbed playhead follows progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scrub {
    Instant,
    /// Catch up over roughly this many seconds.
    Lag(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Playback {
    /// The playhead tracks scroll progress.
    Scrub(Scrub),
    /// Crossing the start plays the animation forward in time.  Unless
    /// `once` is set, scrolling back above the start plays it in reverse.
    Toggle { once: bool },
}

/// Which scroll axis a trigger measures against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scope {
    Page,
    /// The horizontal travel of a pinned container trigger.
    Container(TriggerHandle),
}

/// What the `on_update` callback receives each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerUpdate {
    pub progress: f64,
    /// Normalised position of the animation, `0..=1`.
    pub playhead: f64,
    pub active: bool,
}

/// Pin status of a pinned trigger.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinState {
    pub engaged: bool,
    /// Current translation of the pinned content (zero or negative).
    pub horizontal_offset: f64,
    /// Scroll units the pin lasts.
    pub distance: f64,
    /// Offset at which the pin starts.
    pub start: f64,
}

type UpdateFn = Box<dyn FnMut(&TriggerUpdate)>;

/// A trigger description, built before registration.
pub struct Trigger<K> {
    element: K,
    tag: &'static str,
    start: Edge,
    end: Edge,
    scope: Scope,
    playback: Playback,
    pin_width: Option<f64>,
    timeline: Option<Timeline<K>>,
    on_update: Option<UpdateFn>,
}

impl<K: Copy + PartialEq> Trigger<K> {
    /// A trigger on `element` between two edge strings.
    pub fn new(element: K, start: &str, end: &str) -> Result<Self, EdgeError> {
        let start_edge: Edge = start.parse()?;
        if matches!(start_edge, Edge::AfterStart(_)) {
            return Err(EdgeError::RelativeStart(start.to_string()));
        }
        Ok(Self {
            element,
            tag: "",
            start: start_edge,
            end: end.parse()?,
            scope: Scope::Page,
            playback: Playback::Toggle { once: true },
            pin_width: None,
            timeline: None,
            on_update: None,
        })
    }

    /// Distinguish several triggers on the same element.  Registering a
    /// trigger with an existing `(element, tag)` pair replaces the old one.
    pub fn tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    pub fn scrub(mut self, scrub: Scrub) -> Self {
        self.playback = Playback::Scrub(scrub);
        self
    }

    pub fn toggle(mut self, once: bool) -> Self {
        self.playback = Playback::Toggle { once };
        self
    }

    /// Pin the element while `content_width` columns scroll horizontally
    /// past the viewport.  The end edge is replaced by the pin distance.
    pub fn pin(mut self, content_width: f64) -> Self {
        self.pin_width = Some(content_width);
        self
    }

    /// Measure against a pinned container's horizontal travel.
    pub fn in_container(mut self, container: TriggerHandle) -> Self {
        self.scope = Scope::Container(container);
        self
    }

    pub fn animate(mut self, timeline: Timeline<K>) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Called every frame the trigger is updated.  The registry is borrowed
    /// while this runs.
    pub fn on_update(mut self, f: impl FnMut(&TriggerUpdate) + 'static) -> Self {
        self.on_update = Some(Box::new(f));
        self
    }
}

struct Entry<K> {
    handle: TriggerHandle,
    trigger: Trigger<K>,
    range: Option<(f64, f64)>,
    pin: Option<Pin>,
    position: f64,
    velocity: f64,
    progress: f64,
    playhead: f64,
    /// Toggle playback direction: -1, 0 or 1.
    direction: f64,
    ahead: bool,
    active: bool,
}

impl<K: Copy + Eq + Hash> Entry<K> {
    fn new(handle: TriggerHandle, trigger: Trigger<K>) -> Self {
        Self {
            handle,
            trigger,
            range: None,
            pin: None,
            position: 0.0,
            velocity: 0.0,
            progress: 0.0,
            playhead: 0.0,
            direction: 0.0,
            ahead: false,
            active: false,
        }
    }

    fn resolve(&mut self, boxes: &HashMap<K, ElementBox>, viewport: Viewport) {
        let Some(b) = boxes.get(&self.trigger.element) else {
            self.range = None;
            return;
        };
        let (origin, size, view) = match self.trigger.scope {
            Scope::Page => (b.top, b.height, viewport.height),
            Scope::Container(_) => (b.left, b.width, viewport.width),
        };
        let start = self.trigger.start.threshold(origin, size, view).unwrap_or(0.0);
        let pin = self.trigger.pin_width.map(|w| Pin::new(w, viewport.width));
        let end = match (pin, self.trigger.end) {
            (Some(pin), _) if pin.is_pinnable() => start + pin.distance(),
            (_, Edge::AfterStart(n)) => start + n,
            (_, edge) => edge.threshold(origin, size, view).unwrap_or(start),
        };
        self.pin = pin;
        self.range = Some((start, end.max(start)));
    }

    fn duration(&self) -> f64 {
        self.trigger.timeline.as_ref().map_or(0.0, Timeline::duration)
    }

    fn advance(&mut self, position: f64, velocity: f64, dt: f64) {
        let Some((start, end)) = self.range else {
            return;
        };
        let scrubbed = matches!(self.trigger.playback, Playback::Scrub(_));
        self.position = position;
        self.velocity = velocity;
        self.progress = progress_at(position, start, end, !scrubbed);
        self.active = position >= start && position <= end;
        let target = self.progress.min(1.0);

        match self.trigger.playback {
            Playback::Scrub(Scrub::Instant) => self.playhead = target,
            Playback::Scrub(Scrub::Lag(seconds)) => {
                if seconds <= 0.0 {
                    self.playhead = target;
                } else {
                    let alpha = 1.0 - (-4.0 * dt.max(0.0) / seconds).exp();
                    self.playhead += (target - self.playhead) * alpha;
                    if (target - self.playhead).abs() < SNAP {
                        self.playhead = target;
                    }
                }
            }
            Playback::Toggle { once } => {
                let ahead = position >= start;
                if ahead && !self.ahead {
                    self.direction = 1.0;
                } else if !ahead && self.ahead && !once {
                    self.direction = -1.0;
                }
                self.ahead = ahead;
                self.play(dt);
            }
        }

        if let Some(f) = self.trigger.on_update.as_mut() {
            f(&TriggerUpdate {
                progress: self.progress,
                playhead: self.playhead,
                active: self.active,
            });
        }
    }

    fn play(&mut self, dt: f64) {
        if self.direction == 0.0 {
            return;
        }
        let duration = self.duration();
        self.playhead = if duration <= 0.0 {
            if self.direction > 0.0 { 1.0 } else { 0.0 }
        } else {
            (self.playhead + self.direction * dt.max(0.0) / duration).clamp(0.0, 1.0)
        };
        if (self.direction > 0.0 && self.playhead >= 1.0)
            || (self.direction < 0.0 && self.playhead <= 0.0)
        {
            self.direction = 0.0;
        }
    }
}

// ─── Registry ───────────────────────────────────────────────────────────────

/// All live triggers plus the geometry they resolve against.
pub struct TriggerRegistry<K> {
    entries: Vec<Entry<K>>,
    boxes: HashMap<K, ElementBox>,
    viewport: Viewport,
    scroll: ScrollState,
    dirty: bool,
    next_id: u64,
}

impl<K: Copy + Eq + Hash + Debug + 'static> TriggerRegistry<K> {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            entries: Vec::new(),
            boxes: HashMap::new(),
            viewport,
            scroll: ScrollState::default(),
            dirty: false,
            next_id: 0,
        }
    }

    /// Follow `scroll` and update on every tick of `clock`.  Attach after the
    /// scroll driver so each frame sees that frame's offset.
    pub fn attach(
        registry: &Rc<RefCell<Self>>,
        clock: &FrameClock,
        scroll: &Emitter<ScrollState>,
    ) -> Vec<Subscription> {
        let weak = Rc::downgrade(registry);
        let on_scroll = scroll.subscribe(move |state| {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().on_scroll(*state);
            }
        });
        let weak = Rc::downgrade(registry);
        let on_frame = clock.subscribe(move |frame| {
            if let Some(registry) = weak.upgrade() {
                registry.borrow_mut().update(frame);
            }
        });
        vec![on_scroll, on_frame]
    }

    pub fn set_viewport(&mut self, width: f64, height: f64) {
        let viewport = Viewport { width, height };
        if viewport != self.viewport {
            self.viewport = viewport;
            self.dirty = true;
        }
    }

    /// Mount or move an element.
    pub fn set_element_box(&mut self, element: K, bx: ElementBox) {
        if self.boxes.insert(element, bx) != Some(bx) {
            self.dirty = true;
        }
    }

    /// Unmount an element.  Its triggers stay registered but go inert.
    #[cfg(test)]
    pub fn remove_element(&mut self, element: K) {
        if self.boxes.remove(&element).is_some() {
            self.dirty = true;
        }
    }

    /// Register a trigger.  Returns `None` and does nothing if its element
    /// is not mounted.
    pub fn register(&mut self, trigger: Trigger<K>) -> Option<TriggerHandle> {
        if !self.boxes.contains_key(&trigger.element) {
            tracing::debug!(
                element = ?trigger.element,
                tag = trigger.tag,
                "trigger target not mounted"
            );
            return None;
        }
        self.next_id += 1;
        let handle = TriggerHandle(self.next_id);
        let mut entry = Entry::new(handle, trigger);
        entry.resolve(&self.boxes, self.viewport);

        let existing = self.entries.iter_mut().find(|e| {
            e.trigger.element == entry.trigger.element && e.trigger.tag == entry.trigger.tag
        });
        match existing {
            Some(slot) => {
                tracing::debug!(
                    element = ?entry.trigger.element,
                    tag = entry.trigger.tag,
                    "trigger replaced"
                );
                *slot = entry;
            }
            None => self.entries.push(entry),
        }
        Some(handle)
    }

    /// Change the strip width of a pinned trigger, keeping its handle and
    /// playback state.  Returns `false` for unknown or unpinned handles.
    pub fn set_pin_width(&mut self, handle: TriggerHandle, content_width: f64) -> bool {
        match self.entries.iter_mut().find(|e| e.handle == handle) {
            Some(entry) if entry.trigger.pin_width.is_some() => {
                entry.trigger.pin_width = Some(content_width);
                self.dirty = true;
                true
            }
            _ => false,
        }
    }

    pub fn unregister(&mut self, handle: TriggerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }

    /// Drop every trigger.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn on_scroll(&mut self, state: ScrollState) {
        self.scroll = state;
    }

    /// Re-resolve every threshold now.
    pub fn refresh(&mut self) {
        for entry in &mut self.entries {
            entry.resolve(&self.boxes, self.viewport);
        }
        self.dirty = false;
    }

    /// Advance every trigger by one frame, in registration order.
    pub fn update(&mut self, frame: &FrameTime) {
        if self.dirty {
            self.refresh();
        }
        let scroll = self.scroll;
        for i in 0..self.entries.len() {
            let position = match self.entries[i].trigger.scope {
                Scope::Page => scroll.virtual_offset,
                Scope::Container(container) => match self.container_travel(container) {
                    Some(travel) => travel,
                    None => continue,
                },
            };
            self.entries[i].advance(position, scroll.velocity, frame.delta);
        }
    }

    /// Columns a pinned container has scrolled so far.
    fn container_travel(&self, container: TriggerHandle) -> Option<f64> {
        let entry = self.entry(container)?;
        let pin = entry.pin?;
        Some(entry.playhead.clamp(0.0, 1.0) * pin.distance())
    }

    fn entry(&self, handle: TriggerHandle) -> Option<&Entry<K>> {
        self.entries.iter().find(|e| e.handle == handle)
    }

    #[cfg(test)]
    pub fn progress(&self, handle: TriggerHandle) -> Option<f64> {
        self.entry(handle).map(|e| e.progress)
    }

    #[cfg(test)]
    pub fn playhead(&self, handle: TriggerHandle) -> Option<f64> {
        self.entry(handle).map(|e| e.playhead)
    }

    #[cfg(test)]
    pub fn range(&self, handle: TriggerHandle) -> Option<(f64, f64)> {
        self.entry(handle).and_then(|e| e.range)
    }

    pub fn pin_state(&self, handle: TriggerHandle) -> Option<PinState> {
        let entry = self.entry(handle)?;
        let pin = entry.pin.filter(Pin::is_pinnable)?;
        let (start, _) = entry.range?;
        Some(PinState {
            engaged: pin.engaged(entry.position, entry.velocity, start),
            horizontal_offset: pin.horizontal_offset(entry.playhead),
            distance: pin.distance(),
            start,
        })
    }

    /// The combined visual state of `target` across every trigger's
    /// timeline, later registrations layered over earlier ones.
    pub fn visual(&self, target: K) -> Visual {
        let mut out = Visual::default();
        for entry in self.entries.iter().filter(|e| e.range.is_some()) {
            if let Some(timeline) = entry.trigger.timeline.as_ref() {
                if timeline.touches(target) {
                    timeline.apply_to(target, entry.playhead * timeline.duration(), &mut out);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::easing::Ease;
    use crate::motion::props::Props;
    use crate::motion::timeline::{Position, TweenSpec};
    use std::time::Duration;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum El {
        Block,
        Other,
        Strip,
        Card,
    }

    const FRAME: FrameTime = FrameTime {
        time: 0.0,
        delta: 1.0 / 60.0,
        frame: 0,
    };

    fn registry() -> TriggerRegistry<El> {
        let mut reg = TriggerRegistry::new(Viewport {
            width: 100.0,
            height: 40.0,
        });
        reg.set_element_box(
            El::Block,
            ElementBox {
                left: 0.0,
                top: 100.0,
                width: 100.0,
                height: 20.0,
            },
        );
        reg
    }

    fn scroll_to(reg: &mut TriggerRegistry<El>, offset: f64) {
        reg.on_scroll(ScrollState {
            raw_offset: offset,
            virtual_offset: offset,
            velocity: 0.0,
            limit: 1000.0,
        });
        reg.update(&FRAME);
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn parses_edge_strings() {
        assert_eq!(
            "top 85%".parse::<Edge>(),
            Ok(Edge::Meet {
                element: Anchor::at(0.0),
                viewport: Anchor::at(0.85),
            })
        );
        assert_eq!(
            "bottom-=5 top".parse::<Edge>(),
            Ok(Edge::Meet {
                element: Anchor {
                    fraction: 1.0,
                    offset: -5.0
                },
                viewport: Anchor::at(0.0),
            })
        );
        assert_eq!("+=300".parse::<Edge>(), Ok(Edge::AfterStart(300.0)));
        assert_eq!("".parse::<Edge>(), Err(EdgeError::Empty));
        assert!(matches!("middle top".parse::<Edge>(), Err(EdgeError::BadToken(_))));
        assert!(matches!("top top top".parse::<Edge>(), Err(EdgeError::TooManyParts(_))));
        assert!(matches!(
            Trigger::new(El::Block, "+=5", "bottom top"),
            Err(EdgeError::RelativeStart(_))
        ));
    }

    #[test]
    fn edges_resolve_against_box_and_viewport() {
        let mut reg = registry();
        let h = reg
            .register(Trigger::new(El::Block, "top bottom", "bottom top").unwrap())
            .unwrap();
        // top (100) meets viewport bottom (40) at 60; bottom (120) meets top at 120.
        assert_eq!(reg.range(h), Some((60.0, 120.0)));

        reg.set_viewport(100.0, 20.0);
        scroll_to(&mut reg, 0.0);
        assert_eq!(reg.range(h), Some((80.0, 120.0)));
    }

    #[test]
    fn progress_clamps_unless_scrubbed() {
        let mut reg = registry();
        let plain = reg
            .register(Trigger::new(El::Block, "top top", "+=200").unwrap())
            .unwrap();
        let scrub = reg
            .register(
                Trigger::new(El::Block, "top top", "+=200")
                    .unwrap()
                    .tag("scrub")
                    .scrub(Scrub::Instant),
            )
            .unwrap();
        assert_eq!(reg.range(plain), Some((100.0, 300.0)));

        for offset in (0..=500).step_by(25) {
            let offset = offset as f64;
            scroll_to(&mut reg, offset);
            let linear = (offset - 100.0) / 200.0;
            let p = reg.progress(plain).unwrap();
            let s = reg.progress(scrub).unwrap();
            if offset <= 100.0 {
                assert_eq!(p, 0.0);
                assert_eq!(s, 0.0);
            } else if offset <= 300.0 {
                assert!(close(p, linear));
                assert!(close(s, linear));
            } else {
                assert_eq!(p, 1.0);
                assert!(close(s, linear));
                // The playhead never runs past the animation's end.
                assert_eq!(reg.playhead(scrub), Some(1.0));
            }
        }
    }

    #[test]
    fn inverted_range_collapses_to_a_step() {
        let mut reg = registry();
        let h = reg
            .register(Trigger::new(El::Block, "bottom top", "top top").unwrap())
            .unwrap();
        assert_eq!(reg.range(h), Some((120.0, 120.0)));
        scroll_to(&mut reg, 119.0);
        assert_eq!(reg.progress(h), Some(0.0));
        scroll_to(&mut reg, 120.0);
        assert_eq!(reg.progress(h), Some(1.0));
    }

    #[test]
    fn missing_element_is_a_no_op() {
        let mut reg = registry();
        let h = reg.register(Trigger::new(El::Other, "top top", "bottom top").unwrap());
        assert!(h.is_none());
        assert!(reg.is_empty());
    }

    #[test]
    fn re_registering_replaces() {
        let mut reg = registry();
        let calls = Rc::new(RefCell::new(0));
        for _ in 0..3 {
            let c = Rc::clone(&calls);
            reg.register(
                Trigger::new(El::Block, "top top", "bottom top")
                    .unwrap()
                    .on_update(move |_| *c.borrow_mut() += 1),
            );
        }
        reg.register(Trigger::new(El::Block, "top top", "bottom top").unwrap().tag("second"));
        assert_eq!(reg.len(), 2);
        scroll_to(&mut reg, 0.0);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn unmounted_element_goes_inert() {
        let mut reg = registry();
        let h = reg
            .register(Trigger::new(El::Block, "top top", "bottom top").unwrap())
            .unwrap();
        reg.remove_element(El::Block);
        scroll_to(&mut reg, 500.0);
        assert_eq!(reg.range(h), None);
        assert_eq!(reg.progress(h), Some(0.0));
    }

    fn reveal() -> Timeline<El> {
        Timeline::new().with_ease(Ease::Linear).add(
            TweenSpec::from([El::Block], Props::new().opacity(0.0)).duration(1.0),
            Position::AfterPrevious,
        )
    }

    #[test]
    fn toggle_plays_forward_and_reverses_on_leave_back() {
        let mut reg = registry();
        let h = reg
            .register(
                Trigger::new(El::Block, "top top", "bottom top")
                    .unwrap()
                    .toggle(false)
                    .animate(reveal()),
            )
            .unwrap();
        // Immediately hidden before it ever plays.
        assert_eq!(reg.visual(El::Block).opacity, 0.0);

        scroll_to(&mut reg, 100.0);
        for _ in 0..29 {
            reg.update(&FRAME);
        }
        // 30 frames of a one-second animation.
        assert!(close(reg.playhead(h).unwrap(), 0.5));
        assert!(close(reg.visual(El::Block).opacity, 0.5));

        scroll_to(&mut reg, 50.0);
        assert!(reg.playhead(h).unwrap() < 0.5);
        for _ in 0..60 {
            reg.update(&FRAME);
        }
        assert_eq!(reg.playhead(h), Some(0.0));
    }

    #[test]
    fn once_never_reverses() {
        let mut reg = registry();
        let h = reg
            .register(
                Trigger::new(El::Block, "top top", "bottom top")
                    .unwrap()
                    .toggle(true)
                    .animate(reveal()),
            )
            .unwrap();
        scroll_to(&mut reg, 150.0);
        scroll_to(&mut reg, 0.0);
        for _ in 0..120 {
            reg.update(&FRAME);
        }
        assert_eq!(reg.playhead(h), Some(1.0));
        assert_eq!(reg.visual(El::Block).opacity, 1.0);
    }

    #[test]
    fn lagged_scrub_catches_up_without_overshoot() {
        let mut reg = registry();
        let h = reg
            .register(
                Trigger::new(El::Block, "top top", "+=100")
                    .unwrap()
                    .scrub(Scrub::Lag(1.0)),
            )
            .unwrap();
        scroll_to(&mut reg, 200.0);
        let first = reg.playhead(h).unwrap();
        assert!(first > 0.0 && first < 0.2);
        let mut last = first;
        for _ in 0..180 {
            reg.update(&FRAME);
            let now = reg.playhead(h).unwrap();
            assert!(now >= last && now <= 1.0);
            last = now;
        }
        assert_eq!(last, 1.0);
    }

    #[test]
    fn container_triggers_follow_pinned_travel() {
        let mut reg = registry();
        reg.set_element_box(
            El::Strip,
            ElementBox {
                left: 0.0,
                top: 200.0,
                width: 100.0,
                height: 40.0,
            },
        );
        reg.set_element_box(
            El::Card,
            ElementBox {
                left: 250.0,
                top: 0.0,
                width: 50.0,
                height: 20.0,
            },
        );
        let strip = reg
            .register(
                Trigger::new(El::Strip, "top top", "bottom top")
                    .unwrap()
                    .pin(400.0)
                    .scrub(Scrub::Instant),
            )
            .unwrap();
        let card = reg
            .register(
                Trigger::new(El::Card, "left right", "left center")
                    .unwrap()
                    .in_container(strip)
                    .scrub(Scrub::Instant),
            )
            .unwrap();
        // Pin lasts 300 rows; the card enters at 150 columns of travel.
        assert_eq!(reg.range(strip), Some((200.0, 500.0)));
        assert_eq!(reg.range(card), Some((150.0, 200.0)));

        scroll_to(&mut reg, 375.0);
        let pin = reg.pin_state(strip).unwrap();
        assert!(pin.engaged);
        assert!(close(pin.horizontal_offset, -175.0));
        assert!(close(reg.progress(card).unwrap(), 0.5));

        scroll_to(&mut reg, 600.0);
        assert!(!reg.pin_state(strip).unwrap().engaged);
    }

    #[test]
    fn resizing_a_pin_keeps_its_handle() {
        let mut reg = registry();
        reg.set_element_box(
            El::Strip,
            ElementBox {
                left: 0.0,
                top: 200.0,
                width: 100.0,
                height: 40.0,
            },
        );
        let strip = reg
            .register(Trigger::new(El::Strip, "top top", "bottom top").unwrap().pin(400.0))
            .unwrap();
        assert!(reg.set_pin_width(strip, 250.0));
        scroll_to(&mut reg, 200.0);
        assert_eq!(reg.range(strip), Some((200.0, 350.0)));

        let plain = reg
            .register(Trigger::new(El::Block, "top top", "bottom top").unwrap())
            .unwrap();
        assert!(!reg.set_pin_width(plain, 250.0));
    }

    #[test]
    fn layered_timelines_compose_in_registration_order() {
        let mut reg = registry();
        reg.register(
            Trigger::new(El::Block, "top bottom", "top center")
                .unwrap()
                .tag("enter")
                .scrub(Scrub::Instant)
                .animate(Timeline::new().with_ease(Ease::Linear).add(
                    TweenSpec::from([El::Block], Props::new().scale(0.5)).duration(1.0),
                    Position::AfterPrevious,
                )),
        );
        reg.register(
            Trigger::new(El::Block, "top top", "bottom top")
                .unwrap()
                .tag("grow")
                .scrub(Scrub::Instant)
                .animate(Timeline::new().with_ease(Ease::Linear).add(
                    TweenSpec::to([El::Block], Props::new().scale(2.0)).duration(1.0),
                    Position::AfterPrevious,
                )),
        );
        scroll_to(&mut reg, 0.0);
        assert!(close(reg.visual(El::Block).scale, 0.5));
        scroll_to(&mut reg, 100.0);
        assert!(close(reg.visual(El::Block).scale, 1.0));
        scroll_to(&mut reg, 110.0);
        assert!(close(reg.visual(El::Block).scale, 1.5));
    }

    #[test]
    fn attached_registry_follows_clock_and_scroll() {
        let mut clock = FrameClock::new();
        let scroll = Emitter::<ScrollState>::new();
        let reg = Rc::new(RefCell::new(registry()));
        let h = reg
            .borrow_mut()
            .register(
                Trigger::new(El::Block, "top top", "+=100")
                    .unwrap()
                    .scrub(Scrub::Instant),
            )
            .unwrap();
        let mut subs = TriggerRegistry::attach(&reg, &clock, &scroll);

        scroll.emit(&ScrollState {
            virtual_offset: 150.0,
            ..ScrollState::default()
        });
        clock.tick(Duration::from_millis(16));
        assert_eq!(reg.borrow().progress(h), Some(0.5));

        for sub in &mut subs {
            sub.cancel();
        }
        assert_eq!(clock.subscriber_count(), 0);
        assert!(scroll.is_empty());
    }
}
