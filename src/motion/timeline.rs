//! Declarative animation timelines.
//!
//! A [`Timeline`] is built from [`TweenSpec`]s, each placed with a
//! [`Position`].  Building resolves every step to an absolute start time and
//! every `to`-only step to a concrete starting value, so sampling is a pure
//! function of `(target, time)`.
//!
//! ```ignore
//! let tl = Timeline::new()
//!     .with_ease(Ease::ExpoOut)
//!     .add(TweenSpec::from_to([Title(0), Title(1)], Props::new().y_percent(100.0),
//!          Props::new().y_percent(0.0)).duration(1.8).stagger(0.1).delay(0.5),
//!          Position::AfterPrevious)
//!     .add(TweenSpec::from([Subtitle], Props::new().opacity(0.0).y(2.0)).duration(1.2),
//!          Position::Relative(-1.0));
//! let v = tl.visual(Subtitle, 1.0);
//! ```

use super::easing::Ease;
use super::props::{Prop, Props, Visual};
use super::tween::lerp;

/// Where a step is placed relative to the timeline built so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Position {
    /// At the current end of the timeline.
    AfterPrevious,
    /// Offset from the current end; negative values overlap (`"-=1"`).
    Relative(f64),
    /// At an absolute time.
    At(f64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Repeat {
    Once,
    /// Loop forever, optionally playing every other iteration backwards.
    Infinite { yoyo: bool },
}

/// One tween as written by the caller, before placement.
#[derive(Debug, Clone)]
pub struct TweenSpec<T> {
    targets: Vec<T>,
    from: Option<Props>,
    to: Props,
    duration: f64,
    delay: f64,
    stagger: f64,
    ease: Option<Ease>,
}

impl<T: Copy + PartialEq> TweenSpec<T> {
    /// Animate from the target's current values to `to`.
    pub fn to(targets: impl IntoIterator<Item = T>, to: Props) -> Self {
        Self::build(targets, None, to)
    }

    /// Animate from `from` to the target's resting (identity) values.
    pub fn from(targets: impl IntoIterator<Item = T>, from: Props) -> Self {
        let to = Props::new().with_identity_for(&from);
        Self::build(targets, Some(from), to)
    }

    pub fn from_to(targets: impl IntoIterator<Item = T>, from: Props, to: Props) -> Self {
        Self::build(targets, Some(from), to)
    }

    fn build(targets: impl IntoIterator<Item = T>, from: Option<Props>, to: Props) -> Self {
        Self {
            targets: targets.into_iter().collect(),
            from,
            to,
            duration: 0.5,
            delay: 0.0,
            stagger: 0.0,
            ease: None,
        }
    }

    pub fn duration(mut self, seconds: f64) -> Self {
        self.duration = seconds.max(0.0);
        self
    }

    pub fn delay(mut self, seconds: f64) -> Self {
        self.delay = seconds.max(0.0);
        self
    }

    /// Offset between consecutive targets' start times.
    pub fn stagger(mut self, seconds: f64) -> Self {
        self.stagger = seconds.max(0.0);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = Some(ease);
        self
    }

    /// Span from the step's start to its last target finishing.
    fn span(&self) -> f64 {
        let n = self.targets.len().max(1) as f64;
        self.delay + self.stagger * (n - 1.0) + self.duration
    }
}

/// A step after placement.
#[derive(Debug, Clone)]
struct Step<T> {
    spec: TweenSpec<T>,
    start: f64,
    ease: Ease,
    /// Starting values, one per target, for every channel in `spec.to`.
    from: Vec<Props>,
    /// Whether `from` values render before the step starts.
    immediate: bool,
}

impl<T> Step<T> {
    fn local_start(&self, index: usize) -> f64 {
        self.start + self.spec.delay + self.spec.stagger * index as f64
    }
}

#[derive(Debug, Clone)]
pub struct Timeline<T> {
    steps: Vec<Step<T>>,
    defaults: Ease,
    end: f64,
    repeat: Repeat,
}

impl<T: Copy + PartialEq> Default for Timeline<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + PartialEq> Timeline<T> {
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            defaults: Ease::default(),
            end: 0.0,
            repeat: Repeat::Once,
        }
    }

    /// Ease used by steps that do not set their own.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.defaults = ease;
        self
    }

    pub fn repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    /// Place `spec` and return the extended timeline.
    pub fn add(mut self, spec: TweenSpec<T>, position: Position) -> Self {
        let start = match position {
            Position::AfterPrevious => self.end,
            Position::Relative(offset) => self.end + offset,
            Position::At(t) => t,
        }
        .max(0.0);

        let from = spec
            .targets
            .iter()
            .map(|&target| self.resolve_from(target, &spec))
            .collect();

        self.end = self.end.max(start + spec.span());
        self.steps.push(Step {
            ease: spec.ease.unwrap_or(self.defaults),
            immediate: spec.from.is_some(),
            from,
            start,
            spec,
        });
        self
    }

    /// Explicit `from` values win; otherwise each channel starts where the
    /// previously declared steps for this target leave it.
    fn resolve_from(&self, target: T, spec: &TweenSpec<T>) -> Props {
        if let Some(from) = spec.from {
            return from.with_identity_for(&spec.to);
        }
        let mut resting = Visual::default();
        for step in self.steps.iter().filter(|s| s.spec.targets.contains(&target)) {
            resting.apply(&step.spec.to);
        }
        let mut from = Props::new();
        for prop in spec.to.channels() {
            from = set_channel(from, prop, resting.get(prop));
        }
        from
    }

    /// Length of one iteration in seconds.
    pub fn duration(&self) -> f64 {
        self.end
    }

    /// Map absolute time onto one iteration according to the repeat mode.
    fn local_time(&self, time: f64) -> f64 {
        let time = time.max(0.0);
        match self.repeat {
            Repeat::Once => time,
            Repeat::Infinite { yoyo } => {
                if self.end <= 0.0 {
                    return 0.0;
                }
                let iteration = (time / self.end).floor();
                let local = time - iteration * self.end;
                if yoyo && (iteration as u64) % 2 == 1 {
                    self.end - local
                } else {
                    local
                }
            }
        }
    }

    /// Whether any step animates `target`.
    pub fn touches(&self, target: T) -> bool {
        self.steps.iter().any(|s| s.spec.targets.contains(&target))
    }

    /// The visual state of `target` at `time` seconds.
    #[cfg(test)]
    pub fn visual(&self, target: T, time: f64) -> Visual {
        let mut out = Visual::default();
        self.apply_to(target, time, &mut out);
        out
    }

    /// Write the channels this timeline currently drives for `target` onto
    /// `out`, leaving every other channel alone.  A `to`-only step writes
    /// nothing until its playhead has moved past its start, so timelines
    /// layered on the same target do not reset each other while idle.
    pub fn apply_to(&self, target: T, time: f64, out: &mut Visual) {
        let time = self.local_time(time);
        let mut written = [false; 7];

        for step in &self.steps {
            let Some(index) = step.spec.targets.iter().position(|t| *t == target) else {
                continue;
            };
            let start = step.local_start(index);
            let from = &step.from[index];

            if time < start || (!step.immediate && time <= start) {
                if step.immediate {
                    for (slot, prop) in Prop::ALL.into_iter().enumerate() {
                        if written[slot] {
                            continue;
                        }
                        if let Some(v) = from.get(prop) {
                            out.set(prop, v);
                            written[slot] = true;
                        }
                    }
                }
                continue;
            }

            let t = if step.spec.duration <= 0.0 {
                1.0
            } else {
                ((time - start) / step.spec.duration).min(1.0)
            };
            let eased = step.ease.apply(t);
            for (slot, prop) in Prop::ALL.into_iter().enumerate() {
                if let (Some(a), Some(b)) = (from.get(prop), step.spec.to.get(prop)) {
                    out.set(prop, lerp(a, b, eased));
                    written[slot] = true;
                }
            }
        }
    }

    /// Sample by normalised progress (`0..=1` maps onto one iteration).
    #[cfg(test)]
    pub fn visual_at_progress(&self, target: T, progress: f64) -> Visual {
        self.visual(target, progress.clamp(0.0, 1.0) * self.end)
    }
}

fn set_channel(props: Props, prop: Prop, v: f64) -> Props {
    match prop {
        Prop::X => props.x(v),
        Prop::Y => props.y(v),
        Prop::XPercent => props.x_percent(v),
        Prop::YPercent => props.y_percent(v),
        Prop::Opacity => props.opacity(v),
        Prop::Scale => props.scale(v),
        Prop::Rotation => props.rotation(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum T {
        A,
        B,
        C,
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn sequential_steps_follow_declared_order() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .add(TweenSpec::to([T::A], Props::new().x(10.0)).duration(1.0), Position::AfterPrevious)
            .add(
                TweenSpec::to([T::A], Props::new().x(20.0)).duration(1.0),
                Position::AfterPrevious,
            );
        assert!(close(tl.duration(), 2.0));
        assert!(close(tl.visual(T::A, 0.5).x, 5.0));
        // Second step starts from where the first left off.
        assert!(close(tl.visual(T::A, 1.5).x, 15.0));
        assert!(close(tl.visual(T::A, 9.0).x, 20.0));
    }

    #[test]
    fn negative_offset_overlaps() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .add(TweenSpec::to([T::A], Props::new().y(10.0)).duration(2.0), Position::AfterPrevious)
            .add(
                TweenSpec::from([T::B], Props::new().opacity(0.0)).duration(1.0),
                Position::Relative(-1.0),
            );
        // B starts at 1.0, not 2.0.
        assert!(close(tl.visual(T::B, 1.5).opacity, 0.5));
        assert!(close(tl.duration(), 2.0));
    }

    #[test]
    fn absolute_position_and_immediate_render() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .add(TweenSpec::to([T::A], Props::new().x(1.0)).duration(3.0), Position::AfterPrevious)
            .add(
                TweenSpec::from([T::C], Props::new().scale(1.1).opacity(0.0))
                    .duration(2.0)
                    .delay(1.0),
                Position::At(0.0),
            );
        // Before the delayed step starts, its `from` values already show.
        let before = tl.visual(T::C, 0.5);
        assert!(close(before.opacity, 0.0));
        assert!(close(before.scale, 1.1));
        let mid = tl.visual(T::C, 2.0);
        assert!(close(mid.opacity, 0.5));
        assert!(close(tl.visual(T::C, 3.0).scale, 1.0));
    }

    #[test]
    fn stagger_offsets_each_target() {
        let tl = Timeline::new().with_ease(Ease::Linear).add(
            TweenSpec::from_to(
                [T::A, T::B],
                Props::new().y_percent(100.0),
                Props::new().y_percent(0.0),
            )
            .duration(1.0)
            .stagger(0.5),
            Position::AfterPrevious,
        );
        assert!(close(tl.duration(), 1.5));
        assert!(close(tl.visual(T::A, 0.5).y_percent, 50.0));
        assert!(close(tl.visual(T::B, 0.5).y_percent, 100.0));
        assert!(close(tl.visual(T::B, 1.0).y_percent, 50.0));
    }

    #[test]
    fn untouched_target_is_identity() {
        let tl = Timeline::new()
            .add(TweenSpec::to([T::A], Props::new().x(4.0)), Position::AfterPrevious);
        assert_eq!(tl.visual(T::B, 0.3), Visual::default());
    }

    #[test]
    fn progress_sampling() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .add(
                TweenSpec::to([T::A], Props::new().y_percent(20.0)).duration(4.0),
                Position::AfterPrevious,
            );
        assert!(close(tl.visual_at_progress(T::A, 0.5).y_percent, 10.0));
        assert!(close(tl.visual_at_progress(T::A, 3.0).y_percent, 20.0));
    }

    #[test]
    fn infinite_yoyo_bounces() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .repeat(Repeat::Infinite { yoyo: true })
            .add(
                TweenSpec::to([T::A], Props::new().y(-2.0)).duration(2.0),
                Position::AfterPrevious,
            );
        assert!(close(tl.visual(T::A, 1.0).y, -1.0));
        assert!(close(tl.visual(T::A, 3.0).y, -1.0));
        assert!(close(tl.visual(T::A, 3.5).y, -0.5));
        assert!(close(tl.visual(T::A, 4.5).y, -0.5));
    }

    #[test]
    fn infinite_loop_wraps() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .repeat(Repeat::Infinite { yoyo: false })
            .add(
                TweenSpec::from_to([T::A], Props::new().x(0.0), Props::new().x(100.0))
                    .duration(10.0),
                Position::AfterPrevious,
            );
        assert!(close(tl.visual(T::A, 12.5).x, 25.0));
    }

    #[test]
    fn idle_to_steps_leave_layered_values_alone() {
        let tl = Timeline::new()
            .with_ease(Ease::Linear)
            .add(
                TweenSpec::to([T::A], Props::new().scale(1.05)).duration(1.0),
                Position::AfterPrevious,
            );
        let mut v = Visual {
            scale: 0.85,
            ..Visual::default()
        };
        tl.apply_to(T::A, 0.0, &mut v);
        assert!(close(v.scale, 0.85));
        tl.apply_to(T::A, 0.5, &mut v);
        assert!(close(v.scale, 1.025));
        assert!(tl.touches(T::A));
        assert!(!tl.touches(T::B));
    }
}
