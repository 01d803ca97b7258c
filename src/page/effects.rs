//! Every animation on the page, wired to one [`MotionContext`].
//!
//! Scroll-linked effects are triggers in the context's registry.  Effects
//! that run on the clock instead of the scroll position (the hero entrance,
//! the ambient loops, the testimonial carousel, pointer effects) are owned
//! here and layered over the registry's output in [`PageEffects::visual`].

use crate::content::Profile;
use crate::motion::carousel::Carousel;
use crate::motion::context::MotionContext;
use crate::motion::easing::Ease;
use crate::motion::magnetic::{Magnetic, Zone};
use crate::motion::props::{Props, Visual};
use crate::motion::timeline::{Position, Repeat, Timeline, TweenSpec};
use crate::motion::trigger::{
    EdgeError, ElementBox, PinState, Scrub, Trigger, TriggerHandle, TriggerRegistry, TriggerUpdate,
};
use crate::motion::tween::Tween;

use super::layout::{PageLayout, CAR_WIDTH};
use super::{Element, Section};

type Registry = TriggerRegistry<Element>;

const HOVER_LIFT: f64 = -1.0;
const HOVER_SECS: f64 = 0.7;

/// User-tunable effect settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectSettings {
    /// Fraction of the pointer's distance from the button centre the button
    /// follows.
    pub magnetic_strength: f64,
    /// Seconds each testimonial stays in front.
    pub carousel_interval: f64,
}

impl Default for EffectSettings {
    fn default() -> Self {
        Self {
            magnetic_strength: 0.4,
            carousel_interval: 5.0,
        }
    }
}

pub struct PageEffects {
    mounted_at: f64,
    intro: Timeline<Element>,
    ambient: Vec<Timeline<Element>>,
    carousel: Carousel,
    magnetic: Magnetic,
    hover: Vec<Tween>,
    hovered: Option<usize>,
    gallery: Option<TriggerHandle>,
    gallery_pinned: bool,
    card_triggers: Vec<TriggerHandle>,
    torn_down: bool,
}

impl PageEffects {
    /// Mount the page's effects onto `ctx` at clock time `now`.
    pub fn mount(
        ctx: &MotionContext<Element>,
        layout: &PageLayout,
        profile: &Profile,
        settings: EffectSettings,
        now: f64,
    ) -> Result<Self, EdgeError> {
        ctx.scroll().borrow_mut().set_limit(layout.limit());

        let mut effects = Self {
            mounted_at: now,
            intro: intro_timeline(profile.hero.lines.len()),
            ambient: ambient_timelines(layout),
            carousel: Carousel::mount(profile.testimonials.len(), settings.carousel_interval, now),
            magnetic: Magnetic::new(Zone::default(), settings.magnetic_strength),
            hover: vec![Tween::settled(0.0); profile.projects.len()],
            hovered: None,
            gallery: None,
            gallery_pinned: false,
            card_triggers: Vec::new(),
            torn_down: false,
        };

        let mut reg = ctx.triggers().borrow_mut();
        sync_boxes(&mut reg, layout);
        register_scroll_effects(&mut reg, profile)?;
        effects.gallery = reg.register(
            Trigger::new(Element::Section(Section::Projects), "top top", "bottom top")?
                .tag("pin")
                .scrub(Scrub::Lag(1.0))
                .pin(layout.gallery().pin.content_width)
                .on_update({
                    let mut was_active = false;
                    move |update: &TriggerUpdate| {
                        if update.active != was_active {
                            was_active = update.active;
                            tracing::debug!(
                                active = update.active,
                                progress = update.progress,
                                playhead = update.playhead,
                                "gallery pin range crossed"
                            );
                        }
                    }
                }),
        );
        effects.gallery_pinned = layout.gallery().pin.is_pinnable();
        effects.card_triggers =
            register_cards(&mut reg, effects.gallery_pin(), profile.projects.len())?;
        tracing::debug!(triggers = reg.len(), "page effects mounted");
        Ok(effects)
    }

    /// Apply a new layout after a resize.  Playback state survives.
    pub fn relayout(
        &mut self,
        ctx: &MotionContext<Element>,
        layout: &PageLayout,
        profile: &Profile,
    ) -> Result<(), EdgeError> {
        ctx.scroll().borrow_mut().set_limit(layout.limit());
        self.ambient = ambient_timelines(layout);

        let mut reg = ctx.triggers().borrow_mut();
        sync_boxes(&mut reg, layout);
        if let Some(gallery) = self.gallery {
            reg.set_pin_width(gallery, layout.gallery().pin.content_width);
        }
        let pinned = layout.gallery().pin.is_pinnable();
        if pinned != self.gallery_pinned {
            for handle in self.card_triggers.drain(..) {
                reg.unregister(handle);
            }
            self.gallery_pinned = pinned;
            self.card_triggers =
                register_cards(&mut reg, self.gallery_pin(), profile.projects.len())?;
        }
        // Pin geometry is read for drawing and hit-testing before the next frame.
        reg.refresh();
        tracing::debug!(pinned, "page effects relaid out");
        Ok(())
    }

    /// The gallery trigger, when its strip actually scrolls.
    fn gallery_pin(&self) -> Option<TriggerHandle> {
        self.gallery.filter(|_| self.gallery_pinned)
    }

    pub fn set_settings(&mut self, settings: EffectSettings, now: f64) {
        self.magnetic.set_strength(settings.magnetic_strength);
        self.carousel.set_period(settings.carousel_interval, now);
    }

    /// Clock-driven work for one frame.  Returns `true` when the carousel
    /// moved on.
    pub fn tick(&mut self, now: f64) -> bool {
        self.carousel.tick(now)
    }

    pub fn carousel_index(&self) -> usize {
        self.carousel.current()
    }

    /// Current pin state of the project gallery.
    pub fn pin_state(&self, reg: &Registry) -> Option<PinState> {
        self.gallery.and_then(|h| reg.pin_state(h))
    }

    /// The resolved visual of `element` at clock time `now`.
    pub fn visual(&self, element: Element, reg: &Registry, now: f64) -> Visual {
        let mut v = reg.visual(element);
        let local = now - self.mounted_at;
        if self.intro.touches(element) {
            self.intro.apply_to(element, local, &mut v);
        }
        for timeline in self.ambient.iter().filter(|t| t.touches(element)) {
            timeline.apply_to(element, local, &mut v);
        }
        match element {
            Element::Testimonial(i) => v = self.carousel.visual(i, now),
            Element::CtaButton => {
                let (dx, dy) = self.magnetic.offset(now);
                v.x += dx;
                v.y += dy;
            }
            Element::ProjectCard(i) => {
                if let Some(lift) = self.hover.get(i) {
                    v.y += lift.sample(now);
                }
            }
            _ => {}
        }
        v
    }

    /// Feed a pointer position in screen cells.
    pub fn on_pointer(
        &mut self,
        layout: &PageLayout,
        pin: Option<PinState>,
        offset: f64,
        x: f64,
        y: f64,
        now: f64,
    ) {
        if self.torn_down {
            return;
        }
        if let Some(button) = layout.get(Element::CtaButton) {
            let b = layout.screen_box(button, offset, pin);
            self.magnetic.set_zone(Zone {
                x: b.left,
                y: b.top,
                width: b.width,
                height: b.height,
            });
            self.magnetic.on_pointer(x, y, now);
        }

        let hit = (0..self.hover.len()).find(|&i| {
            layout
                .get(Element::ProjectCard(i))
                .is_some_and(|p| contains(layout.screen_box(p, offset, pin), x, y))
        });
        self.set_hovered(hit, now);
    }

    /// The pointer left the terminal or stopped reporting.
    pub fn on_pointer_leave(&mut self, now: f64) {
        if self.torn_down {
            return;
        }
        self.magnetic.on_leave(now);
        self.set_hovered(None, now);
    }

    fn set_hovered(&mut self, hit: Option<usize>, now: f64) {
        if self.torn_down || hit == self.hovered {
            return;
        }
        if let Some(tween) = self.hovered.and_then(|i| self.hover.get_mut(i)) {
            tween.retarget(now, 0.0, HOVER_SECS, Ease::Power2Out);
        }
        if let Some(tween) = hit.and_then(|i| self.hover.get_mut(i)) {
            tween.retarget(now, HOVER_LIFT, HOVER_SECS, Ease::Power2Out);
        }
        self.hovered = hit;
    }

    #[cfg(test)]
    pub fn hovered_card(&self) -> Option<usize> {
        self.hovered
    }

    /// Stop the carousel and pointer effects and drop any hover lift.
    /// Idempotent.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.carousel.destroy();
        self.magnetic.destroy();
        self.hover.iter_mut().for_each(|t| *t = Tween::settled(0.0));
        self.hovered = None;
        self.torn_down = true;
    }
}

fn contains(b: ElementBox, x: f64, y: f64) -> bool {
    x >= b.left && x < b.left + b.width && y >= b.top && y < b.top + b.height
}

/// Mount every placed element in the registry.
fn sync_boxes(reg: &mut Registry, layout: &PageLayout) {
    let vp = layout.viewport();
    reg.set_viewport(vp.width, vp.height);
    for placed in layout.elements() {
        reg.set_element_box(placed.element, layout.trigger_box(placed));
    }
}

// ─── Timelines ──────────────────────────────────────────────────────────────

/// The hero entrance: title lines rise out of their masks one after the
/// other, the subtitle fades up as they settle, the backdrop eases in
/// underneath from the very start.
fn intro_timeline(lines: usize) -> Timeline<Element> {
    Timeline::new()
        .with_ease(Ease::ExpoOut)
        .add(
            TweenSpec::from_to(
                (0..lines).map(Element::HeroLine),
                Props::new().y_percent(100.0),
                Props::new().y_percent(0.0),
            )
            .duration(1.8)
            .stagger(0.1)
            .delay(0.5),
            Position::AfterPrevious,
        )
        .add(
            TweenSpec::from([Element::HeroSubtitle], Props::new().opacity(0.0).y(2.0))
                .duration(1.2),
            Position::Relative(-1.0),
        )
        .add(
            TweenSpec::from([Element::HeroBackdrop], Props::new().scale(1.1).opacity(0.0))
                .duration(2.0),
            Position::At(0.0),
        )
}

/// Endless loops: the philosophy marquee, the floating badge and the car.
fn ambient_timelines(layout: &PageLayout) -> Vec<Timeline<Element>> {
    let width = layout.viewport().width;
    vec![
        Timeline::new()
            .add(
                TweenSpec::to([Element::Marquee], Props::new().x_percent(-50.0))
                    .duration(25.0)
                    .ease(Ease::Linear),
                Position::AfterPrevious,
            )
            .repeat(Repeat::Infinite { yoyo: false }),
        Timeline::new()
            .add(
                TweenSpec::to([Element::Badge], Props::new().y(-1.0))
                    .duration(2.0)
                    .ease(Ease::SineInOut),
                Position::AfterPrevious,
            )
            .repeat(Repeat::Infinite { yoyo: true }),
        Timeline::new()
            .add(
                TweenSpec::from_to(
                    [Element::Car],
                    Props::new().x(-CAR_WIDTH),
                    Props::new().x(width),
                )
                .duration(15.0)
                    .ease(Ease::Linear),
                Position::AfterPrevious,
            )
            .repeat(Repeat::Infinite { yoyo: false }),
    ]
}

// ─── Triggers ───────────────────────────────────────────────────────────────

/// A one-shot entrance that plays when the element's top comes within
/// three rows of the viewport bottom.
fn reveal(
    element: Element,
    from: Props,
    duration: f64,
    delay: f64,
    ease: Ease,
) -> Result<Trigger<Element>, EdgeError> {
    Ok(Trigger::new(element, "top bottom-=3", "bottom top")?
        .tag("reveal")
        .toggle(true)
        .animate(Timeline::new().add(
            TweenSpec::from([element], from)
                .duration(duration)
                .delay(delay)
                .ease(ease),
            Position::AfterPrevious,
        )))
}

fn register_scroll_effects(reg: &mut Registry, profile: &Profile) -> Result<(), EdgeError> {
    reg.register(
        Trigger::new(Element::Section(Section::Hero), "top top", "bottom top")?
            .tag("parallax")
            .scrub(Scrub::Instant)
            .animate(Timeline::new().add(
                TweenSpec::to([Element::HeroBackdrop], Props::new().y_percent(20.0))
                    .ease(Ease::Linear),
                Position::AfterPrevious,
            )),
    );

    let rise = |rows: f64| Props::new().opacity(0.0).y(rows);
    reg.register(reveal(Element::AboutBlock, rise(3.0), 1.0, 0.0, Ease::CircOut)?);
    reg.register(reveal(Element::EducationHeading, rise(2.0), 0.8, 0.0, Ease::Power2Out)?);
    for i in 0..profile.education.len() {
        let from = Props::new().opacity(0.0).scale(0.95);
        let delay = 0.1 * i as f64;
        reg.register(reveal(Element::EducationCard(i), from, 0.8, delay, Ease::Power2Out)?);
    }
    reg.register(reveal(Element::SkillsHeading, rise(3.0), 0.8, 0.0, Ease::Power2Out)?);
    for i in 0..profile.skills.len() {
        let delay = 0.1 * i as f64;
        reg.register(reveal(Element::SkillCard(i), rise(3.0), 0.8, delay, Ease::Power2Out)?);
    }
    let slide = |cols: f64| Props::new().opacity(0.0).x(cols);
    reg.register(reveal(Element::ExperienceHeading, slide(-3.0), 0.8, 0.0, Ease::Power2Out)?);
    for i in 0..profile.experience.len() {
        reg.register(reveal(Element::Job(i), rise(3.0), 0.8, 0.0, Ease::CircOut)?);
    }
    reg.register(reveal(Element::TestimonialsIntro, slide(-6.0), 0.8, 0.0, Ease::Power2Out)?);
    let fade_in = Props::new().opacity(0.0);
    reg.register(reveal(Element::ContactEyebrow, fade_in, 0.8, 0.0, Ease::Power2Out)?);
    Ok(())
}

/// Project card effects.  Inside a scrolling strip each card has an
/// entrance, a focus swell while centred and a fade once it has passed;
/// when the strip fits on screen the cards simply reveal like the rest of
/// the page.
fn register_cards(
    reg: &mut Registry,
    strip: Option<TriggerHandle>,
    count: usize,
) -> Result<Vec<TriggerHandle>, EdgeError> {
    let mut handles = Vec::new();
    for i in 0..count {
        let card = Element::ProjectCard(i);
        let Some(strip) = strip else {
            let from = Props::new().opacity(0.0).scale(0.85);
            handles.extend(reg.register(reveal(card, from, 1.4, 0.1 * i as f64, Ease::Power3Out)?));
            continue;
        };
        let triggers = [
            Trigger::new(card, "left 90%", "left 50%")?
                .tag("enter")
                .scrub(Scrub::Lag(1.5))
                .animate(Timeline::new().add(
                    TweenSpec::from_to(
                        [card],
                        Props::new().x(30.0).opacity(0.0).scale(0.85),
                        Props::new().x(0.0).opacity(1.0).scale(1.0),
                    )
                    .duration(1.4)
                    .ease(Ease::Power3Out),
                    Position::AfterPrevious,
                )),
            Trigger::new(card, "center 60%", "center 40%")?
                .tag("focus")
                .scrub(Scrub::Lag(2.0))
                .animate(Timeline::new().add(
                    TweenSpec::to([card], Props::new().scale(1.05)).ease(Ease::Power2Out),
                    Position::AfterPrevious,
                )),
            Trigger::new(card, "right 40%", "right 20%")?
                .tag("fade")
                .scrub(Scrub::Lag(1.5))
                .animate(Timeline::new().add(
                    TweenSpec::to([card], Props::new().opacity(0.4).scale(0.92))
                        .ease(Ease::Power2Out),
                    Position::AfterPrevious,
                )),
        ];
        for trigger in triggers {
            handles.extend(reg.register(trigger.in_container(strip)));
        }
    }
    Ok(handles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::scroll::ScrollConfig;
    use crate::motion::trigger::Viewport;
    use std::time::Duration;

    struct Harness {
        ctx: MotionContext<Element>,
        layout: PageLayout,
        profile: Profile,
        effects: PageEffects,
        ms: u64,
    }

    impl Harness {
        fn new(width: f64, height: f64) -> Self {
            let profile = Profile::builtin().unwrap();
            let viewport = Viewport { width, height };
            let layout = PageLayout::compute(&profile, viewport);
            let ctx = MotionContext::new(ScrollConfig::default(), viewport);
            let effects =
                PageEffects::mount(&ctx, &layout, &profile, EffectSettings::default(), 0.0)
                    .unwrap();
            Self {
                ctx,
                layout,
                profile,
                effects,
                ms: 0,
            }
        }

        /// Run frames at 60 fps for `secs`.
        fn run(&mut self, secs: f64) {
            let frames = (secs * 60.0).round() as u64;
            for _ in 0..frames {
                self.ms += 16;
                self.ctx.frame_at(Duration::from_millis(self.ms));
                let now = self.ctx.now();
                self.effects.tick(now);
            }
        }

        fn jump(&mut self, offset: f64) {
            self.ctx.scroll().borrow_mut().jump_to(offset);
        }

        fn visual(&self, element: Element) -> Visual {
            let reg = self.ctx.triggers().borrow();
            self.effects.visual(element, &reg, self.ctx.now())
        }

        fn pin(&self) -> Option<PinState> {
            let reg = self.ctx.triggers().borrow();
            self.effects.pin_state(&reg)
        }
    }

    #[test]
    fn hero_lines_rise_out_of_their_masks() {
        let mut h = Harness::new(100.0, 30.0);
        h.run(0.1);
        assert_eq!(h.visual(Element::HeroLine(0)).y_percent, 100.0);
        assert_eq!(h.visual(Element::HeroSubtitle).opacity, 0.0);
        h.run(2.7);
        assert_eq!(h.visual(Element::HeroLine(0)).y_percent, 0.0);
        assert_eq!(h.visual(Element::HeroLine(1)).y_percent, 0.0);
        assert_eq!(h.visual(Element::HeroSubtitle).opacity, 1.0);
    }

    #[test]
    fn reveals_play_once() {
        let mut h = Harness::new(100.0, 30.0);
        h.run(0.1);
        assert_eq!(h.visual(Element::AboutBlock).opacity, 0.0);

        let about = h.layout.section_top(Section::About).unwrap();
        h.jump(about);
        h.run(1.5);
        assert_eq!(h.visual(Element::AboutBlock).opacity, 1.0);

        h.jump(0.0);
        h.run(1.5);
        assert_eq!(h.visual(Element::AboutBlock).opacity, 1.0);
    }

    #[test]
    fn parallax_follows_the_hero_out() {
        let mut h = Harness::new(100.0, 30.0);
        h.run(2.5);
        h.jump(15.0);
        h.run(0.05);
        let v = h.visual(Element::HeroBackdrop);
        assert!((v.y_percent - 10.0).abs() < 1e-9, "{v:?}");
        assert_eq!(v.opacity, 1.0);
    }

    #[test]
    fn gallery_pins_and_slides_the_strip() {
        let mut h = Harness::new(100.0, 30.0);
        let g = h.layout.gallery();
        h.jump(g.top + g.distance() / 2.0);
        h.run(4.0);
        let pin = h.pin().unwrap();
        assert!(pin.engaged);
        assert!((pin.horizontal_offset + g.distance() / 2.0).abs() < 0.01, "{pin:?}");

        // The first card has scrolled past: focus is over, fade has begun.
        let first = h.visual(Element::ProjectCard(0));
        assert!(first.opacity < 1.0, "{first:?}");
    }

    #[test]
    fn wide_viewport_reveals_cards_without_pinning() {
        let mut h = Harness::new(400.0, 40.0);
        assert!(h.pin().is_none());
        let g = h.layout.gallery();
        h.jump(g.top);
        h.run(2.0);
        for i in 0..3 {
            assert_eq!(h.visual(Element::ProjectCard(i)).opacity, 1.0);
        }
    }

    #[test]
    fn relayout_switches_card_effects_with_pinnability() {
        let mut h = Harness::new(100.0, 30.0);
        let before = h.ctx.triggers().borrow().len();
        let wide = PageLayout::compute(
            &h.profile,
            Viewport {
                width: 400.0,
                height: 30.0,
            },
        );
        h.effects.relayout(&h.ctx, &wide, &h.profile).unwrap();
        // Three scroll-linked triggers per card become one reveal each.
        assert_eq!(h.ctx.triggers().borrow().len(), before - 6);
        assert!(h.pin().is_none());

        let narrow = PageLayout::compute(
            &h.profile,
            Viewport {
                width: 100.0,
                height: 30.0,
            },
        );
        h.effects.relayout(&h.ctx, &narrow, &h.profile).unwrap();
        assert_eq!(h.ctx.triggers().borrow().len(), before);
        assert!(h.pin().is_some());
    }

    #[test]
    fn magnetic_button_follows_the_pointer() {
        let mut h = Harness::new(100.0, 30.0);
        let offset = h.layout.limit();
        h.jump(offset);
        h.run(0.05);
        let button = h.layout.screen_box(h.layout.get(Element::CtaButton).unwrap(), offset, None);
        let (cx, cy) = (button.left + button.width / 2.0, button.top + button.height / 2.0);

        let now = h.ctx.now();
        h.effects.on_pointer(&h.layout, None, offset, cx + 5.0, cy, now);
        let v = h.visual(Element::CtaButton);
        assert!((v.x - 2.0).abs() < 1e-9, "{v:?}");

        h.effects.on_pointer_leave(now);
        h.run(1.1);
        let v = h.visual(Element::CtaButton);
        assert_eq!((v.x, v.y), (0.0, 0.0));
    }

    #[test]
    fn hovering_a_card_lifts_it() {
        let mut h = Harness::new(100.0, 30.0);
        let g = h.layout.gallery();
        h.jump(g.top);
        h.run(3.0);
        let pin = h.pin();
        let card = h.layout.screen_box(h.layout.get(Element::ProjectCard(0)).unwrap(), g.top, pin);

        let now = h.ctx.now();
        h.effects.on_pointer(&h.layout, pin, g.top, card.left + 1.0, card.top + 1.0, now);
        assert_eq!(h.effects.hovered_card(), Some(0));
        let rest = h.visual(Element::ProjectCard(0)).y;
        h.run(1.0);
        let lifted = h.visual(Element::ProjectCard(0)).y;
        assert!((lifted - rest - HOVER_LIFT).abs() < 1e-9, "{rest} -> {lifted}");
    }

    #[test]
    fn pointer_is_ignored_after_teardown() {
        let mut h = Harness::new(100.0, 30.0);
        let g = h.layout.gallery();
        h.jump(g.top);
        h.run(3.0);
        let pin = h.pin();
        let card = h.layout.screen_box(h.layout.get(Element::ProjectCard(0)).unwrap(), g.top, pin);
        let now = h.ctx.now();
        h.effects.on_pointer(&h.layout, pin, g.top, card.left + 1.0, card.top + 1.0, now);
        assert_eq!(h.effects.hovered_card(), Some(0));

        h.effects.teardown();
        h.effects.teardown();
        assert_eq!(h.effects.hovered_card(), None);
        let lift = h.effects.hover[0].sample(now + 1.0);
        assert_eq!(lift, 0.0);

        h.effects.on_pointer(&h.layout, pin, g.top, card.left + 1.0, card.top + 1.0, now);
        assert_eq!(h.effects.hovered_card(), None);
        assert_eq!(h.effects.hover[0].sample(now + 1.0), 0.0);
    }

    #[test]
    fn carousel_rotates_on_its_interval() {
        let mut h = Harness::new(100.0, 30.0);
        h.effects.set_settings(
            EffectSettings {
                carousel_interval: 1.0,
                ..EffectSettings::default()
            },
            h.ctx.now(),
        );
        assert_eq!(h.effects.carousel_index(), 0);
        h.run(1.1);
        assert_eq!(h.effects.carousel_index(), 1);
        let visible = (0..6)
            .filter(|&i| h.visual(Element::Testimonial(i)).opacity > 0.0)
            .count();
        assert!(visible <= 2);
    }
}
