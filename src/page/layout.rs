//! Page layout: every element's box for one viewport size.
//!
//! Sections stack top to bottom in page rows.  The project gallery is the
//! exception: it occupies one viewport of height, but the page reserves as
//! many extra rows after it as its strip is wider than the viewport, so the
//! scroll distance spent pinned lines up with what follows.
//!
//! Elements live on one of three layers:
//!
//! * [`Layer::Page`] boxes are in page coordinates.
//! * [`Layer::Pinned`] boxes are relative to the gallery's top and are
//!   drawn wherever the gallery currently sits on screen.
//! * [`Layer::Strip`] boxes are in strip coordinates and additionally slide
//!   with the gallery's horizontal offset.

use crate::content::profile::{About, Education, Job, Profile, SkillGroup, Testimonial};
use crate::motion::pin::Pin;
use crate::motion::trigger::{ElementBox, PinState, Viewport};

use super::sections::{self, heading_copy};
use super::text;
use super::{Element, Section};

/// Blank rows above and below a section's content.
const PAD: f64 = 3.0;
/// Rows between stacked blocks.
const GAP: f64 = 1.0;
/// Columns a bordered card loses to its border and padding.
pub const CARD_INSET: usize = 4;
const CONTENT_MAX: f64 = 100.0;
const GRID_GAP: f64 = 2.0;
const STAT_ROWS: f64 = 3.0;

const STRIP_CARD_MAX: f64 = 48.0;
const STRIP_GAP: f64 = 4.0;

pub const CAR_WIDTH: f64 = 7.0;
const BADGE_WIDTH: f64 = 14.0;
const BADGE_HEIGHT: f64 = 4.0;
const TESTIMONIAL_MAX: f64 = 72.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Page,
    Pinned,
    Strip,
}

/// One element and where it rests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placed {
    pub element: Element,
    pub bx: ElementBox,
    pub layer: Layer,
}

/// The pinned horizontal project gallery.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gallery {
    /// Page row the gallery starts at.
    pub top: f64,
    pub height: f64,
    pub pin: Pin,
}

impl Gallery {
    /// Extra rows reserved after the gallery while it is pinned.
    pub fn distance(&self) -> f64 {
        self.pin.distance()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    section: Section,
    top: f64,
    /// Rows the section takes on the page, pin spacing included.
    height: f64,
}

#[derive(Debug, Clone)]
pub struct PageLayout {
    viewport: Viewport,
    placed: Vec<Placed>,
    spans: Vec<Span>,
    gallery: Gallery,
    height: f64,
}

impl PageLayout {
    pub fn compute(profile: &Profile, viewport: Viewport) -> Self {
        let width = viewport.width.max(1.0).floor();
        let height = viewport.height.max(1.0).floor();
        let col_width = if width > 24.0 {
            (width - 4.0).min(CONTENT_MAX)
        } else {
            width
        };
        let mut b = Builder {
            profile,
            width,
            height,
            col_left: ((width - col_width) / 2.0).floor(),
            col_width,
            cursor: 0.0,
            placed: Vec::new(),
            spans: Vec::new(),
            gallery: None,
        };

        b.section(Section::Hero, Builder::hero);
        b.section(Section::About, Builder::about);
        b.section(Section::Education, Builder::education);
        b.section(Section::Skills, Builder::skills);
        b.section(Section::Experience, Builder::experience);
        b.section(Section::Projects, Builder::projects);
        b.section(Section::Testimonials, Builder::testimonials);
        b.section(Section::Contact, Builder::contact);

        let gallery = b.gallery.unwrap_or(Gallery {
            top: 0.0,
            height: 0.0,
            pin: Pin::new(0.0, width),
        });
        tracing::debug!(
            width,
            height,
            page_rows = b.cursor,
            pin_distance = gallery.distance(),
            "layout computed"
        );
        Self {
            viewport: Viewport { width, height },
            placed: b.placed,
            spans: b.spans,
            gallery,
            height: b.cursor,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Total page rows.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Largest scroll offset.
    pub fn limit(&self) -> f64 {
        (self.height - self.viewport.height).max(0.0)
    }

    /// Every element in draw order.
    pub fn elements(&self) -> &[Placed] {
        &self.placed
    }

    pub fn get(&self, element: Element) -> Option<&Placed> {
        self.placed.iter().find(|p| p.element == element)
    }

    pub fn section_top(&self, section: Section) -> Option<f64> {
        self.spans.iter().find(|s| s.section == section).map(|s| s.top)
    }

    /// The section a reader at `offset` is looking at: the last one whose
    /// top is above the upper third of the viewport.
    pub fn section_at(&self, offset: f64) -> Section {
        let probe = offset + self.viewport.height / 3.0;
        self.spans
            .iter()
            .take_while(|s| s.top <= probe)
            .last()
            .map_or(Section::Hero, |s| s.section)
    }

    pub fn gallery(&self) -> Gallery {
        self.gallery
    }

    /// The box a trigger measures.  Rows are always page rows; strip
    /// elements keep their strip columns for container triggers.
    pub fn trigger_box(&self, placed: &Placed) -> ElementBox {
        match placed.layer {
            Layer::Page => placed.bx,
            Layer::Pinned | Layer::Strip => ElementBox {
                top: placed.bx.top + self.gallery.top,
                ..placed.bx
            },
        }
    }

    /// Screen row of the gallery's top at `offset`.
    pub fn pinned_top(&self, offset: f64, pin: Option<PinState>) -> f64 {
        match pin {
            Some(p) if p.engaged => 0.0,
            Some(p) if offset > p.start + p.distance => self.gallery.top + p.distance - offset,
            _ => self.gallery.top - offset,
        }
    }

    /// Where `placed` rests on screen at `offset`, before any animation.
    pub fn screen_box(&self, placed: &Placed, offset: f64, pin: Option<PinState>) -> ElementBox {
        match placed.layer {
            Layer::Page => ElementBox {
                top: placed.bx.top - offset,
                ..placed.bx
            },
            Layer::Pinned => ElementBox {
                top: self.pinned_top(offset, pin) + placed.bx.top,
                ..placed.bx
            },
            Layer::Strip => ElementBox {
                top: self.pinned_top(offset, pin) + placed.bx.top,
                left: placed.bx.left + pin.map_or(0.0, |p| p.horizontal_offset),
                ..placed.bx
            },
        }
    }
}

// ─── Block heights ──────────────────────────────────────────────────────────

fn rows(s: &str, width: f64) -> f64 {
    text::height(s, width.max(1.0) as usize) as f64
}

fn inner(width: f64) -> f64 {
    (width - CARD_INSET as f64).max(1.0)
}

/// Eyebrow plus title.
pub fn heading_height(element: Element, width: f64) -> f64 {
    heading_copy(element).map_or(0.0, |(_, title)| 1.0 + rows(title, width))
}

pub fn about_height(about: &About, width: f64) -> f64 {
    let mut h = 0.0;
    if !about.eyebrow.is_empty() {
        h += 2.0;
    }
    if !about.heading.is_empty() {
        h += rows(&about.heading, width) + 1.0;
    }
    for p in &about.paragraphs {
        h += rows(p, width) + 1.0;
    }
    if !about.stats.is_empty() {
        h += STAT_ROWS;
    }
    f64::max(h, 1.0)
}

pub fn education_card_height(e: &Education, width: f64) -> f64 {
    let w = inner(width);
    let mut h = 2.0 + 1.0 + rows(&e.degree, w) + 1.0;
    if !e.details.is_empty() {
        h += 1.0 + rows(&e.details, w);
    }
    h
}

pub fn skill_card_height(g: &SkillGroup, width: f64) -> f64 {
    2.0 + 2.0 + rows(&sections::skill_items(g), inner(width))
}

pub fn job_card_height(j: &Job, width: f64) -> f64 {
    let w = inner(width);
    let mut h = 2.0 + rows(&j.role, w) + 2.0;
    if !j.impact.is_empty() {
        h += 1.0 + rows(&j.impact, w);
    }
    if !j.highlights.is_empty() {
        h += 1.0;
        for line in &j.highlights {
            h += rows(line, w - 2.0);
        }
    }
    h
}

pub fn testimonial_card_height(t: &Testimonial, width: f64) -> f64 {
    2.0 + 2.0 + rows(&sections::quoted(&t.content), inner(width)) + 3.0
}

// ─── Builder ────────────────────────────────────────────────────────────────

struct Builder<'a> {
    profile: &'a Profile,
    width: f64,
    height: f64,
    col_left: f64,
    col_width: f64,
    /// Page row where the next section starts.
    cursor: f64,
    placed: Vec<Placed>,
    spans: Vec<Span>,
    gallery: Option<Gallery>,
}

impl Builder<'_> {
    fn place(
        &mut self,
        element: Element,
        layer: Layer,
        left: f64,
        top: f64,
        width: f64,
        height: f64,
    ) {
        self.placed.push(Placed {
            element,
            bx: ElementBox {
                left,
                top,
                width,
                height,
            },
            layer,
        });
    }

    /// Place a content-column block and return the row below it.
    fn column(&mut self, element: Element, top: f64, height: f64) -> f64 {
        self.place(element, Layer::Page, self.col_left, top, self.col_width, height);
        top + height
    }

    /// Lay out one section.  `build` gets the section's top row and returns
    /// its own box height and the rows it takes on the page.
    fn section(&mut self, section: Section, build: fn(&mut Self, f64) -> (f64, f64)) {
        let top = self.cursor;
        let index = self.placed.len();
        let (height, footprint) = build(self, top);
        self.placed.insert(
            index,
            Placed {
                element: Element::Section(section),
                bx: ElementBox {
                    left: 0.0,
                    top,
                    width: self.width,
                    height,
                },
                layer: Layer::Page,
            },
        );
        self.spans.push(Span {
            section,
            top,
            height: footprint,
        });
        self.cursor = top + footprint;
    }

    fn hero(&mut self, top: f64) -> (f64, f64) {
        let profile = self.profile;
        let hero = &profile.hero;
        let height = self.height;
        self.place(Element::HeroBackdrop, Layer::Page, 0.0, top, self.width, height);

        let line_rows: Vec<f64> = hero.lines.iter().map(|l| rows(l, self.col_width)).collect();
        let sub_width = self.col_width.min(64.0);
        let sub_rows = if hero.subtitle.is_empty() && hero.tagline.is_empty() {
            0.0
        } else {
            2.0 + rows(&hero.subtitle, sub_width)
        };
        let sub_block = if sub_rows > 0.0 { GAP + sub_rows } else { 0.0 };
        let block = line_rows.iter().sum::<f64>() + sub_block;

        // Row 0 belongs to the navigation bar.
        let mut y = top + ((height - block) / 2.0).floor().max(1.0);
        for (i, h) in line_rows.into_iter().enumerate() {
            y = self.column(Element::HeroLine(i), y, h);
        }
        if sub_rows > 0.0 {
            let left = self.col_left + ((self.col_width - sub_width) / 2.0).floor();
            self.place(Element::HeroSubtitle, Layer::Page, left, y + GAP, sub_width, sub_rows);
        }
        (height, height)
    }

    fn about(&mut self, top: f64) -> (f64, f64) {
        let h = about_height(&self.profile.about, self.col_width);
        let bottom = self.column(Element::AboutBlock, top + PAD, h);
        let height = bottom + PAD - top;
        (height, height)
    }

    fn education(&mut self, top: f64) -> (f64, f64) {
        let hh = heading_height(Element::EducationHeading, self.col_width);
        let mut y = self.column(Element::EducationHeading, top + PAD, hh) + GAP;
        let profile = self.profile;
        for (i, e) in profile.education.iter().enumerate() {
            let h = education_card_height(e, self.col_width);
            y = self.column(Element::EducationCard(i), y, h) + GAP;
        }
        let height = y - GAP + PAD - top;
        (height, height)
    }

    fn skills(&mut self, top: f64) -> (f64, f64) {
        let hh = heading_height(Element::SkillsHeading, self.col_width);
        let mut y = self.column(Element::SkillsHeading, top + PAD, hh) + GAP;

        let profile = self.profile;
        let count = profile.skills.len();
        if count > 0 {
            let cols = if self.col_width >= 72.0 { count.min(3) } else { 1 };
            let gaps = GRID_GAP * (cols - 1) as f64;
            let card_width = ((self.col_width - gaps) / cols as f64).floor();
            for row_start in (0..count).step_by(cols) {
                let row_end = (row_start + cols).min(count);
                let row_height = profile.skills[row_start..row_end]
                    .iter()
                    .map(|g| skill_card_height(g, card_width))
                    .fold(0.0, f64::max);
                for i in row_start..row_end {
                    let left = self.col_left + (i - row_start) as f64 * (card_width + GRID_GAP);
                    self.place(Element::SkillCard(i), Layer::Page, left, y, card_width, row_height);
                }
                y += row_height + GAP;
            }
        }

        if !profile.philosophy.is_empty() {
            let half = sections::marquee_half(&profile.philosophy, self.width as usize);
            let span = 2.0 * text::width(&half) as f64;
            self.place(Element::Marquee, Layer::Page, 0.0, y + GAP, span, 1.0);
            y += GAP + 1.0 + GAP;
        }
        let height = y - GAP + PAD - top;
        (height, height)
    }

    fn experience(&mut self, top: f64) -> (f64, f64) {
        let hh = heading_height(Element::ExperienceHeading, self.col_width);
        let mut y = self.column(Element::ExperienceHeading, top + PAD, hh) + GAP;
        let profile = self.profile;
        for (i, j) in profile.experience.iter().enumerate() {
            let h = job_card_height(j, self.col_width);
            y = self.column(Element::Job(i), y, h) + GAP;
        }
        let height = y - GAP + PAD - top;
        (height, height)
    }

    fn projects(&mut self, top: f64) -> (f64, f64) {
        let height = self.height;
        let pad_left = (self.width / 10.0).floor();
        let pad_right = (self.width * 3.0 / 10.0).floor();

        let text_width = (self.width - 2.0 * pad_left).max(1.0);
        let hh = heading_height(Element::ProjectsHeading, text_width);
        self.place(Element::ProjectsHeading, Layer::Pinned, pad_left, 1.0, text_width, hh);

        let count = self.profile.projects.len();
        let card_width = STRIP_CARD_MAX.min((self.width * 0.7).floor()).max(1.0);
        let card_top = 1.0 + hh + GAP;
        let card_height = (height - card_top - 1.0).max(6.0);
        for i in 0..count {
            let left = pad_left + i as f64 * (card_width + STRIP_GAP);
            let card = Element::ProjectCard(i);
            self.place(card, Layer::Strip, left, card_top, card_width, card_height);
        }

        let content_width = pad_left
            + count as f64 * card_width
            + count.saturating_sub(1) as f64 * STRIP_GAP
            + pad_right;
        let gallery = Gallery {
            top,
            height,
            pin: Pin::new(content_width, self.width),
        };
        self.gallery = Some(gallery);
        (height, height + gallery.distance())
    }

    fn testimonials(&mut self, top: f64) -> (f64, f64) {
        let hh = heading_height(Element::TestimonialsIntro, self.col_width);
        let mut y = self.column(Element::TestimonialsIntro, top + PAD, hh) + GAP;

        let profile = self.profile;
        let list = &profile.testimonials;
        if !list.is_empty() {
            let card_width = self.col_width.min(TESTIMONIAL_MAX);
            let left = self.col_left + ((self.col_width - card_width) / 2.0).floor();
            let card_height = list
                .iter()
                .map(|t| testimonial_card_height(t, card_width))
                .fold(0.0, f64::max);
            for i in 0..list.len() {
                self.place(Element::Testimonial(i), Layer::Page, left, y, card_width, card_height);
            }
            if profile.badge.is_some() {
                let badge_left = (left + card_width - BADGE_WIDTH / 2.0)
                    .min(self.width - BADGE_WIDTH)
                    .max(0.0);
                let badge_top = y + card_height - BADGE_HEIGHT / 2.0;
                self.place(
                    Element::Badge,
                    Layer::Page,
                    badge_left,
                    badge_top,
                    BADGE_WIDTH,
                    BADGE_HEIGHT,
                );
            }
            y += card_height + GAP + 1.0;
            y = self.column(Element::CarouselDots, y, 1.0) + GAP;
        }
        let height = y - GAP + PAD - top;
        (height, height)
    }

    fn contact(&mut self, top: f64) -> (f64, f64) {
        let profile = self.profile;
        let contact = &profile.contact;
        let heading_rows = rows(&contact.heading, self.col_width);
        // eyebrow, gap, heading, gap, button, 2, links, 2, road, gap, copyright
        let content = 1.0 + GAP + heading_rows + GAP + 3.0 + 2.0 + 1.0 + 2.0 + 2.0 + GAP + 1.0;
        let height = self.height.max(content + 2.0 * PAD);
        let mut y = top + ((height - content) / 2.0).floor();

        y = self.column(Element::ContactEyebrow, y, 1.0) + GAP;
        y = self.column(Element::ContactHeading, y, heading_rows) + GAP;

        let button_width = (text::width(&contact.cta) as f64 + 10.0).min(self.col_width);
        let button_left = ((self.width - button_width) / 2.0).floor();
        self.place(Element::CtaButton, Layer::Page, button_left, y, button_width, 3.0);
        y += 3.0 + 2.0;

        y = self.column(Element::ContactLinks, y, 1.0) + 2.0;

        self.place(Element::Road, Layer::Page, 0.0, y, self.width, 2.0);
        self.place(Element::Car, Layer::Page, 0.0, y, CAR_WIDTH, 1.0);
        y += 2.0 + GAP;

        self.column(Element::Copyright, y, 1.0);
        (height, height)
    }
}
