//! The portfolio page: what is on it, where it sits and how it moves.
//!
//! * [`layout`] places every element in page coordinates for a viewport.
//! * [`effects`] registers the scroll triggers and owns the time-driven
//!   animations (hero reveal, ambient loops, carousel, pointer effects).
//! * [`sections`] draws each element's content into a buffer.
//! * [`view`] composites the visible elements for one frame.

pub mod effects;
pub mod layout;
pub mod sections;
pub mod text;
pub mod view;

pub use effects::{EffectSettings, PageEffects};
pub use layout::PageLayout;
pub use view::PageView;

/// Top-level page sections, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Section {
    Hero,
    About,
    Education,
    Skills,
    Experience,
    Projects,
    Testimonials,
    Contact,
}

impl Section {
    pub const ALL: &'static [Section] = &[
        Section::Hero,
        Section::About,
        Section::Education,
        Section::Skills,
        Section::Experience,
        Section::Projects,
        Section::Testimonials,
        Section::Contact,
    ];

    /// Sections reachable from the navigation bar, in bar order.
    pub const NAV: &'static [Section] = &[
        Section::Hero,
        Section::About,
        Section::Projects,
        Section::Experience,
        Section::Contact,
    ];

    /// Navigation label.
    pub fn label(self) -> &'static str {
        match self {
            Section::Hero => "Home",
            Section::About => "About",
            Section::Education => "Education",
            Section::Skills => "Skills",
            Section::Experience => "Experience",
            Section::Projects => "Projects",
            Section::Testimonials => "Testimonials",
            Section::Contact => "Contact",
        }
    }
}

/// Everything that can be placed, animated and drawn.
///
/// Indexed variants refer to the matching entry of the profile list
/// (`HeroLine(0)` is the first hero line, `ProjectCard(2)` the third project).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Element {
    /// A whole section; used as a trigger anchor and for its backdrop.
    Section(Section),

    HeroBackdrop,
    HeroLine(usize),
    HeroSubtitle,

    AboutBlock,

    EducationHeading,
    EducationCard(usize),

    SkillsHeading,
    SkillCard(usize),
    Marquee,

    ExperienceHeading,
    Job(usize),

    ProjectsHeading,
    ProjectCard(usize),

    TestimonialsIntro,
    Testimonial(usize),
    CarouselDots,
    Badge,

    ContactEyebrow,
    ContactHeading,
    CtaButton,
    ContactLinks,
    Road,
    Car,
    Copyright,
}

impl Element {
    /// Elements whose content is clipped to their resting box, so sliding
    /// them reveals them from behind an edge.
    pub fn is_masked(self) -> bool {
        matches!(self, Element::HeroLine(_))
    }
}
