//! The page widget: composites every visible element for one frame.

use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use crate::content::Profile;
use crate::motion::trigger::{ElementBox, TriggerRegistry};
use crate::ui::compose;

use super::effects::PageEffects;
use super::layout::PageLayout;
use super::sections::{self, DrawContext};
use super::Element;

pub struct PageView<'a> {
    pub layout: &'a PageLayout,
    pub effects: &'a PageEffects,
    pub registry: &'a TriggerRegistry<Element>,
    pub profile: &'a Profile,
    /// Scroll offset of this frame.
    pub offset: f64,
    /// Clock time of this frame.
    pub now: f64,
    pub year: i32,
}

impl Widget for PageView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let pin = self.effects.pin_state(self.registry);
        let ctx = DrawContext {
            profile: self.profile,
            carousel_index: self.effects.carousel_index(),
            year: self.year,
        };
        // Animated offsets never exceed one viewport, so anything further
        // away than that cannot reach the screen.
        let margin = area.height as f64;

        for placed in self.layout.elements() {
            if matches!(placed.element, Element::Section(_)) {
                continue;
            }
            let rest = self.layout.screen_box(placed, self.offset, pin);
            let rest = ElementBox {
                left: rest.left + area.x as f64,
                top: rest.top + area.y as f64,
                ..rest
            };
            if rest.top > area.bottom() as f64 + margin
                || rest.top + rest.height < area.y as f64 - margin
            {
                continue;
            }

            let visual = self.effects.visual(placed.element, self.registry, self.now);
            let Some(p) = compose::place(rest, &visual) else {
                continue;
            };
            if p.x >= area.right() as i32
                || p.y >= area.bottom() as i32
                || p.x + p.width as i32 <= area.x as i32
                || p.y + p.height as i32 <= area.y as i32
            {
                continue;
            }

            let clip = if placed.element.is_masked() {
                compose::clip_rect(rest, area)
            } else {
                area
            };
            let element = placed.element;
            let src = compose::render_offscreen(p.width, p.height, |a, b| {
                sections::draw(element, &ctx, a, b);
            });
            compose::blit(&src, buf, p.x, p.y, clip, visual.opacity);
        }
    }
}
