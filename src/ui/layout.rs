//! Screen layout: the page viewport, the navigation bar laid over its first
//! row, and the status bar below it.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Widget,
};

use super::theme::Theme;
use crate::page::text;
use crate::page::Section;

/// Primary screen layout: page viewport and a bottom status bar.
pub struct AppLayout {
    pub page_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    pub fn from_area(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // page
                Constraint::Length(1), // status bar
            ])
            .split(area);

        Self {
            page_area: chunks[0],
            status_area: chunks[1],
        }
    }

    /// The navigation bar occupies the page's first row.
    pub fn nav_area(&self) -> Rect {
        Rect {
            height: self.page_area.height.min(1),
            ..self.page_area
        }
    }
}

// ───────────────────────────────────────── navbar ────────────

const NAV_GAP: u16 = 3;
const NAV_PAD: u16 = 2;

/// Screen columns of each navigation label in `area`, right-aligned.  Labels
/// that would run into the brand on the left are dropped, leftmost first.
pub fn nav_slots(area: Rect, brand_width: u16) -> Vec<(Section, Rect)> {
    let mut slots = Vec::new();
    let mut right = area.right().saturating_sub(NAV_PAD);
    let floor = area.x + NAV_PAD + brand_width + NAV_GAP;
    for &section in Section::NAV.iter().rev() {
        let w = text::width(section.label()) as u16;
        let Some(x) = right.checked_sub(w) else {
            break;
        };
        if x < floor {
            break;
        }
        slots.push((section, Rect::new(x, area.y, w, 1)));
        right = x.saturating_sub(NAV_GAP);
    }
    slots.reverse();
    slots
}

/// The navigation entry under a mouse click, if any.
pub fn nav_hit(area: Rect, brand_width: u16, column: u16, row: u16) -> Option<Section> {
    if row != area.y {
        return None;
    }
    nav_slots(area, brand_width)
        .into_iter()
        .find(|(_, r)| column >= r.x && column < r.right())
        .map(|(section, _)| section)
}

/// Brand plus section links, with the section in view highlighted.
pub struct Navbar<'a> {
    pub name: &'a str,
    pub accent: &'a str,
    pub active: Section,
}

impl Navbar<'_> {
    pub fn brand_width(name: &str, accent: &str) -> u16 {
        let accent = if accent.is_empty() { 0 } else { 1 + text::width(accent) };
        (text::width(name) + accent + 1) as u16
    }
}

impl Widget for Navbar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 {
            return;
        }
        let row = Rect { height: 1, ..area };
        buf.set_style(row, Style::default().bg(Theme::BACKGROUND));
        for x in row.left()..row.right() {
            buf[(x, row.y)].set_symbol(" ");
        }

        let mut brand = vec![Span::styled(self.name.to_uppercase(), Theme::heading_style())];
        if !self.accent.is_empty() {
            brand.push(Span::raw(" "));
            brand.push(Span::styled(self.accent.to_uppercase(), Theme::accent_style()));
        }
        brand.push(Span::styled(".", Theme::accent_style()));
        let brand_width = Self::brand_width(self.name, self.accent);
        let brand_area = Rect {
            x: row.x + NAV_PAD.min(row.width),
            width: row.width.saturating_sub(NAV_PAD),
            ..row
        };
        Line::from(brand).render(brand_area, buf);

        for (section, slot) in nav_slots(row, brand_width) {
            let style = if section == self.active {
                Theme::nav_active_style()
            } else {
                Theme::nav_style()
            };
            buf.set_string(slot.x, slot.y, section.label(), style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_bar_takes_the_last_row() {
        let l = AppLayout::from_area(Rect::new(0, 0, 80, 24));
        assert_eq!(l.page_area, Rect::new(0, 0, 80, 23));
        assert_eq!(l.status_area, Rect::new(0, 23, 80, 1));
        assert_eq!(l.nav_area(), Rect::new(0, 0, 80, 1));
    }

    #[test]
    fn nav_links_are_right_aligned_and_clickable() {
        let area = Rect::new(0, 0, 80, 1);
        let slots = nav_slots(area, 10);
        assert_eq!(slots.len(), Section::NAV.len());
        let (last, rect) = slots[slots.len() - 1];
        assert_eq!(last, Section::Contact);
        assert_eq!(rect.right(), 78);

        let (about, about_rect) = slots[1];
        assert_eq!(nav_hit(area, 10, about_rect.x, 0), Some(about));
        assert_eq!(nav_hit(area, 10, about_rect.x, 1), None);
        assert_eq!(nav_hit(area, 10, 0, 0), None);
    }

    #[test]
    fn narrow_bars_drop_links_before_the_brand() {
        let slots = nav_slots(Rect::new(0, 0, 40, 1), 12);
        assert!(slots.len() < Section::NAV.len());
        assert_eq!(slots.last().map(|s| s.0), Some(Section::Contact));
        assert!(slots.iter().all(|(_, r)| r.x >= 2 + 12 + 3));
    }

    #[test]
    fn active_link_is_highlighted() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        Navbar {
            name: "Kaif Ahmed",
            accent: "Sherdi",
            active: Section::Projects,
        }
        .render(area, &mut buf);

        let brand = Navbar::brand_width("Kaif Ahmed", "Sherdi");
        let slot = nav_slots(area, brand)
            .into_iter()
            .find(|(s, _)| *s == Section::Projects)
            .map(|(_, r)| r)
            .unwrap();
        assert_eq!(buf[(slot.x, 0)].symbol(), "P");
        assert_eq!(buf[(slot.x, 0)].fg, Theme::INK);
        assert_eq!(buf[(2, 0)].symbol(), "K");
    }
}
