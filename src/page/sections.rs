//! Per-element content widgets.
//!
//! Each element draws itself into an area the size of its (possibly scaled)
//! box, starting at the area's origin.  Text is pre-wrapped with
//! [`text::wrap`] at the same widths the layout measured with, so the rows
//! line up with the boxes [`super::layout`] computed.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Padding, Paragraph, Widget},
};

use crate::content::profile::{Profile, SkillGroup};
use crate::ui::theme::Theme;

use super::text;
use super::Element;

/// What an element needs to know beyond the profile.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub profile: &'a Profile,
    /// Testimonial currently in front.
    pub carousel_index: usize,
    pub year: i32,
}

/// Eyebrow and title of the fixed section headings.
pub fn heading_copy(element: Element) -> Option<(&'static str, &'static str)> {
    match element {
        Element::EducationHeading => Some(("Academic Foundation", "Educational Background")),
        Element::SkillsHeading => Some(("Technological Arsenal", "Mastering the Digital Edge.")),
        Element::ExperienceHeading => Some(("Proven Track Record", "Professional Journey")),
        Element::ProjectsHeading => Some(("Featured Work", "Case studies in performance.")),
        Element::TestimonialsIntro => Some(("Testimonials", "What People Say About Me")),
        _ => None,
    }
}

pub fn skill_items(group: &SkillGroup) -> String {
    group.items.join(" · ")
}

pub fn quoted(content: &str) -> String {
    format!("“{content}”")
}

/// One marquee period: the words repeated until at least `min_width`
/// columns wide.  The marquee draws two periods back to back and slides by
/// one period per loop, which is seamless.
pub fn marquee_half(words: &[String], min_width: usize) -> String {
    let unit: String = words.iter().map(|w| format!("{}   ✦   ", w.to_uppercase())).collect();
    let unit_width = text::width(&unit).max(1);
    let repeats = min_width.div_ceil(unit_width).max(1);
    unit.repeat(repeats)
}

/// Draw `element` into `area`.
pub fn draw(element: Element, ctx: &DrawContext<'_>, area: Rect, buf: &mut Buffer) {
    if area.width == 0 || area.height == 0 {
        return;
    }
    let p = ctx.profile;
    match element {
        Element::Section(_) => {}
        Element::HeroBackdrop => hero_backdrop(area, buf),
        Element::HeroLine(i) => {
            if let Some(line) = p.hero.lines.get(i) {
                let style = if i % 2 == 0 {
                    Theme::heading_style()
                } else {
                    Theme::heading_style().fg(Theme::PRIMARY)
                };
                centered(wrapped(line, area.width, style), area, buf);
            }
        }
        Element::HeroSubtitle => {
            let mut lines = vec![
                Line::styled(p.hero.tagline.to_uppercase(), Theme::accent_style()),
                Line::raw(""),
            ];
            lines.extend(wrapped(&p.hero.subtitle, area.width, Theme::body_style()));
            centered(lines, area, buf);
        }
        Element::AboutBlock => about(ctx, area, buf),
        Element::EducationHeading
        | Element::SkillsHeading
        | Element::ExperienceHeading
        | Element::ProjectsHeading
        | Element::TestimonialsIntro => heading(element, area, buf),
        Element::EducationCard(i) => {
            if let Some(e) = p.education.get(i) {
                let inner = card(area, buf, None);
                let mut lines = vec![Line::from(vec![
                    Span::styled(e.period.clone(), Theme::accent_style()),
                    Span::styled(format!("  ·  {}", e.location), Theme::faint_style()),
                ])];
                lines.extend(wrapped(&e.degree, inner.width, Theme::heading_style()));
                lines.push(Line::styled(e.institution.clone(), Theme::body_style()));
                if !e.details.is_empty() {
                    lines.push(Line::raw(""));
                    lines.extend(wrapped(&e.details, inner.width, Theme::body_style()));
                }
                Paragraph::new(lines).render(inner, buf);
            }
        }
        Element::SkillCard(i) => {
            if let Some(g) = p.skills.get(i) {
                let inner = card(area, buf, None);
                let mut lines = vec![
                    Line::styled(g.title.to_uppercase(), Theme::eyebrow_style()),
                    Line::raw(""),
                ];
                lines.extend(wrapped(&skill_items(g), inner.width, Theme::emphasis_style()));
                Paragraph::new(lines).render(inner, buf);
            }
        }
        Element::Marquee => {
            let half = marquee_half(&p.philosophy, area.width as usize / 2);
            Paragraph::new(Line::styled(half.repeat(2), Theme::faint_style())).render(area, buf);
        }
        Element::Job(i) => job(ctx, i, area, buf),
        Element::ProjectCard(i) => project(ctx, i, area, buf),
        Element::Testimonial(i) => testimonial(ctx, i, area, buf),
        Element::CarouselDots => {
            let spans: Vec<Span> = (0..p.testimonials.len())
                .map(|i| {
                    if i == ctx.carousel_index {
                        Span::styled("● ", Theme::accent_style())
                    } else {
                        Span::styled("○ ", Theme::faint_style())
                    }
                })
                .collect();
            centered(vec![Line::from(spans)], area, buf);
        }
        Element::Badge => {
            if let Some(badge) = &p.badge {
                let inner = card(area, buf, Some(Theme::PRIMARY));
                let lines = vec![
                    Line::styled(badge.value.clone(), Theme::heading_style().fg(Theme::PRIMARY)),
                    Line::styled(badge.label.to_uppercase(), Theme::faint_style()),
                ];
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(inner, buf);
            }
        }
        Element::ContactEyebrow => centered(
            vec![Line::styled(p.contact.eyebrow.to_uppercase(), Theme::eyebrow_style())],
            area,
            buf,
        ),
        Element::ContactHeading => centered(
            wrapped(&p.contact.heading, area.width, Theme::heading_style()),
            area,
            buf,
        ),
        Element::CtaButton => {
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Theme::accent_style());
            let inner = block.inner(area);
            block.render(area, buf);
            Paragraph::new(Line::styled(p.contact.cta.to_uppercase(), Theme::button_style()))
                .alignment(Alignment::Center)
                .render(inner, buf);
        }
        Element::ContactLinks => {
            let mut spans = Vec::new();
            for (i, link) in p.contact.links.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw("     "));
                }
                spans.push(Span::styled(link.label.to_uppercase(), Theme::body_style()));
            }
            centered(vec![Line::from(spans)], area, buf);
        }
        Element::Road => {
            let rule = "─".repeat(area.width as usize);
            let lines = vec![Line::raw(""), Line::styled(rule, Theme::faint_style())];
            Paragraph::new(lines).render(area, buf);
        }
        Element::Car => {
            let car = Line::from(vec![
                Span::styled("▗", Style::default().fg(Theme::GOLD)),
                Span::styled("▟██▙▄▖", Theme::accent_style()),
            ]);
            Paragraph::new(car).render(area, buf);
        }
        Element::Copyright => centered(
            vec![Line::styled(
                format!("© {} {} •", ctx.year, p.full_name().to_uppercase()),
                Theme::faint_style(),
            )],
            area,
            buf,
        ),
    }
}

// ─── Helpers ────────────────────────────────────────────────────────────────

fn wrapped(s: &str, width: u16, style: Style) -> Vec<Line<'static>> {
    text::wrap(s, width as usize)
        .into_iter()
        .map(|l| Line::styled(l, style))
        .collect()
}

fn centered(lines: Vec<Line<'static>>, area: Rect, buf: &mut Buffer) {
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Draw a card frame and return the padded area inside it.
fn card(area: Rect, buf: &mut Buffer, accent: Option<ratatui::style::Color>) -> Rect {
    let border = accent.map_or(Theme::card_border_style(), |c| Style::default().fg(c));
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(border)
        .padding(Padding::horizontal(1));
    let inner = block.inner(area);
    block.render(area, buf);
    inner
}

fn heading(element: Element, area: Rect, buf: &mut Buffer) {
    let Some((eyebrow, title)) = heading_copy(element) else {
        return;
    };
    let title_style = if element == Element::ProjectsHeading {
        Theme::body_style()
    } else {
        Theme::heading_style()
    };
    let mut lines = vec![Line::styled(eyebrow.to_uppercase(), Theme::eyebrow_style())];
    lines.extend(wrapped(title, area.width, title_style));
    Paragraph::new(lines).render(area, buf);
}

fn hero_backdrop(area: Rect, buf: &mut Buffer) {
    // Sparse dot grid with a brighter band through the middle.
    let mid = area.height / 2;
    for y in (0..area.height).step_by(3) {
        for x in (0..area.width).step_by(6) {
            let near = y.abs_diff(mid) <= area.height / 4;
            let style = if near {
                Style::default().fg(Theme::PRIMARY_DEEP)
            } else {
                Theme::faint_style()
            };
            buf[(area.x + x, area.y + y)].set_symbol("·").set_style(style);
        }
    }
    if area.height > 2 {
        let hint = Line::styled("SCROLL ↓", Theme::faint_style().add_modifier(Modifier::BOLD));
        let row = Rect::new(area.x, area.y + area.height - 2, area.width, 1);
        centered(vec![hint], row, buf);
    }
}

fn about(ctx: &DrawContext<'_>, area: Rect, buf: &mut Buffer) {
    let about = &ctx.profile.about;
    let mut lines = Vec::new();
    if !about.eyebrow.is_empty() {
        lines.push(Line::styled(about.eyebrow.to_uppercase(), Theme::eyebrow_style()));
        lines.push(Line::raw(""));
    }
    if !about.heading.is_empty() {
        lines.extend(wrapped(&about.heading, area.width, Theme::heading_style()));
        lines.push(Line::raw(""));
    }
    for p in &about.paragraphs {
        lines.extend(wrapped(p, area.width, Theme::body_style()));
        lines.push(Line::raw(""));
    }
    let text_rows = lines.len() as u16;
    Paragraph::new(lines).render(area, buf);

    let count = about.stats.len() as u16;
    if count == 0 || area.height <= text_rows {
        return;
    }
    let gap = 2;
    let width = area.width.saturating_sub(gap * (count - 1)) / count;
    for (i, stat) in about.stats.iter().enumerate() {
        let cell = Rect::new(
            area.x + i as u16 * (width + gap),
            area.y + text_rows,
            width,
            3.min(area.height - text_rows),
        );
        let inner = card(cell, buf, None);
        Paragraph::new(Line::from(vec![
            Span::styled(stat.value.clone(), Theme::heading_style().fg(Theme::PRIMARY)),
            Span::styled(format!("  {}", stat.label.to_uppercase()), Theme::faint_style()),
        ]))
        .render(inner, buf);
    }
}

fn job(ctx: &DrawContext<'_>, index: usize, area: Rect, buf: &mut Buffer) {
    let Some(j) = ctx.profile.experience.get(index) else {
        return;
    };
    let inner = card(area, buf, None);
    let mut lines = wrapped(&j.role, inner.width, Theme::heading_style());
    lines.push(Line::styled(
        format!("{}  ·  {}", j.company, j.location),
        Theme::accent_style(),
    ));
    lines.push(Line::styled(j.period.clone(), Theme::faint_style()));
    if !j.impact.is_empty() {
        lines.push(Line::raw(""));
        lines.extend(wrapped(&j.impact, inner.width, Theme::emphasis_style()));
    }
    if !j.highlights.is_empty() {
        lines.push(Line::raw(""));
        for h in &j.highlights {
            for (k, row) in text::wrap(h, inner.width.saturating_sub(2) as usize)
                .into_iter()
                .enumerate()
            {
                let bullet = if k == 0 { "▸ " } else { "  " };
                lines.push(Line::from(vec![
                    Span::styled(bullet, Theme::accent_style()),
                    Span::styled(row, Theme::body_style()),
                ]));
            }
        }
    }
    Paragraph::new(lines).render(inner, buf);
}

fn project(ctx: &DrawContext<'_>, index: usize, area: Rect, buf: &mut Buffer) {
    let Some(project) = ctx.profile.projects.get(index) else {
        return;
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::card_border_style())
        .padding(Padding::horizontal(1))
        .title_top(
            Line::styled(format!(" {:02} ", index + 1), Theme::faint_style()).right_aligned(),
        );
    let inner = block.inner(area);
    block.render(area, buf);

    let mut lines = vec![
        Line::styled(project.category.to_uppercase(), Theme::accent_style()),
        Line::raw(""),
    ];
    lines.extend(wrapped(&project.title, inner.width, Theme::heading_style()));
    lines.push(Line::raw(""));
    lines.extend(wrapped(&project.description, inner.width, Theme::body_style()));
    lines.push(Line::raw(""));
    lines.extend(wrapped(&project.tech.join(" · "), inner.width, Theme::emphasis_style()));
    let body_rows = lines.len() as u16;
    Paragraph::new(lines).render(inner, buf);

    // Stats and link hug the bottom of the card.
    let footer = vec![
        Line::from(
            project
                .stats
                .iter()
                .flat_map(|s| {
                    [
                        Span::styled(s.value.clone(), Theme::heading_style().fg(Theme::PRIMARY)),
                        Span::styled(format!(" {}   ", s.label), Theme::faint_style()),
                    ]
                })
                .collect::<Vec<_>>(),
        ),
        Line::styled(text::ellipsize(&project.url, inner.width as usize), Theme::faint_style()),
    ];
    if inner.height >= body_rows + 3 {
        let area = Rect::new(inner.x, inner.y + inner.height - 2, inner.width, 2);
        Paragraph::new(footer).render(area, buf);
    }
}

fn testimonial(ctx: &DrawContext<'_>, index: usize, area: Rect, buf: &mut Buffer) {
    let Some(t) = ctx.profile.testimonials.get(index) else {
        return;
    };
    let inner = card(area, buf, None);
    let stars = "★".repeat(t.rating as usize) + &"☆".repeat(5 - t.rating.min(5) as usize);
    let mut lines = vec![Line::styled(stars, Theme::star_style()), Line::raw("")];
    lines.extend(wrapped(
        &quoted(&t.content),
        inner.width,
        Theme::emphasis_style().add_modifier(Modifier::ITALIC),
    ));
    lines.push(Line::raw(""));
    lines.push(Line::styled(t.name.clone(), Theme::heading_style()));
    lines.push(Line::styled(t.role.clone(), Theme::body_style()));
    Paragraph::new(lines).render(inner, buf);
}
