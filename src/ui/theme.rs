//! Colour palette and text styles used across the UI.
//!
//! Page colours are true-colour so that faded elements can be blended toward
//! the background channel by channel.

use ratatui::style::{Color, Modifier, Style};

/// Central theme.  Change colours here and they propagate everywhere.
pub struct Theme;

impl Theme {
    pub const PRIMARY: Color = Color::Rgb(118, 176, 171);
    pub const PRIMARY_DEEP: Color = Color::Rgb(90, 141, 137);
    pub const INK: Color = Color::Rgb(236, 236, 236);
    pub const MUTED: Color = Color::Rgb(128, 128, 128);
    pub const FAINT: Color = Color::Rgb(64, 64, 64);
    pub const GOLD: Color = Color::Rgb(250, 204, 21);
    /// Faded elements blend toward this.
    pub const BACKGROUND: Color = Color::Rgb(0, 0, 0);

    // ── page ───────────────────────────────────────────────────
    pub fn eyebrow_style() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn heading_style() -> Style {
        Style::default().fg(Self::INK).add_modifier(Modifier::BOLD)
    }

    pub fn body_style() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn emphasis_style() -> Style {
        Style::default().fg(Self::INK)
    }

    pub fn accent_style() -> Style {
        Style::default().fg(Self::PRIMARY)
    }

    pub fn faint_style() -> Style {
        Style::default().fg(Self::FAINT)
    }

    pub fn card_border_style() -> Style {
        Style::default().fg(Self::FAINT)
    }

    pub fn star_style() -> Style {
        Style::default().fg(Self::GOLD)
    }

    pub fn button_style() -> Style {
        Style::default()
            .fg(Self::INK)
            .add_modifier(Modifier::BOLD)
    }

    // ── chrome ─────────────────────────────────────────────────
    pub fn border_style() -> Style {
        Style::default().fg(Color::DarkGray)
    }

    pub fn title_style() -> Style {
        Style::default()
            .fg(Self::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected_style() -> Style {
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD)
    }

    pub fn nav_style() -> Style {
        Style::default().fg(Self::MUTED)
    }

    pub fn nav_active_style() -> Style {
        Style::default()
            .fg(Self::INK)
            .add_modifier(Modifier::BOLD)
    }

    pub fn status_bar_style() -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }
}
