//! Popup overlay widgets for the settings menu and controls submenu.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Widget},
};

use super::theme::Theme;
use crate::app::settings::SETTINGS_ITEMS;
use crate::app::state::AppState;
use crate::config::{Action, AppConfig};

// ───────────────────────────────────────── settings popup ────

pub struct SettingsPopup<'a> {
    pub selected: usize,
    pub state: &'a AppState,
}

impl Widget for SettingsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = SETTINGS_ITEMS.len() as u16 + 6;
        let popup = centered_fixed(46, height, area);
        let inner = frame(" Settings ", popup, buf);

        let mut lines = vec![Line::raw("")];
        for (i, item) in SETTINGS_ITEMS.iter().enumerate() {
            let selected = i == self.selected;
            let prefix = if selected { " ▸ " } else { "   " };
            let label = format!("{prefix}{:<24}", item.label());
            let mut spans = vec![Span::styled(label, row_style(selected))];
            match item.value(self.state) {
                Some(value) => {
                    let style = match value.as_str() {
                        "ON" => Style::default().fg(Color::Green),
                        "OFF" | "off" => Style::default().fg(Color::DarkGray),
                        _ => Style::default().fg(Color::Yellow),
                    };
                    spans.push(Span::styled(format!("[{value}]"), style));
                }
                None => spans.push(Span::styled("›", Theme::faint_style())),
            }
            lines.push(Line::from(spans));
        }
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "  Enter/Space: change  Esc: close",
            Style::default().fg(Color::DarkGray),
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── controls popup ────

/// Key binding editor.
pub struct ControlsPopup<'a> {
    pub config: &'a AppConfig,
    pub selected: usize,
    pub awaiting_rebind: bool,
}

impl Widget for ControlsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Actions, reset row, two spacers, hint and borders.
        let height = Action::ALL.len() as u16 + 7;
        let popup = centered_fixed(52, height, area);
        let inner = frame(" Controls ", popup, buf);

        let mut lines = vec![Line::raw("")];
        for (i, &action) in Action::ALL.iter().enumerate() {
            let selected = i == self.selected;
            let waiting = selected && self.awaiting_rebind;
            let prefix = if selected { " ▸ " } else { "   " };
            let keys = if waiting {
                "Press a key…".to_string()
            } else {
                self.config.display_bindings(action)
            };

            let mut key_style = Style::default().fg(Color::Yellow);
            if selected {
                key_style = key_style.bg(Color::DarkGray);
            }
            if waiting {
                key_style = key_style.add_modifier(Modifier::BOLD);
            }

            let label = format!("{prefix}{:<22}", action.label());
            let keys_width = (inner.width as usize).saturating_sub(label.chars().count()).max(1);
            lines.push(Line::from(vec![
                Span::styled(label, row_style(selected)),
                Span::styled(format!("{keys:>keys_width$}"), key_style),
            ]));
        }

        let reset_selected = self.selected == Action::ALL.len();
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            format!("{}⟳ Reset to defaults", if reset_selected { " ▸ " } else { "   " }),
            row_style(reset_selected),
        ));
        lines.push(Line::raw(""));
        lines.push(Line::styled(
            "  Enter: add key  Del: clear  Esc: back",
            Style::default().fg(Color::DarkGray),
        ));

        Paragraph::new(lines).render(inner, buf);
    }
}

// ───────────────────────────────────────── helpers ───────────

/// Clear `popup`, draw the titled border and return the inner area.
fn frame(title: &str, popup: Rect, buf: &mut Buffer) -> Rect {
    Clear.render(popup, buf);
    let block = Block::default()
        .title(title)
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Theme::border_style());
    let inner = block.inner(popup);
    block.render(popup, buf);
    inner
}

fn row_style(selected: bool) -> Style {
    if selected {
        Theme::selected_style().fg(Color::White)
    } else {
        Style::default().fg(Color::White)
    }
}

/// A centred rectangle of fixed size, clamped to `area`.
fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}
