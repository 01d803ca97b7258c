//! Input handling: maps key/mouse events to state mutations.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::{Action, KeyBind};
use crate::motion::scroll::ScrollInput;
use crate::page::{Element, Section};
use crate::ui::layout::{nav_hit, AppLayout, Navbar};

use super::settings::SETTINGS_ITEMS;
use super::state::{ActiveView, AppState};

/// Rows moved per wheel notch before the configured multiplier.
const WHEEL_ROWS: f64 = 3.0;
/// Rows moved per arrow key press.
const KEY_ROWS: f64 = 3.0;

/// Total selectable rows in the controls submenu (actions + "Reset").
pub fn controls_item_count() -> usize {
    Action::ALL.len() + 1
}

/// Process a key event, dispatching based on the active view.
pub fn handle_key(state: &mut AppState, key: KeyEvent) {
    // Ctrl+c always quits, regardless of view.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        state.should_quit = true;
        return;
    }

    match state.active_view {
        ActiveView::Page => handle_page_key(state, key),
        ActiveView::SettingsMenu => handle_settings_key(state, key),
        ActiveView::ControlsSubmenu if state.awaiting_rebind => handle_rebind_key(state, key),
        ActiveView::ControlsSubmenu => handle_controls_key(state, key),
    }
}

// ── Page (configurable bindings) ────────────────────────────────

fn handle_page_key(state: &mut AppState, key: KeyEvent) {
    state.status_message = None;

    let Some(action) = state.config.match_key(key) else {
        // Digits jump straight to the navigation entries.
        if let KeyCode::Char(c @ '1'..='9') = key.code {
            let index = c as usize - '1' as usize;
            if let Some(&section) = Section::NAV.get(index) {
                state.scroll_to_section(section);
            }
        }
        return;
    };
    if handle_page_action(state, action) {
        return;
    }

    let step = (state.layout.viewport().height - 2.0).max(1.0);
    let mut scroll = state.motion.scroll().borrow_mut();
    match action {
        Action::ScrollUp => scroll.scroll_by(-KEY_ROWS),
        Action::ScrollDown => scroll.scroll_by(KEY_ROWS),
        Action::PageUp => scroll.scroll_by(-step),
        Action::PageDown => scroll.scroll_by(step),
        Action::Top => scroll.scroll_to(0.0),
        Action::Bottom => {
            let limit = scroll.state().limit;
            scroll.scroll_to(limit);
        }
        Action::NextSection | Action::PrevSection | Action::OpenSettings | Action::Quit => {}
    }
}

/// Actions that do not move the scroll target directly.  Returns `false`
/// for the rest.
fn handle_page_action(state: &mut AppState, action: Action) -> bool {
    match action {
        Action::NextSection => state.step_section(1),
        Action::PrevSection => state.step_section(-1),
        Action::OpenSettings => {
            state.active_view = ActiveView::SettingsMenu;
            state.settings_selected = 0;
        }
        Action::Quit => state.should_quit = true,
        _ => return false,
    }
    true
}

// ── Settings menu (hardcoded keys) ──────────────────────────────

fn handle_settings_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') => {
            state.active_view = ActiveView::Page;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.settings_selected = state.settings_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.settings_selected + 1 < SETTINGS_ITEMS.len() {
                state.settings_selected += 1;
            }
        }
        KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            if let Some(item) = SETTINGS_ITEMS.get(state.settings_selected) {
                item.activate(state);
                if state.active_view == ActiveView::ControlsSubmenu {
                    state.controls_selected = 0;
                }
            }
        }
        _ => {}
    }
}

// ── Controls submenu (hardcoded navigation, interactive rebinding) ──

fn handle_controls_key(state: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            state.active_view = ActiveView::Page;
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.active_view = ActiveView::SettingsMenu;
        }
        KeyCode::Up | KeyCode::Char('k') => {
            state.controls_selected = state.controls_selected.saturating_sub(1);
        }
        KeyCode::Down | KeyCode::Char('j') => {
            if state.controls_selected + 1 < controls_item_count() {
                state.controls_selected += 1;
            }
        }
        KeyCode::Enter => match Action::ALL.get(state.controls_selected) {
            Some(_) => state.awaiting_rebind = true,
            None => {
                state.config.reset_defaults();
                state.save_config();
                state.status_message = Some("Key bindings reset".into());
            }
        },
        KeyCode::Delete | KeyCode::Backspace => {
            if let Some(&action) = Action::ALL.get(state.controls_selected) {
                state.config.clear_bindings(action);
                state.save_config();
            }
        }
        _ => {}
    }
}

/// Capture the next key press as a new binding.
fn handle_rebind_key(state: &mut AppState, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        state.awaiting_rebind = false;
        return;
    }
    // Ctrl+c stays reserved for quitting.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return;
    }
    let Some(&action) = Action::ALL.get(state.controls_selected) else {
        state.awaiting_rebind = false;
        return;
    };
    state.config.add_binding(action, KeyBind::from_key_event(key));
    state.save_config();
    state.awaiting_rebind = false;
}

// ── Mouse ───────────────────────────────────────────────────────

pub fn handle_mouse(state: &mut AppState, mouse: MouseEvent) {
    if state.active_view != ActiveView::Page {
        return;
    }
    let layout = AppLayout::from_area(state.terminal_area);
    let page = layout.page_area;

    match mouse.kind {
        MouseEventKind::ScrollDown => scroll_input(state, ScrollInput::Wheel(WHEEL_ROWS)),
        MouseEventKind::ScrollUp => scroll_input(state, ScrollInput::Wheel(-WHEEL_ROWS)),
        MouseEventKind::Down(MouseButton::Left) => {
            let brand = Navbar::brand_width(&state.profile.name, &state.profile.accent_name);
            if let Some(section) = nav_hit(layout.nav_area(), brand, mouse.column, mouse.row) {
                state.scroll_to_section(section);
                return;
            }
            if hits_element(state, page, Element::CtaButton, mouse.column, mouse.row) {
                let contact = &state.profile.contact;
                state.status_message = Some(format!("{} → {}", contact.cta, contact.cta_url));
                return;
            }
            state.drag_row = Some(mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(previous) = state.drag_row.replace(mouse.row) {
                // Dragging content upward moves the page down.
                let delta = previous as f64 - mouse.row as f64;
                if delta != 0.0 {
                    scroll_input(state, ScrollInput::Touch(delta));
                }
            }
            pointer(state, page, mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            state.drag_row = None;
        }
        MouseEventKind::Moved => pointer(state, page, mouse.column, mouse.row),
        _ => {}
    }
}

/// The pointer left the terminal.
pub fn handle_focus_lost(state: &mut AppState) {
    state.drag_row = None;
    let now = state.motion.now();
    state.effects.on_pointer_leave(now);
}

pub fn handle_resize(
    state: &mut AppState,
    width: u16,
    height: u16,
) -> Result<(), crate::motion::trigger::EdgeError> {
    state.resize(Rect::new(0, 0, width, height))
}

fn scroll_input(state: &mut AppState, input: ScrollInput) {
    state.status_message = None;
    state.motion.scroll().borrow_mut().on_input(input);
}

fn pointer(state: &mut AppState, page: Rect, column: u16, row: u16) {
    if column < page.x || row < page.y || column >= page.right() || row >= page.bottom() {
        let now = state.motion.now();
        state.effects.on_pointer_leave(now);
        return;
    }
    let (x, y) = ((column - page.x) as f64, (row - page.y) as f64);
    let now = state.motion.now();
    let offset = state.offset();
    let pin = state.effects.pin_state(&state.motion.triggers().borrow());
    state.effects.on_pointer(&state.layout, pin, offset, x, y, now);
}

fn hits_element(state: &AppState, page: Rect, element: Element, column: u16, row: u16) -> bool {
    let Some(placed) = state.layout.get(element) else {
        return false;
    };
    let pin = state.effects.pin_state(&state.motion.triggers().borrow());
    let b = state.layout.screen_box(placed, state.offset(), pin);
    let (x, y) = (column as f64 - page.x as f64, row as f64 - page.y as f64);
    x >= b.left && x < b.left + b.width && y >= b.top && y < b.top + b.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::content::Profile;

    fn state() -> AppState {
        let mut config = AppConfig::default();
        config.motion.smooth_scroll = false;
        AppState::new(Profile::builtin().unwrap(), config, Rect::new(0, 0, 100, 31), 2026).unwrap()
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn raw(state: &AppState) -> f64 {
        state.motion.scroll_state().raw_offset
    }

    #[test]
    fn bound_keys_scroll_the_page() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('j')));
        assert_eq!(raw(&s), KEY_ROWS);
        handle_key(&mut s, press(KeyCode::PageDown));
        assert_eq!(raw(&s), KEY_ROWS + 28.0);
        handle_key(&mut s, press(KeyCode::End));
        assert_eq!(raw(&s), s.layout.limit());
        handle_key(&mut s, press(KeyCode::Home));
        assert_eq!(raw(&s), 0.0);
    }

    #[test]
    fn digits_jump_to_navigation_entries() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('3')));
        assert_eq!(Some(raw(&s)), s.layout.section_top(Section::NAV[2]));
    }

    #[test]
    fn wheel_and_drag_feed_the_driver() {
        let mut s = state();
        handle_mouse(&mut s, mouse(MouseEventKind::ScrollDown, 10, 10));
        assert_eq!(raw(&s), WHEEL_ROWS);

        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), 10, 20));
        handle_mouse(&mut s, mouse(MouseEventKind::Drag(MouseButton::Left), 10, 18));
        let touch = s.config.motion.touch_multiplier;
        assert_eq!(raw(&s), WHEEL_ROWS + 2.0 * touch);
        handle_mouse(&mut s, mouse(MouseEventKind::Up(MouseButton::Left), 10, 18));
        assert_eq!(s.drag_row, None);
    }

    #[test]
    fn clicking_a_nav_link_scrolls_to_its_section() {
        let mut s = state();
        let area = AppLayout::from_area(s.terminal_area).nav_area();
        let brand = Navbar::brand_width(&s.profile.name, &s.profile.accent_name);
        let (section, slot) = crate::ui::layout::nav_slots(area, brand)
            .into_iter()
            .find(|(sec, _)| *sec == Section::Contact)
            .unwrap();
        handle_mouse(&mut s, mouse(MouseEventKind::Down(MouseButton::Left), slot.x, slot.y));
        assert_eq!(Some(raw(&s)), s.layout.section_top(section).map(|t| t.min(s.layout.limit())));
        assert_eq!(s.drag_row, None);
    }

    #[test]
    fn settings_popup_cycles_and_applies() {
        let mut s = state();
        handle_key(&mut s, press(KeyCode::Char('?')));
        assert_eq!(s.active_view, ActiveView::SettingsMenu);
        // Smooth scrolling is the second entry.
        handle_key(&mut s, press(KeyCode::Down));
        handle_key(&mut s, press(KeyCode::Enter));
        assert!(s.config.motion.smooth_scroll);
        assert!(s.motion.scroll().borrow().config().smooth);
        handle_key(&mut s, press(KeyCode::Esc));
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn rebinding_through_the_controls_popup() {
        let mut s = state();
        s.active_view = ActiveView::SettingsMenu;
        handle_key(&mut s, press(KeyCode::Enter));
        assert_eq!(s.active_view, ActiveView::ControlsSubmenu);

        // First action is ScrollUp.
        handle_key(&mut s, press(KeyCode::Enter));
        assert!(s.awaiting_rebind);
        handle_key(&mut s, press(KeyCode::Char('w')));
        assert!(!s.awaiting_rebind);
        assert_eq!(s.config.match_key(press(KeyCode::Char('w'))), Some(Action::ScrollUp));

        handle_key(&mut s, press(KeyCode::Char('q')));
        assert_eq!(s.active_view, ActiveView::Page);
    }

    #[test]
    fn ctrl_c_always_quits() {
        let mut s = state();
        s.active_view = ActiveView::ControlsSubmenu;
        s.awaiting_rebind = true;
        handle_key(&mut s, KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(s.should_quit);
    }
}
