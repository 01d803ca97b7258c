//! Central application state.
//!
//! All mutable state lives here so that the rest of the app can be pure
//! functions over `&AppState` (rendering) or `&mut AppState` (event handling).

use std::cell::Cell;
use std::rc::Rc;

use ratatui::layout::Rect;

use crate::config::AppConfig;
use crate::content::Profile;
use crate::motion::context::MotionContext;
use crate::motion::emitter::Subscription;
use crate::motion::trigger::{EdgeError, Viewport};
use crate::page::{Element, PageEffects, PageLayout, Section};
use crate::ui::layout::AppLayout;

/// Which view / overlay is currently active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Page,
    SettingsMenu,
    ControlsSubmenu,
}

pub struct AppState {
    pub profile: Profile,
    pub motion: MotionContext<Element>,
    pub layout: PageLayout,
    pub effects: PageEffects,
    /// User-configurable keybindings and motion settings.
    pub config: AppConfig,
    pub should_quit: bool,
    pub status_message: Option<String>,
    pub active_view: ActiveView,
    pub settings_selected: usize,
    pub controls_selected: usize,
    /// The controls submenu is waiting for a key to bind to
    /// `controls_selected`.
    pub awaiting_rebind: bool,
    /// Row of the previous drag event, for touch emulation.
    pub drag_row: Option<u16>,
    /// Year shown in the footer.
    pub year: i32,
    /// Full terminal area as of the last draw or resize.
    pub terminal_area: Rect,
    /// Direction of the last published scroll frame.
    scroll_direction: Rc<Cell<i8>>,
    scroll_sub: Subscription,
}

/// The page viewport inside a terminal of size `area`.
pub fn page_viewport(area: Rect) -> Viewport {
    let page = AppLayout::from_area(area).page_area;
    Viewport {
        width: page.width as f64,
        height: page.height as f64,
    }
}

impl AppState {
    /// Lay the page out for a terminal of size `area` and mount its effects.
    pub fn new(
        profile: Profile,
        config: AppConfig,
        area: Rect,
        year: i32,
    ) -> Result<Self, EdgeError> {
        let viewport = page_viewport(area);
        let motion = MotionContext::new(config.motion.scroll_config(), viewport);
        let layout = PageLayout::compute(&profile, viewport);
        let settings = config.motion.effect_settings();
        let effects = PageEffects::mount(&motion, &layout, &profile, settings, motion.now())?;
        let scroll_direction = Rc::new(Cell::new(0));
        let scroll_sub = {
            let direction = Rc::clone(&scroll_direction);
            motion.on_scroll(move |state| direction.set(state.direction()))
        };
        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            page_height = layout.height(),
            "page mounted"
        );
        Ok(Self {
            profile,
            motion,
            layout,
            effects,
            config,
            should_quit: false,
            status_message: None,
            active_view: ActiveView::default(),
            settings_selected: 0,
            controls_selected: 0,
            awaiting_rebind: false,
            drag_row: None,
            year,
            terminal_area: area,
            scroll_direction,
            scroll_sub,
        })
    }

    /// Re-lay the page out for a new terminal size.  Scroll position,
    /// playback state and trigger handles all survive.
    pub fn resize(&mut self, area: Rect) -> Result<(), EdgeError> {
        self.terminal_area = area;
        let viewport = page_viewport(area);
        if viewport == self.layout.viewport() {
            return Ok(());
        }
        self.layout = PageLayout::compute(&self.profile, viewport);
        self.effects.relayout(&self.motion, &self.layout, &self.profile)?;
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            page_height = self.layout.height(),
            "layout refreshed"
        );
        Ok(())
    }

    /// Push the configured motion settings into the live motion objects.
    pub fn apply_motion_settings(&mut self) {
        let now = self.motion.now();
        self.motion
            .scroll()
            .borrow_mut()
            .set_config(self.config.motion.scroll_config());
        self.effects.set_settings(self.config.motion.effect_settings(), now);
    }

    /// Persist the config, reporting failures in the status bar.
    pub fn save_config(&mut self) {
        if let Err(e) = self.config.save() {
            tracing::warn!(error = %e, "config save failed");
            self.status_message = Some(format!("Could not save settings: {e}"));
        }
    }

    /// Advance the motion context one frame at wall-clock time.
    pub fn frame(&mut self) {
        self.motion.frame();
        let now = self.motion.now();
        self.effects.tick(now);
    }

    /// Scroll offset the page is drawn at.
    pub fn offset(&self) -> f64 {
        self.motion.scroll_state().virtual_offset
    }

    /// 1 while the page moves down, -1 while it moves up, 0 at rest.
    pub fn scroll_direction(&self) -> i8 {
        self.scroll_direction.get()
    }

    /// The section under the upper third of the viewport, judged from where
    /// the page is heading.
    pub fn active_section(&self) -> Section {
        self.layout.section_at(self.motion.scroll_state().raw_offset)
    }

    pub fn scroll_to_section(&mut self, section: Section) {
        if let Some(top) = self.layout.section_top(section) {
            self.motion.scroll().borrow_mut().scroll_to(top);
        }
    }

    /// Next (`step = 1`) or previous (`step = -1`) section from the one in
    /// view.
    pub fn step_section(&mut self, step: isize) {
        let current = self.active_section();
        let Some(i) = Section::ALL.iter().position(|&s| s == current) else {
            return;
        };
        let target = i as isize + step;
        if let Some(&section) = usize::try_from(target).ok().and_then(|t| Section::ALL.get(t)) {
            self.scroll_to_section(section);
        }
    }

    /// Stop every animation and release every listener.  Idempotent.
    pub fn teardown(&mut self) {
        self.scroll_sub.cancel();
        self.effects.teardown();
        self.motion.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> AppState {
        AppState::new(
            Profile::builtin().unwrap(),
            AppConfig::default(),
            Rect::new(0, 0, 100, 31),
            2026,
        )
        .unwrap()
    }

    #[test]
    fn stepping_sections_targets_their_tops() {
        let mut s = state();
        s.step_section(1);
        let about = s.layout.section_top(Section::About).unwrap();
        assert_eq!(s.motion.scroll_state().raw_offset, about);
        assert_eq!(s.active_section(), Section::About);

        s.step_section(-1);
        assert_eq!(s.motion.scroll_state().raw_offset, 0.0);
        // Nothing before the first section.
        s.step_section(-1);
        assert_eq!(s.motion.scroll_state().raw_offset, 0.0);
    }

    #[test]
    fn resize_keeps_the_scroll_position() {
        let mut s = state();
        s.motion.scroll().borrow_mut().jump_to(40.0);
        s.resize(Rect::new(0, 0, 60, 21)).unwrap();
        assert_eq!(
            s.layout.viewport(),
            Viewport {
                width: 60.0,
                height: 20.0
            }
        );
        assert_eq!(s.motion.scroll_state().raw_offset, 40.0);
    }

    #[test]
    fn motion_settings_reach_the_driver() {
        let mut s = state();
        s.config.motion.smooth_scroll = false;
        s.config.motion.wheel_multiplier = 3.0;
        s.apply_motion_settings();
        let scroll = s.motion.scroll().borrow();
        assert!(!scroll.config().smooth);
        assert_eq!(scroll.config().wheel_multiplier, 3.0);
    }

    #[test]
    fn scroll_direction_follows_the_published_frames() {
        let mut s = state();
        assert_eq!(s.scroll_direction(), 0);
        s.motion.scroll().borrow_mut().scroll_to(40.0);
        s.motion.frame_at(std::time::Duration::from_millis(0));
        s.motion.frame_at(std::time::Duration::from_millis(16));
        assert_eq!(s.scroll_direction(), 1);

        s.motion.scroll().borrow_mut().scroll_to(0.0);
        s.motion.frame_at(std::time::Duration::from_millis(32));
        assert_eq!(s.scroll_direction(), -1);

        s.teardown();
        s.motion.frame_at(std::time::Duration::from_millis(48));
        assert_eq!(s.scroll_direction(), -1);
    }

    #[test]
    fn teardown_is_idempotent() {
        let mut s = state();
        s.teardown();
        s.teardown();
        assert!(s.motion.is_torn_down());
    }
}
