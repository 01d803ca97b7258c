//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::{ActiveView, AppState};

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Opens a submenu.
    Submenu {
        label: &'static str,
        view: ActiveView,
    },
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// Steps through a fixed list of values.
    Cycle {
        label: &'static str,
        value: fn(&AppState) -> String,
        cycle: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Submenu { label, .. }
            | Self::Toggle { label, .. }
            | Self::Cycle { label, .. } => label,
        }
    }

    /// Current value as shown beside the label; `None` for submenus.
    pub fn value(&self, state: &AppState) -> Option<String> {
        match self {
            Self::Submenu { .. } => None,
            Self::Toggle { get, .. } => Some(if get(state) { "ON".into() } else { "OFF".into() }),
            Self::Cycle { value, .. } => Some(value(state)),
        }
    }

    /// Run the item: open its submenu, flip it or step it.
    pub fn activate(&self, state: &mut AppState) {
        match self {
            Self::Submenu { view, .. } => state.active_view = *view,
            Self::Toggle { get, set, .. } => {
                let v = !get(state);
                set(state, v);
            }
            Self::Cycle { cycle, .. } => cycle(state),
        }
    }
}

/// The entry after `current` in `steps`, wrapping.  Values not in the list
/// restart from the first step.
fn next_step<T: PartialEq + Copy>(steps: &[T], current: T) -> T {
    match steps.iter().position(|&s| s == current) {
        Some(i) => steps[(i + 1) % steps.len()],
        None => steps[0],
    }
}

/// Store, apply and report a motion change.
fn commit(state: &mut AppState, message: String) {
    state.apply_motion_settings();
    state.save_config();
    state.status_message = Some(message);
}

const DURATIONS_MS: &[u64] = &[600, 900, 1200, 1600, 2000];
const WHEEL_MULTIPLIERS: &[f64] = &[0.5, 1.0, 1.5, 2.0, 3.0];
const MAGNETIC_STRENGTHS: &[f64] = &[0.0, 0.2, 0.4, 0.6];
const CAROUSEL_INTERVALS_MS: &[u64] = &[3000, 5000, 8000, 12_000];

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Submenu {
        label: "Controls",
        view: ActiveView::ControlsSubmenu,
    },
    SettingsItem::Toggle {
        label: "Smooth Scrolling",
        get: |s| s.config.motion.smooth_scroll,
        set: |s, v| {
            s.config.motion.smooth_scroll = v;
            commit(s, format!("Smooth scrolling {}", if v { "on" } else { "off" }));
        },
    },
    SettingsItem::Cycle {
        label: "Scroll Duration",
        value: |s| format!("{}ms", s.config.motion.scroll_duration_ms),
        cycle: |s| {
            let next = next_step(DURATIONS_MS, s.config.motion.scroll_duration_ms);
            s.config.motion.scroll_duration_ms = next;
            commit(s, format!("Scroll duration: {next}ms"));
        },
    },
    SettingsItem::Cycle {
        label: "Wheel Speed",
        value: |s| format!("{}×", s.config.motion.wheel_multiplier),
        cycle: |s| {
            let next = next_step(WHEEL_MULTIPLIERS, s.config.motion.wheel_multiplier);
            s.config.motion.wheel_multiplier = next;
            commit(s, format!("Wheel speed: {next}×"));
        },
    },
    SettingsItem::Cycle {
        label: "Magnetic Button",
        value: |s| match s.config.motion.magnetic_strength {
            m if m <= 0.0 => "off".into(),
            m => format!("{:.0}%", m * 100.0),
        },
        cycle: |s| {
            let next = next_step(MAGNETIC_STRENGTHS, s.config.motion.magnetic_strength);
            s.config.motion.magnetic_strength = next;
            commit(s, format!("Magnetic strength: {:.0}%", next * 100.0));
        },
    },
    SettingsItem::Cycle {
        label: "Testimonial Interval",
        value: |s| format!("{}s", s.config.motion.carousel_interval_ms / 1000),
        cycle: |s| {
            let next = next_step(CAROUSEL_INTERVALS_MS, s.config.motion.carousel_interval_ms);
            s.config.motion.carousel_interval_ms = next;
            commit(s, format!("Testimonials rotate every {}s", next / 1000));
        },
    },
];
