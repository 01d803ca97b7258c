//! User configuration: key bindings and motion settings.
//!
//! Stored as a plain `key = value` file at `$XDG_CONFIG_HOME/folio/config.toml`
//! (default `~/.config/folio/config.toml`).  Unknown keys and unparsable
//! values are skipped so an old or hand-edited file never blocks startup.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::{debug, warn};

use crate::motion::scroll::ScrollConfig;
use crate::page::EffectSettings;

// ───────────────────────────────────────── actions ───────────

/// Every rebindable action on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    Top,
    Bottom,
    NextSection,
    PrevSection,
    OpenSettings,
    Quit,
}

impl Action {
    /// Display order in the controls popup.
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::NextSection,
        Action::PrevSection,
        Action::OpenSettings,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PageUp => "Page Up",
            Action::PageDown => "Page Down",
            Action::Top => "Back to Top",
            Action::Bottom => "Jump to End",
            Action::NextSection => "Next Section",
            Action::PrevSection => "Previous Section",
            Action::OpenSettings => "Open Settings",
            Action::Quit => "Quit",
        }
    }

    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::NextSection => "next_section",
            Action::PrevSection => "prev_section",
            Action::OpenSettings => "open_settings",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

/// Named keys: (code, file name, on-screen name).
const NAMED_KEYS: &[(KeyCode, &str, &str)] = &[
    (KeyCode::Up, "Up", "↑"),
    (KeyCode::Down, "Down", "↓"),
    (KeyCode::Left, "Left", "←"),
    (KeyCode::Right, "Right", "→"),
    (KeyCode::Enter, "Enter", "Enter"),
    (KeyCode::Esc, "Esc", "Esc"),
    (KeyCode::Tab, "Tab", "Tab"),
    (KeyCode::BackTab, "BackTab", "S-Tab"),
    (KeyCode::Backspace, "Backspace", "Bksp"),
    (KeyCode::Delete, "Delete", "Del"),
    (KeyCode::Home, "Home", "Home"),
    (KeyCode::End, "End", "End"),
    (KeyCode::PageUp, "PageUp", "PgUp"),
    (KeyCode::PageDown, "PageDown", "PgDn"),
    (KeyCode::Char(' '), "Space", "Space"),
];

/// One key plus its CTRL/ALT/SHIFT modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Platform modifiers such as SUPER are ignored.
    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code
            && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    pub fn from_key_event(event: KeyEvent) -> Self {
        Self {
            code: event.code,
            modifiers: event.modifiers & MODIFIER_MASK,
        }
    }

    /// On-screen form, e.g. `"Ctrl+↓"`.
    pub fn display(&self) -> String {
        self.render(|k| k.2)
    }

    /// File form, e.g. `"Ctrl+Down"`.
    fn to_config_string(&self) -> String {
        self.render(|k| k.1)
    }

    fn render(&self, pick: fn(&(KeyCode, &'static str, &'static str)) -> &'static str) -> String {
        let mut s = String::new();
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(prefix);
            }
        }
        match NAMED_KEYS.iter().find(|k| k.0 == self.code) {
            Some(named) => s.push_str(pick(named)),
            None => match self.code {
                KeyCode::Char(c) => s.push(c),
                KeyCode::F(n) => s.push_str(&format!("F{n}")),
                other => s.push_str(&format!("{other:?}")),
            },
        }
        s
    }

    /// Parse `"q"`, `"Enter"`, `"Ctrl+Down"`, `"F5"` and the like.
    fn parse(s: &str) -> Option<Self> {
        let mut parts: Vec<&str> = s.split('+').collect();
        // A bare "+" key splits into two empty halves.
        let key = if s.ends_with("++") || s == "+" {
            parts.truncate(parts.len().saturating_sub(2));
            "+"
        } else {
            parts.pop()?
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            match part.to_ascii_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let lower = key.to_ascii_lowercase();
        let code = if let Some(named) = NAMED_KEYS
            .iter()
            .find(|(_, file, shown)| {
                file.eq_ignore_ascii_case(&lower) || shown.eq_ignore_ascii_case(&lower)
            })
        {
            named.0
        } else {
            match lower.as_str() {
                "return" => KeyCode::Enter,
                "escape" => KeyCode::Esc,
                "pgup" => KeyCode::PageUp,
                "pgdn" => KeyCode::PageDown,
                f if f.len() > 1 && f.starts_with('f') => KeyCode::F(f[1..].parse().ok()?),
                _ => {
                    let mut chars = key.chars();
                    let c = chars.next()?;
                    if chars.next().is_some() {
                        return None;
                    }
                    KeyCode::Char(c)
                }
            }
        };
        Some(Self { code, modifiers })
    }
}

// ───────────────────────────────────────── motion ────────────

/// Persisted motion tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionSettings {
    pub smooth_scroll: bool,
    pub scroll_duration_ms: u64,
    pub wheel_multiplier: f64,
    pub touch_multiplier: f64,
    pub magnetic_strength: f64,
    pub carousel_interval_ms: u64,
}

impl Default for MotionSettings {
    fn default() -> Self {
        let scroll = ScrollConfig::default();
        let effects = EffectSettings::default();
        Self {
            smooth_scroll: scroll.smooth,
            scroll_duration_ms: (scroll.duration * 1000.0).round() as u64,
            wheel_multiplier: scroll.wheel_multiplier,
            touch_multiplier: scroll.touch_multiplier,
            magnetic_strength: effects.magnetic_strength,
            carousel_interval_ms: (effects.carousel_interval * 1000.0).round() as u64,
        }
    }
}

impl MotionSettings {
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig {
            duration: self.scroll_duration_ms as f64 / 1000.0,
            wheel_multiplier: self.wheel_multiplier,
            touch_multiplier: self.touch_multiplier,
            smooth: self.smooth_scroll,
        }
    }

    pub fn effect_settings(&self) -> EffectSettings {
        EffectSettings {
            magnetic_strength: self.magnetic_strength,
            carousel_interval: self.carousel_interval_ms as f64 / 1000.0,
        }
    }

    /// Apply one `key = value` line.  Returns `false` if `key` is not a
    /// motion key.  Values are clamped into usable ranges.
    fn apply(&mut self, key: &str, value: &str) -> bool {
        match key {
            "smooth_scroll" => {
                if let Ok(v) = value.parse() {
                    self.smooth_scroll = v;
                }
            }
            "scroll_duration_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.scroll_duration_ms = v.clamp(100, 5000);
                }
            }
            "wheel_multiplier" => {
                if let Some(v) = parse_finite(value) {
                    self.wheel_multiplier = v.clamp(0.1, 10.0);
                }
            }
            "touch_multiplier" => {
                if let Some(v) = parse_finite(value) {
                    self.touch_multiplier = v.clamp(0.1, 10.0);
                }
            }
            "magnetic_strength" => {
                if let Some(v) = parse_finite(value) {
                    self.magnetic_strength = v.clamp(0.0, 1.0);
                }
            }
            "carousel_interval_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.carousel_interval_ms = v.clamp(1000, 60_000);
                }
            }
            _ => return false,
        }
        true
    }
}

/// A float that is neither NaN nor infinite.
fn parse_finite(value: &str) -> Option<f64> {
    value.parse::<f64>().ok().filter(|v| v.is_finite())
}

// ───────────────────────────────────────── config ────────────

pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub motion: MotionSettings,
    /// Where `save` writes.  `None` keeps the config in memory only.
    path: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            motion: MotionSettings::default(),
            path: None,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        let n = KeyModifiers::NONE;
        let shift = KeyModifiers::SHIFT;
        let key = |code: KeyCode, mods: KeyModifiers| KeyBind::new(code, mods);
        let ch = |c: char| KeyBind::new(KeyCode::Char(c), n);

        HashMap::from([
            (Action::ScrollUp, vec![key(KeyCode::Up, n), ch('k')]),
            (Action::ScrollDown, vec![key(KeyCode::Down, n), ch('j')]),
            (Action::PageUp, vec![key(KeyCode::PageUp, n), ch('b')]),
            (Action::PageDown, vec![key(KeyCode::PageDown, n), ch(' ')]),
            (Action::Top, vec![key(KeyCode::Home, n), ch('g')]),
            (Action::Bottom, vec![key(KeyCode::End, n), key(KeyCode::Char('G'), shift)]),
            (Action::NextSection, vec![key(KeyCode::Tab, n), ch('n')]),
            (Action::PrevSection, vec![key(KeyCode::BackTab, shift), ch('p')]),
            (Action::OpenSettings, vec![ch('?')]),
            (Action::Quit, vec![key(KeyCode::Char('q'), n), key(KeyCode::Esc, n)]),
        ])
    }

    /// The action bound to `event`.  When several bindings match, the one
    /// with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Bind `bind` to `action`, taking it away from any other action.
    pub fn add_binding(&mut self, action: Action, bind: KeyBind) {
        for binds in self.bindings.values_mut() {
            binds.retain(|b| b != &bind);
        }
        self.bindings.entry(action).or_default().push(bind);
    }

    pub fn clear_bindings(&mut self, action: Action) {
        self.bindings.remove(&action);
    }

    pub fn reset_defaults(&mut self) {
        self.bindings = Self::default_bindings();
    }

    /// All bindings of `action`, e.g. `"↓/j"`.
    pub fn display_bindings(&self, action: Action) -> String {
        match self.bindings.get(&action) {
            Some(binds) if !binds.is_empty() => {
                binds.iter().map(KeyBind::display).collect::<Vec<_>>().join("/")
            }
            _ => "unbound".into(),
        }
    }

    fn short_binding(&self, action: Action) -> String {
        self.bindings
            .get(&action)
            .and_then(|b| b.first())
            .map(KeyBind::display)
            .unwrap_or_else(|| "?".into())
    }

    pub fn status_bar_hint(&self) -> String {
        format!(
            "{}/{}: scroll | {}: section | {}: settings | {}: quit",
            self.short_binding(Action::ScrollUp),
            self.short_binding(Action::ScrollDown),
            self.short_binding(Action::NextSection),
            self.short_binding(Action::OpenSettings),
            self.short_binding(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from the user config path, falling back to defaults.
    pub fn load() -> Self {
        let path = config_path();
        let mut config = match std::fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), "loaded config");
                Self::parse(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "could not read config, using defaults");
                Self::default()
            }
        };
        config.path = Some(path);
        config
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_config(path, &self.serialise())
    }

    pub fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if config.motion.apply(key, value) {
                continue;
            }
            let Some(action) = Action::from_config_key(key) else {
                debug!(key, "ignoring unknown config key");
                continue;
            };
            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }
        config
    }

    pub fn serialise(&self) -> String {
        let m = &self.motion;
        let mut lines = vec![
            "# folio configuration".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("smooth_scroll = {}", m.smooth_scroll),
            format!("scroll_duration_ms = {}", m.scroll_duration_ms),
            format!("wheel_multiplier = {}", m.wheel_multiplier),
            format!("touch_multiplier = {}", m.touch_multiplier),
            format!("magnetic_strength = {}", m.magnetic_strength),
            format!("carousel_interval_ms = {}", m.carousel_interval_ms),
            String::new(),
            "# Key bindings: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+".to_string(),
            "# Named keys: Up, Down, Left, Right, Enter, Esc, Tab, BackTab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];
        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn write_config(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating config directory {}", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("writing config {}", path.display()))?;
    debug!(path = %path.display(), "saved config");
    Ok(())
}

/// `$XDG_CONFIG_HOME/folio/config.toml`.
fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("folio").join("config.toml")
}
