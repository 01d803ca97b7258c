//! A terminal portfolio page with scroll-driven motion.
//!
//! Run the binary to open the built-in profile, or pass `--profile` with a
//! TOML file of your own (`--print-default-profile` prints a template).

mod app;
mod config;
mod content;
mod motion;
mod page;
mod ui;

use std::io::{self, stderr, Stderr};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::Parser;
use crossterm::{
    event::{DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Rect},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::time::MissedTickBehavior;

use crate::app::{
    event::{spawn_event_reader, AppEvent},
    handler,
    state::{ActiveView, AppState},
};
use crate::content::{profile::DEFAULT_PROFILE, Profile};
use crate::page::PageView;
use crate::ui::{
    layout::{AppLayout, Navbar},
    popup,
    theme::Theme,
};

// ───────────────────────────────────────── CLI ───────────────

#[derive(Parser, Debug)]
#[command(name = env!("CARGO_PKG_NAME"), about = "Terminal portfolio with scroll-driven motion")]
struct Cli {
    /// Portfolio content to show instead of the built-in profile.
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Frames per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    fps: u32,

    /// Move the page immediately on input instead of easing toward it.
    #[arg(long)]
    no_smooth: bool,

    /// Write logs to this file instead of stderr.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Print the built-in profile as TOML and exit.
    #[arg(long)]
    print_default_profile: bool,
}

type Term = Terminal<CrosstermBackend<Stderr>>;

fn init_tracing(log_file: Option<&PathBuf>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        // Only visible once RUST_LOG is set; the page owns the screen.
        None => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init(),
    }
    Ok(())
}

// ───────────────────────────────────────── drawing ───────────

fn draw(frame: &mut Frame, state: &AppState) {
    let area = frame.area();
    let layout = AppLayout::from_area(area);

    {
        let registry = state.motion.triggers().borrow();
        frame.render_widget(
            PageView {
                layout: &state.layout,
                effects: &state.effects,
                registry: &registry,
                profile: &state.profile,
                offset: state.offset(),
                now: state.motion.now(),
                year: state.year,
            },
            layout.page_area,
        );
    }

    frame.render_widget(
        Navbar {
            name: &state.profile.name,
            accent: &state.profile.accent_name,
            active: state.active_section(),
        },
        layout.nav_area(),
    );

    let hint = state.config.status_bar_hint();
    let status_text = match state.active_view {
        ActiveView::Page => state.status_message.as_deref().unwrap_or(&hint),
        ActiveView::SettingsMenu | ActiveView::ControlsSubmenu => "",
    };
    frame.render_widget(
        Paragraph::new(status_text).style(Theme::status_bar_style()),
        layout.status_area,
    );
    let progress = state.motion.scroll_state().progress();
    let arrow = match state.scroll_direction() {
        1 => '↓',
        -1 => '↑',
        _ => ' ',
    };
    frame.render_widget(
        Paragraph::new(format!("{arrow} {:>3.0}% ", progress * 100.0))
            .alignment(Alignment::Right)
            .style(Theme::status_bar_style()),
        Rect {
            x: layout.status_area.right().saturating_sub(8),
            width: layout.status_area.width.min(8),
            ..layout.status_area
        },
    );

    match state.active_view {
        ActiveView::SettingsMenu => frame.render_widget(
            popup::SettingsPopup {
                selected: state.settings_selected,
                state,
            },
            area,
        ),
        ActiveView::ControlsSubmenu => frame.render_widget(
            popup::ControlsPopup {
                config: &state.config,
                selected: state.controls_selected,
                awaiting_rebind: state.awaiting_rebind,
            },
            area,
        ),
        ActiveView::Page => {}
    }
}

// ───────────────────────────────────────── main ─────────────

async fn run(terminal: &mut Term, state: &mut AppState, fps: u32) -> Result<()> {
    let mut events = spawn_event_reader(Duration::from_millis(50));
    let mut frames = tokio::time::interval(Duration::from_secs_f64(1.0 / fps as f64));
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                match event {
                    AppEvent::Key(k) => handler::handle_key(state, k),
                    AppEvent::Mouse(m) => handler::handle_mouse(state, m),
                    AppEvent::Resize(w, h) => handler::handle_resize(state, w, h)?,
                    AppEvent::FocusLost => handler::handle_focus_lost(state),
                }
            }

            _ = frames.tick() => {
                state.frame();
                terminal.draw(|frame| draw(frame, state))?;
            }
        }

        if state.should_quit {
            return Ok(());
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_ref())?;

    if cli.print_default_profile {
        print!("{DEFAULT_PROFILE}");
        return Ok(());
    }

    let profile = match &cli.profile {
        Some(path) => {
            Profile::load(path).with_context(|| format!("loading profile {}", path.display()))?
        }
        None => Profile::builtin().context("parsing the built-in profile")?,
    };
    let mut user_config = config::AppConfig::load();
    if cli.no_smooth {
        // Session override; not written back unless settings change.
        user_config.motion.smooth_scroll = false;
    }

    // ── terminal setup ────────────────────────────────────────
    enable_raw_mode()?;
    let mut stderr_handle = stderr();
    execute!(stderr_handle, EnterAlternateScreen, EnableMouseCapture, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stderr());
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let area = Rect::new(0, 0, size.width, size.height);
    let year = chrono::Local::now().year();

    let result = match AppState::new(profile, user_config, area, year) {
        Ok(mut state) => {
            let result = run(&mut terminal, &mut state, cli.fps).await;
            state.teardown();
            result
        }
        Err(e) => Err(e.into()),
    };

    // ── teardown ──────────────────────────────────────────────
    // Always restore the terminal, even when the loop failed.
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableFocusChange,
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}
