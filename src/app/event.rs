//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a blocking reader task
//! that forwards them over a channel so the main loop stays non-blocking.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind, MouseEvent};
use tokio::sync::mpsc;

/// High-level events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    /// The terminal lost focus; pointer effects should let go.
    FocusLost,
}

impl AppEvent {
    fn from_crossterm(ev: CtEvent) -> Option<Self> {
        match ev {
            // Release and repeat events would double every key press on
            // terminals that report them.
            CtEvent::Key(k) if k.kind == KeyEventKind::Press => Some(Self::Key(k)),
            CtEvent::Mouse(m) => Some(Self::Mouse(m)),
            CtEvent::Resize(w, h) => Some(Self::Resize(w, h)),
            CtEvent::FocusLost => Some(Self::FocusLost),
            _ => None,
        }
    }
}

/// Spawns a blocking task that reads terminal events and sends them through
/// the returned channel.  The task ends once the receiver is dropped; `poll`
/// wakes it every `poll_interval` to notice that.
pub fn spawn_event_reader(poll_interval: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || {
        while !tx.is_closed() {
            match event::poll(poll_interval) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event poll failed");
                    break;
                }
            }
            let ev = match event::read() {
                Ok(ev) => ev,
                Err(e) => {
                    tracing::warn!(error = %e, "terminal event read failed");
                    break;
                }
            };
            if let Some(app_event) = AppEvent::from_crossterm(ev) {
                if tx.send(app_event).is_err() {
                    break;
                }
            }
        }
    });

    rx
}
