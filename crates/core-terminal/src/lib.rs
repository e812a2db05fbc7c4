//! Terminal session and a collection host that paints into it.
//!
//! [`TerminalSession`] holds raw mode and the alternate screen for as long as
//! it lives and turns crossterm input into [`SessionEvent`]s, applying
//! resizes to the [`TerminalHost`] on the way. [`TerminalHost`] is a
//! [`CollectionHost`](core_adapter::CollectionHost) that lays rows out as text
//! lines and paints them with crossterm.

use anyhow::Result;
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
    },
};
use std::io::{Stdout, stdout};
use tracing::debug;

pub mod capabilities;
pub mod host;
pub use capabilities::TerminalCapabilities;
pub use host::{RenderedLine, TerminalHost};

/// Input relevant to a list screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Key(KeyEvent),
    /// Geometry changed; the host has already been updated and marked dirty.
    Resized,
}

/// Raw-mode, alternate-screen session. Dropping it restores the terminal,
/// including on early return or panic unwinding.
pub struct TerminalSession {
    out: Stdout,
    rows: u16,
    fixed_width: bool,
}

impl TerminalSession {
    /// Enter the alternate screen titled `title`. With `fixed_width`, resizes
    /// only change the row count and the host keeps its column count.
    pub fn enter(title: &str, fixed_width: bool) -> Result<Self> {
        let rows = TerminalCapabilities::detect().rows;
        enable_raw_mode()?;
        let mut out = stdout();
        if let Err(err) = execute!(out, EnterAlternateScreen, Hide, SetTitle(title)) {
            let _ = disable_raw_mode();
            return Err(err.into());
        }
        debug!(target: "terminal", rows, fixed_width, "session_entered");
        Ok(Self {
            out,
            rows,
            fixed_width,
        })
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn out(&mut self) -> &mut Stdout {
        &mut self.out
    }

    /// Block for the next event the screen cares about.
    pub fn next_event(&mut self, host: &TerminalHost) -> Result<SessionEvent> {
        loop {
            let event = event::read()?;
            if let Some(ev) = route_event(event, host, &mut self.rows, self.fixed_width) {
                return Ok(ev);
            }
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let _ = execute!(self.out, LeaveAlternateScreen, Show);
        let _ = disable_raw_mode();
        debug!(target: "terminal", "session_left");
    }
}

/// Key presses pass through; resizes update `host` and `rows`; everything
/// else (key releases, mouse, focus, paste) is dropped.
fn route_event(
    event: Event,
    host: &TerminalHost,
    rows: &mut u16,
    fixed_width: bool,
) -> Option<SessionEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => Some(SessionEvent::Key(key)),
        Event::Resize(columns, new_rows) => {
            *rows = new_rows;
            if !fixed_width {
                host.resize(columns);
            }
            host.mark_dirty();
            Some(SessionEvent::Resized)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};

    #[test]
    fn resize_updates_host_and_rows() {
        let host = TerminalHost::new(40);
        let mut rows = 24;
        let ev = route_event(Event::Resize(100, 30), &host, &mut rows, false);
        assert_eq!(ev, Some(SessionEvent::Resized));
        assert_eq!(rows, 30);
        assert_eq!(host.columns(), 100);
        assert!(host.needs_repaint());
    }

    #[test]
    fn fixed_width_ignores_column_changes() {
        let host = TerminalHost::new(40);
        let mut rows = 24;
        route_event(Event::Resize(100, 10), &host, &mut rows, true);
        assert_eq!(host.columns(), 40);
        assert_eq!(rows, 10);
    }

    #[test]
    fn only_key_presses_pass_through() {
        let host = TerminalHost::new(40);
        let mut rows = 24;
        let press = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        assert_eq!(
            route_event(Event::Key(press), &host, &mut rows, false),
            Some(SessionEvent::Key(press))
        );
        let release = KeyEvent {
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
            ..press
        };
        assert_eq!(route_event(Event::Key(release), &host, &mut rows, false), None);
        assert_eq!(route_event(Event::FocusGained, &host, &mut rows, false), None);
    }
}
