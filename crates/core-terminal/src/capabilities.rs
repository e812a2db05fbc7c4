//! Terminal geometry probing.
//!
//! Detection runs once at startup and again on resize events. When the size
//! cannot be queried (output redirected, CI) we fall back to 80x24 so
//! headless rendering still produces sensible widths.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    pub columns: u16,
    pub rows: u16,
}

impl TerminalCapabilities {
    pub const FALLBACK_COLUMNS: u16 = 80;
    pub const FALLBACK_ROWS: u16 = 24;

    pub fn detect() -> Self {
        match crossterm::terminal::size() {
            Ok((columns, rows)) if columns > 0 && rows > 0 => Self { columns, rows },
            _ => Self::fixed(Self::FALLBACK_COLUMNS, Self::FALLBACK_ROWS),
        }
    }

    pub const fn fixed(columns: u16, rows: u16) -> Self {
        Self { columns, rows }
    }
}
