//! Theme source consulted while content is produced.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeStyle {
    #[default]
    Light,
    Dark,
}

impl ThemeStyle {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Light => "settings.theme.light",
            Self::Dark => "settings.theme.dark",
        }
    }
}

pub trait ThemeSource: Send + Sync {
    fn style(&self) -> ThemeStyle;
}

/// Shared, switchable theme. Clones observe the same value, so rows built
/// once pick up a theme change the next time their content is produced.
#[derive(Debug, Clone, Default)]
pub struct ThemeHandle {
    style: Arc<AtomicU8>,
}

impl ThemeHandle {
    pub fn new(style: ThemeStyle) -> Self {
        let h = Self::default();
        h.set(style);
        h
    }

    pub fn set(&self, style: ThemeStyle) {
        let v = match style {
            ThemeStyle::Light => 0,
            ThemeStyle::Dark => 1,
        };
        self.style.store(v, Ordering::Relaxed);
    }

    pub fn toggle(&self) -> ThemeStyle {
        let next = self.style().toggled();
        self.set(next);
        next
    }
}

impl ThemeSource for ThemeHandle {
    fn style(&self) -> ThemeStyle {
        match self.style.load(Ordering::Relaxed) {
            0 => ThemeStyle::Light,
            _ => ThemeStyle::Dark,
        }
    }
}
