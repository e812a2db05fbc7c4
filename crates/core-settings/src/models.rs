//! Row view-models used by the settings screen.

use crate::theme::{ThemeHandle, ThemeSource, ThemeStyle};
use core_model::{Accessory, CellContent, TextRun, Tone, ViewModel};
use std::sync::atomic::{AtomicBool, Ordering};

/// Uppercased section title.
#[derive(Debug, Clone)]
pub struct SectionHeader {
    pub title: String,
}

impl SectionHeader {
    pub fn new(title: impl AsRef<str>) -> Self {
        Self {
            title: title.as_ref().to_uppercase(),
        }
    }
}

impl ViewModel for SectionHeader {
    fn create_node(&self) -> CellContent {
        CellContent {
            lines: vec![TextRun::new(&self.title, Tone::Muted)],
            ..CellContent::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableRow {
    pub title: String,
    pub subtitle: Option<String>,
    pub accessory: Accessory,
}

impl TableRow {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            subtitle: None,
            accessory: Accessory::None,
        }
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn with_accessory(mut self, accessory: Accessory) -> Self {
        self.accessory = accessory;
        self
    }
}

impl ViewModel for TableRow {
    fn create_node(&self) -> CellContent {
        let mut content = CellContent::text(&self.title).with_accessory(self.accessory.clone());
        if let Some(sub) = &self.subtitle {
            content = content.with_line(sub, Tone::Muted);
        }
        content
    }
}

/// Row with an on/off switch. The state is interior so the same shared model
/// can be flipped in place and re-rendered.
#[derive(Debug)]
pub struct SwitchRow {
    pub title: String,
    on: AtomicBool,
}

impl SwitchRow {
    pub fn new(title: impl Into<String>, initially_on: bool) -> Self {
        Self {
            title: title.into(),
            on: AtomicBool::new(initially_on),
        }
    }

    pub fn is_on(&self) -> bool {
        self.on.load(Ordering::Relaxed)
    }

    pub fn set_on(&self, on: bool) {
        self.on.store(on, Ordering::Relaxed);
    }

    /// Flip the switch, returning the new state.
    pub fn toggle(&self) -> bool {
        !self.on.fetch_xor(true, Ordering::Relaxed)
    }
}

impl ViewModel for SwitchRow {
    fn create_node(&self) -> CellContent {
        CellContent::text(&self.title).with_accessory(Accessory::Switch(self.is_on()))
    }
}

/// Theme picker row; shows the active theme's label.
#[derive(Debug, Clone)]
pub struct ThemeSettingRow {
    pub title: String,
    pub light_label: String,
    pub dark_label: String,
    pub theme: ThemeHandle,
}

impl ViewModel for ThemeSettingRow {
    fn create_node(&self) -> CellContent {
        let label = match self.theme.style() {
            ThemeStyle::Light => &self.light_label,
            ThemeStyle::Dark => &self.dark_label,
        };
        CellContent::text(&self.title).with_accessory(Accessory::Value(label.clone()))
    }
}

/// Prominent sign-out row whose presentation depends on the theme at the
/// moment its content is produced.
#[derive(Debug, Clone)]
pub struct SignOutRow {
    pub title: String,
    pub theme: ThemeHandle,
}

impl ViewModel for SignOutRow {
    fn create_node(&self) -> CellContent {
        let (text, background, highlighted) = match self.theme.style() {
            ThemeStyle::Light => (Tone::Inverse, Tone::Inverse, Tone::Accent),
            ThemeStyle::Dark => (Tone::Danger, Tone::Default, Tone::Muted),
        };
        CellContent {
            lines: vec![TextRun::new(&self.title, text)],
            accessory: Accessory::None,
            background,
            highlighted_background: Some(highlighted),
        }
    }
}
