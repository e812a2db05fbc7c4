//! Renderable cell content produced by view-models.
//!
//! `CellContent` is deliberately host-agnostic: a stack of text runs, a
//! trailing accessory and a background tone. Hosts decide how tones map to
//! real colors. Content self-sizes vertically (one row per line) while the
//! width is imposed by the adapter's sizing policy.

/// Semantic color role; hosts map these onto their palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tone {
    #[default]
    Default,
    Muted,
    Accent,
    Danger,
    /// Inverted presentation (e.g. a filled button row).
    Inverse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub tone: Tone,
}

impl TextRun {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Trailing decoration drawn at the right edge of a row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Accessory {
    #[default]
    None,
    Disclosure,
    DetailIndicator,
    Switch(bool),
    Value(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CellContent {
    pub lines: Vec<TextRun>,
    pub accessory: Accessory,
    pub background: Tone,
    /// Background while the host highlights the cell (pressed or selected);
    /// `None` leaves the highlight style to the host.
    pub highlighted_background: Option<Tone>,
}

impl CellContent {
    /// Placeholder used when a section has no model for a supplementary kind.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Single line of default-toned text.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            lines: vec![TextRun::new(text, Tone::Default)],
            ..Self::default()
        }
    }

    pub fn with_line(mut self, text: impl Into<String>, tone: Tone) -> Self {
        self.lines.push(TextRun::new(text, tone));
        self
    }

    pub fn with_accessory(mut self, accessory: Accessory) -> Self {
        self.accessory = accessory;
        self
    }

    pub fn with_background(mut self, background: Tone) -> Self {
        self.background = background;
        self
    }

    pub fn with_highlighted_background(mut self, background: Tone) -> Self {
        self.highlighted_background = Some(background);
        self
    }

    /// Background to paint given the host's highlight state.
    pub fn background_for(&self, highlighted: bool) -> Tone {
        match self.highlighted_background {
            Some(tone) if highlighted => tone,
            _ => self.background,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.accessory == Accessory::None
    }

    /// Rows this content occupies when laid out; an empty placeholder takes none.
    pub fn preferred_height(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.lines.len().max(1)
        }
    }

    /// First line's text, or "" for empty content.
    pub fn title(&self) -> &str {
        self.lines.first().map(|l| l.text.as_str()).unwrap_or("")
    }
}
