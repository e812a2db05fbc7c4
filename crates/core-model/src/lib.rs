//! Section store data model.
//!
//! The list shown by a collection host is modelled up front as an ordered
//! sequence of [`SectionModel`]s. Each section carries an optional header
//! model, zero or more item models and an optional footer model. Every model
//! is a [`ViewModel`]: something that can produce a [`CellContent`] on demand.
//!
//! Invariants:
//! * Index paths are 0-based `(section, item)` pairs.
//! * Header and footer presence is independent per section; a section with
//!   zero items still renders its supplementary content.
//! * A [`SectionStore`] is owned by exactly one adapter. Nothing here knows
//!   about hosts or update notifications; that contract lives in
//!   `core-adapter`.

mod content;
mod section;

pub use content::{Accessory, CellContent, TextRun, Tone};
pub use section::{SectionModel, SectionStore, SharedModel, StaticModel, ViewModel};

use std::fmt;

/// Identifier the host uses for section header supplementary elements.
pub const SECTION_HEADER_KIND: &str = "section-header";
/// Identifier the host uses for section footer supplementary elements.
pub const SECTION_FOOTER_KIND: &str = "section-footer";

/// `(section, item)` coordinate of a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IndexPath {
    pub section: usize,
    pub item: usize,
}

impl IndexPath {
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.section, self.item)
    }
}

/// Supplementary element kinds a section can carry (at most one of each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupplementaryKind {
    Header,
    Footer,
}

impl SupplementaryKind {
    pub const ALL: [SupplementaryKind; 2] = [SupplementaryKind::Header, SupplementaryKind::Footer];

    /// Map a host kind identifier to a known kind. Hosts may ask about kinds
    /// this model does not use, so unknown identifiers yield `None`.
    pub fn parse(kind: &str) -> Option<Self> {
        match kind {
            SECTION_HEADER_KIND => Some(Self::Header),
            SECTION_FOOTER_KIND => Some(Self::Footer),
            _ => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Header => SECTION_HEADER_KIND,
            Self::Footer => SECTION_FOOTER_KIND,
        }
    }
}
