//! View-model capability, sections and the section store.

use crate::{CellContent, SupplementaryKind};
use std::fmt;
use std::sync::Arc;

/// Anything that can vend displayable content for one row, header or footer.
///
/// Models are `Send + Sync` because a host may materialize content lazily on
/// another execution context than the one that looked the model up.
pub trait ViewModel: Send + Sync {
    fn create_node(&self) -> CellContent;
}

/// Shared handle to a view-model; cloned into deferred content producers.
pub type SharedModel = Arc<dyn ViewModel>;

/// View-model that always produces the same content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticModel(pub CellContent);

impl StaticModel {
    pub fn text(text: impl Into<String>) -> Self {
        Self(CellContent::text(text))
    }

    pub fn shared(self) -> SharedModel {
        Arc::new(self)
    }
}

impl ViewModel for StaticModel {
    fn create_node(&self) -> CellContent {
        self.0.clone()
    }
}

/// One section: optional header, ordered items, optional footer.
#[derive(Clone, Default)]
pub struct SectionModel {
    pub header_model: Option<SharedModel>,
    pub item_models: Vec<SharedModel>,
    pub footer_model: Option<SharedModel>,
}

impl SectionModel {
    pub fn new(items: Vec<SharedModel>) -> Self {
        Self {
            header_model: None,
            item_models: items,
            footer_model: None,
        }
    }

    pub fn with_header(mut self, header: SharedModel) -> Self {
        self.header_model = Some(header);
        self
    }

    pub fn with_footer(mut self, footer: SharedModel) -> Self {
        self.footer_model = Some(footer);
        self
    }

    pub fn supplementary(&self, kind: SupplementaryKind) -> Option<&SharedModel> {
        match kind {
            SupplementaryKind::Header => self.header_model.as_ref(),
            SupplementaryKind::Footer => self.footer_model.as_ref(),
        }
    }

    pub fn has_supplementary(&self, kind: SupplementaryKind) -> bool {
        self.supplementary(kind).is_some()
    }
}

impl fmt::Debug for SectionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionModel")
            .field("header", &self.header_model.is_some())
            .field("items", &self.item_models.len())
            .field("footer", &self.footer_model.is_some())
            .finish()
    }
}

/// Ordered sequence of sections. Plain data; the owning adapter mediates all
/// access and keeps the host informed of every change.
#[derive(Clone, Default, Debug)]
pub struct SectionStore {
    pub sections: Vec<SectionModel>,
}

impl SectionStore {
    pub fn new(sections: Vec<SectionModel>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn get(&self, section: usize) -> Option<&SectionModel> {
        self.sections.get(section)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionModel> {
        self.sections.iter()
    }

    /// Total number of item models across all sections.
    pub fn item_total(&self) -> usize {
        self.sections.iter().map(|s| s.item_models.len()).sum()
    }
}
