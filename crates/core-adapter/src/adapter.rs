use crate::host::{CollectionHost, Registration};
use crate::layout::{FlowSizing, LayoutContext, ScrollDirections, SizeRange, SizingPolicy};
use crate::metrics::{UpdateMetrics, UpdateMetricsSnapshot};
use core_events::{HostUpdate, UpdateBatch};
use core_model::{
    CellContent, IndexPath, SectionModel, SectionStore, SharedModel, SupplementaryKind,
};
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Deferred content producer. Invoking it calls `create_node` on the model
/// captured at lookup time; the host decides when and where that happens.
pub type NodeBlock = Box<dyn FnOnce() -> CellContent + Send + 'static>;

/// Data queries a host issues while laying out and rendering.
///
/// All methods are pure reads. `item_count` and `content_at` require indices
/// the host was previously told exist.
pub trait CollectionDataSource {
    fn section_count(&self) -> usize;
    fn item_count(&self, section: usize) -> usize;
    fn content_at(&self, index_path: IndexPath) -> NodeBlock;
    /// Header/footer content, or an empty placeholder when the section has
    /// none of that kind or the kind is not one this source serves.
    fn supplementary_content(&self, kind: &str, index_path: IndexPath) -> CellContent;
    /// Number of sections carrying an element of `kind`.
    fn supplementary_section_count(&self, kind: &str) -> usize;
    /// 0 or 1: a section has at most one header and one footer.
    fn supplementary_count(&self, kind: &str, section: usize) -> usize;
}

/// Sizing queries for hosts that negotiate per-element constraints.
pub trait LayoutInspector {
    fn constrained_size_for_item(&self, index_path: IndexPath) -> SizeRange;
    fn constrained_size_for_supplementary(&self, kind: &str, index_path: IndexPath) -> SizeRange;
    fn scroll_axis(&self) -> ScrollDirections;
}

/// Binds a [`SectionStore`] to a borrowed collection host.
pub struct Adapter<'w, H: CollectionHost + ?Sized, S: SizingPolicy = FlowSizing> {
    store: SectionStore,
    host: &'w H,
    sizing: S,
    metrics: UpdateMetrics,
}

impl<'w, H: CollectionHost + ?Sized> Adapter<'w, H, FlowSizing> {
    pub fn new(host: &'w H, sections: Vec<SectionModel>) -> Self {
        Self::with_sizing(host, sections, FlowSizing::default())
    }

    pub fn empty(host: &'w H) -> Self {
        Self::new(host, Vec::new())
    }
}

impl<'w, H: CollectionHost + ?Sized, S: SizingPolicy> Adapter<'w, H, S> {
    /// Registers header/footer kinds with the host, then attaches as data
    /// source and, when the host supports it, as layout inspector.
    pub fn with_sizing(host: &'w H, sections: Vec<SectionModel>, sizing: S) -> Self {
        for kind in SupplementaryKind::ALL {
            host.register_supplementary_kind(kind.as_str());
        }
        let registration = Registration {
            data_source: true,
            layout_inspector: host.supports_layout_inspection(),
        };
        host.attach(registration);
        debug!(
            target: "adapter",
            sections = sections.len(),
            layout_inspector = registration.layout_inspector,
            "adapter_attached"
        );
        Self {
            store: SectionStore::new(sections),
            host,
            sizing,
            metrics: UpdateMetrics::default(),
        }
    }

    pub fn host(&self) -> &'w H {
        self.host
    }

    pub fn store(&self) -> &SectionStore {
        &self.store
    }

    pub fn sections(&self) -> &[SectionModel] {
        &self.store.sections
    }

    pub fn sizing(&self) -> &S {
        &self.sizing
    }

    pub fn metrics_snapshot(&self) -> UpdateMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn layout_context(&self) -> LayoutContext {
        LayoutContext {
            frame_width: self.host.frame_width(),
            section_insets: self.host.section_insets(),
        }
    }

    /// Bounding box every cell and supplementary element must satisfy.
    pub fn constrained_size(&self) -> SizeRange {
        self.sizing.constrained_size(&self.layout_context())
    }

    // ---------------------------------------------------------------------------------------------
    // Data access
    // ---------------------------------------------------------------------------------------------

    /// Bounds-checked lookup. Stale or bogus index paths yield `None`.
    pub fn model_at(&self, index_path: IndexPath) -> Option<&SharedModel> {
        self.store
            .get(index_path.section)?
            .item_models
            .get(index_path.item)
    }

    // ---------------------------------------------------------------------------------------------
    // Insertions & deletions
    // ---------------------------------------------------------------------------------------------

    /// Append sections and report the inserted index range.
    pub fn add_sections(&mut self, sections: Vec<SectionModel>) {
        let old_count = self.store.len();
        let added = sections.len();
        self.store.sections.extend(sections);
        debug!(target: "adapter.mutation", old_count, added, "sections_added");
        self.deliver(UpdateBatch::single(HostUpdate::InsertSections(
            old_count..old_count + added,
        )));
    }

    /// Append items to section 0, creating it when the store is empty.
    pub fn add_items(&mut self, models: Vec<SharedModel>) {
        self.add_items_in_section(models, 0);
    }

    /// Append items to `section`. On an empty store, section 0 is synthesized
    /// first; both changes reach the host as one batch, section insert first.
    ///
    /// Panics when `section` does not exist (after synthesis).
    pub fn add_items_in_section(&mut self, models: Vec<SharedModel>, section: usize) {
        let mut batch = UpdateBatch::new();
        if self.store.is_empty() && section == 0 {
            self.store.sections.push(SectionModel::default());
            batch.push(HostUpdate::InsertSections(0..1));
            trace!(target: "adapter.mutation", "section_synthesized");
        }

        let target = &mut self.store.sections[section];
        let old_count = target.item_models.len();
        let added = models.len();
        target.item_models.extend(models);

        batch.push(HostUpdate::InsertItems(
            (old_count..old_count + added)
                .map(|item| IndexPath::new(section, item))
                .collect(),
        ));
        debug!(target: "adapter.mutation", section, old_count, added, "items_added");
        self.deliver(batch);
    }

    /// Remove exactly one item. Panics when `index_path` is out of range.
    pub fn remove(&mut self, index_path: IndexPath) -> SharedModel {
        let removed = self.store.sections[index_path.section]
            .item_models
            .remove(index_path.item);
        debug!(target: "adapter.mutation", %index_path, "item_removed");
        self.deliver(UpdateBatch::single(HostUpdate::DeleteItems(vec![
            index_path,
        ])));
        removed
    }

    /// Drop every section and fully reload the host, blocking until the host
    /// confirms the reload was applied. No-op on an empty store.
    pub fn clear_data(&mut self) {
        if self.store.is_empty() {
            return;
        }
        let sections = self.store.len();
        let items = self.store.item_total();
        self.store.sections.clear();
        self.metrics.record_reload();

        let waiter = self.host.reload_data();
        if let Err(err) = waiter.wait() {
            warn!(target: "adapter.mutation", %err, "reload_commit_failed");
        }
        debug!(target: "adapter.mutation", sections, items, "data_cleared");
    }

    fn deliver(&self, batch: UpdateBatch) {
        if batch.is_empty() {
            return;
        }
        trace!(target: "adapter.mutation", updates = batch.len(), "batch_deliver");
        self.metrics.record_batch(&batch);
        self.host.apply(batch);
    }
}

impl<'w, H: CollectionHost + ?Sized, S: SizingPolicy> CollectionDataSource for Adapter<'w, H, S> {
    fn section_count(&self) -> usize {
        self.store.len()
    }

    fn item_count(&self, section: usize) -> usize {
        self.store.sections[section].item_models.len()
    }

    fn content_at(&self, index_path: IndexPath) -> NodeBlock {
        let model = Arc::clone(
            &self.store.sections[index_path.section].item_models[index_path.item],
        );
        Box::new(move || model.create_node())
    }

    fn supplementary_content(&self, kind: &str, index_path: IndexPath) -> CellContent {
        let Some(kind) = SupplementaryKind::parse(kind) else {
            return CellContent::empty();
        };
        self.store
            .get(index_path.section)
            .and_then(|s| s.supplementary(kind))
            .map(|m| m.create_node())
            .unwrap_or_else(CellContent::empty)
    }

    fn supplementary_section_count(&self, kind: &str) -> usize {
        let Some(kind) = SupplementaryKind::parse(kind) else {
            return 0;
        };
        self.store
            .iter()
            .filter(|s| s.has_supplementary(kind))
            .count()
    }

    fn supplementary_count(&self, kind: &str, section: usize) -> usize {
        let Some(kind) = SupplementaryKind::parse(kind) else {
            return 0;
        };
        self.store
            .get(section)
            .map_or(0, |s| usize::from(s.has_supplementary(kind)))
    }
}

impl<'w, H: CollectionHost + ?Sized, S: SizingPolicy> LayoutInspector for Adapter<'w, H, S> {
    fn constrained_size_for_item(&self, index_path: IndexPath) -> SizeRange {
        self.sizing
            .constrained_size_for_item(&self.layout_context(), index_path)
    }

    fn constrained_size_for_supplementary(&self, kind: &str, index_path: IndexPath) -> SizeRange {
        self.sizing
            .constrained_size_for_supplementary(&self.layout_context(), kind, index_path)
    }

    fn scroll_axis(&self) -> ScrollDirections {
        self.sizing.scrollable_directions()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RecordingHost;
    use core_model::{SECTION_FOOTER_KIND, SECTION_HEADER_KIND, StaticModel};

    fn item(text: &str) -> SharedModel {
        StaticModel::text(text).shared()
    }

    #[test]
    fn construction_registers_kinds_and_roles() {
        let host = RecordingHost::new(320.0).with_layout_inspection(true);
        let _adapter = Adapter::empty(&host);
        assert_eq!(
            host.registered_kinds(),
            vec![SECTION_HEADER_KIND, SECTION_FOOTER_KIND]
        );
        assert_eq!(
            host.registration(),
            Some(Registration {
                data_source: true,
                layout_inspector: true
            })
        );
    }

    #[test]
    fn host_without_inspection_only_gets_data_source() {
        let host = RecordingHost::new(320.0);
        let _adapter = Adapter::empty(&host);
        assert_eq!(
            host.registration(),
            Some(Registration {
                data_source: true,
                layout_inspector: false
            })
        );
    }

    #[test]
    fn content_is_deferred_until_invoked() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        struct Counting(Arc<AtomicUsize>);
        impl core_model::ViewModel for Counting {
            fn create_node(&self) -> CellContent {
                self.0.fetch_add(1, Ordering::SeqCst);
                CellContent::text("counted")
            }
        }

        let calls = Arc::new(AtomicUsize::new(0));
        let host = RecordingHost::new(320.0);
        let adapter = Adapter::new(
            &host,
            vec![SectionModel::new(vec![Arc::new(Counting(calls.clone()))])],
        );
        let block = adapter.content_at(IndexPath::new(0, 0));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let content = std::thread::spawn(block).join().unwrap();
        assert_eq!(content.title(), "counted");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unknown_supplementary_kind_is_harmless() {
        let host = RecordingHost::new(320.0);
        let adapter = Adapter::new(
            &host,
            vec![SectionModel::new(vec![item("a")]).with_header(item("h"))],
        );
        assert!(adapter
            .supplementary_content("badge", IndexPath::new(0, 0))
            .is_empty());
        assert_eq!(adapter.supplementary_section_count("badge"), 0);
        assert_eq!(adapter.supplementary_count("badge", 0), 0);
        assert_eq!(
            adapter
                .supplementary_content(SECTION_HEADER_KIND, IndexPath::new(0, 0))
                .title(),
            "h"
        );
        assert!(adapter
            .supplementary_content(SECTION_FOOTER_KIND, IndexPath::new(0, 0))
            .is_empty());
    }

    #[test]
    fn constrained_size_follows_host_geometry() {
        let host = RecordingHost::new(400.0);
        let adapter = Adapter::empty(&host);
        assert_eq!(adapter.constrained_size().min.width, 368.0);
        assert_eq!(
            adapter.constrained_size_for_item(IndexPath::new(0, 0)),
            adapter.constrained_size()
        );
        assert_eq!(
            adapter.constrained_size_for_supplementary(SECTION_HEADER_KIND, IndexPath::new(0, 0)),
            adapter.constrained_size()
        );
        assert!(adapter.scroll_axis().is_vertical());
    }

    #[test]
    fn custom_sizing_policy_is_consulted() {
        struct Fixed;
        impl SizingPolicy for Fixed {
            fn constrained_size(&self, _ctx: &LayoutContext) -> SizeRange {
                SizeRange::fixed_width(42.0)
            }
        }
        let host = RecordingHost::new(400.0);
        let adapter = Adapter::with_sizing(&host, Vec::new(), Fixed);
        assert_eq!(adapter.constrained_size().max.width, 42.0);
    }
}
