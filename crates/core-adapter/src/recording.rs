//! In-memory collection host.
//!
//! `RecordingHost` keeps every batch it receives and mirrors the section and
//! item counts it has been told about by replaying those batches, which is
//! exactly what a real widget does before it queries again. Sections arriving
//! through `InsertSections` are pending until [`RecordingHost::settle`] reads
//! their item counts from the data source, the way a widget lays out newly
//! inserted sections. Updates that do not fit the mirror panic. Comparing the
//! mirror with the data source's answers checks the adapter's consistency
//! contract without a UI. Headless renderers use it as a null widget.
//!
//! Reload commits are acknowledged immediately by default, or from a helper
//! thread after a delay (`with_deferred_commit`) to exercise the blocking
//! barrier in `clear_data`.

use crate::adapter::CollectionDataSource;
use crate::host::{CollectionHost, Insets, Registration};
use core_events::{CommitWaiter, HostUpdate, UpdateBatch, commit_channel};
use std::cell::{Cell, RefCell};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

#[derive(Debug)]
pub struct RecordingHost {
    frame_width: f32,
    insets: Option<Insets>,
    layout_inspection: bool,
    commit_delay: Option<Duration>,
    registered_kinds: RefCell<Vec<&'static str>>,
    registration: Cell<Option<Registration>>,
    batches: RefCell<Vec<UpdateBatch>>,
    reloads: Cell<usize>,
    commits: Arc<AtomicUsize>,
    mirror: RefCell<Vec<Option<usize>>>,
}

impl RecordingHost {
    pub fn new(frame_width: f32) -> Self {
        Self {
            frame_width,
            insets: None,
            layout_inspection: false,
            commit_delay: None,
            registered_kinds: RefCell::new(Vec::new()),
            registration: Cell::new(None),
            batches: RefCell::new(Vec::new()),
            reloads: Cell::new(0),
            commits: Arc::new(AtomicUsize::new(0)),
            mirror: RefCell::new(Vec::new()),
        }
    }

    pub fn with_insets(mut self, insets: Insets) -> Self {
        self.insets = Some(insets);
        self
    }

    pub fn with_layout_inspection(mut self, enabled: bool) -> Self {
        self.layout_inspection = enabled;
        self
    }

    /// Acknowledge reloads from a helper thread after `delay`.
    pub fn with_deferred_commit(mut self, delay: Duration) -> Self {
        self.commit_delay = Some(delay);
        self
    }

    pub fn registered_kinds(&self) -> Vec<&'static str> {
        self.registered_kinds.borrow().clone()
    }

    pub fn registration(&self) -> Option<Registration> {
        self.registration.get()
    }

    pub fn batches(&self) -> Vec<UpdateBatch> {
        self.batches.borrow().clone()
    }

    /// Drain recorded batches, leaving the mirror untouched.
    pub fn take_batches(&self) -> Vec<UpdateBatch> {
        std::mem::take(&mut *self.batches.borrow_mut())
    }

    /// Every recorded update in delivery order, flattened across batches.
    pub fn updates(&self) -> Vec<HostUpdate> {
        self.batches
            .borrow()
            .iter()
            .flat_map(|b| b.updates().iter().cloned())
            .collect()
    }

    pub fn reload_count(&self) -> usize {
        self.reloads.get()
    }

    /// Number of reloads acknowledged through the commit barrier.
    pub fn commit_count(&self) -> usize {
        self.commits.load(Ordering::SeqCst)
    }

    pub fn known_section_count(&self) -> usize {
        self.mirror.borrow().len()
    }

    /// Item count of a settled section; `None` when unknown or pending.
    pub fn known_item_count(&self, section: usize) -> Option<usize> {
        self.mirror.borrow().get(section).copied().flatten()
    }

    pub fn known_counts(&self) -> Vec<Option<usize>> {
        self.mirror.borrow().clone()
    }

    /// Re-query every count from `source`, as a widget does after a reload.
    pub fn resync(&self, source: &dyn CollectionDataSource) {
        let counts = (0..source.section_count())
            .map(|s| Some(source.item_count(s)))
            .collect();
        *self.mirror.borrow_mut() = counts;
    }

    /// Read item counts for pending sections from `source`. Settled
    /// sections keep the counts replayed from updates.
    pub fn settle(&self, source: &dyn CollectionDataSource) {
        for (section, count) in self.mirror.borrow_mut().iter_mut().enumerate() {
            if count.is_none() {
                *count = Some(source.item_count(section));
            }
        }
    }

    /// Apply one update to the mirror, rejecting anything a widget holding
    /// these counts would refuse.
    fn replay(&self, update: &HostUpdate) {
        let mut mirror = self.mirror.borrow_mut();
        match update {
            HostUpdate::InsertSections(range) => {
                assert!(
                    range.start <= mirror.len(),
                    "InsertSections({range:?}) past known section count {}",
                    mirror.len()
                );
                for at in range.clone() {
                    mirror.insert(at, None);
                }
            }
            HostUpdate::InsertItems(paths) => {
                for p in paths {
                    let known = mirror.len();
                    let Some(slot) = mirror.get_mut(p.section) else {
                        panic!("InsertItems at {p} but only {known} sections are known");
                    };
                    // Pending sections pick the items up when they settle.
                    if let Some(n) = slot {
                        assert!(p.item <= *n, "InsertItems at {p} past item count {n}");
                        *n += 1;
                    }
                }
            }
            HostUpdate::DeleteItems(paths) => {
                for p in paths {
                    let known = mirror.len();
                    let Some(slot) = mirror.get_mut(p.section) else {
                        panic!("DeleteItems at {p} but only {known} sections are known");
                    };
                    if let Some(n) = slot {
                        assert!(p.item < *n, "DeleteItems at {p} but item count is {n}");
                        *n -= 1;
                    }
                }
            }
            HostUpdate::ReloadData => mirror.clear(),
        }
    }
}

impl CollectionHost for RecordingHost {
    fn register_supplementary_kind(&self, kind: &'static str) {
        self.registered_kinds.borrow_mut().push(kind);
    }

    fn attach(&self, registration: Registration) {
        self.registration.set(Some(registration));
    }

    fn supports_layout_inspection(&self) -> bool {
        self.layout_inspection
    }

    fn frame_width(&self) -> f32 {
        self.frame_width
    }

    fn section_insets(&self) -> Option<Insets> {
        self.insets
    }

    fn apply(&self, batch: UpdateBatch) {
        for update in batch.updates() {
            self.replay(update);
        }
        self.batches.borrow_mut().push(batch);
    }

    fn reload_data(&self) -> CommitWaiter {
        self.reloads.set(self.reloads.get() + 1);
        // A reload drops the host's view of the data; `resync` rebuilds it.
        self.replay(&HostUpdate::ReloadData);

        let (signal, waiter) = commit_channel();
        let commits = Arc::clone(&self.commits);
        match self.commit_delay {
            None => {
                commits.fetch_add(1, Ordering::SeqCst);
                signal.commit();
            }
            Some(delay) => {
                thread::spawn(move || {
                    thread::sleep(delay);
                    commits.fetch_add(1, Ordering::SeqCst);
                    signal.commit();
                });
            }
        }
        waiter
    }
}
