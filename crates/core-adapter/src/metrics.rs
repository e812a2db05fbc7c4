//! Update notification counters.
//!
//! Relaxed atomics, no locking; read them through `snapshot`. Counts reflect
//! what was delivered to the host, not what callers asked for: a batch that
//! collapses to nothing is not counted.

use core_events::{HostUpdate, UpdateBatch};
use std::sync::atomic::{AtomicU64, Ordering::Relaxed};

#[derive(Debug, Default)]
pub struct UpdateMetrics {
    batches: AtomicU64,
    sections_inserted: AtomicU64,
    items_inserted: AtomicU64,
    items_deleted: AtomicU64,
    reloads: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UpdateMetricsSnapshot {
    pub batches: u64,
    pub sections_inserted: u64,
    pub items_inserted: u64,
    pub items_deleted: u64,
    pub reloads: u64,
}

impl UpdateMetrics {
    pub fn snapshot(&self) -> UpdateMetricsSnapshot {
        UpdateMetricsSnapshot {
            batches: self.batches.load(Relaxed),
            sections_inserted: self.sections_inserted.load(Relaxed),
            items_inserted: self.items_inserted.load(Relaxed),
            items_deleted: self.items_deleted.load(Relaxed),
            reloads: self.reloads.load(Relaxed),
        }
    }

    pub(crate) fn record_batch(&self, batch: &UpdateBatch) {
        self.batches.fetch_add(1, Relaxed);
        for update in batch.updates() {
            match update {
                HostUpdate::InsertSections(r) => {
                    self.sections_inserted.fetch_add(r.len() as u64, Relaxed);
                }
                HostUpdate::InsertItems(p) => {
                    self.items_inserted.fetch_add(p.len() as u64, Relaxed);
                }
                HostUpdate::DeleteItems(p) => {
                    self.items_deleted.fetch_add(p.len() as u64, Relaxed);
                }
                HostUpdate::ReloadData => {
                    self.reloads.fetch_add(1, Relaxed);
                }
            }
        }
    }

    pub(crate) fn record_reload(&self) {
        self.reloads.fetch_add(1, Relaxed);
    }
}
