//! Host update vocabulary and the reload commit barrier.
//!
//! The adapter never lets a host observe a half-applied mutation: store
//! changes land first, then the matching `HostUpdate`s are delivered as one
//! [`UpdateBatch`]. A batch is ordered so that section-level structural
//! changes precede item-level changes, which is the order hosts reconcile
//! counts in.
//!
//! Full reloads are the exception. They are delivered on their own and the
//! host hands back a [`CommitWaiter`] that resolves once the reload has been
//! applied, giving callers a synchronous guarantee for teardown paths.

use core_model::IndexPath;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::ops::Range;
use thiserror::Error;

/// A single incremental change the host must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostUpdate {
    /// Half-open range of newly appended section indices.
    InsertSections(Range<usize>),
    InsertItems(Vec<IndexPath>),
    DeleteItems(Vec<IndexPath>),
    /// Discard everything and re-query the data source.
    ReloadData,
}

impl HostUpdate {
    fn is_structural(&self) -> bool {
        matches!(self, HostUpdate::InsertSections(_) | HostUpdate::ReloadData)
    }

    fn is_noop(&self) -> bool {
        match self {
            HostUpdate::InsertSections(r) => r.is_empty(),
            HostUpdate::InsertItems(p) | HostUpdate::DeleteItems(p) => p.is_empty(),
            HostUpdate::ReloadData => false,
        }
    }
}

/// Ordered group of updates applied by the host as one atomic step.
///
/// Invariant: every structural update precedes every item-level update.
/// Pushing keeps that order regardless of call order; updates that change
/// nothing (empty ranges) are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateBatch {
    updates: Vec<HostUpdate>,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(update: HostUpdate) -> Self {
        let mut b = Self::new();
        b.push(update);
        b
    }

    pub fn push(&mut self, update: HostUpdate) {
        if update.is_noop() {
            return;
        }
        if update.is_structural() {
            let at = self
                .updates
                .iter()
                .position(|u| !u.is_structural())
                .unwrap_or(self.updates.len());
            self.updates.insert(at, update);
        } else {
            self.updates.push(update);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn updates(&self) -> &[HostUpdate] {
        &self.updates
    }

    pub fn into_updates(self) -> Vec<HostUpdate> {
        self.updates
    }
}

impl IntoIterator for UpdateBatch {
    type Item = HostUpdate;
    type IntoIter = std::vec::IntoIter<HostUpdate>;

    fn into_iter(self) -> Self::IntoIter {
        self.updates.into_iter()
    }
}

// -------------------------------------------------------------------------------------------------
// Commit barrier
// -------------------------------------------------------------------------------------------------
// A rendezvous between whoever applies a reload (possibly a render thread) and the caller that must
// not continue until the reload is visible. Capacity 1: the signal fires at most once and never
// blocks the host.
// -------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommitError {
    #[error("host dropped the commit signal without applying the update")]
    Disconnected,
}

/// Host side of the barrier. Consumed by `commit`; dropping it unfired
/// releases the waiter with [`CommitError::Disconnected`].
#[derive(Debug)]
pub struct CommitSignal {
    tx: Sender<()>,
}

impl CommitSignal {
    pub fn commit(self) {
        // Receiver may already be gone if the waiter was dropped; nothing to report then.
        let _ = self.tx.send(());
        tracing::trace!(target: "events.commit", "commit_signalled");
    }
}

/// Caller side of the barrier.
#[derive(Debug)]
pub struct CommitWaiter {
    rx: Receiver<()>,
}

impl CommitWaiter {
    /// Waiter that resolves immediately; for hosts that apply synchronously.
    pub fn ready() -> Self {
        let (signal, waiter) = commit_channel();
        signal.commit();
        waiter
    }

    /// Block until the host has applied the update.
    pub fn wait(self) -> Result<(), CommitError> {
        self.rx.recv().map_err(|_| CommitError::Disconnected)
    }

    /// Non-blocking check; `true` once the signal has fired.
    pub fn is_committed(&self) -> bool {
        !self.rx.is_empty()
    }
}

pub fn commit_channel() -> (CommitSignal, CommitWaiter) {
    let (tx, rx) = bounded(1);
    (CommitSignal { tx }, CommitWaiter { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn structural_updates_sort_before_item_updates() {
        let mut b = UpdateBatch::new();
        b.push(HostUpdate::InsertItems(vec![IndexPath::new(0, 0)]));
        b.push(HostUpdate::InsertSections(0..1));
        assert_eq!(
            b.updates(),
            &[
                HostUpdate::InsertSections(0..1),
                HostUpdate::InsertItems(vec![IndexPath::new(0, 0)]),
            ]
        );
    }

    #[test]
    fn structural_updates_keep_relative_order() {
        let mut b = UpdateBatch::new();
        b.push(HostUpdate::DeleteItems(vec![IndexPath::new(1, 0)]));
        b.push(HostUpdate::InsertSections(2..3));
        b.push(HostUpdate::InsertSections(3..4));
        assert_eq!(b.updates()[0], HostUpdate::InsertSections(2..3));
        assert_eq!(b.updates()[1], HostUpdate::InsertSections(3..4));
        assert_eq!(b.len(), 3);
    }

    #[test]
    fn empty_updates_are_dropped() {
        let mut b = UpdateBatch::new();
        b.push(HostUpdate::InsertSections(4..4));
        b.push(HostUpdate::InsertItems(vec![]));
        assert!(b.is_empty());
        assert_eq!(UpdateBatch::single(HostUpdate::ReloadData).len(), 1);
    }

    #[test]
    fn ready_waiter_resolves_immediately() {
        let w = CommitWaiter::ready();
        assert!(w.is_committed());
        assert_eq!(w.wait(), Ok(()));
    }

    #[test]
    fn waiter_blocks_until_signal_from_other_thread() {
        let (signal, waiter) = commit_channel();
        assert!(!waiter.is_committed());
        let h = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            signal.commit();
        });
        assert_eq!(waiter.wait(), Ok(()));
        h.join().unwrap();
    }

    #[test]
    fn dropped_signal_reports_disconnected() {
        let (signal, waiter) = commit_channel();
        drop(signal);
        assert_eq!(waiter.wait(), Err(CommitError::Disconnected));
    }
}
