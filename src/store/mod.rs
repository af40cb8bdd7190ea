//! In-memory snapshot store.
//!
//! Snapshots are kept newest first in a bounded ring. When the ring is full
//! the oldest snapshot is evicted to make room. Every operation takes the one
//! lock guarding the ring, so a reader always sees a `total` that matches the
//! slice it was handed.
//!
//! Nothing here is persisted; the store lives as long as its owner.

use crate::models::RequestSnapshot;
use std::collections::VecDeque;
use std::ops::Range;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::trace;

/// Default number of snapshots retained.
pub const DEFAULT_CAPACITY: usize = 1000;

/// Bounded, newest-first sequence of captured requests.
///
/// Shared between capture and pagination through an `Arc`. Snapshots are
/// stored as `Arc<RequestSnapshot>`, so reads clone pointers, not records.
#[derive(Debug)]
pub struct SnapshotStore {
    entries: RwLock<VecDeque<Arc<RequestSnapshot>>>,
    capacity: usize,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl SnapshotStore {
    /// Creates an empty store holding at most `capacity` snapshots.
    ///
    /// A capacity of zero is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY))),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Prepends a snapshot, evicting the oldest one if the store is full.
    ///
    /// # Returns
    ///
    /// The number of snapshots evicted (0 or 1).
    pub fn push(&self, snapshot: RequestSnapshot) -> usize {
        let mut entries = self.write();

        let mut evicted = 0;
        while entries.len() >= self.capacity {
            entries.pop_back();
            evicted += 1;
        }
        entries.push_front(Arc::new(snapshot));

        trace!(len = entries.len(), evicted, "stored request snapshot");
        evicted
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Returns every stored snapshot, newest first.
    pub fn snapshot(&self) -> Vec<Arc<RequestSnapshot>> {
        self.read().iter().cloned().collect()
    }

    /// Returns the store length together with the snapshots in the range
    /// chosen by `bounds`, both observed under the same lock.
    ///
    /// `bounds` receives the current length. The range it returns is clamped
    /// to the store, so a range at or beyond the end yields an empty slice.
    /// Only the selected entries are visited.
    pub fn page<F>(&self, bounds: F) -> (usize, Vec<Arc<RequestSnapshot>>)
    where
        F: FnOnce(usize) -> Range<usize>,
    {
        let entries = self.read();
        let total = entries.len();

        let Range { start, end } = bounds(total);
        let start = start.min(total);
        let end = end.clamp(start, total);
        let slice = entries.range(start..end).cloned().collect();

        (total, slice)
    }

    /// Removes every snapshot.
    pub fn clear(&self) {
        self.write().clear();
    }

    // The ring holds no multi-step invariant, so a poisoned lock is still
    // safe to use.
    fn read(&self) -> RwLockReadGuard<'_, VecDeque<Arc<RequestSnapshot>>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, VecDeque<Arc<RequestSnapshot>>> {
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
