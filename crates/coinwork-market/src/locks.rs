//! Per-entity mutual-exclusion registry.
//!
//! The stores are individually atomic, but the marketplace's multi-write
//! sequences (refund-then-delete, flip-then-credit) span stores. Each such
//! sequence runs while holding the lock of its primary entity, so two
//! requests targeting the same task, submission, or withdrawal are
//! serialized. Account balances are only ever touched through single atomic
//! store deltas, so accounts need no entity lock of their own and no
//! operation ever holds two registry locks at once.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;

/// Registry handing out one mutex per entity key.
///
/// Lock handles are keyed by a kind-prefixed string so task ids can never
/// collide with submission ids. Handles are created on first use and
/// evicted once the entity is deleted or reaches a terminal status, so the
/// registry does not grow with every entity ever touched.
///
/// Eviction invariant: a key may only be evicted after the write that made
/// the entity terminal (or deleted it) has committed. A fresh handle handed
/// out after eviction does not exclude a holder of the old one, but by then
/// every operation on the entity fails its status or existence check.
#[derive(Debug, Default)]
pub(crate) struct EntityLocks {
    inner: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl EntityLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn handle(&self, key: String) -> Arc<Mutex<()>> {
        Arc::clone(self.inner.lock().entry(key).or_default())
    }

    fn evict(&self, key: &str) {
        self.inner.lock().remove(key);
    }

    /// The lock serializing mutations of one task.
    pub(crate) fn task(&self, task_id: &str) -> Arc<Mutex<()>> {
        self.handle(format!("task:{task_id}"))
    }

    /// The lock serializing mutations of one submission.
    pub(crate) fn submission(&self, submission_id: &str) -> Arc<Mutex<()>> {
        self.handle(format!("submission:{submission_id}"))
    }

    /// The lock serializing mutations of one withdrawal.
    pub(crate) fn withdrawal(&self, withdrawal_id: &str) -> Arc<Mutex<()>> {
        self.handle(format!("withdrawal:{withdrawal_id}"))
    }

    /// Drops the lock entry of a deleted task.
    pub(crate) fn evict_task(&self, task_id: &str) {
        self.evict(&format!("task:{task_id}"));
    }

    /// Drops the lock entry of a terminal submission.
    pub(crate) fn evict_submission(&self, submission_id: &str) {
        self.evict(&format!("submission:{submission_id}"));
    }

    /// Drops the lock entry of a terminal withdrawal.
    pub(crate) fn evict_withdrawal(&self, withdrawal_id: &str) {
        self.evict(&format!("withdrawal:{withdrawal_id}"));
    }

    /// Number of live lock entries.
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().len()
    }
}
