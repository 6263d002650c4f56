//! Per-object mutual exclusion for read-modify-write updates.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use warden_types::ObjectId;

/// Lock table keyed by object id.
///
/// Each id maps to its own mutex, so writers of different objects never
/// contend. The unit mutex guards no data: a panicking holder leaves nothing
/// half-updated in memory, so poisoning is ignored.
#[derive(Debug, Default)]
pub(crate) struct LockTable {
    slots: Mutex<HashMap<ObjectId, Arc<Mutex<()>>>>,
}

impl LockTable {
    fn table(&self) -> MutexGuard<'_, HashMap<ObjectId, Arc<Mutex<()>>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The mutex for `id`, created on first use.
    pub(crate) fn slot(&self, id: &ObjectId) -> Arc<Mutex<()>> {
        Arc::clone(self.table().entry(*id).or_default())
    }

    /// Run `f` while holding the lock for `id`.
    pub(crate) fn with<T>(&self, id: &ObjectId, f: impl FnOnce() -> T) -> T {
        let slot = self.slot(id);
        let _guard = slot.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(%id, "holding object lock");
        f()
    }

    /// Drop the slot for `id`. Threads already holding its `Arc` finish normally.
    pub(crate) fn forget(&self, id: &ObjectId) {
        self.table().remove(id);
    }

    /// Number of live slots.
    pub(crate) fn len(&self) -> usize {
        self.table().len()
    }
}
