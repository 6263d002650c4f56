use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;
use warden_types::{ObjectId, ObjectMeta};

use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

#[derive(Default)]
struct Records {
    metas: HashMap<ObjectId, ObjectMeta>,
    contents: HashMap<ObjectId, Vec<u8>>,
}

/// In-memory, HashMap-based blob store.
///
/// Intended for tests and embedding. Both record maps live behind a single
/// `RwLock`, so `create` and `delete` are atomic with respect to readers.
/// Records are cloned on read/write. Data is lost when the store is dropped.
pub struct InMemoryBlobStore {
    records: RwLock<Records>,
}

impl InMemoryBlobStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Records::default()),
        }
    }

    fn read_lock(&self) -> StoreResult<RwLockReadGuard<'_, Records>> {
        self.records
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write_lock(&self) -> StoreResult<RwLockWriteGuard<'_, Records>> {
        self.records
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    /// Number of objects with a metadata record.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_lock()?.metas.len())
    }

    /// Returns `true` if the store holds no metadata records.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobStore for InMemoryBlobStore {
    fn create(&self, meta: &ObjectMeta, content: &[u8]) -> StoreResult<()> {
        let mut records = self.write_lock()?;
        records.contents.insert(meta.id, content.to_vec());
        records.metas.insert(meta.id, meta.clone());
        debug!(id = %meta.id, bytes = content.len(), "created object in memory");
        Ok(())
    }

    fn read_content(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_lock()?.contents.get(id).cloned())
    }

    fn read_meta(&self, id: &ObjectId) -> StoreResult<Option<ObjectMeta>> {
        Ok(self.read_lock()?.metas.get(id).cloned())
    }

    fn update_content(&self, id: &ObjectId, content: &[u8]) -> StoreResult<bool> {
        let mut records = self.write_lock()?;
        match records.contents.get_mut(id) {
            Some(slot) => {
                *slot = content.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn update_meta(&self, meta: &ObjectMeta) -> StoreResult<bool> {
        let mut records = self.write_lock()?;
        match records.metas.get_mut(&meta.id) {
            Some(slot) => {
                *slot = meta.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let mut records = self.write_lock()?;
        if !records.metas.contains_key(id) || !records.contents.contains_key(id) {
            return Ok(false);
        }
        records.metas.remove(id);
        records.contents.remove(id);
        debug!(%id, "deleted object from memory");
        Ok(true)
    }

    fn list_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let records = self.read_lock()?;
        let mut ids: Vec<ObjectId> = records.metas.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        let records = self.read_lock()?;
        Ok(records.metas.contains_key(id) && records.contents.contains_key(id))
    }
}

impl std::fmt::Debug for InMemoryBlobStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len().unwrap_or_default();
        f.debug_struct("InMemoryBlobStore")
            .field("object_count", &count)
            .finish()
    }
}
