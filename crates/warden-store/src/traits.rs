use warden_types::{MetaPatch, ObjectId, ObjectMeta};

use crate::error::StoreResult;

/// Paired metadata/content store keyed by [`ObjectId`].
///
/// All implementations must satisfy these invariants:
/// - Absence is reported through `Option`/`bool`, never as `Err`.
/// - Update operations never bring an object into existence.
/// - `delete` removes both records, and fails without side effects if either
///   record is already missing.
/// - The store never looks at user identities; `owner` and `readers` are just
///   data to it.
/// - All I/O errors are propagated, never silently ignored.
pub trait BlobStore: Send + Sync {
    /// Persist metadata and content for a new object.
    ///
    /// No uniqueness check is made: callers supply freshly generated ids.
    fn create(&self, meta: &ObjectMeta, content: &[u8]) -> StoreResult<()>;

    /// Read the content bytes, or `None` if there are none.
    fn read_content(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>>;

    /// Read the metadata record, or `None` if there is none.
    fn read_meta(&self, id: &ObjectId) -> StoreResult<Option<ObjectMeta>>;

    /// Replace the content of an existing object.
    ///
    /// Returns `false` (and writes nothing) if the object has no content.
    fn update_content(&self, id: &ObjectId, content: &[u8]) -> StoreResult<bool>;

    /// Replace the whole metadata record of an existing object.
    ///
    /// Returns `false` (and writes nothing) if no metadata exists for `meta.id`.
    fn update_meta(&self, meta: &ObjectMeta) -> StoreResult<bool>;

    /// Remove both records. Returns `false` if either was already missing.
    fn delete(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Ids of every object with a metadata record, sorted ascending.
    fn list_ids(&self) -> StoreResult<Vec<ObjectId>>;

    /// Returns `true` only if both records are present.
    fn exists(&self, id: &ObjectId) -> StoreResult<bool>;

    /// Read metadata and content together; `None` if either is missing.
    fn read_both(&self, id: &ObjectId) -> StoreResult<Option<(ObjectMeta, Vec<u8>)>> {
        let Some(meta) = self.read_meta(id)? else {
            return Ok(None);
        };
        Ok(self.read_content(id)?.map(|content| (meta, content)))
    }

    /// Apply a partial metadata update. Returns `false` if the object is absent.
    ///
    /// Default implementation is read-modify-write over [`Self::read_meta`]
    /// and [`Self::update_meta`]; it is not atomic with respect to other
    /// writers of the same id.
    fn patch_meta(&self, id: &ObjectId, patch: &MetaPatch) -> StoreResult<bool> {
        let Some(mut meta) = self.read_meta(id)? else {
            return Ok(false);
        };
        meta.apply(patch);
        self.update_meta(&meta)
    }
}
