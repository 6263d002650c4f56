use std::sync::Arc;

use tracing::{debug, info, warn};
use warden_store::BlobStore;
use warden_types::{
    validate_identity, validate_name, Extra, MetaPatch, ObjectId, ObjectMeta, ObjectSummary,
    ReaderSet,
};

use crate::config::AccessConfig;
use crate::error::{AccessError, AccessResult};
use crate::locks::LockTable;
use crate::permission::Operation;

// ---------------------------------------------------------------------------
// NewObject
// ---------------------------------------------------------------------------

/// Everything needed to create an object, apart from its owner.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NewObject {
    pub name: String,
    pub content: Vec<u8>,
    pub readers: ReaderSet,
    pub extra: Extra,
}

impl NewObject {
    /// An object readable only by its owner.
    pub fn new(name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content,
            ..Default::default()
        }
    }

    /// Grant read access to additional identities.
    pub fn with_readers<I, S>(mut self, readers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.readers.extend(readers.into_iter().map(Into::into));
        self
    }

    /// Attach opaque extra data.
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }
}

// ---------------------------------------------------------------------------
// AccessService
// ---------------------------------------------------------------------------

/// Authorization-enforcing façade over a [`BlobStore`].
///
/// Every id-addressed call resolves the object first (`NotFound` if either
/// half is missing), then checks the permission its [`Operation`] requires
/// (`Forbidden`), and only then validates caller input (`InvalidInput`).
/// Mutations of one object are serialized through a per-object lock.
pub struct AccessService {
    store: Arc<dyn BlobStore>,
    config: AccessConfig,
    locks: LockTable,
}

impl AccessService {
    /// Create a service with default limits.
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self::with_config(store, AccessConfig::default())
    }

    /// Create a service with explicit limits.
    pub fn with_config(store: Arc<dyn BlobStore>, config: AccessConfig) -> Self {
        Self {
            store,
            config,
            locks: LockTable::default(),
        }
    }

    /// The active limits.
    pub fn config(&self) -> &AccessConfig {
        &self.config
    }

    // ---- Creation and listing ----

    /// Create an object owned by `owner` and return its fresh id.
    ///
    /// The owner is always added to the reader set, whatever `object.readers` says.
    pub fn create_object(&self, owner: &str, object: NewObject) -> AccessResult<ObjectId> {
        validate_identity(owner, self.config.max_identity_len)?;
        self.check_name(&object.name)?;
        self.check_identities(&object.readers)?;

        let id = ObjectId::generate();
        let meta = ObjectMeta::new(id, object.name, owner, object.readers).with_extra(object.extra);
        self.store.create(&meta, &object.content)?;
        info!(%id, owner, readers = meta.readers.len(), bytes = object.content.len(), "created object");
        Ok(id)
    }

    /// Summaries of every complete object `user` may read, sorted by id.
    pub fn list_accessible(&self, user: &str) -> AccessResult<Vec<ObjectSummary>> {
        let mut out = Vec::new();
        for id in self.store.list_ids()? {
            // Deleted between listing and reading: skip.
            let Some(mut meta) = self.store.read_meta(&id)? else {
                continue;
            };
            meta.ensure_owner_reader();
            if meta.can_read(user) && self.store.exists(&id)? {
                out.push(meta.summary());
            }
        }
        debug!(user, count = out.len(), "listed accessible objects");
        Ok(out)
    }

    // ---- Reads ----

    /// Content bytes of `id`.
    pub fn read_content(&self, user: &str, id: &ObjectId) -> AccessResult<Vec<u8>> {
        self.authorize(user, id, Operation::ReadContent)?;
        self.store
            .read_content(id)?
            .ok_or(AccessError::NotFound(*id))
    }

    /// Full metadata of `id`.
    pub fn read_meta(&self, user: &str, id: &ObjectId) -> AccessResult<ObjectMeta> {
        self.authorize(user, id, Operation::ReadMeta)
    }

    /// Reader set of `id`.
    pub fn readers(&self, user: &str, id: &ObjectId) -> AccessResult<ReaderSet> {
        Ok(self.authorize(user, id, Operation::ReadReaders)?.readers)
    }

    // ---- Owner-only mutations ----

    /// Replace the content of `id`.
    pub fn update_content(&self, user: &str, id: &ObjectId, content: &[u8]) -> AccessResult<()> {
        self.locked(id, || {
            self.authorize(user, id, Operation::ReplaceContent)?;
            if !self.store.update_content(id, content)? {
                return Err(AccessError::NotFound(*id));
            }
            info!(%id, bytes = content.len(), "replaced content");
            Ok(())
        })
    }

    /// Change the display name of `id`.
    pub fn rename(&self, user: &str, id: &ObjectId, new_name: &str) -> AccessResult<()> {
        self.locked(id, || {
            self.authorize(user, id, Operation::Rename)?;
            self.check_name(new_name)?;
            self.patch(id, &MetaPatch::rename(new_name))?;
            info!(%id, name = new_name, "renamed object");
            Ok(())
        })
    }

    /// Replace the reader set of `id`. The owner is kept regardless of `readers`.
    pub fn set_readers<I, S>(&self, user: &str, id: &ObjectId, readers: I) -> AccessResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut readers: ReaderSet = readers.into_iter().map(Into::into).collect();
        self.locked(id, || {
            let meta = self.authorize(user, id, Operation::SetReaders)?;
            self.check_identities(&readers)?;
            readers.insert(meta.owner);
            let count = readers.len();
            self.patch(id, &MetaPatch::readers(readers))?;
            info!(%id, readers = count, "replaced reader set");
            Ok(())
        })
    }

    /// Grant `target` read access to `id`. Granting an existing reader is a no-op.
    pub fn add_reader(&self, user: &str, id: &ObjectId, target: &str) -> AccessResult<()> {
        self.locked(id, || {
            let mut meta = self.authorize(user, id, Operation::AddReader)?;
            validate_identity(target, self.config.max_identity_len)?;
            if !meta.readers.insert(target.to_string()) {
                return Ok(());
            }
            self.patch(id, &MetaPatch::readers(meta.readers))?;
            info!(%id, target, "added reader");
            Ok(())
        })
    }

    /// Revoke `target`'s read access to `id`.
    ///
    /// Revoking the owner, or someone who is not a reader, silently does nothing.
    pub fn remove_reader(&self, user: &str, id: &ObjectId, target: &str) -> AccessResult<()> {
        self.locked(id, || {
            let mut meta = self.authorize(user, id, Operation::RemoveReader)?;
            if meta.is_owner(target) || !meta.readers.remove(target) {
                debug!(%id, target, "reader removal skipped");
                return Ok(());
            }
            self.patch(id, &MetaPatch::readers(meta.readers))?;
            info!(%id, target, "removed reader");
            Ok(())
        })
    }

    /// Remove `id` entirely.
    pub fn delete_object(&self, user: &str, id: &ObjectId) -> AccessResult<()> {
        let result = self.locked(id, || {
            self.authorize(user, id, Operation::Delete)?;
            if !self.store.delete(id)? {
                return Err(AccessError::NotFound(*id));
            }
            info!(%id, "deleted object");
            Ok(())
        });
        if result.is_ok() {
            self.locks.forget(id);
        }
        result
    }

    // ---- Internals ----

    /// Current metadata of a complete object.
    fn resolve(&self, id: &ObjectId) -> AccessResult<ObjectMeta> {
        let mut meta = self
            .store
            .read_meta(id)?
            .ok_or(AccessError::NotFound(*id))?;
        if !self.store.exists(id)? {
            warn!(%id, "metadata without content; treating as missing");
            return Err(AccessError::NotFound(*id));
        }
        if meta.ensure_owner_reader() {
            warn!(%id, owner = %meta.owner, "stored reader set lacked its owner");
        }
        Ok(meta)
    }

    /// Resolve `id`, then check that `user` may perform `operation` on it.
    fn authorize(&self, user: &str, id: &ObjectId, operation: Operation) -> AccessResult<ObjectMeta> {
        let meta = self.resolve(id)?;
        if !operation.required().is_granted(&meta, user) {
            warn!(%id, user, %operation, "access denied");
            return Err(AccessError::Forbidden {
                id: *id,
                user: user.to_string(),
                operation,
            });
        }
        Ok(meta)
    }

    /// Run a mutation under the object's lock. Slots for missing ids are
    /// dropped so probing random ids does not grow the table.
    fn locked<T>(&self, id: &ObjectId, f: impl FnOnce() -> AccessResult<T>) -> AccessResult<T> {
        let result = self.locks.with(id, f);
        if matches!(result, Err(AccessError::NotFound(_))) {
            self.locks.forget(id);
        }
        result
    }

    fn patch(&self, id: &ObjectId, patch: &MetaPatch) -> AccessResult<()> {
        if !self.store.patch_meta(id, patch)? {
            return Err(AccessError::NotFound(*id));
        }
        Ok(())
    }

    fn check_name(&self, name: &str) -> AccessResult<()> {
        Ok(validate_name(name, self.config.max_name_len)?)
    }

    fn check_identities<'a>(&self, identities: impl IntoIterator<Item = &'a String>) -> AccessResult<()> {
        for identity in identities {
            validate_identity(identity, self.config.max_identity_len)?;
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn lock_slots(&self) -> usize {
        self.locks.len()
    }
}

impl std::fmt::Debug for AccessService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessService")
            .field("config", &self.config)
            .field("lock_slots", &self.locks.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_store::{FsBlobStore, InMemoryBlobStore, StoreError};

    fn service() -> (Arc<InMemoryBlobStore>, AccessService) {
        let store = Arc::new(InMemoryBlobStore::new());
        let svc = AccessService::new(store.clone());
        (store, svc)
    }

    fn readers(names: &[&str]) -> ReaderSet {
        names.iter().map(|s| s.to_string()).collect()
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    #[test]
    fn create_and_read_round_trip() {
        let (_, svc) = service();
        let id = svc
            .create_object("alice", NewObject::new("demo.txt", b"hello".to_vec()))
            .unwrap();

        assert_eq!(svc.read_content("alice", &id).unwrap(), b"hello");
        let meta = svc.read_meta("alice", &id).unwrap();
        assert_eq!(meta.name, "demo.txt");
        assert_eq!(meta.owner, "alice");
        assert_eq!(meta.readers, readers(&["alice"]));
    }

    #[test]
    fn create_merges_initial_readers_with_owner() {
        let (_, svc) = service();
        let id = svc
            .create_object("alice", NewObject::new("f", vec![1u8]).with_readers(["bob", "carol"]))
            .unwrap();
        assert_eq!(svc.readers("bob", &id).unwrap(), readers(&["alice", "bob", "carol"]));
    }

    #[test]
    fn create_keeps_extra() {
        let (store, svc) = service();
        let mut extra = Extra::new();
        extra.insert("mime".into(), serde_json::json!("text/plain"));
        let id = svc
            .create_object("alice", NewObject::new("f", vec![]).with_extra(extra.clone()))
            .unwrap();
        assert_eq!(store.read_meta(&id).unwrap().unwrap().extra, extra);
    }

    #[test]
    fn create_rejects_bad_input() {
        let (store, svc) = service();
        let err = svc.create_object("alice", NewObject::new("  ", vec![])).unwrap_err();
        assert!(matches!(err, AccessError::InvalidInput(_)));

        let err = svc
            .create_object("alice", NewObject::new("ok", vec![]).with_readers(["bad name"]))
            .unwrap_err();
        assert!(matches!(err, AccessError::InvalidInput(_)));
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn create_rejects_malformed_owner() {
        let (store, svc) = service();
        for owner in ["", "a b"] {
            let err = svc.create_object(owner, NewObject::new("f", vec![])).unwrap_err();
            assert!(matches!(err, AccessError::InvalidInput(_)), "accepted owner {owner:?}");
        }
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn create_ids_are_unique() {
        let (_, svc) = service();
        let a = svc.create_object("alice", NewObject::new("same", vec![])).unwrap();
        let b = svc.create_object("alice", NewObject::new("same", vec![])).unwrap();
        assert_ne!(a, b);
    }

    // -----------------------------------------------------------------------
    // Check ordering
    // -----------------------------------------------------------------------

    #[test]
    fn not_found_for_every_operation() {
        let (_, svc) = service();
        let ghost = ObjectId::generate();

        assert!(svc.read_content("alice", &ghost).unwrap_err().is_not_found());
        assert!(svc.read_meta("alice", &ghost).unwrap_err().is_not_found());
        assert!(svc.readers("alice", &ghost).unwrap_err().is_not_found());
        assert!(svc.update_content("alice", &ghost, b"x").unwrap_err().is_not_found());
        assert!(svc.rename("alice", &ghost, "n").unwrap_err().is_not_found());
        assert!(svc.set_readers("alice", &ghost, ["bob"]).unwrap_err().is_not_found());
        assert!(svc.add_reader("alice", &ghost, "bob").unwrap_err().is_not_found());
        assert!(svc.remove_reader("alice", &ghost, "bob").unwrap_err().is_not_found());
        assert!(svc.delete_object("alice", &ghost).unwrap_err().is_not_found());
    }

    #[test]
    fn forbidden_precedes_invalid_input() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("f", vec![])).unwrap();
        assert!(svc.rename("bob", &id, "").unwrap_err().is_forbidden());
        assert!(svc.add_reader("bob", &id, "has space").unwrap_err().is_forbidden());
    }

    #[test]
    fn not_found_precedes_invalid_input() {
        let (_, svc) = service();
        let ghost = ObjectId::generate();
        assert!(svc.rename("alice", &ghost, "").unwrap_err().is_not_found());
    }

    #[test]
    fn reader_may_read_but_not_mutate() {
        let (_, svc) = service();
        let id = svc
            .create_object("alice", NewObject::new("f", b"v1".to_vec()).with_readers(["bob"]))
            .unwrap();

        assert_eq!(svc.read_content("bob", &id).unwrap(), b"v1");
        assert!(svc.update_content("bob", &id, b"v2").unwrap_err().is_forbidden());
        assert!(svc.rename("bob", &id, "mine").unwrap_err().is_forbidden());
        assert!(svc.add_reader("bob", &id, "carol").unwrap_err().is_forbidden());
        assert!(svc.remove_reader("bob", &id, "bob").unwrap_err().is_forbidden());
        assert!(svc.set_readers("bob", &id, ["bob"]).unwrap_err().is_forbidden());
        assert!(svc.delete_object("bob", &id).unwrap_err().is_forbidden());
    }

    #[test]
    fn forbidden_carries_operation() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("f", vec![])).unwrap();
        match svc.read_meta("mallory", &id).unwrap_err() {
            AccessError::Forbidden { user, operation, .. } => {
                assert_eq!(user, "mallory");
                assert_eq!(operation, Operation::ReadMeta);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    #[test]
    fn owner_updates_content() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("file.txt", b"v1".to_vec())).unwrap();
        svc.update_content("alice", &id, b"v2").unwrap();
        assert_eq!(svc.read_content("alice", &id).unwrap(), b"v2");
    }

    #[test]
    fn rename_changes_name_only() {
        let (_, svc) = service();
        let id = svc
            .create_object("alice", NewObject::new("oldname.txt", b"data".to_vec()).with_readers(["bob"]))
            .unwrap();
        svc.rename("alice", &id, "newname.txt").unwrap();

        let meta = svc.read_meta("alice", &id).unwrap();
        assert_eq!(meta.name, "newname.txt");
        assert_eq!(meta.readers, readers(&["alice", "bob"]));
        assert_eq!(svc.read_content("alice", &id).unwrap(), b"data");
    }

    #[test]
    fn set_readers_replaces_and_keeps_owner() {
        let (_, svc) = service();
        let id = svc
            .create_object("alice", NewObject::new("f", vec![]).with_readers(["carol"]))
            .unwrap();
        svc.set_readers("alice", &id, ["bob"]).unwrap();
        assert_eq!(svc.readers("alice", &id).unwrap(), readers(&["alice", "bob"]));

        svc.set_readers("alice", &id, Vec::<String>::new()).unwrap();
        assert_eq!(svc.readers("alice", &id).unwrap(), readers(&["alice"]));
    }

    #[test]
    fn set_readers_validates_every_entry() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("f", vec![])).unwrap();
        let err = svc.set_readers("alice", &id, ["bob", ""]).unwrap_err();
        assert!(matches!(err, AccessError::InvalidInput(_)));
        assert_eq!(svc.readers("alice", &id).unwrap(), readers(&["alice"]));
    }

    #[test]
    fn add_reader_is_idempotent() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("f", vec![])).unwrap();
        svc.add_reader("alice", &id, "bob").unwrap();
        let once = svc.readers("alice", &id).unwrap();
        svc.add_reader("alice", &id, "bob").unwrap();
        assert_eq!(svc.readers("alice", &id).unwrap(), once);
    }

    #[test]
    fn remove_owner_is_silently_ignored() {
        let (_, svc) = service();
        let id = svc
            .create_object("alice", NewObject::new("f", vec![]).with_readers(["bob"]))
            .unwrap();
        svc.remove_reader("alice", &id, "alice").unwrap();
        assert_eq!(svc.readers("alice", &id).unwrap(), readers(&["alice", "bob"]));
    }

    #[test]
    fn remove_non_member_is_noop() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("f", vec![])).unwrap();
        svc.remove_reader("alice", &id, "nobody").unwrap();
        assert_eq!(svc.readers("alice", &id).unwrap(), readers(&["alice"]));
    }

    #[test]
    fn delete_then_everything_is_not_found() {
        let (store, svc) = service();
        let id = svc.create_object("alice", NewObject::new("todelete.txt", b"temp".to_vec())).unwrap();

        assert!(svc.delete_object("bob", &id).unwrap_err().is_forbidden());
        svc.delete_object("alice", &id).unwrap();

        assert!(svc.read_content("alice", &id).unwrap_err().is_not_found());
        assert!(svc.update_content("alice", &id, b"x").unwrap_err().is_not_found());
        assert!(svc.delete_object("alice", &id).unwrap_err().is_not_found());
        assert!(svc.read_content("bob", &id).unwrap_err().is_not_found());
        assert!(store.is_empty().unwrap());
    }

    // -----------------------------------------------------------------------
    // Listing
    // -----------------------------------------------------------------------

    #[test]
    fn list_accessible_filters_by_reader() {
        let (_, svc) = service();
        let a = svc.create_object("alice", NewObject::new("a", vec![])).unwrap();
        let b = svc
            .create_object("alice", NewObject::new("b", vec![]).with_readers(["bob"]))
            .unwrap();
        let c = svc.create_object("bob", NewObject::new("c", vec![])).unwrap();

        let alice: Vec<_> = svc.list_accessible("alice").unwrap().into_iter().map(|s| s.id).collect();
        let bob: Vec<_> = svc.list_accessible("bob").unwrap().into_iter().map(|s| s.id).collect();

        assert!(alice.contains(&a) && alice.contains(&b) && !alice.contains(&c));
        assert!(!bob.contains(&a) && bob.contains(&b) && bob.contains(&c));
        assert!(svc.list_accessible("carol").unwrap().is_empty());
    }

    #[test]
    fn list_accessible_is_stable() {
        let (_, svc) = service();
        for i in 0..5 {
            svc.create_object("alice", NewObject::new(format!("f{i}"), vec![])).unwrap();
        }
        let first = svc.list_accessible("alice").unwrap();
        assert_eq!(first, svc.list_accessible("alice").unwrap());
        for w in first.windows(2) {
            assert!(w[0].id < w[1].id);
        }
    }

    #[test]
    fn list_summary_fields() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("report", vec![])).unwrap();
        let listed = svc.list_accessible("alice").unwrap();
        assert_eq!(
            listed,
            vec![ObjectSummary { id, name: "report".into(), owner: "alice".into() }]
        );
    }

    // -----------------------------------------------------------------------
    // Partial records
    // -----------------------------------------------------------------------

    #[test]
    fn metadata_without_content_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsBlobStore::at(dir.path()).unwrap());
        let svc = AccessService::new(store.clone());
        let id = svc.create_object("alice", NewObject::new("half", b"x".to_vec())).unwrap();
        std::fs::remove_file(dir.path().join(format!("{id}.data"))).unwrap();

        assert!(svc.read_meta("alice", &id).unwrap_err().is_not_found());
        assert!(svc.rename("alice", &id, "n").unwrap_err().is_not_found());
        assert!(svc.delete_object("alice", &id).unwrap_err().is_not_found());
        assert!(svc.list_accessible("alice").unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Locking
    // -----------------------------------------------------------------------

    #[test]
    fn lock_slots_are_pruned() {
        let (_, svc) = service();
        let id = svc.create_object("alice", NewObject::new("f", vec![])).unwrap();
        svc.rename("alice", &id, "g").unwrap();
        assert_eq!(svc.lock_slots(), 1);
        svc.delete_object("alice", &id).unwrap();
        assert_eq!(svc.lock_slots(), 0);

        let _ = svc.rename("alice", &ObjectId::generate(), "x");
        assert_eq!(svc.lock_slots(), 0);
    }

    #[test]
    fn concurrent_add_reader_loses_no_updates() {
        use std::thread;

        let (_, svc) = service();
        let svc = Arc::new(svc);
        let id = svc.create_object("alice", NewObject::new("shared", vec![])).unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let svc = Arc::clone(&svc);
                thread::spawn(move || svc.add_reader("alice", &id, &format!("user{i}")).unwrap())
            })
            .collect();
        for h in handles {
            h.join().expect("thread should not panic");
        }

        let readers = svc.readers("alice", &id).unwrap();
        assert_eq!(readers.len(), 17);
    }

    #[test]
    fn custom_config_limits_names() {
        let store = Arc::new(InMemoryBlobStore::new());
        let svc = AccessService::with_config(
            store,
            AccessConfig { max_name_len: 4, ..Default::default() },
        );
        assert_eq!(svc.config().max_name_len, 4);
        assert!(svc.create_object("alice", NewObject::new("abcd", vec![])).is_ok());
        assert!(matches!(
            svc.create_object("alice", NewObject::new("abcde", vec![])),
            Err(AccessError::InvalidInput(_))
        ));
    }

    #[test]
    fn owner_missing_from_stored_readers_still_reads() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsBlobStore::at(dir.path()).unwrap());
        let svc = AccessService::new(store.clone());
        let id = svc.create_object("alice", NewObject::new("f", b"x".to_vec())).unwrap();

        // Legacy record written without the owner in its reader list.
        let json = format!(
            r#"{{"id":"{id}","name":"f","owner":"alice","readable_by":["bob"]}}"#
        );
        std::fs::write(dir.path().join(format!("{id}.json")), json).unwrap();

        assert_eq!(svc.read_content("alice", &id).unwrap(), b"x");
        assert_eq!(svc.readers("bob", &id).unwrap(), readers(&["alice", "bob"]));
    }

    #[test]
    fn owner_missing_from_stored_readers_is_still_listed() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsBlobStore::at(dir.path()).unwrap());
        let svc = AccessService::new(store.clone());
        let id = svc.create_object("alice", NewObject::new("f", b"x".to_vec())).unwrap();

        let json = format!(
            r#"{{"id":"{id}","name":"f","owner":"alice","readable_by":["bob"]}}"#
        );
        std::fs::write(dir.path().join(format!("{id}.json")), json).unwrap();

        let listed: Vec<_> = svc.list_accessible("alice").unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(listed, vec![id]);
        assert_eq!(svc.list_accessible("bob").unwrap().len(), 1);
        assert!(svc.list_accessible("carol").unwrap().is_empty());
    }

    // -----------------------------------------------------------------------
    // Storage faults
    // -----------------------------------------------------------------------

    #[test]
    fn corrupt_metadata_surfaces_as_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(FsBlobStore::at(dir.path()).unwrap());
        let svc = AccessService::new(store.clone());
        let id = svc.create_object("alice", NewObject::new("f", b"x".to_vec())).unwrap();
        std::fs::write(dir.path().join(format!("{id}.json")), b"not json").unwrap();

        let is_corrupt = |r: AccessResult<()>| {
            matches!(r, Err(AccessError::Storage(StoreError::CorruptMeta { .. })))
        };
        assert!(is_corrupt(svc.read_meta("alice", &id).map(|_| ())));
        assert!(is_corrupt(svc.read_meta("mallory", &id).map(|_| ())));
        assert!(is_corrupt(svc.rename("alice", &id, "g")));
        assert!(is_corrupt(svc.delete_object("alice", &id)));
        assert!(is_corrupt(svc.list_accessible("alice").map(|_| ())));
        assert_eq!(store.read_content(&id).unwrap().unwrap(), b"x");
    }
}
