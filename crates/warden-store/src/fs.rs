//! Filesystem-backed blob store.
//!
//! On-disk layout is a single flat directory:
//!
//! ```text
//! {root}/{id}.data   raw content bytes
//! {root}/{id}.json   pretty-printed ObjectMeta
//! ```
//!
//! Every write lands in a temporary file inside `{root}` and is then renamed
//! over the target, so readers never observe a half-written record. `create`
//! writes content before metadata: an interrupted create leaves at most an
//! orphan `.data` file, which `list_ids` does not report.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};
use warden_types::{ObjectId, ObjectMeta};

use crate::config::StoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::traits::BlobStore;

const DATA_EXT: &str = "data";
const META_EXT: &str = "json";

/// Blob store persisting each object as a `.data` / `.json` file pair.
#[derive(Debug)]
pub struct FsBlobStore {
    config: StoreConfig,
}

impl FsBlobStore {
    /// Open (creating if needed) the store directory described by `config`.
    pub fn open(config: StoreConfig) -> StoreResult<Self> {
        fs::create_dir_all(&config.root)?;
        debug!(root = %config.root.display(), "opened filesystem store");
        Ok(Self { config })
    }

    /// Open a store at `root` with default settings.
    pub fn at(root: impl Into<PathBuf>) -> StoreResult<Self> {
        Self::open(StoreConfig::at(root))
    }

    /// The directory holding the object files.
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    fn data_path(&self, id: &ObjectId) -> PathBuf {
        self.config.root.join(format!("{id}.{DATA_EXT}"))
    }

    fn meta_path(&self, id: &ObjectId) -> PathBuf {
        self.config.root.join(format!("{id}.{META_EXT}"))
    }

    /// Atomically replace `path` with `bytes`.
    fn write_file(&self, path: &Path, bytes: &[u8]) -> StoreResult<()> {
        let mut tmp = NamedTempFile::new_in(&self.config.root)?;
        tmp.write_all(bytes)?;
        if self.config.fsync {
            tmp.as_file().sync_all()?;
        }
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }

    fn write_meta(&self, meta: &ObjectMeta) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(meta)?;
        self.write_file(&self.meta_path(&meta.id), &json)
    }

    fn is_present(path: &Path) -> StoreResult<bool> {
        Ok(path.try_exists()?)
    }
}

/// Read a whole file, mapping "not found" to `None`.
fn read_optional(path: &Path) -> StoreResult<Option<Vec<u8>>> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl BlobStore for FsBlobStore {
    fn create(&self, meta: &ObjectMeta, content: &[u8]) -> StoreResult<()> {
        self.write_file(&self.data_path(&meta.id), content)?;
        self.write_meta(meta)?;
        debug!(id = %meta.id, bytes = content.len(), "created object files");
        Ok(())
    }

    fn read_content(&self, id: &ObjectId) -> StoreResult<Option<Vec<u8>>> {
        read_optional(&self.data_path(id))
    }

    fn read_meta(&self, id: &ObjectId) -> StoreResult<Option<ObjectMeta>> {
        let path = self.meta_path(id);
        let Some(bytes) = read_optional(&path)? else {
            return Ok(None);
        };
        let meta: ObjectMeta =
            serde_json::from_slice(&bytes).map_err(|e| StoreError::CorruptMeta {
                id: *id,
                path: path.clone(),
                reason: e.to_string(),
            })?;
        if meta.id != *id {
            return Err(StoreError::CorruptMeta {
                id: *id,
                path,
                reason: format!("record carries id {}", meta.id),
            });
        }
        Ok(Some(meta))
    }

    fn update_content(&self, id: &ObjectId, content: &[u8]) -> StoreResult<bool> {
        let path = self.data_path(id);
        if !Self::is_present(&path)? {
            return Ok(false);
        }
        self.write_file(&path, content)?;
        debug!(%id, bytes = content.len(), "replaced content file");
        Ok(true)
    }

    fn update_meta(&self, meta: &ObjectMeta) -> StoreResult<bool> {
        if !Self::is_present(&self.meta_path(&meta.id))? {
            return Ok(false);
        }
        self.write_meta(meta)?;
        Ok(true)
    }

    fn delete(&self, id: &ObjectId) -> StoreResult<bool> {
        let data = self.data_path(id);
        let meta = self.meta_path(id);
        if !Self::is_present(&data)? || !Self::is_present(&meta)? {
            return Ok(false);
        }
        // Metadata first: once it is gone the object is no longer listed.
        fs::remove_file(&meta)?;
        fs::remove_file(&data)?;
        debug!(%id, "removed object files");
        Ok(true)
    }

    fn list_ids(&self) -> StoreResult<Vec<ObjectId>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.config.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(META_EXT) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            match ObjectId::parse(stem) {
                Ok(id) => ids.push(id),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping foreign file"),
            }
        }
        ids.sort();
        Ok(ids)
    }

    fn exists(&self, id: &ObjectId) -> StoreResult<bool> {
        Ok(Self::is_present(&self.meta_path(id))? && Self::is_present(&self.data_path(id))?)
    }
}
