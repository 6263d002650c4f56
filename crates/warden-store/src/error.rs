use std::path::PathBuf;

use warden_types::ObjectId;

/// Errors from blob store operations.
///
/// "Not found" is deliberately missing: stores report absence through
/// `Option` and `bool` return values.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Metadata could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A metadata record exists but cannot be decoded.
    #[error("corrupt metadata for {id} at {path}: {reason}")]
    CorruptMeta {
        id: ObjectId,
        path: PathBuf,
        reason: String,
    },

    /// An in-process lock was poisoned by a panicking writer.
    #[error("store lock poisoned: {0}")]
    LockPoisoned(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
