use warden_store::StoreError;
use warden_types::{ObjectId, TypeError};

use crate::permission::Operation;

/// Errors returned by the access service.
///
/// `NotFound` and `Forbidden` are the two user-facing outcomes; adapters
/// should match on the variant rather than the message.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The id has no complete (metadata + content) record.
    #[error("object not found: {0}")]
    NotFound(ObjectId),

    /// The acting identity lacks the permission the operation needs.
    #[error("forbidden: {user} may not {operation} object {id}")]
    Forbidden {
        id: ObjectId,
        user: String,
        operation: Operation,
    },

    /// Caller-supplied data is malformed.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The backing store failed. Not retried.
    #[error("storage fault: {0}")]
    Storage(#[from] StoreError),
}

impl AccessError {
    /// Returns `true` for [`AccessError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns `true` for [`AccessError::Forbidden`].
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden { .. })
    }
}

impl From<TypeError> for AccessError {
    fn from(e: TypeError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

/// Result alias for access service operations.
pub type AccessResult<T> = Result<T, AccessError>;
