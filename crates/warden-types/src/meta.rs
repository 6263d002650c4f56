use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::id::ObjectId;

/// Set of identities allowed to read an object.
///
/// Ordered so that serialized metadata is deterministic.
pub type ReaderSet = BTreeSet<String>;

/// Opaque auxiliary data attached to an object. Never interpreted by Warden.
pub type Extra = BTreeMap<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// ObjectMeta
// ---------------------------------------------------------------------------

/// Structured metadata for a stored object.
///
/// Invariant: `owner` is always a member of `readers`. Constructors and
/// [`ObjectMeta::apply`] re-establish it; code that assigns `readers`
/// directly must call [`ObjectMeta::ensure_owner_reader`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ObjectMeta {
    pub id: ObjectId,
    pub name: String,
    pub owner: String,
    #[serde(default, alias = "readable_by")]
    pub readers: ReaderSet,
    #[serde(default)]
    pub extra: Extra,
}

impl ObjectMeta {
    /// Build metadata for a new object. The owner is added to `readers`.
    pub fn new<I, S>(id: ObjectId, name: impl Into<String>, owner: impl Into<String>, readers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut meta = Self {
            id,
            name: name.into(),
            owner: owner.into(),
            readers: readers.into_iter().map(Into::into).collect(),
            extra: Extra::new(),
        };
        meta.ensure_owner_reader();
        meta
    }

    /// Attach opaque extra data.
    pub fn with_extra(mut self, extra: Extra) -> Self {
        self.extra = extra;
        self
    }

    /// Returns `true` if `user` owns this object.
    pub fn is_owner(&self, user: &str) -> bool {
        self.owner == user
    }

    /// Returns `true` if `user` may read content and metadata.
    pub fn can_read(&self, user: &str) -> bool {
        self.readers.contains(user)
    }

    /// Insert the owner into `readers` if missing. Returns `true` if it was missing.
    pub fn ensure_owner_reader(&mut self) -> bool {
        if self.readers.contains(&self.owner) {
            return false;
        }
        self.readers.insert(self.owner.clone());
        true
    }

    /// Apply a partial update. Fields left as `None` are untouched.
    pub fn apply(&mut self, patch: &MetaPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(readers) = &patch.readers {
            self.readers = readers.clone();
            self.ensure_owner_reader();
        }
        if let Some(extra) = &patch.extra {
            self.extra = extra.clone();
        }
    }

    /// The listing view of this object.
    pub fn summary(&self) -> ObjectSummary {
        ObjectSummary {
            id: self.id,
            name: self.name.clone(),
            owner: self.owner.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// MetaPatch
// ---------------------------------------------------------------------------

/// Partial metadata update over the closed set of mutable fields.
///
/// `id` and `owner` are deliberately absent: they never change after creation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readers: Option<ReaderSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Extra>,
}

impl MetaPatch {
    /// A patch that only changes the name.
    pub fn rename(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    /// A patch that only replaces the reader set.
    pub fn readers(readers: ReaderSet) -> Self {
        Self {
            readers: Some(readers),
            ..Default::default()
        }
    }

    /// A patch that only replaces the extra data.
    pub fn extra(extra: Extra) -> Self {
        Self {
            extra: Some(extra),
            ..Default::default()
        }
    }

    /// Returns `true` if applying this patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.readers.is_none() && self.extra.is_none()
    }
}

// ---------------------------------------------------------------------------
// ObjectSummary
// ---------------------------------------------------------------------------

/// Entry returned when listing accessible objects.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub id: ObjectId,
    pub name: String,
    pub owner: String,
}
