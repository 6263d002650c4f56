//! Operations and the permission each one requires.

use std::fmt;

use serde::{Deserialize, Serialize};
use warden_types::ObjectMeta;

/// Level of access an operation needs on an existing object.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    /// Acting identity must be in the reader set.
    Read,
    /// Acting identity must be the owner.
    Own,
}

impl Permission {
    /// Returns `true` if `user` holds this permission on `meta`.
    pub fn is_granted(self, meta: &ObjectMeta, user: &str) -> bool {
        match self {
            Self::Read => meta.can_read(user),
            Self::Own => meta.is_owner(user),
        }
    }
}

/// Every id-addressed operation the service performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    ReadContent,
    ReadMeta,
    ReadReaders,
    ReplaceContent,
    Rename,
    SetReaders,
    AddReader,
    RemoveReader,
    Delete,
}

impl Operation {
    /// The permission this operation requires.
    ///
    /// Content replacement is owner-only even though readers may fetch it.
    pub fn required(self) -> Permission {
        match self {
            Self::ReadContent | Self::ReadMeta | Self::ReadReaders => Permission::Read,
            Self::ReplaceContent
            | Self::Rename
            | Self::SetReaders
            | Self::AddReader
            | Self::RemoveReader
            | Self::Delete => Permission::Own,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::ReadContent => "read content of",
            Self::ReadMeta => "read metadata of",
            Self::ReadReaders => "read readers of",
            Self::ReplaceContent => "replace content of",
            Self::Rename => "rename",
            Self::SetReaders => "set readers of",
            Self::AddReader => "add a reader to",
            Self::RemoveReader => "remove a reader from",
            Self::Delete => "delete",
        };
        f.write_str(s)
    }
}
