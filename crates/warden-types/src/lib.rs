//! Foundation types for Warden, a permissioned blob store.
//!
//! Every other Warden crate depends on `warden-types`. Nothing here performs
//! I/O or authorization; these are the plain records that the store persists
//! and the access service reasons about.
//!
//! # Key Types
//!
//! - [`ObjectId`] — Random UUID v4 identifier, generated once per object
//! - [`ObjectMeta`] — Name, owner, reader set and opaque extra data
//! - [`MetaPatch`] — Closed set of metadata fields that may be updated in place
//! - [`ObjectSummary`] — The `{id, name, owner}` triple returned by listings

pub mod error;
pub mod id;
pub mod identity;
pub mod meta;

pub use error::TypeError;
pub use id::ObjectId;
pub use identity::{validate_identity, validate_name};
pub use meta::{Extra, MetaPatch, ObjectMeta, ObjectSummary, ReaderSet};
