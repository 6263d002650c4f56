//! Access-controlled service for Warden.
//!
//! [`AccessService`] wraps any [`warden_store::BlobStore`] and is the only
//! place where ownership and reader lists mean anything. Each call takes the
//! acting identity as a plain string that an outer adapter has already
//! resolved.
//!
//! # Rules
//!
//! 1. Missing (or half-present) objects are `NotFound`, checked before any
//!    permission, so callers learn nothing about objects that do not exist.
//! 2. Renaming, reader-list changes, content replacement and deletion are
//!    owner-only.
//! 3. Reading content, metadata or the reader list requires membership in
//!    the reader set.
//! 4. The owner is always a reader and cannot be removed.
//!
//! # Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use warden_access::{AccessService, NewObject};
//! use warden_store::InMemoryBlobStore;
//!
//! let svc = AccessService::new(Arc::new(InMemoryBlobStore::new()));
//! let id = svc.create_object("alice", NewObject::new("notes.txt", b"hi".to_vec())).unwrap();
//! assert!(svc.read_content("bob", &id).unwrap_err().is_forbidden());
//! svc.add_reader("alice", &id, "bob").unwrap();
//! assert_eq!(svc.read_content("bob", &id).unwrap(), b"hi");
//! ```

pub mod config;
pub mod error;
pub mod input;
mod locks;
pub mod permission;
pub mod service;

pub use config::AccessConfig;
pub use error::{AccessError, AccessResult};
pub use input::parse_reader_list;
pub use permission::{Operation, Permission};
pub use service::{AccessService, NewObject};
