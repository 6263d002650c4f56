//! Persistence for Warden objects.
//!
//! Each object is stored as two independent records under the same id: the
//! raw content bytes and the structured [`ObjectMeta`]. The store knows
//! nothing about users or permissions; that is the access service's job.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlobStore`] trait:
//!
//! - [`InMemoryBlobStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlobStore`] -- flat directory of `{id}.data` / `{id}.json` files
//!
//! # Design Rules
//!
//! 1. Absence is never an error: reads return `Option`, mutations return `bool`.
//! 2. Mutations never create objects; only `create` does.
//! 3. `delete` removes both halves or nothing, and is not idempotent.
//! 4. `exists` requires both halves; `list_ids` only looks at metadata.
//! 5. All I/O errors are propagated, never silently ignored.
//!
//! [`ObjectMeta`]: warden_types::ObjectMeta

pub mod config;
pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use fs::FsBlobStore;
pub use memory::InMemoryBlobStore;
pub use traits::BlobStore;
