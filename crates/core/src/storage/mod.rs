//! Object storage for ingested files using Apache OpenDAL.
//!
//! The pipeline only ever sees the [`ObjectStore`] trait. [`StorageService`] is the
//! production implementation with support for:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//! - Azure Blob Storage
//! - Local filesystem (development only)
//! - In-process memory (development and tests)
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │         ObjectStore::upload(bytes, key, content_type)           │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                      Apache OpenDAL                             │
//! │   op.write_with("key", bytes).content_type("image/png")         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod error;
mod service;

pub use error::StorageError;
pub use formstow_shared::StorageProvider;
pub use service::{ObjectStore, StorageService, StoredObjectRef};
