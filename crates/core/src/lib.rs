//! Core ingest logic for Formstow.
//!
//! This crate contains the multipart ingest pipeline with ZERO web framework dependencies.
//! The HTTP surface and the concrete multipart parser live in `formstow-api`.
//!
//! # Modules
//!
//! - `ingest` - Materialize, sniff, key, upload and merge submitted form files
//! - `storage` - Object storage behind the `ObjectStore` seam, backed by Apache OpenDAL

pub mod ingest;
pub mod storage;
