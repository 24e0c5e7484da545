//! Multipart ingest pipeline.
//!
//! Turns a parsed multipart submission into a [`UnifiedBody`]:
//!
//! ```text
//! FormParser ──► ParsedForm ──┬─► fields ──────────────────────────────┐
//!                             └─► files (per field, concurrently)      │
//!                                   materialize ─► sniff ─► key ─► upload
//!                                                                      ▼
//!                                                                UnifiedBody
//! ```
//!
//! Any I/O or upload failure fails the whole submission. Objects already written
//! to storage are not rolled back.

mod error;
mod key;
mod parser;
mod pipeline;
mod sniff;
mod types;

pub use error::IngestError;
pub use key::{KeyGenerator, StorageKey};
pub use parser::{FormParser, StagedForm};
pub use pipeline::{IngestPipeline, materialize};
pub use sniff::{SniffedType, sniff};
pub use types::{FileHandle, ParsedForm, UnifiedBody};
