//! Request middleware.

pub mod ingest;

pub use ingest::ingest_middleware;
