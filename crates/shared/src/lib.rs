//! Shared errors and configuration for Formstow.
//!
//! This crate provides common types used across all other crates:
//! - Application-wide error types
//! - Configuration management, including the object-storage provider selection

pub mod config;
pub mod error;

pub use config::{AppConfig, ServerConfig, StorageProvider, UploadConfig};
pub use error::AppError;
