//! Storage key generation.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Unique key an uploaded file is stored under.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the key into its string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Builds storage keys from wall-clock time and the staged file path.
///
/// Format: `{prefix}/{unix_millis}-{tag}-{nonce}-{sanitized_path}`
///
/// The whole staged path lands in the key with separators and any other unsafe
/// characters replaced by `_`. The nonce is 8 hex chars of a v4 UUID, so two files staged under the same
/// path within the same millisecond still get distinct keys.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    prefix: String,
    tag: String,
}

impl KeyGenerator {
    /// Create a key generator.
    #[must_use]
    pub fn new(prefix: impl Into<String>, tag: impl Into<String>) -> Self {
        let prefix: String = prefix.into();
        Self {
            prefix: prefix.trim_matches('/').to_string(),
            tag: tag.into(),
        }
    }

    /// Generate a fresh key for the file staged at `path`.
    #[must_use]
    pub fn generate(&self, path: &Path) -> StorageKey {
        self.generate_at(Utc::now(), path)
    }

    fn generate_at(&self, now: DateTime<Utc>, path: &Path) -> StorageKey {
        let nonce = Uuid::new_v4().simple().to_string();
        let name = format!(
            "{}-{}-{}-{}",
            now.timestamp_millis(),
            self.tag,
            &nonce[..8],
            path_component(path)
        );

        if self.prefix.is_empty() {
            StorageKey(name)
        } else {
            StorageKey(format!("{}/{name}", self.prefix))
        }
    }
}

/// The full staged path, sanitized for use in a key.
fn path_component(path: &Path) -> String {
    let sanitized = sanitize_filename(&path.to_string_lossy());
    if sanitized.is_empty() {
        "file".to_string()
    } else {
        sanitized
    }
}

/// Sanitize filename for storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
