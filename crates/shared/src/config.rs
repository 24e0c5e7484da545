//! Application configuration management.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Object storage provider.
    #[serde(default)]
    pub storage: StorageProvider,
    /// Multipart ingest configuration.
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Object storage provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageProvider {
    /// S3-compatible storage: Cloudflare R2, Supabase, AWS S3, DigitalOcean Spaces
    S3 {
        /// S3 endpoint URL.
        endpoint: String,
        /// S3 bucket name.
        bucket: String,
        /// AWS access key ID.
        access_key_id: String,
        /// AWS secret access key.
        secret_access_key: String,
        /// AWS region.
        region: String,
    },
    /// Azure Blob Storage
    AzureBlob {
        /// Azure storage account name.
        account: String,
        /// Azure storage access key.
        access_key: String,
        /// Azure container name.
        container: String,
    },
    /// Local filesystem (development only)
    LocalFs {
        /// Root directory path.
        root: PathBuf,
    },
    /// In-process memory (development and tests)
    Memory,
}

impl Default for StorageProvider {
    fn default() -> Self {
        Self::local_fs("./storage")
    }
}

impl StorageProvider {
    /// Create S3-compatible provider (Cloudflare R2, Supabase, AWS S3).
    #[must_use]
    pub fn s3(
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self::S3 {
            endpoint: endpoint.into(),
            bucket: bucket.into(),
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }

    /// Create Azure Blob Storage provider.
    #[must_use]
    pub fn azure_blob(
        account: impl Into<String>,
        access_key: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self::AzureBlob {
            account: account.into(),
            access_key: access_key.into(),
            container: container.into(),
        }
    }

    /// Create local filesystem provider (development only).
    #[must_use]
    pub fn local_fs(root: impl Into<PathBuf>) -> Self {
        Self::LocalFs { root: root.into() }
    }

    /// Get the provider name for logs and object references.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::S3 { .. } => "s3",
            Self::AzureBlob { .. } => "azure_blob",
            Self::LocalFs { .. } => "local",
            Self::Memory => "memory",
        }
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        match self {
            Self::S3 { bucket, .. } => bucket,
            Self::AzureBlob { container, .. } => container,
            Self::LocalFs { root } => root.to_str().unwrap_or("local"),
            Self::Memory => "memory",
        }
    }
}

/// Multipart ingest configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Logical folder every storage key starts with.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
    /// Literal tag placed between the timestamp and the path component.
    #[serde(default = "default_key_tag")]
    pub key_tag: String,
    /// Upper bound on in-flight uploads per form field. Unbounded when absent.
    #[serde(default)]
    pub max_concurrent_uploads: Option<usize>,
    /// Directory staged files are written to. Defaults to the OS temp dir.
    #[serde(default)]
    pub staging_dir: Option<PathBuf>,
    /// Maximum accepted request body size in bytes.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            key_prefix: default_key_prefix(),
            key_tag: default_key_tag(),
            max_concurrent_uploads: None,
            staging_dir: None,
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_key_prefix() -> String {
    "bucketFolder".to_string()
}

fn default_key_tag() -> String {
    "lg".to_string()
}

fn default_body_limit_bytes() -> usize {
    25 * 1024 * 1024 // 25 MiB
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FORMSTOW").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(source: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(source, FileFormat::Toml))
            .build()
            .expect("config should build")
            .try_deserialize()
            .expect("config should deserialize")
    }

    #[test]
    fn test_defaults_when_empty() {
        let config = from_toml("");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.name(), "local");
        assert_eq!(config.upload.key_prefix, "bucketFolder");
        assert_eq!(config.upload.key_tag, "lg");
        assert!(config.upload.max_concurrent_uploads.is_none());
        assert_eq!(config.upload.body_limit_bytes, 25 * 1024 * 1024);
    }

    #[test]
    fn test_s3_provider_section() {
        let config = from_toml(
            r#"
            [storage]
            type = "s3"
            endpoint = "https://account.r2.cloudflarestorage.com"
            bucket = "uploads"
            access_key_id = "access_key"
            secret_access_key = "secret_key"
            region = "auto"

            [upload]
            key_prefix = "forms"
            max_concurrent_uploads = 4
            "#,
        );
        assert_eq!(config.storage.name(), "s3");
        assert_eq!(config.storage.bucket(), "uploads");
        assert_eq!(config.upload.key_prefix, "forms");
        assert_eq!(config.upload.key_tag, "lg");
        assert_eq!(config.upload.max_concurrent_uploads, Some(4));
    }

    #[test]
    fn test_memory_provider_section() {
        let config = from_toml(
            r#"
            [storage]
            type = "memory"
            "#,
        );
        assert_eq!(config.storage.name(), "memory");
        assert_eq!(config.storage.bucket(), "memory");
    }

    #[test]
    fn test_storage_provider_azure() {
        let provider = StorageProvider::azure_blob("formstowdev", "access_key", "uploads");
        assert_eq!(provider.name(), "azure_blob");
        assert_eq!(provider.bucket(), "uploads");
    }
}
