//! Storage service implementation using Apache OpenDAL.

use std::future::Future;

use bytes::Bytes;
use opendal::{Operator, services};
use serde::{Deserialize, Serialize};

use super::error::StorageError;
use crate::ingest::{SniffedType, StorageKey};
use formstow_shared::StorageProvider;

/// Where an uploaded object now lives.
///
/// Downstream handlers receive these in place of the raw file parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObjectRef {
    /// Storage key the object was written under.
    pub key: String,
    /// Provider-specific URI of the object.
    pub location: String,
    /// Bucket/container the object was written to.
    pub bucket: String,
    /// Sniffed content type, `"unknown"` when no signature matched.
    pub content_type: String,
    /// Object size in bytes.
    pub size: u64,
}

/// Object storage seam used by the ingest pipeline.
pub trait ObjectStore: Send + Sync {
    /// Write `bytes` under `key`.
    ///
    /// The content type is only attached to the object when it is known.
    fn upload(
        &self,
        bytes: Bytes,
        key: &StorageKey,
        content_type: &SniffedType,
    ) -> impl Future<Output = Result<StoredObjectRef, StorageError>> + Send;
}

/// Storage service for ingested files.
pub struct StorageService {
    operator: Operator,
    provider: StorageProvider,
}

impl StorageService {
    /// Create a new storage service from a provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_provider(provider: StorageProvider) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&provider)?;
        Ok(Self { operator, provider })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::AzureBlob {
                account,
                access_key,
                container,
            } => {
                let builder = services::Azblob::default()
                    .endpoint(&format!("https://{account}.blob.core.windows.net"))
                    .account_name(account)
                    .account_key(access_key)
                    .container(container);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::Memory => Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()
                .pipe(Ok),
        }
    }

    /// Build the provider-specific URI of an object.
    #[must_use]
    pub fn location_of(&self, key: &str) -> String {
        match &self.provider {
            StorageProvider::S3 {
                endpoint, bucket, ..
            } => format!("{}/{bucket}/{key}", endpoint.trim_end_matches('/')),
            StorageProvider::AzureBlob {
                account, container, ..
            } => format!("https://{account}.blob.core.windows.net/{container}/{key}"),
            StorageProvider::LocalFs { root } => root.join(key).display().to_string(),
            StorageProvider::Memory => format!("memory://{key}"),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Get the bucket/container name.
    #[must_use]
    pub fn bucket(&self) -> &str {
        self.provider.bucket()
    }
}

impl ObjectStore for StorageService {
    async fn upload(
        &self,
        bytes: Bytes,
        key: &StorageKey,
        content_type: &SniffedType,
    ) -> Result<StoredObjectRef, StorageError> {
        let size = bytes.len() as u64;
        let write = self.operator.write_with(key.as_str(), bytes);
        let write = match content_type.mime_type() {
            Some(mime) => write.content_type(mime),
            None => write,
        };
        write.await.map_err(StorageError::from)?;

        Ok(StoredObjectRef {
            key: key.to_string(),
            location: self.location_of(key.as_str()),
            bucket: self.bucket().to_string(),
            content_type: content_type.to_string(),
            size,
        })
    }
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}
