//! Ingest pipeline implementation.

use std::collections::BTreeMap;
use std::num::NonZeroUsize;
use std::sync::Arc;

use bytes::Bytes;
use futures::future::join_all;
use futures::{StreamExt, stream};
use tracing::{debug, info, warn};

use super::error::IngestError;
use super::key::KeyGenerator;
use super::sniff::sniff;
use super::types::{FileHandle, ParsedForm, UnifiedBody};
use crate::storage::{ObjectStore, StoredObjectRef};

/// Read a staged file's full content.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the staged file is missing or unreadable.
pub async fn materialize(handle: &FileHandle) -> Result<Bytes, IngestError> {
    tokio::fs::read(&handle.path)
        .await
        .map(Bytes::from)
        .map_err(|source| IngestError::Io {
            path: handle.path.clone(),
            source,
        })
}

/// Uploads every staged file of a form and merges the results with its fields.
pub struct IngestPipeline<S: ObjectStore> {
    store: Arc<S>,
    keys: KeyGenerator,
    max_concurrent_uploads: Option<NonZeroUsize>,
}

impl<S: ObjectStore> IngestPipeline<S> {
    /// Create a pipeline with unbounded per-field fan-out.
    #[must_use]
    pub fn new(store: Arc<S>, keys: KeyGenerator) -> Self {
        Self {
            store,
            keys,
            max_concurrent_uploads: None,
        }
    }

    /// Bound in-flight uploads per field. `None` or `Some(0)` means unbounded.
    #[must_use]
    pub fn with_max_concurrent_uploads(mut self, limit: Option<usize>) -> Self {
        self.max_concurrent_uploads = limit.and_then(NonZeroUsize::new);
        self
    }

    /// The underlying object store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Run the whole pipeline for one submission.
    ///
    /// Fields are resolved one after another; the files of a field are uploaded
    /// concurrently. Any failure fails the submission, but only once every
    /// upload of that field has settled.
    ///
    /// # Errors
    ///
    /// - [`IngestError::FieldConflict`] before any upload if a name carries both a value and a file
    /// - [`IngestError::Io`] if a staged file cannot be read
    /// - [`IngestError::Upload`] if the store fails any upload
    pub async fn process(&self, form: ParsedForm) -> Result<UnifiedBody, IngestError> {
        if let Some(name) = form.conflicting_field() {
            return Err(IngestError::FieldConflict(name.to_string()));
        }

        let scalars = form.first_values();
        let file_count = form.file_count();
        let (_, files) = form.into_parts();

        let mut resolved = BTreeMap::new();
        for (field, handles) in files {
            let stored = self.upload_field(&field, &handles).await?;
            resolved.insert(field, stored);
        }

        info!(
            fields = scalars.len(),
            file_fields = resolved.len(),
            files = file_count,
            "Form ingested"
        );

        Ok(UnifiedBody::merge(scalars, resolved))
    }

    /// Upload all files of one field, preserving submission order.
    ///
    /// In-flight uploads are never abandoned: siblings of a failed upload run
    /// to completion before the first error is returned.
    async fn upload_field(
        &self,
        field: &str,
        handles: &[FileHandle],
    ) -> Result<Vec<StoredObjectRef>, IngestError> {
        let uploads: Vec<_> = handles
            .iter()
            .map(|handle| self.store_file(field, handle))
            .collect();

        let settled: Vec<_> = match self.max_concurrent_uploads {
            None => join_all(uploads).await,
            Some(limit) => stream::iter(uploads).buffered(limit.get()).collect().await,
        };

        settled.into_iter().collect()
    }

    /// Materialize, sniff, key and upload a single staged file.
    async fn store_file(
        &self,
        field: &str,
        handle: &FileHandle,
    ) -> Result<StoredObjectRef, IngestError> {
        let bytes = materialize(handle).await?;
        if bytes.len() as u64 != handle.size {
            warn!(
                field = %field,
                path = %handle.path.display(),
                staged_size = handle.size,
                read_size = bytes.len(),
                "Staged file changed size before upload"
            );
        }

        let content_type = sniff(&bytes);
        if !content_type.is_known() {
            warn!(
                field = %field,
                path = %handle.path.display(),
                declared = handle.declared_content_type.as_deref().unwrap_or("-"),
                "File content does not match any known signature"
            );
        }

        let key = self.keys.generate(&handle.path);
        debug!(
            field = %field,
            file_name = handle.file_name.as_deref().unwrap_or("-"),
            key = %key,
            content_type = %content_type,
            size = bytes.len(),
            "Uploading file"
        );

        self.store
            .upload(bytes, &key, &content_type)
            .await
            .map_err(|source| IngestError::Upload {
                key: key.into_string(),
                source,
            })
    }
}
