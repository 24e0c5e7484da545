//! Multipart form parser backed by Axum's `Multipart` extractor.

use std::path::{Path, PathBuf};

use axum::{
    extract::{FromRequest, Multipart, Request, multipart::MultipartError},
    http::StatusCode,
};
use tempfile::TempDir;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

use formstow_core::ingest::{FileHandle, FormParser, IngestError, ParsedForm, StagedForm};

/// Parses `multipart/form-data` requests, staging file parts in a per-request
/// temporary directory.
///
/// Parts with a filename are files; everything else is a scalar field.
#[derive(Debug, Clone)]
pub struct MultipartFormParser {
    staging_root: PathBuf,
}

impl Default for MultipartFormParser {
    fn default() -> Self {
        Self::new(None)
    }
}

impl MultipartFormParser {
    /// Create a parser staging under `staging_root`, or the OS temp dir.
    #[must_use]
    pub fn new(staging_root: Option<PathBuf>) -> Self {
        Self {
            staging_root: staging_root.unwrap_or_else(std::env::temp_dir),
        }
    }

    /// Root directory per-request staging directories are created in.
    #[must_use]
    pub fn staging_root(&self) -> &Path {
        &self.staging_root
    }

    async fn stage_file(
        staging: &TempDir,
        file_name: &str,
        field: &mut axum::extract::multipart::Field<'_>,
    ) -> Result<FileHandle, IngestError> {
        let path = staging.path().join(staged_name(file_name));
        let io_err = |source| IngestError::Io {
            path: path.clone(),
            source,
        };

        let mut file = tokio::fs::File::create(&path).await.map_err(io_err)?;
        let mut size = 0u64;
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            size += chunk.len() as u64;
            file.write_all(&chunk).await.map_err(io_err)?;
        }
        file.flush().await.map_err(io_err)?;

        Ok(FileHandle::new(path, size))
    }
}

impl FormParser for MultipartFormParser {
    type Request = Request;
    type Staging = TempDir;

    async fn parse(&self, request: Request) -> Result<StagedForm<TempDir>, IngestError> {
        let mut multipart = Multipart::from_request(request, &())
            .await
            .map_err(|rejection| IngestError::parse(rejection.body_text()))?;

        let staging = tempfile::Builder::new()
            .prefix("formstow-")
            .tempdir_in(&self.staging_root)
            .map_err(|source| IngestError::Io {
                path: self.staging_root.clone(),
                source,
            })?;

        let mut form = ParsedForm::new();
        while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
            let Some(name) = field.name().map(str::to_owned) else {
                debug!("Skipping multipart part without a name");
                continue;
            };

            match field.file_name().map(str::to_owned) {
                Some(file_name) => {
                    let declared = field.content_type().map(str::to_owned);
                    let mut handle = Self::stage_file(&staging, &file_name, &mut field)
                        .await?
                        .with_file_name(file_name);
                    if let Some(declared) = declared {
                        handle = handle.with_declared_content_type(declared);
                    }
                    form.push_file(name, handle);
                }
                None => {
                    let value = field.text().await.map_err(multipart_error)?;
                    form.push_field(name, value);
                }
            }
        }

        debug!(
            fields = form.fields().len(),
            files = form.file_count(),
            staging = %staging.path().display(),
            "Multipart body parsed"
        );

        Ok(StagedForm { form, staging })
    }
}

/// Unique on-disk name for a staged part, keeping the client's extension.
fn staged_name(file_name: &str) -> String {
    let id = Uuid::new_v4().simple().to_string();
    match Path::new(file_name).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if !ext.is_empty() => format!("{id}.{ext}"),
        _ => id,
    }
}

fn multipart_error(err: MultipartError) -> IngestError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        IngestError::BodyTooLarge(err.body_text())
    } else {
        IngestError::parse(err.body_text())
    }
}
