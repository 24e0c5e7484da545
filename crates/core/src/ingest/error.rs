//! Ingest error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::storage::StorageError;
use formstow_shared::AppError;

/// Ingest pipeline errors.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Multipart body malformed, unreadable, or not multipart at all.
    #[error("malformed multipart body: {0}")]
    Parse(String),

    /// Request body exceeded the configured limit while parsing.
    #[error("request body too large: {0}")]
    BodyTooLarge(String),

    /// A field name carries both a scalar value and a file.
    #[error("field '{0}' carries both a value and a file")]
    FieldConflict(String),

    /// A staged file could not be read back from local storage.
    #[error("failed to read staged file {}: {source}", path.display())]
    Io {
        /// Staged file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The object store rejected or failed an upload.
    #[error("upload of '{key}' failed: {source}")]
    Upload {
        /// Storage key of the failed upload.
        key: String,
        /// Underlying storage error.
        source: StorageError,
    },
}

impl IngestError {
    /// Create a parse error.
    #[must_use]
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Whether the error happened before any upload was attempted.
    #[must_use]
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            Self::Parse(_) | Self::BodyTooLarge(_) | Self::FieldConflict(_)
        )
    }
}

impl From<IngestError> for AppError {
    fn from(err: IngestError) -> Self {
        match err {
            IngestError::BodyTooLarge(_) => Self::PayloadTooLarge(err.to_string()),
            IngestError::Parse(_) | IngestError::FieldConflict(_) => {
                Self::Validation(err.to_string())
            }
            IngestError::Io { .. } | IngestError::Upload { .. } => Self::Upload(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_errors_map_to_validation() {
        let app: AppError = IngestError::parse("missing boundary").into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(
            app.to_string(),
            "Validation error: malformed multipart body: missing boundary"
        );

        let app: AppError = IngestError::FieldConflict("avatar".into()).into();
        assert_eq!(app.status_code(), 400);

        let app: AppError = IngestError::BodyTooLarge("length limit exceeded".into()).into();
        assert_eq!(app.status_code(), 413);
    }

    #[test]
    fn test_io_and_upload_errors_map_to_upload_failure() {
        let io = IngestError::Io {
            path: PathBuf::from("/tmp/gone"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(!io.is_parse());
        assert_eq!(AppError::from(io).status_code(), 500);

        let upload = IngestError::Upload {
            key: "bucketFolder/1-lg-x".into(),
            source: StorageError::operation("quota exceeded"),
        };
        assert!(
            upload
                .to_string()
                .contains("storage operation failed: quota exceeded")
        );
        assert_eq!(AppError::from(upload).error_code(), "UPLOAD_FAILED");
    }
}
