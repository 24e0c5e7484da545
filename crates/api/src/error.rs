//! Error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use formstow_core::ingest::IngestError;
use formstow_shared::AppError;

/// Fixed message of the upload failure response.
pub const UPLOAD_FAILED_MESSAGE: &str = "File upload failed. Try again.";

/// Application error rendered as a JSON response.
///
/// Body: `{"error": "<ERROR_CODE>", "message": "<detail>"}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<IngestError> for ApiError {
    fn from(err: IngestError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.to_string()
            })),
        )
            .into_response()
    }
}

/// The one response the ingest stage writes itself.
///
/// Body: `{"err": "<detail>", "message": "File upload failed. Try again."}`.
pub fn upload_failed_response(err: &IngestError) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "err": err.to_string(),
            "message": UPLOAD_FAILED_MESSAGE
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::json_body;

    #[tokio::test]
    async fn test_validation_error_response() {
        let response = ApiError::from(IngestError::parse("missing boundary")).into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "VALIDATION_ERROR");
        assert_eq!(
            body["message"],
            "Validation error: malformed multipart body: missing boundary"
        );
    }

    #[tokio::test]
    async fn test_upload_failed_response_shape() {
        let err = IngestError::Io {
            path: "/tmp/gone".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let response = upload_failed_response(&err);

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["message"], UPLOAD_FAILED_MESSAGE);
        assert!(
            body["err"]
                .as_str()
                .expect("err is a string")
                .starts_with("failed to read staged file /tmp/gone")
        );
    }
}
