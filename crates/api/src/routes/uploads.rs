//! Upload routes.
//!
//! Handlers here run after the ingest middleware, so they only ever see the
//! unified body.

use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use tracing::info;

use crate::extractors::UploadedForm;

/// Creates the upload routes.
pub fn routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new().route("/uploads", post(accept_upload))
}

/// POST `/uploads`
/// Accept a multipart submission and return its unified body.
async fn accept_upload(UploadedForm(body): UploadedForm) -> impl IntoResponse {
    info!(
        fields = body.fields.len(),
        file_fields = body.files.len(),
        "Upload accepted"
    );
    (StatusCode::CREATED, Json(body))
}
