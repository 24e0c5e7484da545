//! Request extractors.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
};
use serde_json::json;

use formstow_core::ingest::UnifiedBody;

/// Extractor for the unified body produced by the ingest middleware.
///
/// ```ignore
/// async fn handler(UploadedForm(body): UploadedForm) -> impl IntoResponse {
///     let caption = body.field("caption");
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct UploadedForm(pub UnifiedBody);

impl<S> FromRequestParts<S> for UploadedForm
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<UnifiedBody>()
            .cloned()
            .map(UploadedForm)
            .ok_or_else(|| {
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "ingest_missing",
                        "message": "Route is not behind the multipart ingest middleware"
                    })),
                )
            })
    }
}
