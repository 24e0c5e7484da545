//! Multipart ingest middleware.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{HeaderValue, Uri, header::CONTENT_LENGTH, header::CONTENT_TYPE},
    middleware::Next,
    response::Response,
};
use tracing::error;

use formstow_core::ingest::{FormParser, IngestError, StagedForm};
use formstow_core::storage::ObjectStore;
use formstow_shared::AppError;

use crate::{AppState, ApiError, error::upload_failed_response};

/// Middleware that uploads every file of a multipart submission and replaces
/// the request body with the unified JSON body.
///
/// This middleware:
/// 1. Parses the multipart body, staging file parts on local disk
/// 2. Uploads every staged file through the ingest pipeline
/// 3. Replaces the body with the JSON `UnifiedBody` (also stored in request extensions)
/// 4. Hands the request to the next handler
///
/// Parse failures propagate as [`ApiError`]. Read or upload failures end the
/// request here with a 500 and the downstream handler never runs.
pub async fn ingest_middleware<S: ObjectStore + 'static>(
    State(state): State<AppState<S>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (mut parts, body) = request.into_parts();

    // The parser only needs the headers and the body-limit extension.
    let mut parse_request = Request::new(body);
    *parse_request.headers_mut() = parts.headers.clone();
    *parse_request.extensions_mut() = parts.extensions.clone();

    let StagedForm { form, staging } = match state.parser.parse(parse_request).await {
        Ok(staged) => staged,
        Err(err) => return reject(err, &parts.uri),
    };
    let result = state.pipeline.process(form).await;
    drop(staging);

    let unified = match result {
        Ok(unified) => unified,
        Err(err) => return reject(err, &parts.uri),
    };

    let json = serde_json::to_vec(&unified)
        .map_err(|e| ApiError(AppError::Internal(format!("unified body: {e}"))))?;

    parts
        .headers
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    parts.headers.insert(CONTENT_LENGTH, HeaderValue::from(json.len()));
    parts.extensions.insert(unified);

    Ok(next.run(Request::from_parts(parts, Body::from(json))).await)
}

/// Parse-class errors go to the enclosing error layer; anything else ends
/// the request with the upload-failure response.
fn reject(err: IngestError, uri: &Uri) -> Result<Response, ApiError> {
    if err.is_parse() {
        return Err(err.into());
    }
    error!(error = %err, uri = %uri, "File upload failed");
    Ok(upload_failed_response(&err))
}
