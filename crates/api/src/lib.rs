//! HTTP layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The multipart form parser staging file parts on local disk
//! - The ingest middleware rewriting multipart bodies into unified JSON bodies
//! - Request extractors
//! - Error responses
//! - Health and upload routes

pub mod error;
pub mod extractors;
pub mod middleware;
pub mod parser;
pub mod routes;

#[cfg(test)]
mod test_support;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use formstow_core::ingest::IngestPipeline;
use formstow_core::storage::{ObjectStore, StorageService};

pub use error::ApiError;
pub use parser::MultipartFormParser;

/// Application state shared across handlers and middleware.
pub struct AppState<S: ObjectStore = StorageService> {
    /// Multipart parser staging file parts.
    pub parser: Arc<MultipartFormParser>,
    /// Ingest pipeline uploading staged files.
    pub pipeline: Arc<IngestPipeline<S>>,
    /// Maximum accepted body size on upload routes.
    pub body_limit_bytes: usize,
}

impl<S: ObjectStore> AppState<S> {
    /// Create application state.
    #[must_use]
    pub fn new(
        parser: MultipartFormParser,
        pipeline: IngestPipeline<S>,
        body_limit_bytes: usize,
    ) -> Self {
        Self {
            parser: Arc::new(parser),
            pipeline: Arc::new(pipeline),
            body_limit_bytes,
        }
    }
}

impl<S: ObjectStore> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            parser: Arc::clone(&self.parser),
            pipeline: Arc::clone(&self.pipeline),
            body_limit_bytes: self.body_limit_bytes,
        }
    }
}

/// Creates the main application router.
pub fn create_router<S: ObjectStore + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes(&state))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
