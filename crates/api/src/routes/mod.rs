//! API route definitions.

use axum::{Router, extract::DefaultBodyLimit, middleware};

use formstow_core::storage::ObjectStore;

use crate::{AppState, middleware::ingest_middleware};

pub mod health;
pub mod uploads;

/// Creates the API router; upload routes sit behind the ingest middleware.
pub fn api_routes<S: ObjectStore + 'static>(state: &AppState<S>) -> Router<AppState<S>> {
    // Body limit is outermost so the parser sees it.
    let upload_routes = uploads::routes()
        .layer(middleware::from_fn_with_state(
            state.clone(),
            ingest_middleware::<S>,
        ))
        .layer(DefaultBodyLimit::max(state.body_limit_bytes));

    Router::new()
        .merge(health::routes())
        .merge(upload_routes)
}
