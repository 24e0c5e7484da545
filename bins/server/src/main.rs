//! Formstow API Server
//!
//! Main entry point for the Formstow multipart ingest service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use formstow_api::{AppState, MultipartFormParser, create_router};
use formstow_core::ingest::{IngestPipeline, KeyGenerator};
use formstow_core::storage::StorageService;
use formstow_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formstow=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Create storage service
    let storage = StorageService::from_provider(config.storage.clone())?;
    info!(
        provider = storage.provider_name(),
        bucket = storage.bucket(),
        "Storage service configured"
    );

    // Create ingest pipeline
    let keys = KeyGenerator::new(&config.upload.key_prefix, &config.upload.key_tag);
    let pipeline = IngestPipeline::new(Arc::new(storage), keys)
        .with_max_concurrent_uploads(config.upload.max_concurrent_uploads);
    let parser = MultipartFormParser::new(config.upload.staging_dir.clone());
    info!(
        staging_root = %parser.staging_root().display(),
        max_concurrent_uploads = ?config.upload.max_concurrent_uploads,
        body_limit_bytes = config.upload.body_limit_bytes,
        "Ingest pipeline configured"
    );

    // Create application state
    let state = AppState::new(parser, pipeline, config.upload.body_limit_bytes);

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
