mod config;
mod db;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;
mod submission;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{ModelFallback, CANDIDATE_MODELS};
use crate::routes::build_router;
use crate::state::AppState;
use crate::submission::store::PgSubmissionStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing API key)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting job description generator v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation fallback chain
    let generator = ModelFallback::gemini(&config.gemini_api_base, &config.gemini_api_key)?;
    info!("LLM client initialized (models: {})", CANDIDATE_MODELS.join(" -> "));

    // Per-submission PostgreSQL store; no pool is opened at startup
    match &config.database {
        Some(db) => info!("Submissions will be saved to {}:{}/{}", db.host, db.port, db.name),
        None => warn!("PG_* settings incomplete; submissions will not be saved"),
    }
    let store = PgSubmissionStore::new(config.database.clone());

    let port = config.port;
    let state = AppState {
        config: Arc::new(config),
        generator: Arc::new(generator),
        store: Arc::new(store),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{port}").parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
