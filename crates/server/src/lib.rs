//! vettriage REST API server
//!
//! Pets, symptom analysis, history, and expiring share links over a
//! single SQLite database.

pub mod config;
pub mod db;
pub mod error;
pub mod routes;
pub mod share;
pub mod state;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use llm_bridge::{LlmAnalyzer, ProviderConfig, SymptomAnalyzer};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use state::AppState;

/// Build the application router
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", routes::api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

/// Open the database, select the model backend, and serve until shutdown
pub async fn serve(config: ServerConfig, provider: ProviderConfig) -> Result<()> {
    let conn = db::open_database(&config.database_path)
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;

    let analyzer: Arc<dyn SymptomAnalyzer> =
        Arc::new(LlmAnalyzer::from_config(provider).context("Failed to configure model backend")?);

    let addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(conn, analyzer, config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app(state)).await.context("Server error")?;
    Ok(())
}
