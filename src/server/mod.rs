//! HTTP surface.

pub mod error;
pub mod routes;

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::{Config, PipelineConfig};
use crate::extract::AnthropicExtractor;
use crate::llm::AnthropicClient;
use crate::pipeline::BatchOrchestrator;
use crate::search::providers::TavilySearchProvider;
use crate::search::SearchOptions;

pub use error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: BatchOrchestrator,
    pub pipeline: PipelineConfig,
}

impl AppState {
    pub fn new(orchestrator: BatchOrchestrator, pipeline: PipelineConfig) -> Self {
        Self {
            orchestrator,
            pipeline,
        }
    }

    /// Wire the production adapters from configuration.
    pub fn from_config(config: &Config) -> Self {
        if !config.search.provider.eq_ignore_ascii_case("tavily") {
            tracing::warn!(provider = %config.search.provider, "unknown search provider, using tavily");
        }
        let search = Arc::new(TavilySearchProvider::new(&config.search));
        let extractor = Arc::new(AnthropicExtractor::new(AnthropicClient::new(
            config.anthropic.clone(),
        )));
        let orchestrator = BatchOrchestrator::new(
            search,
            extractor,
            SearchOptions::from(&config.search),
            config.pipeline.batch_size,
        );

        Self::new(orchestrator, config.pipeline.clone())
    }
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/health", get(routes::health))
        .route("/api/filters", get(routes::filters))
        .route("/api/search-leads", post(routes::search_leads))
        .route("/api/search-stream", get(routes::search_stream))
        .route("/api/export-csv", post(routes::export_csv))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Bind and serve until ctrl-c.
pub async fn serve(config: &Config) -> Result<()> {
    let app = router(AppState::from_config(config));
    let addr = config.server.bind_address();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!(address = %addr, "lead scraper listening");
    tracing::info!("  POST /api/search-leads (batch mode)");
    tracing::info!("  GET  /api/search-stream (progressive SSE)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
}
