//! HTTP API: application factory and server loop.

pub mod handlers;

use crate::config::Config;
use crate::error::{PromptitectureError, Result};
use axum::{routing::get, Router};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            started_at: Utc::now(),
        }
    }
}

/// Build the axum application for `config`
pub fn create_app(config: &Config) -> Router {
    let cors = cors_layer(&config.http_server.allowed_origins);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        .route("/architectures", get(handlers::list_architectures))
        .route("/architectures/:id", get(handlers::get_architecture))
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(AppState::new(config.clone()))
}

/// Any origin when none are configured, otherwise exactly the configured list.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Bind the configured address and serve until Ctrl+C
pub async fn serve(config: Config) -> Result<()> {
    let addr = config.bind_addr();
    let app = create_app(&config);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| PromptitectureError::Http(format!(
            "Failed to bind to {}: {}. Set http_server.port in promptitecture.toml or pass --port.",
            addr, e
        )))?;

    log::info!("Starting PrompTitecture API v{} on http://{}", crate::VERSION, addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PromptitectureError::Http(format!("HTTP server error: {}", e)))?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown signal received");
}
