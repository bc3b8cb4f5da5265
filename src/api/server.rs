//! Forecast API Server implementation
//!
//! HTTP front end using Axum: upload a workbook, receive the forecast table,
//! the chart or the .xlsx download.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::handlers;
use crate::config::ForecastConfig;

pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// API Server configuration
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

impl ApiConfig {
    /// Megabytes to bytes; `None` when the product does not fit in `usize`
    pub fn upload_limit_from_mb(megabytes: usize) -> Option<usize> {
        megabytes.checked_mul(1024 * 1024)
    }
}

/// Shared application state; read-only after startup
#[derive(Clone)]
pub struct AppState {
    pub version: String,
    pub defaults: ForecastConfig,
}

impl AppState {
    pub fn new(defaults: ForecastConfig) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            defaults,
        }
    }
}

/// Build the router with all routes and middleware
pub fn build_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::version))
        // Forecast endpoints
        .route("/api/v1/forecast", post(handlers::forecast))
        .route("/api/v1/forecast/chart", post(handlers::chart))
        .route("/api/v1/forecast/export", post(handlers::export))
        // State and middleware
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the API server
pub async fn run_api_server(config: ApiConfig, defaults: ForecastConfig) -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forecast_server=info,opportunity_forecast=info,tower_http=info".into()
            }),
        )
        .init();

    defaults.validate()?;
    let state = Arc::new(AppState::new(defaults));
    let app = build_router(state, config.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("📈 Forecast API Server starting on http://{}", addr);
    info!("   Endpoints: /api/v1/forecast, /api/v1/forecast/chart, /api/v1/forecast/export");
    info!("   Health: /health, Version: /version");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Forecast API Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, stopping server...");
}
