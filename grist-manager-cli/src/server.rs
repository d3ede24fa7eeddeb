//! Web Server for Grist Manager
//!
//! Serves the instance API under `/api` and, when a UI directory is
//! configured, the built dashboard with SPA fallback to `index.html`.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use grist_manager_shared::InstanceStore;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api;

/// Server state shared across all handlers
pub struct AppState {
    pub store: RwLock<InstanceStore>,

    /// Artificial delay applied before every API call
    pub latency: Duration,
}

impl AppState {
    pub fn new(store: InstanceStore) -> Self {
        Self {
            store: RwLock::new(store),
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Sleep for the configured latency, if any
    pub async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Options for `grist-manager serve`
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,

    /// Directory holding the built UI (`trunk build` output)
    pub ui_dir: Option<PathBuf>,

    /// Start with the demo instances and logs
    pub seed: bool,

    pub latency: Duration,
}

/// Build the full application router
pub fn create_router(state: Arc<AppState>, ui_dir: Option<&Path>) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let router = Router::new()
        // Health check
        .route("/health", get(health_check))
        // API info endpoint
        .route("/api/info", get(api_info))
        // Instance and log endpoints
        .nest("/api", api::create_api_router());

    let router = match ui_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).fallback(index))
        }
        None => router.fallback(ui_not_configured),
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Start the web server
pub async fn start_server(
    config: &ServerConfig,
) -> anyhow::Result<tokio::task::JoinHandle<anyhow::Result<()>>> {
    let store = if config.seed {
        InstanceStore::seeded()
    } else {
        InstanceStore::new()
    };
    info!(instances = store.len(), "Instance store ready");

    let state = Arc::new(AppState::new(store).with_latency(config.latency));
    if let Some(dir) = &config.ui_dir {
        info!("Serving UI from {}", dir.display());
    }
    let app = create_router(state, config.ui_dir.as_deref());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))
    });

    Ok(handle)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    tracing::debug!("Health check endpoint called");
    (StatusCode::OK, "OK")
}

/// API info endpoint - version and backing mode for the UI
async fn api_info(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let instances = state.store.read().await.len();
    let info = serde_json::json!({
        "version": env!("CARGO_PKG_VERSION"),
        "mode": "in-memory",
        "instances": instances,
        "latency_ms": state.latency.as_millis() as u64,
    });
    (StatusCode::OK, Json(info))
}

async fn ui_not_configured() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        "UI not configured; start with --ui-dir pointing at the built dashboard",
    )
}
