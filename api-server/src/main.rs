//! VulnGuard API Server
//!
//! HTTP front for the scoring core.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     VULNGUARD API                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐   snapshot   ┌──────────────────────────┐ │
//! │  │  Router   │ ───────────► │  ModelStore (ArcSwap)    │ │
//! │  │  (Axum)   │              │  forest │ fallback       │ │
//! │  └─────┬─────┘              └────────────▲─────────────┘ │
//! │        │ spawn_blocking                  │ swap          │
//! │        ▼                                 │               │
//! │  ┌───────────────────┐        ┌──────────┴────────────┐  │
//! │  │ Pipeline / Diff   │        │ Bootstrap (train/load)│  │
//! │  └───────────────────┘        └───────────────────────┘  │
//! └──────────────────────────────────────────────────────────┘
//! ```

mod bootstrap;
mod config;
mod error;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vulnguard_core::constants::{APP_NAME, APP_VERSION};
use vulnguard_core::{ExtractorConfig, ModelStore};

pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vulnguard_api=debug,vulnguard_core=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = config::Config::from_env();

    tracing::info!("{} API v{} starting ({})", APP_NAME, APP_VERSION, config.environment);

    let state = AppState::new(config.clone());

    // Train or load the model before accepting traffic; failure means fallback mode
    let boot_config = config.clone();
    match tokio::task::spawn_blocking(move || bootstrap::build_model(&boot_config)).await {
        Ok(Ok(model)) => state.models.replace(model),
        Ok(Err(e)) => tracing::warn!("Model unavailable ({}), running in fallback mode", e),
        Err(e) => tracing::error!("Model bootstrap task failed ({}), running in fallback mode", e),
    }

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<ModelStore>,
    pub config: config::Config,
    pub extractor: ExtractorConfig,
}

impl AppState {
    pub fn new(config: config::Config) -> Self {
        Self {
            models: Arc::new(ModelStore::new()),
            extractor: config.extractor(),
            config,
        }
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::check))
        .route("/stats", get(handlers::stats::stats))
        .route("/analyze", post(handlers::analyze::analyze))
        .route("/analyze/diff", post(handlers::diff::scan))
        .route("/model/reload", post(handlers::model::reload))
        .fallback(handlers::not_found)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
