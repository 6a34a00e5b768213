//! Customer Churn Prediction API
//!
//! HTTP front-end over the `churn-core` inference pipeline.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    CHURN PREDICTION API                     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐     ┌────────────────┐     ┌──────────────┐  │
//! │  │  Router   │ ──► │ ChurnPredictor │ ──► │ ArtifactStore│  │
//! │  │  (Axum)   │     │ (churn-core)   │     │ (Arc, r/o)   │  │
//! │  └───────────┘     └────────────────┘     └──────┬───────┘  │
//! │                                                  ▼          │
//! │                                          models/ (JSON)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod extract;
mod handlers;
mod models;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use churn_core::{ArtifactStore, ChurnPredictor, PipelineError};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::{Config, LogFormat};
pub use error::{AppError, AppResult};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("Invalid configuration")?;

    // Initialize logging
    init_tracing(config.log_format);

    tracing::info!("Churn Prediction API starting...");
    tracing::info!("Environment: {}", config.environment);
    tracing::info!(
        "Risk thresholds: low={} medium={}, value segment policy: {}",
        config.risk_thresholds.low,
        config.risk_thresholds.medium,
        config.segment_policy
    );

    // Load artifacts before accepting traffic
    let predictor = match load_predictor(&config) {
        Ok(predictor) => Some(predictor),
        Err(e) if config.allow_degraded_start => {
            tracing::error!("{:#}", e);
            tracing::warn!("Starting without model artifacts; prediction routes will return 503");
            None
        }
        Err(e) => return Err(e),
    };

    // Build application state
    let state = AppState {
        config: config.clone(),
        predictor,
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host, config.port))?;
    tracing::info!("🚀 Server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing(format: LogFormat) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "churn_server=debug,churn_core=info,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
    }
}

fn load_predictor(config: &Config) -> anyhow::Result<ChurnPredictor> {
    let store = ArtifactStore::load(&config.models_dir).with_context(|| {
        format!("Failed to load model artifacts from {}", config.models_dir.display())
    })?;
    Ok(ChurnPredictor::new(Arc::new(store), config.pipeline()))
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// `None` after a degraded start
    pub predictor: Option<ChurnPredictor>,
}

impl AppState {
    pub fn predictor(&self) -> AppResult<&ChurnPredictor> {
        self.predictor
            .as_ref()
            .ok_or_else(|| PipelineError::NotLoaded.into())
    }
}

/// Create the main router with all routes
fn create_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/", get(handlers::root::index))
        .route("/health", get(handlers::health::check))
        .route("/model/info", get(handlers::model::info))
        .route("/predict", post(handlers::predict::single))
        .route("/predict/batch", post(handlers::predict::batch));

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    routes
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}
