//! Health check handler

use axum::{extract::State, http::StatusCode, Json};

use crate::models::HealthResponse;
use crate::AppState;

/// 200 with artifacts loaded, 503 otherwise
pub async fn check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let model_loaded = state.predictor.is_some();
    let (status, label) = if model_loaded {
        (StatusCode::OK, "healthy")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unhealthy")
    };

    (
        status,
        Json(HealthResponse {
            status: label,
            model_loaded,
            version: env!("CARGO_PKG_VERSION"),
            timestamp: chrono::Utc::now().timestamp(),
        }),
    )
}
