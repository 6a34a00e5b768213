//! Prediction handlers

use axum::{extract::State, Json};
use churn_core::{BatchResult, CustomerRecord, PredictionResult};
use validator::Validate;

use crate::extract::JsonBody;
use crate::models::BatchPredictionRequest;
use crate::{AppResult, AppState};

/// Score one customer
pub async fn single(
    State(state): State<AppState>,
    JsonBody(customer): JsonBody<CustomerRecord>,
) -> AppResult<Json<PredictionResult>> {
    let predictor = state.predictor()?;
    customer.validate()?;

    let result = predictor.predict_single(&customer)?;
    tracing::debug!(
        probability = result.churn_probability,
        risk = %result.risk_level,
        "Prediction served"
    );
    Ok(Json(result))
}

/// Score a list of customers; any failing record rejects the batch
pub async fn batch(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<BatchPredictionRequest>,
) -> AppResult<Json<BatchResult>> {
    let predictor = state.predictor()?;
    req.validate()?;

    let result = predictor.predict_batch(&req.customers)?;
    tracing::info!(
        customers = result.total_customers,
        churners = result.predicted_churners,
        churn_rate = result.churn_rate,
        "Batch prediction served"
    );
    Ok(Json(result))
}
