//! Model introspection handler

use axum::{extract::State, Json};
use churn_core::LayoutInfo;

use crate::models::ModelInfoResponse;
use crate::{AppResult, AppState};

pub async fn info(State(state): State<AppState>) -> AppResult<Json<ModelInfoResponse>> {
    let predictor = state.predictor()?;
    let store = predictor.store();

    Ok(Json(ModelInfoResponse {
        metadata: store.metadata().clone(),
        feature_count: store.schema().width(),
        feature_names: store.feature_names().to_vec(),
        layout: LayoutInfo::current(),
        artifact_digest: store.digest().map(str::to_string),
        loaded_at: store.loaded_at(),
        risk_thresholds: predictor.thresholds(),
        segment_policy: state.config.segment_policy,
    }))
}
