//! Service index handler

use std::collections::BTreeMap;

use axum::Json;

use crate::models::RootResponse;

pub async fn index() -> Json<RootResponse> {
    let endpoints = BTreeMap::from([
        ("GET /health", "Service health and model status"),
        ("GET /model/info", "Loaded model metadata"),
        ("POST /predict", "Predict churn for a single customer"),
        ("POST /predict/batch", "Batch prediction for multiple customers"),
    ]);

    Json(RootResponse {
        message: "Customer Churn Prediction API",
        version: env!("CARGO_PKG_VERSION"),
        status: "active",
        endpoints,
    })
}
