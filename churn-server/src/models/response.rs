//! Response bodies

use std::collections::BTreeMap;

use churn_core::{LayoutInfo, ModelMetadata, RiskThresholds, SegmentPolicy};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: &'static str,
    pub version: &'static str,
    pub status: &'static str,
    pub endpoints: BTreeMap<&'static str, &'static str>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
    pub version: &'static str,
    pub timestamp: i64,
}

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    #[serde(flatten)]
    pub metadata: ModelMetadata,
    pub feature_count: usize,
    pub feature_names: Vec<String>,
    pub layout: LayoutInfo,
    pub artifact_digest: Option<String>,
    pub loaded_at: chrono::DateTime<chrono::Utc>,
    pub risk_thresholds: RiskThresholds,
    pub segment_policy: SegmentPolicy,
}
