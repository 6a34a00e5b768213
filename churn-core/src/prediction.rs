//! Prediction Orchestrator
//!
//! record → engineer → encode → order → scale → classify → risk tier

use std::sync::Arc;

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::artifacts::ArtifactStore;
use crate::encoding::encode;
use crate::error::{PipelineError, PipelineResult};
use crate::features::{FeatureEngineer, SegmentPolicy};
use crate::model::{RiskLevel, RiskThresholds};
use crate::record::CustomerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChurnLabel {
    #[serde(rename = "No Churn")]
    NoChurn,
    Churn,
}

impl ChurnLabel {
    pub fn from_prediction(prediction: u8) -> Self {
        if prediction == 1 {
            ChurnLabel::Churn
        } else {
            ChurnLabel::NoChurn
        }
    }
}

/// Prediction for one customer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub churn_prediction: u8,
    pub churn_probability: f64,
    pub churn_label: ChurnLabel,
    pub risk_level: RiskLevel,
}

/// Predictions for a batch, in input order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub predictions: Vec<PredictionResult>,
    pub total_customers: usize,
    pub predicted_churners: usize,
    pub churn_rate: f64,
}

impl BatchResult {
    pub fn from_predictions(predictions: Vec<PredictionResult>) -> Self {
        let total_customers = predictions.len();
        let predicted_churners = predictions
            .iter()
            .filter(|p| p.churn_prediction == 1)
            .count();

        Self {
            predictions,
            total_customers,
            predicted_churners,
            churn_rate: churn_rate(predicted_churners, total_customers),
        }
    }
}

/// churned / total rounded to 4 decimals (ties to even); 0 for an empty batch
pub fn churn_rate(churned: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    round4(churned as f64 / total as f64)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round_ties_even() / 10_000.0
}

/// Pipeline settings that are not part of the artifact bundle
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineConfig {
    pub thresholds: RiskThresholds,
    pub segment_policy: SegmentPolicy,
}

/// Runs the full pipeline against a shared artifact store
#[derive(Debug, Clone)]
pub struct ChurnPredictor {
    store: Arc<ArtifactStore>,
    engineer: FeatureEngineer,
    thresholds: RiskThresholds,
}

impl ChurnPredictor {
    pub fn new(store: Arc<ArtifactStore>, config: PipelineConfig) -> Self {
        Self {
            store,
            engineer: FeatureEngineer::new(config.segment_policy),
            thresholds: config.thresholds,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn thresholds(&self) -> RiskThresholds {
        self.thresholds
    }

    /// Stages 2-4: the scaled, schema-ordered model input
    pub fn preprocess(&self, record: &CustomerRecord) -> PipelineResult<Array1<f64>> {
        let features = self.engineer.engineer(record);
        log::trace!("Engineered features: {}", features.to_log_entry());

        let encoded = encode(&features, self.store.encoders())?;
        let ordered = self.store.schema().gather(&encoded)?;
        Ok(self.store.scaler().transform(ordered))
    }

    pub fn predict_single(&self, record: &CustomerRecord) -> PipelineResult<PredictionResult> {
        let row = self.preprocess(record)?;
        let classifier = self.store.classifier();

        let churn_prediction = classifier.predict(row.view());
        let churn_probability = classifier.predict_proba(row.view());

        Ok(PredictionResult {
            churn_prediction,
            churn_probability,
            churn_label: ChurnLabel::from_prediction(churn_prediction),
            risk_level: self.thresholds.classify(churn_probability),
        })
    }

    /// All-or-nothing: the first failing record rejects the batch
    pub fn predict_batch(&self, records: &[CustomerRecord]) -> PipelineResult<BatchResult> {
        let predictions = records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                self.predict_single(record).map_err(|e| PipelineError::BatchRecord {
                    index,
                    source: Box::new(e),
                })
            })
            .collect::<PipelineResult<Vec<_>>>()?;

        let batch = BatchResult::from_predictions(predictions);
        log::debug!(
            "Batch scored: {} customers, {} churners",
            batch.total_customers,
            batch.predicted_churners
        );
        Ok(batch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::fixtures::sample_store;
    use crate::features::Column;

    fn predictor() -> ChurnPredictor {
        ChurnPredictor::new(Arc::new(sample_store()), PipelineConfig::default())
    }

    fn loyal_customer() -> CustomerRecord {
        let mut r = CustomerRecord::example();
        r.tenure = 60;
        r.contract = "Two year".to_string();
        r.payment_method = "Credit card (automatic)".to_string();
        r.internet_service = "DSL".to_string();
        r.monthly_charges = 55.0;
        r.total_charges = 3300.0;
        r
    }

    fn undecided_customer() -> CustomerRecord {
        let mut r = CustomerRecord::example();
        r.tenure = 40;
        r.payment_method = "Mailed check".to_string();
        r.internet_service = "DSL".to_string();
        r.monthly_charges = 50.0;
        r.total_charges = 2000.0;
        r
    }

    #[test]
    fn test_example_customer_churns() {
        let result = predictor().predict_single(&CustomerRecord::example()).unwrap();

        // margin 0.45 + 0.35 + 0.2
        assert!((result.churn_probability - 0.731_058_578_6).abs() < 1e-6);
        assert_eq!(result.churn_prediction, 1);
        assert_eq!(result.churn_label, ChurnLabel::Churn);
        assert_eq!(result.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_loyal_customer_low_risk() {
        let result = predictor().predict_single(&loyal_customer()).unwrap();
        assert_eq!(result.churn_prediction, 0);
        assert_eq!(result.churn_label, ChurnLabel::NoChurn);
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_undecided_customer_medium_risk() {
        let result = predictor().predict_single(&undecided_customer()).unwrap();
        assert_eq!(result.churn_prediction, 0);
        assert_eq!(result.risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_result_invariants() {
        let p = predictor();
        for record in [CustomerRecord::example(), loyal_customer(), undecided_customer()] {
            let r = p.predict_single(&record).unwrap();
            assert!((0.0..=1.0).contains(&r.churn_probability));
            assert!(r.churn_prediction <= 1);
            assert_eq!(r.churn_label == ChurnLabel::Churn, r.churn_prediction == 1);
        }
    }

    #[test]
    fn test_predict_single_idempotent() {
        let p = predictor();
        let record = CustomerRecord::example();
        assert_eq!(p.predict_single(&record).unwrap(), p.predict_single(&record).unwrap());
    }

    #[test]
    fn test_preprocess_width_matches_schema() {
        let p = predictor();
        let row = p.preprocess(&CustomerRecord::example()).unwrap();
        assert_eq!(row.len(), p.store().feature_names().len());

        // AvgMonthlyRate = 85.5 before scaling
        let pos = p.store().schema().position(Column::AvgMonthlyRate.name()).unwrap();
        let unscaled = p.store().scaler().inverse_transform(row);
        assert!((unscaled[pos] - 85.5).abs() < 1e-9);
    }

    #[test]
    fn test_unseen_category_fails_request() {
        let mut record = CustomerRecord::example();
        record.internet_service = "Satellite".to_string();

        match predictor().predict_single(&record) {
            Err(PipelineError::UnseenCategory { column, value }) => {
                assert_eq!(column, Column::InternetService);
                assert_eq!(value, "Satellite");
            }
            other => panic!("Expected UnseenCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_segment_policy() {
        let mut record = CustomerRecord::example();
        record.monthly_charges = 0.0;

        assert!(matches!(
            predictor().predict_single(&record),
            Err(PipelineError::UnbucketedCharge { .. })
        ));

        let clamp = ChurnPredictor::new(
            Arc::new(sample_store()),
            PipelineConfig {
                segment_policy: SegmentPolicy::Clamp,
                ..Default::default()
            },
        );
        assert!(clamp.predict_single(&record).is_ok());
    }

    #[test]
    fn test_batch_preserves_order_and_counts() {
        let records = vec![loyal_customer(), CustomerRecord::example(), undecided_customer()];
        let batch = predictor().predict_batch(&records).unwrap();

        assert_eq!(batch.total_customers, 3);
        assert_eq!(batch.predicted_churners, 1);
        assert_eq!(batch.churn_rate, 0.3333);
        assert_eq!(batch.predictions[1].churn_label, ChurnLabel::Churn);
        assert_eq!(batch.predictions[0].risk_level, RiskLevel::Low);
        assert_eq!(batch.predictions[2].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_empty_batch() {
        let batch = predictor().predict_batch(&[]).unwrap();
        assert_eq!(batch.total_customers, 0);
        assert_eq!(batch.churn_rate, 0.0);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut bad = CustomerRecord::example();
        bad.gender = "Unknown".to_string();
        let records = vec![CustomerRecord::example(), bad, loyal_customer()];

        match predictor().predict_batch(&records) {
            Err(PipelineError::BatchRecord { index, source }) => {
                assert_eq!(index, 1);
                assert!(matches!(*source, PipelineError::UnseenCategory { .. }));
            }
            other => panic!("Expected BatchRecord, got {:?}", other),
        }
    }

    #[test]
    fn test_churn_rate() {
        assert_eq!(churn_rate(0, 0), 0.0);
        assert_eq!(churn_rate(3, 10), 0.3);
        assert_eq!(churn_rate(2, 3), 0.6667);
        assert_eq!(churn_rate(5, 5), 1.0);
        // 0.03125 and 0.09375 sit exactly on a tie
        assert_eq!(churn_rate(1, 32), 0.0312);
        assert_eq!(churn_rate(3, 32), 0.0938);
    }

    #[test]
    fn test_wire_format() {
        let result = PredictionResult {
            churn_prediction: 0,
            churn_probability: 0.12,
            churn_label: ChurnLabel::NoChurn,
            risk_level: RiskLevel::Low,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["churn_label"], "No Churn");
        assert_eq!(json["risk_level"], "Low");
    }
}
