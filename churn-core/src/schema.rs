//! Column Ordering Stage - training schema resolved against the layout
//!
//! The schema (ordered feature names saved at training time) is resolved
//! once, at artifact load, into an index table. Requests only gather
//! values through that table; no name lookups happen per request.

use std::collections::HashSet;

use ndarray::Array1;

use crate::encoding::{EncodedVector, EncoderSet};
use crate::error::{PipelineError, PipelineResult};
use crate::features::Column;

#[derive(Debug, Clone)]
pub struct SchemaPlan {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl SchemaPlan {
    /// Resolve the training schema.
    ///
    /// Fails on unknown or duplicated names, and on categorical columns
    /// that have no fitted encoder (their values could never be numeric).
    pub fn resolve(names: &[String], encoders: &EncoderSet) -> PipelineResult<Self> {
        if names.is_empty() {
            return Err(PipelineError::SchemaMismatch(
                "feature name list is empty".to_string(),
            ));
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());

        for name in names {
            let column = Column::from_name(name).ok_or_else(|| {
                PipelineError::SchemaMismatch(format!(
                    "schema column '{}' is not produced by feature engineering",
                    name
                ))
            })?;

            if !seen.insert(column) {
                return Err(PipelineError::SchemaMismatch(format!(
                    "schema column '{}' appears more than once",
                    name
                )));
            }

            if column.is_categorical() && !encoders.contains(column) {
                return Err(PipelineError::SchemaMismatch(format!(
                    "categorical schema column '{}' has no fitted encoder",
                    name
                )));
            }

            columns.push(column);
        }

        Ok(Self {
            names: names.to_vec(),
            columns,
        })
    }

    /// Number of model inputs
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Schema position of a feature name
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Gather encoded values in schema order
    pub fn gather(&self, encoded: &EncodedVector) -> PipelineResult<Array1<f64>> {
        let values = self
            .columns
            .iter()
            .map(|&col| {
                encoded.get(col).ok_or_else(|| {
                    PipelineError::SchemaMismatch(format!(
                        "schema column '{}' is missing after encoding",
                        col
                    ))
                })
            })
            .collect::<PipelineResult<Vec<f64>>>()?;

        Ok(Array1::from(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{encode, LabelEncoder};
    use crate::features::FeatureEngineer;
    use crate::record::CustomerRecord;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn contract_encoders() -> EncoderSet {
        let mut set = EncoderSet::empty();
        set.insert(
            Column::Contract,
            LabelEncoder::from_classes(names(&["Month-to-month", "One year", "Two year"])).unwrap(),
        );
        set
    }

    #[test]
    fn test_resolve_and_gather_reorders() {
        let plan = SchemaPlan::resolve(
            &names(&["MonthlyCharges", "Contract", "tenure", "AvgMonthlyRate"]),
            &contract_encoders(),
        )
        .unwrap();
        assert_eq!(plan.width(), 4);
        assert_eq!(plan.position("tenure"), Some(2));

        let record = CustomerRecord::example();
        let features = FeatureEngineer::default().engineer(&record);
        let encoded = encode(&features, &contract_encoders()).unwrap();
        let row = plan.gather(&encoded).unwrap();

        assert_eq!(row.to_vec(), vec![85.5, 0.0, 12.0, 85.5]);
    }

    #[test]
    fn test_resolve_rejects_unknown_name() {
        let err = SchemaPlan::resolve(&names(&["tenure", "customerID"]), &EncoderSet::empty())
            .unwrap_err();
        assert!(err.to_string().contains("customerID"));
    }

    #[test]
    fn test_resolve_rejects_duplicates() {
        let err = SchemaPlan::resolve(&names(&["tenure", "tenure"]), &EncoderSet::empty())
            .unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch(_)));
    }

    #[test]
    fn test_resolve_rejects_unencoded_categorical() {
        let err = SchemaPlan::resolve(&names(&["tenure", "gender"]), &contract_encoders())
            .unwrap_err();
        assert!(err.to_string().contains("gender"));
    }

    #[test]
    fn test_resolve_rejects_empty() {
        assert!(SchemaPlan::resolve(&[], &EncoderSet::empty()).is_err());
    }
}
