//! Encoding Stage - categorical labels to training-time integer codes
//!
//! Each encoder is an explicit label → code map built from the fitted class
//! list. Codes are the index of the label in that list, the way a label
//! encoder assigns them, so `decode(encode(x)) == x`.

use std::collections::HashMap;

use crate::error::{ArtifactError, PipelineError, PipelineResult};
use crate::features::{Column, FeatureValue, FeatureVector, FEATURE_COUNT};

// ============================================================================
// LABEL ENCODER
// ============================================================================

#[derive(Debug, Clone)]
pub struct LabelEncoder {
    classes: Vec<String>,
    codes: HashMap<String, u32>,
}

impl LabelEncoder {
    /// Build from the fitted class list; labels must be unique
    pub fn from_classes(classes: Vec<String>) -> Result<Self, String> {
        if classes.is_empty() {
            return Err("encoder has no classes".to_string());
        }

        let mut codes = HashMap::with_capacity(classes.len());
        for (code, label) in classes.iter().enumerate() {
            if codes.insert(label.clone(), code as u32).is_some() {
                return Err(format!("duplicate class '{}'", label));
            }
        }

        Ok(Self { classes, codes })
    }

    pub fn encode(&self, label: &str) -> Option<u32> {
        self.codes.get(label).copied()
    }

    pub fn decode(&self, code: u32) -> Option<&str> {
        self.classes.get(code as usize).map(String::as_str)
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

// ============================================================================
// ENCODER SET
// ============================================================================

/// Fitted encoders indexed by layout column
#[derive(Debug, Clone)]
pub struct EncoderSet {
    by_column: [Option<LabelEncoder>; FEATURE_COUNT],
}

impl EncoderSet {
    pub fn empty() -> Self {
        Self {
            by_column: std::array::from_fn(|_| None),
        }
    }

    /// Build from the artifact map (column name → class list).
    ///
    /// Entries for columns outside the categorical list are ignored.
    pub fn from_classes(map: HashMap<String, Vec<String>>) -> Result<Self, ArtifactError> {
        let mut set = Self::empty();

        for (name, classes) in map {
            let column = match Column::from_name(&name) {
                Some(col) if col.is_categorical() => col,
                _ => {
                    log::warn!("Ignoring encoder for non-categorical column '{}'", name);
                    continue;
                }
            };

            let encoder = LabelEncoder::from_classes(classes).map_err(|reason| {
                ArtifactError::Invalid {
                    artifact: "label_encoders",
                    reason: format!("{}: {}", name, reason),
                }
            })?;
            set.insert(column, encoder);
        }

        Ok(set)
    }

    pub fn insert(&mut self, column: Column, encoder: LabelEncoder) {
        self.by_column[column.index()] = Some(encoder);
    }

    pub fn get(&self, column: Column) -> Option<&LabelEncoder> {
        self.by_column[column.index()].as_ref()
    }

    pub fn contains(&self, column: Column) -> bool {
        self.get(column).is_some()
    }

    /// Columns with a fitted encoder, in layout order
    pub fn columns(&self) -> Vec<Column> {
        Column::ALL.into_iter().filter(|c| self.contains(*c)).collect()
    }
}

// ============================================================================
// ENCODED VECTOR
// ============================================================================

/// Feature vector with categorical columns replaced by codes.
///
/// `None` marks a categorical column left unencoded (no fitted encoder).
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedVector {
    values: [Option<f64>; FEATURE_COUNT],
}

impl EncodedVector {
    pub fn get(&self, column: Column) -> Option<f64> {
        self.values[column.index()]
    }
}

/// Replace every encodable label with its code
pub fn encode(features: &FeatureVector<'_>, encoders: &EncoderSet) -> PipelineResult<EncodedVector> {
    let mut values = [None; FEATURE_COUNT];

    for (column, value) in features.iter() {
        let encoder = if column.is_categorical() {
            encoders.get(column)
        } else {
            None
        };

        values[column.index()] = match (value, encoder) {
            (FeatureValue::Number(v), _) => Some(v),
            (FeatureValue::Label(label), Some(enc)) => {
                let code = enc.encode(label).ok_or_else(|| PipelineError::UnseenCategory {
                    column,
                    value: label.to_string(),
                })?;
                Some(code as f64)
            }
            (FeatureValue::Missing, Some(_)) if column == Column::ValueSegment => {
                return Err(PipelineError::UnbucketedCharge {
                    value: features.number(Column::MonthlyCharges).unwrap_or(f64::NAN),
                });
            }
            (FeatureValue::Missing, Some(_)) => {
                return Err(PipelineError::SchemaMismatch(format!(
                    "column '{}' has an encoder but no value",
                    column
                )));
            }
            (FeatureValue::Label(_), None) | (FeatureValue::Missing, None) => None,
        };
    }

    Ok(EncodedVector { values })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FeatureEngineer;
    use crate::record::CustomerRecord;

    fn classes(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|s| s.to_string()).collect()
    }

    fn contract_encoders() -> EncoderSet {
        let mut map = HashMap::new();
        map.insert(
            "Contract".to_string(),
            classes(&["Month-to-month", "One year", "Two year"]),
        );
        map.insert(
            "ValueSegment".to_string(),
            classes(&["High Value", "Low Value", "Medium Value"]),
        );
        EncoderSet::from_classes(map).unwrap()
    }

    #[test]
    fn test_label_encoder_roundtrip() {
        let enc = LabelEncoder::from_classes(classes(&["No", "Yes"])).unwrap();
        assert_eq!(enc.encode("No"), Some(0));
        assert_eq!(enc.encode("Yes"), Some(1));
        assert_eq!(enc.encode("Maybe"), None);
        assert_eq!(enc.decode(1), Some("Yes"));
        assert_eq!(enc.decode(2), None);
        assert_eq!(enc.len(), 2);
    }

    #[test]
    fn test_label_encoder_rejects_duplicates() {
        assert!(LabelEncoder::from_classes(classes(&["No", "No"])).is_err());
        assert!(LabelEncoder::from_classes(Vec::new()).is_err());
    }

    #[test]
    fn test_encoder_set_ignores_numeric_and_unknown_columns() {
        let mut map = HashMap::new();
        map.insert("tenure".to_string(), classes(&["1", "2"]));
        map.insert("customerID".to_string(), classes(&["a"]));
        map.insert("Partner".to_string(), classes(&["No", "Yes"]));

        let set = EncoderSet::from_classes(map).unwrap();
        assert_eq!(set.columns(), vec![Column::Partner]);
    }

    #[test]
    fn test_encode_example() {
        let record = CustomerRecord::example();
        let features = FeatureEngineer::default().engineer(&record);
        let encoded = encode(&features, &contract_encoders()).unwrap();

        assert_eq!(encoded.get(Column::Contract), Some(0.0));
        assert_eq!(encoded.get(Column::ValueSegment), Some(0.0));
        assert_eq!(encoded.get(Column::Tenure), Some(12.0));
        // no encoder fitted for gender
        assert_eq!(encoded.get(Column::Gender), None);
    }

    #[test]
    fn test_encode_unseen_category() {
        let mut record = CustomerRecord::example();
        record.contract = "Three year".to_string();
        let features = FeatureEngineer::default().engineer(&record);

        match encode(&features, &contract_encoders()) {
            Err(PipelineError::UnseenCategory { column, value }) => {
                assert_eq!(column, Column::Contract);
                assert_eq!(value, "Three year");
            }
            other => panic!("Expected UnseenCategory, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_unbucketed_charge() {
        let mut record = CustomerRecord::example();
        record.monthly_charges = 130.0;
        let features = FeatureEngineer::default().engineer(&record);

        match encode(&features, &contract_encoders()) {
            Err(PipelineError::UnbucketedCharge { value }) => assert_eq!(value, 130.0),
            other => panic!("Expected UnbucketedCharge, got {:?}", other),
        }

        // Without a ValueSegment encoder the missing bucket is harmless
        let features = FeatureEngineer::default().engineer(&record);
        let encoded = encode(&features, &EncoderSet::empty()).unwrap();
        assert_eq!(encoded.get(Column::ValueSegment), None);
    }
}
