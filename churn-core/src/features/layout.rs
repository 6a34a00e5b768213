//! Feature Layout - Centralized Column Definition
//!
//! **This file controls the engineered feature schema.**
//!
//! ## Rules:
//! 1. Add column → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Rename column → increment FEATURE_VERSION
//!
//! Column names must match the training dataset byte for byte; the
//! artifact schema is resolved against them at load time.

use std::fmt;

use crc32fast::Hasher;
use serde::{Deserialize, Serialize};

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
pub const FEATURE_VERSION: u8 = 1;

/// Total number of engineered columns
pub const FEATURE_COUNT: usize = 30;

// ============================================================================
// COLUMN ENUM (Authoritative source)
// ============================================================================

/// Every column the feature engineering stage produces, in layout order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    // === Raw customer attributes (0-18) ===
    Gender,
    SeniorCitizen,
    Partner,
    Dependents,
    Tenure,
    PhoneService,
    MultipleLines,
    InternetService,
    OnlineSecurity,
    OnlineBackup,
    DeviceProtection,
    TechSupport,
    StreamingTv,
    StreamingMovies,
    Contract,
    PaperlessBilling,
    PaymentMethod,
    MonthlyCharges,
    TotalCharges,

    // === Engineered (19-26) ===
    ServiceCount,
    AvgMonthlyRate,
    PremiumServiceCount,
    HasPremiumServices,
    HasStreaming,
    ValueSegment,
    HighRiskProfile,
    FamilyCustomer,

    // === Interactions (27-29) ===
    TenureMonthlyCharges,
    TenureServiceCount,
    MonthlyChargesServiceCount,
}

/// Column names in exact layout order
pub const FEATURE_LAYOUT: [&str; FEATURE_COUNT] = [
    "gender",
    "SeniorCitizen",
    "Partner",
    "Dependents",
    "tenure",
    "PhoneService",
    "MultipleLines",
    "InternetService",
    "OnlineSecurity",
    "OnlineBackup",
    "DeviceProtection",
    "TechSupport",
    "StreamingTV",
    "StreamingMovies",
    "Contract",
    "PaperlessBilling",
    "PaymentMethod",
    "MonthlyCharges",
    "TotalCharges",
    "ServiceCount",
    "AvgMonthlyRate",
    "PremiumServiceCount",
    "HasPremiumServices",
    "HasStreaming",
    "ValueSegment",
    "HighRiskProfile",
    "FamilyCustomer",
    "Tenure_MonthlyCharges",
    "Tenure_ServiceCount",
    "MonthlyCharges_ServiceCount",
];

/// Columns that hold labels and go through a fitted label encoder
pub const CATEGORICAL_COLUMNS: [Column; 20] = [
    Column::Gender,
    Column::Partner,
    Column::Dependents,
    Column::PhoneService,
    Column::MultipleLines,
    Column::InternetService,
    Column::OnlineSecurity,
    Column::OnlineBackup,
    Column::DeviceProtection,
    Column::TechSupport,
    Column::StreamingTv,
    Column::StreamingMovies,
    Column::Contract,
    Column::PaperlessBilling,
    Column::PaymentMethod,
    Column::HasPremiumServices,
    Column::HasStreaming,
    Column::HighRiskProfile,
    Column::FamilyCustomer,
    Column::ValueSegment,
];

impl Column {
    /// All columns in layout order
    pub const ALL: [Column; FEATURE_COUNT] = [
        Column::Gender,
        Column::SeniorCitizen,
        Column::Partner,
        Column::Dependents,
        Column::Tenure,
        Column::PhoneService,
        Column::MultipleLines,
        Column::InternetService,
        Column::OnlineSecurity,
        Column::OnlineBackup,
        Column::DeviceProtection,
        Column::TechSupport,
        Column::StreamingTv,
        Column::StreamingMovies,
        Column::Contract,
        Column::PaperlessBilling,
        Column::PaymentMethod,
        Column::MonthlyCharges,
        Column::TotalCharges,
        Column::ServiceCount,
        Column::AvgMonthlyRate,
        Column::PremiumServiceCount,
        Column::HasPremiumServices,
        Column::HasStreaming,
        Column::ValueSegment,
        Column::HighRiskProfile,
        Column::FamilyCustomer,
        Column::TenureMonthlyCharges,
        Column::TenureServiceCount,
        Column::MonthlyChargesServiceCount,
    ];

    /// Position in the layout
    pub fn index(self) -> usize {
        self as usize
    }

    /// Training-time column name
    pub fn name(self) -> &'static str {
        FEATURE_LAYOUT[self.index()]
    }

    /// Resolve a training-time column name
    pub fn from_name(name: &str) -> Option<Column> {
        FEATURE_LAYOUT
            .iter()
            .position(|&n| n == name)
            .map(|i| Column::ALL[i])
    }

    pub fn is_categorical(self) -> bool {
        CATEGORICAL_COLUMNS.contains(&self)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// CRC32 fingerprint of the layout (version + ordered names)
pub fn layout_hash() -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]);
    }

    hasher.finalize()
}

/// Layout information for introspection endpoints and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutInfo {
    pub version: u8,
    pub hash: u32,
    pub feature_count: usize,
    pub categorical_count: usize,
}

impl LayoutInfo {
    pub fn current() -> Self {
        Self {
            version: FEATURE_VERSION,
            hash: layout_hash(),
            feature_count: FEATURE_COUNT,
            categorical_count: CATEGORICAL_COLUMNS.len(),
        }
    }
}

impl Default for LayoutInfo {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_layout_matches_enum() {
        assert_eq!(Column::ALL.len(), FEATURE_LAYOUT.len());
        for (i, col) in Column::ALL.iter().enumerate() {
            assert_eq!(col.index(), i);
            assert_eq!(Column::from_name(col.name()), Some(*col));
        }
    }

    #[test]
    fn test_layout_names_unique() {
        let names: HashSet<_> = FEATURE_LAYOUT.iter().collect();
        assert_eq!(names.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_training_names() {
        assert_eq!(Column::StreamingTv.name(), "StreamingTV");
        assert_eq!(Column::Tenure.name(), "tenure");
        assert_eq!(
            Column::MonthlyChargesServiceCount.name(),
            "MonthlyCharges_ServiceCount"
        );
        assert_eq!(Column::from_name("customerID"), None);
    }

    #[test]
    fn test_categorical_columns() {
        assert!(Column::Contract.is_categorical());
        assert!(Column::ValueSegment.is_categorical());
        assert!(!Column::SeniorCitizen.is_categorical());
        assert!(!Column::ServiceCount.is_categorical());
    }

    #[test]
    fn test_layout_hash_consistency() {
        assert_eq!(layout_hash(), layout_hash());
        assert_ne!(layout_hash(), 0);
    }

    #[test]
    fn test_layout_info() {
        let info = LayoutInfo::current();
        assert_eq!(info.version, FEATURE_VERSION);
        assert_eq!(info.feature_count, 30);
        assert_eq!(info.categorical_count, 20);
    }
}
