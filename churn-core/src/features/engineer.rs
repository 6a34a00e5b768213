//! Feature Engineering - derived columns computed from a raw record
//!
//! Must reproduce the training-time derivations exactly. Every function
//! here is pure; the only knob is the [`SegmentPolicy`] for charges that
//! fall outside the value-segment bins.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::layout::Column;
use super::vector::FeatureVector;
use crate::record::CustomerRecord;

/// Marker for an active flag
pub const YES: &str = "Yes";
/// Marker for an inactive flag / no internet service
pub const NO: &str = "No";

pub const MONTH_TO_MONTH: &str = "Month-to-month";
pub const ELECTRONIC_CHECK: &str = "Electronic check";

/// Columns counted by ServiceCount
pub const SERVICE_COLUMNS: [Column; 8] = [
    Column::PhoneService,
    Column::InternetService,
    Column::OnlineSecurity,
    Column::OnlineBackup,
    Column::DeviceProtection,
    Column::TechSupport,
    Column::StreamingTv,
    Column::StreamingMovies,
];

/// Columns counted by PremiumServiceCount
pub const PREMIUM_COLUMNS: [Column; 4] = [
    Column::OnlineSecurity,
    Column::OnlineBackup,
    Column::DeviceProtection,
    Column::TechSupport,
];

/// Right-inclusive upper edges of the Low / Medium / High value bins
pub const SEGMENT_EDGES: [f64; 3] = [35.0, 70.0, 120.0];

// ============================================================================
// VALUE SEGMENT
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSegment {
    Low,
    Medium,
    High,
}

impl ValueSegment {
    pub fn label(self) -> &'static str {
        match self {
            ValueSegment::Low => "Low Value",
            ValueSegment::Medium => "Medium Value",
            ValueSegment::High => "High Value",
        }
    }

    /// Bucket MonthlyCharges into (0,35], (35,70], (70,120]
    pub fn bucket(monthly_charges: f64, policy: SegmentPolicy) -> Option<ValueSegment> {
        let in_bins = monthly_charges > 0.0 && monthly_charges <= SEGMENT_EDGES[2];

        if !in_bins {
            return match policy {
                SegmentPolicy::Strict => None,
                SegmentPolicy::Clamp if monthly_charges > SEGMENT_EDGES[2] => Some(ValueSegment::High),
                SegmentPolicy::Clamp if monthly_charges <= 0.0 => Some(ValueSegment::Low),
                // NaN
                SegmentPolicy::Clamp => None,
            };
        }

        if monthly_charges <= SEGMENT_EDGES[0] {
            Some(ValueSegment::Low)
        } else if monthly_charges <= SEGMENT_EDGES[1] {
            Some(ValueSegment::Medium)
        } else {
            Some(ValueSegment::High)
        }
    }
}

/// How to treat MonthlyCharges outside (0, 120]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentPolicy {
    /// Leave the segment missing; encoding rejects the record
    #[default]
    Strict,
    /// Clamp into the nearest edge bucket
    Clamp,
}

impl FromStr for SegmentPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(SegmentPolicy::Strict),
            "clamp" => Ok(SegmentPolicy::Clamp),
            other => Err(format!("unknown value segment policy '{}'", other)),
        }
    }
}

impl fmt::Display for SegmentPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SegmentPolicy::Strict => f.write_str("strict"),
            SegmentPolicy::Clamp => f.write_str("clamp"),
        }
    }
}

// ============================================================================
// DERIVATIONS
// ============================================================================

fn yes_no(flag: bool) -> &'static str {
    if flag { YES } else { NO }
}

fn is_yes(record: &CustomerRecord, column: Column) -> bool {
    record.label(column) == Some(YES)
}

/// Active services; InternetService counts unless it is "No"
pub fn service_count(record: &CustomerRecord) -> u32 {
    SERVICE_COLUMNS
        .iter()
        .filter(|&&col| match col {
            Column::InternetService => record.internet_service != NO,
            _ => is_yes(record, col),
        })
        .count() as u32
}

/// TotalCharges / tenure, with tenure 0 treated as 1
pub fn avg_monthly_rate(total_charges: f64, tenure: u32) -> f64 {
    total_charges / tenure.max(1) as f64
}

pub fn premium_service_count(record: &CustomerRecord) -> u32 {
    PREMIUM_COLUMNS
        .iter()
        .filter(|&&col| is_yes(record, col))
        .count() as u32
}

pub fn has_streaming(record: &CustomerRecord) -> bool {
    record.streaming_tv == YES || record.streaming_movies == YES
}

pub fn is_high_risk_profile(record: &CustomerRecord) -> bool {
    record.contract == MONTH_TO_MONTH && record.payment_method == ELECTRONIC_CHECK
}

pub fn is_family_customer(record: &CustomerRecord) -> bool {
    record.partner == YES || record.dependents == YES
}

// ============================================================================
// ENGINEER
// ============================================================================

/// Builds the full [`FeatureVector`] for a record
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEngineer {
    policy: SegmentPolicy,
}

impl FeatureEngineer {
    pub fn new(policy: SegmentPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> SegmentPolicy {
        self.policy
    }

    pub fn engineer<'a>(&self, record: &'a CustomerRecord) -> FeatureVector<'a> {
        let mut v = FeatureVector::new();

        // Raw attributes
        for col in Column::ALL {
            if let Some(label) = record.label(col) {
                v.set_label(col, label);
            }
        }
        let tenure = record.tenure as f64;
        v.set_number(Column::SeniorCitizen, record.senior_citizen as f64);
        v.set_number(Column::Tenure, tenure);
        v.set_number(Column::MonthlyCharges, record.monthly_charges);
        v.set_number(Column::TotalCharges, record.total_charges);

        // Derived
        let services = service_count(record) as f64;
        let premium = premium_service_count(record);

        v.set_number(Column::ServiceCount, services);
        v.set_number(
            Column::AvgMonthlyRate,
            avg_monthly_rate(record.total_charges, record.tenure),
        );
        v.set_number(Column::PremiumServiceCount, premium as f64);
        v.set_label(Column::HasPremiumServices, yes_no(premium > 0));
        v.set_label(Column::HasStreaming, yes_no(has_streaming(record)));
        if let Some(segment) = ValueSegment::bucket(record.monthly_charges, self.policy) {
            v.set_label(Column::ValueSegment, segment.label());
        }
        v.set_label(Column::HighRiskProfile, yes_no(is_high_risk_profile(record)));
        v.set_label(Column::FamilyCustomer, yes_no(is_family_customer(record)));

        // Interactions
        v.set_number(Column::TenureMonthlyCharges, tenure * record.monthly_charges);
        v.set_number(Column::TenureServiceCount, tenure * services);
        v.set_number(
            Column::MonthlyChargesServiceCount,
            record.monthly_charges * services,
        );

        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_record() -> CustomerRecord {
        let mut r = CustomerRecord::example();
        r.phone_service = NO.to_string();
        r.internet_service = NO.to_string();
        for field in [
            &mut r.online_security,
            &mut r.online_backup,
            &mut r.device_protection,
            &mut r.tech_support,
            &mut r.streaming_tv,
            &mut r.streaming_movies,
        ] {
            *field = NO.to_string();
        }
        r
    }

    #[test]
    fn test_service_count_phone_and_dsl() {
        let mut r = bare_record();
        r.phone_service = YES.to_string();
        r.internet_service = "DSL".to_string();
        assert_eq!(service_count(&r), 2);
    }

    #[test]
    fn test_service_count_no_internet_marker() {
        let mut r = bare_record();
        r.online_security = "No internet service".to_string();
        assert_eq!(service_count(&r), 0);

        r.internet_service = "Fiber optic".to_string();
        assert_eq!(service_count(&r), 1);
    }

    #[test]
    fn test_avg_monthly_rate() {
        assert_eq!(avg_monthly_rate(29.85, 0), 29.85);
        assert_eq!(avg_monthly_rate(1026.0, 12), 85.5);
        assert_eq!(avg_monthly_rate(100.0, 3), 100.0 / 3.0);
    }

    #[test]
    fn test_value_segment_bins() {
        let p = SegmentPolicy::Strict;
        assert_eq!(ValueSegment::bucket(18.25, p), Some(ValueSegment::Low));
        assert_eq!(ValueSegment::bucket(35.0, p), Some(ValueSegment::Low));
        assert_eq!(ValueSegment::bucket(35.01, p), Some(ValueSegment::Medium));
        assert_eq!(ValueSegment::bucket(70.0, p), Some(ValueSegment::Medium));
        assert_eq!(ValueSegment::bucket(70.5, p), Some(ValueSegment::High));
        assert_eq!(ValueSegment::bucket(120.0, p), Some(ValueSegment::High));
    }

    #[test]
    fn test_value_segment_edges_strict() {
        let p = SegmentPolicy::Strict;
        assert_eq!(ValueSegment::bucket(0.0, p), None);
        assert_eq!(ValueSegment::bucket(120.01, p), None);
        assert_eq!(ValueSegment::bucket(f64::NAN, p), None);
    }

    #[test]
    fn test_value_segment_edges_clamp() {
        let p = SegmentPolicy::Clamp;
        assert_eq!(ValueSegment::bucket(0.0, p), Some(ValueSegment::Low));
        assert_eq!(ValueSegment::bucket(450.0, p), Some(ValueSegment::High));
        assert_eq!(ValueSegment::bucket(50.0, p), Some(ValueSegment::Medium));
        assert_eq!(ValueSegment::bucket(f64::NAN, p), None);
    }

    #[test]
    fn test_segment_policy_parse() {
        assert_eq!("strict".parse::<SegmentPolicy>(), Ok(SegmentPolicy::Strict));
        assert_eq!(" Clamp ".parse::<SegmentPolicy>(), Ok(SegmentPolicy::Clamp));
        assert!("lenient".parse::<SegmentPolicy>().is_err());
    }

    #[test]
    fn test_flags() {
        let mut r = bare_record();
        r.partner = NO.to_string();
        r.dependents = NO.to_string();
        assert!(!is_family_customer(&r));
        r.dependents = YES.to_string();
        assert!(is_family_customer(&r));

        r.contract = "One year".to_string();
        assert!(!is_high_risk_profile(&r));
        r.contract = MONTH_TO_MONTH.to_string();
        assert!(is_high_risk_profile(&r));
        r.payment_method = "Mailed check".to_string();
        assert!(!is_high_risk_profile(&r));

        assert!(!has_streaming(&r));
        r.streaming_movies = YES.to_string();
        assert!(has_streaming(&r));
    }

    #[test]
    fn test_premium_services() {
        let mut r = bare_record();
        assert_eq!(premium_service_count(&r), 0);
        r.tech_support = YES.to_string();
        r.online_backup = YES.to_string();
        assert_eq!(premium_service_count(&r), 2);

        let v = FeatureEngineer::default().engineer(&r);
        assert_eq!(v.number(Column::PremiumServiceCount), Some(2.0));
        assert_eq!(v.label(Column::HasPremiumServices), Some(YES));
    }
}
