//! Risk Classification Policy
//!
//! Maps a churn probability to a coarse risk tier. Boundaries belong to the
//! higher tier.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const DEFAULT_LOW_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MEDIUM_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tier boundaries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Probabilities below this are Low
    pub low: f64,
    /// Probabilities at or above this are High
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW_THRESHOLD,
            medium: DEFAULT_MEDIUM_THRESHOLD,
        }
    }
}

impl RiskThresholds {
    /// Checked constructor: `0 <= low <= medium <= 1`
    pub fn new(low: f64, medium: f64) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&medium) {
            return Err(format!(
                "risk thresholds must lie in [0, 1] (low={}, medium={})",
                low, medium
            ));
        }
        if low > medium {
            return Err(format!(
                "low risk threshold {} exceeds medium threshold {}",
                low, medium
            ));
        }
        Ok(Self { low, medium })
    }

    pub fn classify(&self, probability: f64) -> RiskLevel {
        if probability < self.low {
            RiskLevel::Low
        } else if probability < self.medium {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}
