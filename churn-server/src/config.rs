//! Configuration module

use std::env;
use std::path::PathBuf;

use churn_core::{PipelineConfig, RiskThresholds, SegmentPolicy};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} has invalid value '{value}': {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid risk thresholds: {0}")]
    Thresholds(String),
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Directory holding the artifact bundle
    pub models_dir: PathBuf,

    /// Environment (development, production)
    pub environment: String,

    /// Risk tier boundaries
    pub risk_thresholds: RiskThresholds,

    /// Handling of MonthlyCharges outside the value-segment bins
    pub segment_policy: SegmentPolicy,

    /// Serve (unhealthy) even when artifacts fail to load
    pub allow_degraded_start: bool,

    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = parse_or(&lookup, "PORT", 8000u16)?;
        let low = parse_or(&lookup, "RISK_THRESHOLD_LOW", RiskThresholds::default().low)?;
        let medium = parse_or(&lookup, "RISK_THRESHOLD_MEDIUM", RiskThresholds::default().medium)?;
        let risk_thresholds = RiskThresholds::new(low, medium).map_err(ConfigError::Thresholds)?;

        let segment_policy = match lookup("VALUE_SEGMENT_POLICY") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidValue {
                key: "VALUE_SEGMENT_POLICY",
                value: raw.clone(),
                reason,
            })?,
            None => SegmentPolicy::default(),
        };

        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            None | Some("") | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(ConfigError::InvalidValue {
                    key: "LOG_FORMAT",
                    value: other.to_string(),
                    reason: "expected 'pretty' or 'json'".to_string(),
                })
            }
        };

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            models_dir: lookup("MODELS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("models")),
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string()),
            risk_thresholds,
            segment_policy,
            allow_degraded_start: parse_or(&lookup, "ALLOW_DEGRADED_START", false)?,
            log_format,
        })
    }

    /// Settings handed to the prediction pipeline
    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            thresholds: self.risk_thresholds,
            segment_policy: self.segment_policy,
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
