//! Error types for the prediction pipeline and artifact loading

use std::path::PathBuf;

use thiserror::Error;

use crate::features::Column;

/// Errors raised while turning a customer record into a prediction
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Artifacts were never loaded (degraded start)
    #[error("Model not loaded. Artifacts must be loaded before serving predictions")]
    NotLoaded,

    /// Categorical value absent from the fitted encoder's vocabulary
    #[error("Unseen category for '{column}': '{value}' was not present at training time")]
    UnseenCategory { column: Column, value: String },

    /// MonthlyCharges fell outside the value-segment bins
    #[error("MonthlyCharges {value} is outside the value segment range (0, 120]")]
    UnbucketedCharge { value: f64 },

    /// Engineered columns and training schema disagree
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A record inside a batch failed; the whole batch is rejected
    #[error("Customer #{index}: {source}")]
    BatchRecord {
        index: usize,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    /// The error that caused the failure, unwrapping batch context
    pub fn root(&self) -> &PipelineError {
        match self {
            PipelineError::BatchRecord { source, .. } => source.root(),
            other => other,
        }
    }

    /// True when the failure was caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(
            self.root(),
            PipelineError::UnseenCategory { .. } | PipelineError::UnbucketedCharge { .. }
        )
    }
}

/// Errors raised while loading the artifact bundle
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid artifact {artifact}: {reason}")]
    Invalid { artifact: &'static str, reason: String },

    #[error(transparent)]
    Schema(#[from] PipelineError),
}

pub type PipelineResult<T> = Result<T, PipelineError>;
