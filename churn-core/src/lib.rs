//! Churn Prediction Core
//!
//! Reproduces the training-time feature pipeline at inference time and
//! scores customers against a fitted artifact bundle.
//!
//! # Pipeline
//!
//! ```text
//! CustomerRecord
//!     │  features::FeatureEngineer     derived columns
//!     ▼
//! FeatureVector
//!     │  encoding::encode              labels → training codes
//!     ▼
//! EncodedVector
//!     │  schema::SchemaPlan::gather    training column order
//!     │  model::StandardScaler         (x - mean) / scale
//!     ▼
//! ScaledVector ──► model::Classifier ──► model::RiskThresholds
//! ```

pub mod artifacts;
pub mod encoding;
pub mod error;
pub mod features;
pub mod model;
pub mod prediction;
pub mod record;
pub mod schema;

pub use artifacts::{ArtifactStore, ModelMetadata};
pub use error::{ArtifactError, PipelineError, PipelineResult};
pub use features::{LayoutInfo, SegmentPolicy};
pub use model::{RiskLevel, RiskThresholds};
pub use prediction::{BatchResult, ChurnLabel, ChurnPredictor, PipelineConfig, PredictionResult};
pub use record::CustomerRecord;
