//! Model Module - scaler, classifier and risk policy
//!
//! Everything the pipeline applies after encoding: the fitted scaler, the
//! tree-ensemble classifier and the risk-tier thresholds.

pub mod scaler;
pub mod threshold;
pub mod tree;

pub use scaler::{ScalerParams, StandardScaler};
pub use threshold::{RiskLevel, RiskThresholds};
pub use tree::{Classifier, ModelFile, TreeEnsemble};
