//! Features Module - Feature Engineering Stage
//!
//! Turns a raw [`CustomerRecord`](crate::record::CustomerRecord) into the
//! engineered column set the model was trained on. Column order and names
//! live in `layout.rs`; derivations live in `engineer.rs`.

pub mod engineer;
pub mod layout;
pub mod vector;


pub use engineer::{FeatureEngineer, SegmentPolicy, ValueSegment};
pub use layout::{layout_hash, Column, LayoutInfo, CATEGORICAL_COLUMNS, FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION};
pub use vector::{FeatureValue, FeatureVector};
