//! Artifact Store - the fitted bundle produced by offline training
//!
//! Loaded once at startup from a directory, validated against the feature
//! layout, then shared read-only (`Arc<ArtifactStore>`) by every request.
//!
//! | file                  | content                                   |
//! |-----------------------|-------------------------------------------|
//! | `model.json`          | tree ensemble dump ([`ModelFile`])        |
//! | `scaler.json`         | `{"mean": [..], "scale": [..]}`           |
//! | `label_encoders.json` | `{"<column>": ["<class0>", ..]}`          |
//! | `feature_names.json`  | ordered training schema                   |
//! | `model_metadata.json` | name, evaluation metrics, training date   |

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::encoding::EncoderSet;
use crate::error::{ArtifactError, PipelineError};
use crate::model::{Classifier, ModelFile, ScalerParams, StandardScaler, TreeEnsemble};
use crate::schema::SchemaPlan;

pub const MODEL_FILE: &str = "model.json";
pub const SCALER_FILE: &str = "scaler.json";
pub const ENCODERS_FILE: &str = "label_encoders.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
pub const METADATA_FILE: &str = "model_metadata.json";

/// Digest order
const ARTIFACT_FILES: [&str; 5] = [
    MODEL_FILE,
    SCALER_FILE,
    ENCODERS_FILE,
    FEATURE_NAMES_FILE,
    METADATA_FILE,
];

/// Training-time metadata, informational only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_name: String,
    pub f1_score: f64,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub roc_auc: f64,
    pub n_features: usize,
    pub training_date: String,
}

/// Parsed, not yet validated artifacts
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub model: ModelFile,
    pub scaler: ScalerParams,
    pub encoders: HashMap<String, Vec<String>>,
    pub feature_names: Vec<String>,
    pub metadata: ModelMetadata,
}

impl ArtifactBundle {
    /// Read every artifact file from `dir`
    pub fn read_dir(dir: &Path) -> Result<Self, ArtifactError> {
        Ok(Self {
            model: read_json(&dir.join(MODEL_FILE))?,
            scaler: read_json(&dir.join(SCALER_FILE))?,
            encoders: read_json(&dir.join(ENCODERS_FILE))?,
            feature_names: read_json(&dir.join(FEATURE_NAMES_FILE))?,
            metadata: read_json(&dir.join(METADATA_FILE))?,
        })
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let bytes = fs::read(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// SHA-256 over all artifact files, in fixed order
pub fn bundle_digest(dir: &Path) -> Result<String, ArtifactError> {
    let mut hasher = Sha256::new();
    for name in ARTIFACT_FILES {
        let path = dir.join(name);
        let bytes = fs::read(&path).map_err(|source| ArtifactError::Io { path, source })?;
        hasher.update(name.as_bytes());
        hasher.update([0u8]);
        hasher.update(&bytes);
    }
    Ok(hex::encode(hasher.finalize()))
}

// ============================================================================
// STORE
// ============================================================================

/// Immutable, validated artifacts
pub struct ArtifactStore {
    classifier: Box<dyn Classifier>,
    scaler: StandardScaler,
    encoders: EncoderSet,
    schema: SchemaPlan,
    metadata: ModelMetadata,
    digest: Option<String>,
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl std::fmt::Debug for ArtifactStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArtifactStore")
            .field("model", &self.classifier.name())
            .field("features", &self.schema.width())
            .field("digest", &self.digest)
            .field("source", &self.source)
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

impl ArtifactStore {
    /// Load and validate the bundle in `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        log::info!("Loading model artifacts from: {}", dir.display());

        let bundle = ArtifactBundle::read_dir(dir)?;
        let digest = bundle_digest(dir)?;

        let mut store = Self::from_bundle(bundle)?;
        store.digest = Some(digest);
        store.source = Some(dir.to_path_buf());

        log::info!(
            "All model artifacts loaded: model={} features={} encoders={} digest={}",
            store.classifier.name(),
            store.schema.width(),
            store.encoders.columns().len(),
            store.digest.as_deref().unwrap_or("-"),
        );
        Ok(store)
    }

    /// Validate an in-memory bundle
    pub fn from_bundle(bundle: ArtifactBundle) -> Result<Self, ArtifactError> {
        let encoders = EncoderSet::from_classes(bundle.encoders)?;
        let schema = SchemaPlan::resolve(&bundle.feature_names, &encoders)?;

        let scaler = StandardScaler::from_params(bundle.scaler).map_err(|reason| {
            ArtifactError::Invalid { artifact: "scaler", reason }
        })?;
        if scaler.width() != schema.width() {
            return Err(PipelineError::SchemaMismatch(format!(
                "scaler expects {} features but schema has {}",
                scaler.width(),
                schema.width()
            ))
            .into());
        }

        let classifier = TreeEnsemble::compile(bundle.model, &schema)
            .map_err(|reason| ArtifactError::Invalid { artifact: "model", reason })?;

        if bundle.metadata.n_features != schema.width() {
            log::warn!(
                "Metadata reports {} features but schema has {}",
                bundle.metadata.n_features,
                schema.width()
            );
        }

        Ok(Self {
            classifier: Box::new(classifier),
            scaler,
            encoders,
            schema,
            metadata: bundle.metadata,
            digest: None,
            source: None,
            loaded_at: Utc::now(),
        })
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn scaler(&self) -> &StandardScaler {
        &self.scaler
    }

    pub fn encoders(&self) -> &EncoderSet {
        &self.encoders
    }

    pub fn schema(&self) -> &SchemaPlan {
        &self.schema
    }

    pub fn feature_names(&self) -> &[String] {
        self.schema.names()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Bundle digest; `None` for in-memory bundles
    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Sample bundle shipped in the workspace `models/` directory
    pub fn sample_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../models")
    }

    pub fn sample_bundle() -> ArtifactBundle {
        ArtifactBundle::read_dir(&sample_dir()).unwrap()
    }

    pub fn sample_store() -> ArtifactStore {
        ArtifactStore::load(sample_dir()).unwrap()
    }
}
