//! Training - labeled samples → immutable [`TrainedModel`]
//!
//! Blocking and CPU bound. Run it once at startup (or offline) and hand the
//! result to a [`super::ModelStore`].

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::forest::{ForestConfig, RandomForest, StructureError, TrainingRow};
use super::inference::Probabilities;
use crate::logic::dataset::{fingerprint, Sample};
use crate::logic::features::{
    layout_hash, validate_layout, FeatureVector, LayoutMismatchError, FEATURE_COUNT,
    FEATURE_LAYOUT, FEATURE_VERSION,
};

/// Algorithm family reported by the stats endpoint
pub const MODEL_TYPE: &str = "RandomForestClassifier";

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("training set is empty")]
    EmptyDataset,

    #[error("sample {index} has non-binary label {label}")]
    NonBinaryLabel { index: usize, label: f64 },

    #[error("sample {index}: {source}")]
    Layout {
        index: usize,
        #[source]
        source: LayoutMismatchError,
    },

    #[error("invalid forest configuration: {0}")]
    InvalidConfig(String),
}

// ============================================================================
// MODEL
// ============================================================================

/// Everything the stats endpoint and persisted files need to know
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub model_type: String,
    pub n_estimators: usize,
    pub min_samples_leaf: usize,
    pub seed: u64,
    pub feature_version: u8,
    pub layout_hash: u32,
    pub feature_names: Vec<String>,
    pub training_samples: usize,
    pub vulnerable_samples: usize,
    /// SHA-256 of the training table contents
    pub dataset_sha256: String,
    pub trained_at: DateTime<Utc>,
}

/// Immutable trained classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    pub metadata: ModelMetadata,
    forest: RandomForest,
}

impl TrainedModel {
    /// `(p_safe, p_vulnerable)` for a snippet vector
    pub fn predict_proba(&self, features: &FeatureVector) -> Probabilities {
        let [safe, vulnerable] = self.forest.predict_proba(features.as_array());
        Probabilities { safe, vulnerable }
    }

    /// Class with the higher probability (ties go to safe)
    pub fn predict(&self, features: &FeatureVector) -> u8 {
        self.predict_proba(features).predicted_class()
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }

    /// Check the model was trained on the current feature layout
    pub fn validate_layout(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.metadata.feature_version, self.metadata.layout_hash)
    }

    /// Check the tree arenas are safe to walk
    pub fn validate_structure(&self) -> Result<(), StructureError> {
        self.forest.check_structure()
    }
}

// ============================================================================
// TRAINING
// ============================================================================

/// Train with the default forest configuration (50 trees, 5 per leaf, seed 42)
pub fn train(samples: &[Sample]) -> Result<TrainedModel, TrainingError> {
    train_with(samples, &ForestConfig::default())
}

/// Train with an explicit forest configuration
pub fn train_with(samples: &[Sample], config: &ForestConfig) -> Result<TrainedModel, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    if config.n_estimators == 0 {
        return Err(TrainingError::InvalidConfig("n_estimators must be at least 1".to_string()));
    }
    if config.min_samples_leaf == 0 {
        return Err(TrainingError::InvalidConfig("min_samples_leaf must be at least 1".to_string()));
    }

    let rows = samples
        .iter()
        .enumerate()
        .map(|(index, sample)| {
            sample
                .features
                .validate()
                .map_err(|source| TrainingError::Layout { index, source })?;
            let class = sample.class().ok_or(TrainingError::NonBinaryLabel {
                index,
                label: sample.label,
            })?;
            Ok(TrainingRow {
                values: sample.features.values,
                class,
            })
        })
        .collect::<Result<Vec<_>, TrainingError>>()?;

    let vulnerable_samples = rows.iter().filter(|r| r.class == 1).count();
    log::info!(
        "Training random forest: {} samples ({} vulnerable), {} trees, min_samples_leaf={}",
        rows.len(),
        vulnerable_samples,
        config.n_estimators,
        config.min_samples_leaf
    );

    let start_time = Instant::now();
    let forest = RandomForest::fit(&rows, config);
    log::info!("Random forest trained in {:?}", start_time.elapsed());

    let metadata = ModelMetadata {
        model_type: MODEL_TYPE.to_string(),
        n_estimators: forest.n_estimators(),
        min_samples_leaf: config.min_samples_leaf,
        seed: config.seed,
        feature_version: FEATURE_VERSION,
        layout_hash: layout_hash(),
        feature_names: FEATURE_LAYOUT.iter().map(|s| s.to_string()).collect(),
        training_samples: rows.len(),
        vulnerable_samples,
        dataset_sha256: fingerprint(samples),
        trained_at: Utc::now(),
    };
    debug_assert_eq!(metadata.feature_names.len(), FEATURE_COUNT);

    Ok(TrainedModel { metadata, forest })
}

// ============================================================================
// TESTS
// ============================================================================
