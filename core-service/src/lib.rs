//! VulnGuard Core
//!
//! Lexical vulnerability scoring for source snippets and unified diffs.
//!
//! ```text
//!  snippet ──► features ──► model (forest | fallback) ──► alert ──► AnalysisResult
//!  diff ─────► diff::parser ──► features (line mode) ──► risk score ──► DiffReport
//! ```
//!
//! The trained model is immutable and shared through [`ModelStore`]; every
//! other stage is a pure function.

pub mod constants;
pub mod logic;

pub use logic::alert::{AlertLevel, AlertThresholds, PatternTag};
pub use logic::dataset::{load_table, split_holdout, DatasetError, Sample};
pub use logic::diff::{scan_diff, DiffLineResult, DiffReport, DiffSummary, RiskBand};
pub use logic::features::{
    extract_features, extract_line_features, ExtractorConfig, FeatureVector, LineFeatures,
    FEATURE_COUNT, LINE_FEATURE_COUNT,
};
pub use logic::model::{
    load_model, save_model, train, train_with, Classifier, ForestConfig, ModelError,
    ModelMetadata, ModelStore, Prediction, PredictionMethod, Probabilities, TrainedModel,
    TrainingError,
};
pub use logic::pipeline::{analyze, evaluate, AnalysisResult, EvaluationReport, Pipeline};
