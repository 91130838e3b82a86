//! Model Module - Risk Classifier
//!
//! Random forest trained once from labeled samples, a keyword fallback for
//! when no model exists, and a lock-free store holding the current model.

pub mod forest;
pub mod training;
pub mod inference;
pub mod store;
pub mod persist;

#[cfg(test)]
pub(crate) mod fixtures;

pub use forest::{DecisionTree, ForestConfig, RandomForest, StructureError};
pub use inference::{
    predict_fallback, Classifier, Prediction, PredictionMethod, Probabilities,
    FALLBACK_SAFE_PROBABILITY, FALLBACK_VULNERABLE_PROBABILITY,
};
pub use persist::{from_json, load_model, save_model, to_json, ModelError};
pub use store::ModelStore;
pub use training::{train, train_with, ModelMetadata, TrainedModel, TrainingError, MODEL_TYPE};
