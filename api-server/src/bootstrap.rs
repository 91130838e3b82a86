//! Model bootstrap
//!
//! Blocking: call from `spawn_blocking`. A persisted model (`MODEL_PATH`) wins
//! over training from the table.

use std::path::Path;

use thiserror::Error;
use vulnguard_core::{
    load_model, load_table, train_with, DatasetError, ModelError, TrainedModel, TrainingError,
};

use crate::config::Config;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error(transparent)]
    Training(#[from] TrainingError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

pub fn build_model(config: &Config) -> Result<TrainedModel, BootstrapError> {
    if let Some(path) = &config.model_path {
        tracing::info!("Loading persisted model from {}", path);
        return Ok(load_model(Path::new(path))?);
    }

    tracing::info!("Training model from {}", config.training_data_path);
    let samples = load_table(&config.training_data_path)?;
    let model = train_with(&samples, &config.forest)?;

    tracing::info!(
        trees = model.metadata.n_estimators,
        samples = model.metadata.training_samples,
        "Model trained"
    );
    Ok(model)
}
