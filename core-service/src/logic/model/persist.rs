//! Model persistence (JSON)
//!
//! A saved model carries its feature version and layout hash; loading refuses
//! a file built against a different layout, or one whose trees cannot be walked.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::forest::StructureError;
use super::training::TrainedModel;
use crate::logic::features::LayoutMismatchError;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid model JSON: {0}")]
    Format(#[from] serde_json::Error),

    #[error("model was trained on another feature layout: {0}")]
    Layout(#[from] LayoutMismatchError),

    #[error("corrupt model: {0}")]
    Corrupt(#[from] StructureError),
}

pub fn to_json(model: &TrainedModel) -> Result<String, ModelError> {
    Ok(serde_json::to_string(model)?)
}

/// Parse, then check the layout and the tree structure
pub fn from_json(json: &str) -> Result<TrainedModel, ModelError> {
    let model: TrainedModel = serde_json::from_str(json)?;
    model.validate_layout()?;
    model.validate_structure()?;
    Ok(model)
}

/// Write the model to `path`, creating parent directories
pub fn save_model(model: &TrainedModel, path: impl AsRef<Path>) -> Result<(), ModelError> {
    let path = path.as_ref();
    let io_err = |source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, model)?;
    writer.flush().map_err(io_err)?;

    log::info!("Saved model ({} trees) to {}", model.metadata.n_estimators, path.display());
    Ok(())
}

pub fn load_model(path: impl AsRef<Path>) -> Result<TrainedModel, ModelError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let model = from_json(&json)?;
    log::info!(
        "Loaded model from {} ({} trees, trained {})",
        path.display(),
        model.metadata.n_estimators,
        model.metadata.trained_at
    );
    Ok(model)
}
