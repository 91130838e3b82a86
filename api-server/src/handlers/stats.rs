//! Model statistics handler

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::AppState;

/// Shown instead of model stats while in fallback mode
pub const DEMO_MODEL_TYPE: &str = "Mock";
pub const DEMO_MESSAGE: &str = "Modelo en modo demo";

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatsResponse {
    Trained {
        model_type: String,
        n_estimators: usize,
        min_samples_leaf: usize,
        features: Vec<String>,
        n_features: usize,
        feature_version: u8,
        layout_hash: u32,
        training_samples: usize,
        trained_at: DateTime<Utc>,
        trained: bool,
    },
    Demo {
        model_type: &'static str,
        trained: bool,
        message: &'static str,
    },
}

pub async fn stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let response = match state.models.current() {
        Some(model) => {
            let meta = model.metadata();
            StatsResponse::Trained {
                model_type: meta.model_type.clone(),
                n_estimators: meta.n_estimators,
                min_samples_leaf: meta.min_samples_leaf,
                features: meta.feature_names.clone(),
                n_features: meta.feature_names.len(),
                feature_version: meta.feature_version,
                layout_hash: meta.layout_hash,
                training_samples: meta.training_samples,
                trained_at: meta.trained_at,
                trained: true,
            }
        }
        None => StatsResponse::Demo {
            model_type: DEMO_MODEL_TYPE,
            trained: false,
            message: DEMO_MESSAGE,
        },
    };

    Json(response)
}
