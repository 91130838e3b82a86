//! Model reload handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::bootstrap::build_model;
use crate::{AppResult, AppState};

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub reloaded: bool,
    pub n_estimators: usize,
    pub training_samples: usize,
    pub generation: u64,
}

/// Retrain (or reload) and swap atomically. On failure the current model stays.
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let config = state.config.clone();
    let model = tokio::task::spawn_blocking(move || build_model(&config)).await??;

    let (n_estimators, training_samples) =
        (model.metadata.n_estimators, model.metadata.training_samples);
    state.models.replace(model);

    Ok(Json(ReloadResponse {
        reloaded: true,
        n_estimators,
        training_samples,
        generation: state.models.generation(),
    }))
}
