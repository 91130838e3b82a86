//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;
use vulnguard_core::constants::{APP_VERSION, SERVICE_NAME};

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    model_loaded: bool,
    service: &'static str,
    version: &'static str,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.models.is_loaded(),
        service: SERVICE_NAME,
        version: APP_VERSION,
    })
}
