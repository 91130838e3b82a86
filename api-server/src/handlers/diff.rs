//! Diff scanning handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use vulnguard_core::{scan_diff, DiffReport};

use crate::{AppError, AppResult, AppState};

pub const MISSING_DIFF: &str = "Se requiere el campo 'diff' en el JSON";

#[derive(Debug, Deserialize)]
pub struct DiffRequest {
    pub diff: Option<String>,
}

/// Scoring does not depend on the model, state is unused
pub async fn scan(
    State(_state): State<AppState>,
    payload: Result<Json<DiffRequest>, JsonRejection>,
) -> AppResult<Json<DiffReport>> {
    let diff = payload
        .ok()
        .and_then(|Json(request)| request.diff)
        .ok_or_else(|| AppError::InvalidInput(MISSING_DIFF.to_string()))?;

    let report = tokio::task::spawn_blocking(move || scan_diff(&diff)).await?;

    tracing::info!(
        lines = report.summary.total_lines_analyzed,
        high = report.summary.high_risk_lines,
        medium = report.summary.medium_risk_lines,
        "Diff scanned"
    );
    Ok(Json(report))
}
