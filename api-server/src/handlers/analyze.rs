//! Snippet scoring handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use vulnguard_core::{AnalysisResult, Pipeline};

use crate::{AppError, AppResult, AppState};

pub const MISSING_CODE: &str = "Se requiere el campo 'code' en el JSON";

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// Any JSON value; non-strings are scored as their JSON text
    pub code: Option<Value>,
}

/// `null` counts as missing
fn code_text(code: Option<Value>) -> Option<String> {
    match code? {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

pub async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> AppResult<Json<AnalysisResult>> {
    let request = payload.map_err(|rejection| {
        tracing::debug!("Rejected /analyze body: {}", rejection);
        AppError::InvalidInput(MISSING_CODE.to_string())
    })?;
    let text = code_text(request.0.code).ok_or_else(|| AppError::InvalidInput(MISSING_CODE.to_string()))?;

    let pipeline = Pipeline::new(state.models.snapshot()).with_extractor(state.extractor);
    let result = tokio::task::spawn_blocking(move || pipeline.analyze(&text)).await?;

    tracing::info!(
        level = %result.alert_level,
        method = result.method.as_str(),
        p = result.prob_vulnerable,
        "Snippet analyzed"
    );
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_code_text_coercion() {
        assert_eq!(code_text(None), None);
        assert_eq!(code_text(Some(Value::Null)), None);
        assert_eq!(code_text(Some(json!("x = 1"))), Some("x = 1".to_string()));
        assert_eq!(code_text(Some(json!(42))), Some("42".to_string()));
        assert_eq!(code_text(Some(json!(["a", 1]))), Some("[\"a\",1]".to_string()));
    }
}
