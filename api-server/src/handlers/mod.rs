//! HTTP handlers

pub mod health;
pub mod analyze;
pub mod stats;
pub mod diff;
pub mod model;

#[cfg(test)]
mod tests;

use axum::http::Uri;

use crate::AppError;

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("Ruta no encontrada: {}", uri.path()))
}
