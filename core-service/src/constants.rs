//! Central Configuration Constants
//!
//! Single source of truth for all configuration defaults.

/// Calibration feature baked into every snippet vector.
///
/// Mean `score` of the reference vulnerability dataset the training tables were
/// built from. Kept constant at training and inference time.
pub const CALIBRATION_SCORE: f64 = 5.52572202166065;

/// Default header-less training table
pub const DEFAULT_TRAINING_DATA_PATH: &str = "train_features.csv";

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 5000;

/// Service name reported by the health endpoint
pub const SERVICE_NAME: &str = "Vulnerability Detection API";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "VulnGuard";

// ============================================
// Helper functions to read from env with fallback
// ============================================

/// Get calibration score from environment or use default
pub fn get_calibration_score() -> f64 {
    std::env::var("VULNGUARD_CALIBRATION_SCORE")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(CALIBRATION_SCORE)
}

/// Get training table path from environment or use default
pub fn get_training_data_path() -> String {
    std::env::var("TRAINING_DATA_PATH")
        .unwrap_or_else(|_| DEFAULT_TRAINING_DATA_PATH.to_string())
}

/// Get persisted model path from environment, if any
pub fn get_model_path() -> Option<String> {
    std::env::var("MODEL_PATH").ok().filter(|s| !s.trim().is_empty())
}
