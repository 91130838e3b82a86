//! Configuration module

use std::env;

use vulnguard_core::constants::{
    get_calibration_score, get_model_path, get_training_data_path, DEFAULT_PORT,
};
use vulnguard_core::{ExtractorConfig, ForestConfig};

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,

    /// Header-less training table used at startup and on reload
    pub training_data_path: String,

    /// Persisted model; preferred over training when set
    pub model_path: Option<String>,

    /// Forest hyper-parameters for training
    pub forest: ForestConfig,

    /// Calibration column of snippet vectors
    pub calibration_score: f64,

    /// Environment (development, production)
    pub environment: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = ForestConfig::default();

        Self {
            port: env_or("PORT", DEFAULT_PORT),

            training_data_path: get_training_data_path(),

            model_path: get_model_path(),

            forest: ForestConfig {
                n_estimators: env_or("FOREST_ESTIMATORS", defaults.n_estimators),
                min_samples_leaf: env_or("FOREST_MIN_SAMPLES_LEAF", defaults.min_samples_leaf),
                seed: env_or("FOREST_SEED", defaults.seed),
                ..defaults
            },

            calibration_score: get_calibration_score(),

            environment: env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }

    pub fn extractor(&self) -> ExtractorConfig {
        ExtractorConfig {
            calibration_score: self.calibration_score,
        }
    }
}
