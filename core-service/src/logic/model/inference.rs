//! Inference - trained forest or keyword fallback
//!
//! A [`Classifier`] is a snapshot: either an `Arc` to an immutable trained
//! model or the fallback heuristic. Both paths return the same [`Prediction`]
//! shape so callers never branch on which one served them.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::training::TrainedModel;
use crate::logic::features::FeatureVector;

/// Keywords that flag a snippet when no model is loaded
pub const FALLBACK_KEYWORDS: [&str; 4] = ["select", "insert", "eval", "exec"];

pub const FALLBACK_VULNERABLE_PROBABILITY: f64 = 0.85;
pub const FALLBACK_SAFE_PROBABILITY: f64 = 0.15;

// ============================================================================
// DATA STRUCTURES
// ============================================================================

/// Probability pair over {safe, vulnerable}
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Probabilities {
    pub safe: f64,
    pub vulnerable: f64,
}

impl Probabilities {
    /// Build from p_vulnerable; p_safe is its complement
    pub fn from_vulnerable(vulnerable: f64) -> Self {
        let vulnerable = vulnerable.clamp(0.0, 1.0);
        Self {
            safe: 1.0 - vulnerable,
            vulnerable,
        }
    }

    /// 1 when vulnerable strictly wins, else 0
    pub fn predicted_class(&self) -> u8 {
        if self.vulnerable > self.safe {
            1
        } else {
            0
        }
    }
}

/// Which path produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionMethod {
    RandomForest,
    Fallback,
}

impl PredictionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionMethod::RandomForest => "random_forest",
            PredictionMethod::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: u8,
    pub probabilities: Probabilities,
    pub method: PredictionMethod,
}

// ============================================================================
// CLASSIFIER
// ============================================================================

#[derive(Debug, Clone)]
pub enum Classifier {
    Trained(Arc<TrainedModel>),
    Fallback,
}

impl Default for Classifier {
    fn default() -> Self {
        Classifier::Fallback
    }
}

impl Classifier {
    pub fn is_trained(&self) -> bool {
        matches!(self, Classifier::Trained(_))
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        match self {
            Classifier::Trained(model) => Some(model),
            Classifier::Fallback => None,
        }
    }

    /// Score a snippet. `text` is only consulted by the fallback path.
    pub fn predict(&self, text: &str, features: &FeatureVector) -> Prediction {
        match self {
            Classifier::Trained(model) => {
                let probabilities = model.predict_proba(features);
                Prediction {
                    class: probabilities.predicted_class(),
                    probabilities,
                    method: PredictionMethod::RandomForest,
                }
            }
            Classifier::Fallback => predict_fallback(text),
        }
    }
}

/// Keyword heuristic used when no model is loaded
pub fn predict_fallback(text: &str) -> Prediction {
    let lowered = text.to_lowercase();
    let flagged = FALLBACK_KEYWORDS.iter().any(|k| lowered.contains(k));

    let vulnerable = if flagged {
        FALLBACK_VULNERABLE_PROBABILITY
    } else {
        FALLBACK_SAFE_PROBABILITY
    };
    log::debug!("Fallback classifier: flagged={}", flagged);

    Prediction {
        class: u8::from(flagged),
        probabilities: Probabilities {
            safe: 1.0 - vulnerable,
            vulnerable,
        },
        method: PredictionMethod::Fallback,
    }
}

// ============================================================================
// TESTS
// ============================================================================
