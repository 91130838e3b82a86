//! Pipeline Module - extract → classify → decide
//!
//! Single-snippet scoring shared by the HTTP service and the CLI, plus the
//! hold-out evaluation used after training.

pub mod evaluation;


use serde::Serialize;

use crate::logic::alert::{assess, AlertLevel, AlertThresholds, PatternTag};
use crate::logic::features::{serialize_named, ExtractorConfig, FeatureExtractor, FeatureVector};
use crate::logic::model::{Classifier, PredictionMethod};

pub use evaluation::{evaluate, ConfusionMatrix, EvaluationReport};

/// Result of scoring one snippet. Same shape for trained and fallback paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResult {
    pub prediction: u8,
    pub prob_vulnerable: f64,
    pub prob_safe: f64,
    pub alert_level: AlertLevel,
    pub message: String,
    pub patterns_detected: Vec<PatternTag>,
    #[serde(serialize_with = "serialize_named")]
    pub features: FeatureVector,
    pub method: PredictionMethod,
}

/// Extractor + classifier snapshot + thresholds
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    pub classifier: Classifier,
    pub extractor: ExtractorConfig,
    pub thresholds: AlertThresholds,
}

impl Pipeline {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            ..Default::default()
        }
    }

    pub fn with_extractor(mut self, extractor: ExtractorConfig) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn with_thresholds(mut self, thresholds: AlertThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let features = self.extractor.extract(text);
        let prediction = self.classifier.predict(text, &features);
        let decision = assess(prediction.probabilities.vulnerable, text, &self.thresholds);

        log::debug!(
            "Analyzed {} chars via {}: p={:.3} level={}",
            features.values[0],
            prediction.method.as_str(),
            prediction.probabilities.vulnerable,
            decision.level
        );

        AnalysisResult {
            prediction: prediction.class,
            prob_vulnerable: prediction.probabilities.vulnerable,
            prob_safe: prediction.probabilities.safe,
            alert_level: decision.level,
            message: decision.message,
            patterns_detected: decision.patterns,
            features,
            method: prediction.method,
        }
    }
}

/// Score `text` with default extractor and thresholds
pub fn analyze(text: &str, classifier: &Classifier) -> AnalysisResult {
    Pipeline::new(classifier.clone()).analyze(text)
}
