//! Hold-out evaluation of a trained model
//!
//! Test samples are already vectors, so each goes straight to the forest and
//! the alert engine. Rows are scored in parallel.

use std::collections::BTreeMap;

use rayon::prelude::*;
use serde::Serialize;

use crate::logic::alert::{decide_with_thresholds, AlertLevel, AlertThresholds};
use crate::logic::dataset::Sample;
use crate::logic::model::{TrainedModel, TrainingError};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfusionMatrix {
    pub true_positives: usize,
    pub false_positives: usize,
    pub true_negatives: usize,
    pub false_negatives: usize,
}

impl ConfusionMatrix {
    fn record(&mut self, actual: usize, predicted: u8) {
        match (actual, predicted) {
            (1, 1) => self.true_positives += 1,
            (0, 1) => self.false_positives += 1,
            (1, _) => self.false_negatives += 1,
            _ => self.true_negatives += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positives + self.false_positives + self.true_negatives + self.false_negatives
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub samples: usize,
    pub confusion: ConfusionMatrix,
    pub accuracy: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    /// Samples per alert tier (every tier present, possibly 0)
    pub alert_distribution: BTreeMap<AlertLevel, usize>,
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}

/// Score every labeled sample and aggregate
pub fn evaluate(model: &TrainedModel, samples: &[Sample]) -> Result<EvaluationReport, TrainingError> {
    if samples.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }

    let thresholds = AlertThresholds::default();
    let scored = samples
        .par_iter()
        .enumerate()
        .map(|(index, sample)| {
            sample
                .features
                .validate()
                .map_err(|source| TrainingError::Layout { index, source })?;
            let actual = sample.class().ok_or(TrainingError::NonBinaryLabel {
                index,
                label: sample.label,
            })?;
            let probabilities = model.predict_proba(&sample.features);
            let level = decide_with_thresholds(probabilities.vulnerable, &thresholds);
            Ok((actual, probabilities.predicted_class(), level))
        })
        .collect::<Result<Vec<_>, TrainingError>>()?;

    let mut alert_distribution: BTreeMap<AlertLevel, usize> =
        AlertLevel::ALL.into_iter().map(|level| (level, 0)).collect();
    let confusion = scored
        .iter()
        .fold(ConfusionMatrix::default(), |mut matrix, &(actual, predicted, level)| {
            matrix.record(actual, predicted);
            *alert_distribution.entry(level).or_insert(0) += 1;
            matrix
        });

    let precision = ratio(confusion.true_positives, confusion.true_positives + confusion.false_positives);
    let recall = ratio(confusion.true_positives, confusion.true_positives + confusion.false_negatives);
    let f1 = if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    };

    let report = EvaluationReport {
        samples: scored.len(),
        accuracy: ratio(confusion.true_positives + confusion.true_negatives, confusion.total()),
        confusion,
        precision,
        recall,
        f1,
        alert_distribution,
    };

    log::info!(
        "Evaluation: {} samples, accuracy={:.3} precision={:.3} recall={:.3} f1={:.3}",
        report.samples,
        report.accuracy,
        report.precision,
        report.recall,
        report.f1
    );
    Ok(report)
}
