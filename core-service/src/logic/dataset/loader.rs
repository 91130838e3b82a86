//! Header-less training table
//!
//! One row per sample: 13 feature columns in layout order followed by the
//! label column. Only the column count and numeric cells are checked here;
//! label validity is the trainer's concern.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::record::Sample;
use crate::logic::features::{FeatureVector, FEATURE_COUNT};

/// Columns per row: features + label
pub const TABLE_COLUMNS: usize = FEATURE_COUNT + 1;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read training table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("row {row}: expected {expected} columns, found {found}")]
    ColumnCount {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row}, column {column}: '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: usize,
        value: String,
    },
}

/// Parse table text. Blank lines are skipped; rows are numbered from 1.
pub fn parse_table(content: &str) -> Result<Vec<Sample>, DatasetError> {
    let mut samples = Vec::new();

    for (i, line) in content.lines().enumerate() {
        let row = i + 1;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let cells: Vec<&str> = line.split(',').map(str::trim).collect();
        if cells.len() != TABLE_COLUMNS {
            return Err(DatasetError::ColumnCount {
                row,
                expected: TABLE_COLUMNS,
                found: cells.len(),
            });
        }

        let mut values = [0.0f64; TABLE_COLUMNS];
        for (column, cell) in cells.iter().enumerate() {
            // `f64::from_str` also accepts "nan" and "inf"
            values[column] = cell
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| DatasetError::InvalidNumber {
                    row,
                    column: column + 1,
                    value: cell.to_string(),
                })?;
        }

        let mut features = [0.0; FEATURE_COUNT];
        features.copy_from_slice(&values[..FEATURE_COUNT]);
        samples.push(Sample::new(FeatureVector::from_values(features), values[FEATURE_COUNT]));
    }

    Ok(samples)
}

/// Read and parse a table from disk
pub fn load_table(path: impl AsRef<Path>) -> Result<Vec<Sample>, DatasetError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let samples = parse_table(&content)?;
    log::info!("Loaded {} samples from {}", samples.len(), path.display());
    Ok(samples)
}

/// Render samples back into table text (same layout `parse_table` reads)
pub fn to_table(samples: &[Sample]) -> String {
    let mut out = String::new();
    for sample in samples {
        for value in sample.features.values.iter() {
            let _ = write!(out, "{},", value);
        }
        let _ = writeln!(out, "{}", sample.label);
    }
    out
}

/// Shuffle with `seed` and hold out `test_ratio` of the rows.
/// Returns `(train, test)`; the test share is rounded up.
pub fn split_holdout(samples: &[Sample], test_ratio: f64, seed: u64) -> (Vec<Sample>, Vec<Sample>) {
    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let ratio = test_ratio.clamp(0.0, 1.0);
    let test_len = ((samples.len() as f64) * ratio).ceil() as usize;
    let test_len = test_len.min(samples.len());

    let test = order[..test_len].iter().map(|&i| samples[i].clone()).collect();
    let train = order[test_len..].iter().map(|&i| samples[i].clone()).collect();
    (train, test)
}

/// SHA-256 over every value and label, hex encoded
pub fn fingerprint(samples: &[Sample]) -> String {
    let mut hasher = Sha256::new();
    for sample in samples {
        for value in sample.features.values.iter() {
            hasher.update(value.to_le_bytes());
        }
        hasher.update(sample.label.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}
