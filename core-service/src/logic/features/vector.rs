//! Feature Vector - Core data structure for model input
//!
//! **Versioned feature vector with layout validation**
//!
//! Uses centralized layout from `layout.rs` for:
//! - Consistent feature ordering
//! - Version tracking
//! - Layout hash for compatibility checks

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use super::layout::{
    layout_hash, line_feature_names, validate_layout, LayoutMismatchError,
    FEATURE_COUNT, FEATURE_LAYOUT, FEATURE_VERSION, LINE_FEATURE_COUNT,
};

// ============================================================================
// VERSIONED FEATURE VECTOR
// ============================================================================

/// Versioned snippet feature vector (13 fields)
///
/// This struct MUST be used for all model input. Never pass raw `[f64; N]`
/// across module boundaries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature layout version
    pub version: u8,
    /// CRC32 hash of the feature layout (for mismatch detection)
    pub layout_hash: u32,
    /// Feature values in order defined by FEATURE_LAYOUT
    pub values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Create a new zeroed feature vector with current version
    pub fn new() -> Self {
        Self::from_values([0.0; FEATURE_COUNT])
    }

    /// Create from raw values with current version
    pub fn from_values(values: [f64; FEATURE_COUNT]) -> Self {
        Self {
            version: FEATURE_VERSION,
            layout_hash: layout_hash(),
            values,
        }
    }

    /// Get values as array reference
    pub fn as_array(&self) -> &[f64; FEATURE_COUNT] {
        &self.values
    }

    /// Validate that this vector is compatible with current layout
    pub fn validate(&self) -> Result<(), LayoutMismatchError> {
        validate_layout(self.version, self.layout_hash)
    }
}

impl Default for FeatureVector {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a vector as a `{name: value}` map in layout order.
///
/// Used for the `features` field of analysis responses.
pub fn serialize_named<S: Serializer>(vector: &FeatureVector, serializer: S) -> Result<S::Ok, S::Error> {
    serialize_in_layout(FEATURE_LAYOUT, &vector.values, serializer)
}

fn serialize_in_layout<S: Serializer>(
    names: &[&str],
    values: &[f64],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(values.len()))?;
    for (name, value) in names.iter().zip(values) {
        map.serialize_entry(name, value)?;
    }
    map.end()
}

// ============================================================================
// LINE FEATURES
// ============================================================================

/// Lightweight per-line vector used by the diff scanner (12 fields)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineFeatures {
    pub values: [f64; LINE_FEATURE_COUNT],
}

impl LineFeatures {
    pub fn from_values(values: [f64; LINE_FEATURE_COUNT]) -> Self {
        Self { values }
    }

    /// Full snippet-layout vector with the calibration column appended,
    /// ready for the classifier.
    pub fn with_calibration(&self, calibration_score: f64) -> FeatureVector {
        let mut values = [0.0; FEATURE_COUNT];
        values[..LINE_FEATURE_COUNT].copy_from_slice(&self.values);
        values[LINE_FEATURE_COUNT] = calibration_score;
        FeatureVector::from_values(values)
    }
}

impl Serialize for LineFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_in_layout(line_feature_names(), &self.values, serializer)
    }
}

// ============================================================================
// FEATURE EXTRACTOR TRAIT
// ============================================================================

/// Trait for feature extractors
pub trait FeatureExtractor {
    /// Extract features from text into a snippet vector
    fn extract(&self, text: &str) -> FeatureVector;
}

// ============================================================================
// TESTS
// ============================================================================
