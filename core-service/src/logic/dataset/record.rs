use serde::{Deserialize, Serialize};

use crate::logic::features::{extract_features, FeatureVector};

/// Labeled training row: 13 features + label (0 = safe, 1 = vulnerable)
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: FeatureVector,
    /// Raw label column; training rejects anything other than 0 or 1
    pub label: f64,
}

impl Sample {
    pub const SAFE: f64 = 0.0;
    pub const VULNERABLE: f64 = 1.0;

    pub fn new(features: FeatureVector, label: f64) -> Self {
        Self { features, label }
    }

    pub fn safe(features: FeatureVector) -> Self {
        Self::new(features, Self::SAFE)
    }

    pub fn vulnerable(features: FeatureVector) -> Self {
        Self::new(features, Self::VULNERABLE)
    }

    /// Label a raw snippet through the extractor
    pub fn from_snippet(text: &str, vulnerable: bool) -> Self {
        let label = if vulnerable { Self::VULNERABLE } else { Self::SAFE };
        Self::new(extract_features(text), label)
    }

    /// Class index (0 or 1), or None for a non-binary label
    pub fn class(&self) -> Option<usize> {
        if self.label == Self::SAFE {
            Some(0)
        } else if self.label == Self::VULNERABLE {
            Some(1)
        } else {
            None
        }
    }
}
