//! Alert Types
//!
//! Data structures only; decisions live in `engine`.

use serde::{Deserialize, Serialize};

use super::rules::{CRITICAL_MESSAGE, LOW_MESSAGE, MEDIUM_MESSAGE};

// ============================================================================
// ALERT LEVEL
// ============================================================================

/// Alert tiers, ordered `Low < Medium < Critical`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    #[serde(rename = "BAJA")]
    Low,
    #[serde(rename = "MEDIA")]
    Medium,
    #[serde(rename = "CRITICA")]
    Critical,
}

impl AlertLevel {
    pub const ALL: [AlertLevel; 3] = [AlertLevel::Low, AlertLevel::Medium, AlertLevel::Critical];

    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertLevel::Low => "BAJA",
            AlertLevel::Medium => "MEDIA",
            AlertLevel::Critical => "CRITICA",
        }
    }

    /// Fixed advisory message for the tier
    pub fn message(&self) -> &'static str {
        match self {
            AlertLevel::Low => LOW_MESSAGE,
            AlertLevel::Medium => MEDIUM_MESSAGE,
            AlertLevel::Critical => CRITICAL_MESSAGE,
        }
    }
}

impl std::fmt::Display for AlertLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// PATTERN TAGS
// ============================================================================

/// Risk pattern categories found in the raw text, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PatternTag {
    #[serde(rename = "Patrones SQL detectados")]
    Sql,
    #[serde(rename = "Patrones XSS detectados")]
    Xss,
    #[serde(rename = "Concatenación insegura de strings")]
    UnsafeConcatenation,
    #[serde(rename = "Funciones peligrosas/deprecated")]
    DangerousFunctions,
}

impl PatternTag {
    pub const ALL: [PatternTag; 4] = [
        PatternTag::Sql,
        PatternTag::Xss,
        PatternTag::UnsafeConcatenation,
        PatternTag::DangerousFunctions,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            PatternTag::Sql => "Patrones SQL detectados",
            PatternTag::Xss => "Patrones XSS detectados",
            PatternTag::UnsafeConcatenation => "Concatenación insegura de strings",
            PatternTag::DangerousFunctions => "Funciones peligrosas/deprecated",
        }
    }
}

impl std::fmt::Display for PatternTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// DECISION
// ============================================================================

/// Tier + message + tags for one scored snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDecision {
    pub level: AlertLevel,
    pub message: String,
    pub patterns: Vec<PatternTag>,
}
