//! Alert Rules & Thresholds
//!
//! Constants and config only, no decision logic.

use serde::{Deserialize, Serialize};

// ============================================================================
// THRESHOLDS
// ============================================================================

/// p_vulnerable strictly above this = Critical
pub const CRITICAL_THRESHOLD: f64 = 0.70;

/// p_vulnerable strictly above this (and not Critical) = Medium
pub const MEDIUM_THRESHOLD: f64 = 0.50;

// ============================================================================
// MESSAGES
// ============================================================================

pub const CRITICAL_MESSAGE: &str =
    "Alta probabilidad de vulnerabilidad detectada. Se requiere revisión inmediata.";
pub const MEDIUM_MESSAGE: &str = "Posible vulnerabilidad detectada. Se recomienda revisión manual.";
pub const LOW_MESSAGE: &str = "Código seguro. Baja probabilidad de vulnerabilidad.";

// ============================================================================
// TAG KEYWORDS
// ============================================================================

// Narrower than the feature lists in `features::patterns`

pub const SQL_TAG_KEYWORDS: &[&str] = &["select", "insert", "update", "delete"];
pub const XSS_TAG_KEYWORDS: &[&str] = &["alert", "document", "innerhtml", "eval"];
pub const CONCAT_TAG_LITERALS: &[&str] = &["' +", "\" +"];
pub const DANGEROUS_TAG_KEYWORDS: &[&str] = &["gets", "strcpy", "system", "exec"];

// ============================================================================
// CONFIGURABLE THRESHOLDS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    /// Above this = Critical
    pub critical_above: f64,
    /// Above this = Medium
    pub medium_above: f64,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            critical_above: CRITICAL_THRESHOLD,
            medium_above: MEDIUM_THRESHOLD,
        }
    }
}
