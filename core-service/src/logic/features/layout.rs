//! Feature Layout - Centralized Feature Definition
//!
//! **CRITICAL: This file controls the feature schema**
//!
//! ## Rules (NEVER break these):
//! 1. Add feature → increment FEATURE_VERSION
//! 2. Change order → increment FEATURE_VERSION
//! 3. Remove feature → increment FEATURE_VERSION
//!
//! Training tables, persisted models and the HTTP `features` map all follow
//! this order. Line mode uses the first `LINE_FEATURE_COUNT` entries.

use crc32fast::Hasher;
use thiserror::Error;

// ============================================================================
// FEATURE VERSION
// ============================================================================

/// Current feature layout version
/// MUST be incremented when layout changes
pub const FEATURE_VERSION: u8 = 1;

// ============================================================================
// FEATURE LAYOUT (Authoritative source)
// ============================================================================

/// Feature names in exact order they appear in the vector
pub const FEATURE_LAYOUT: &[&str] = &[
    // === Shape (0-6) ===
    "length",          // 0: Characters in the lower-cased text
    "num_lines",       // 1: Newlines + 1
    "num_semi",        // 2: ';' count
    "num_if",          // 3: "if" substring count
    "num_for",         // 4: "for" substring count
    "num_while",       // 5: "while" substring count
    "num_equal",       // 6: '=' count

    // === Risk keywords (7-11) ===
    "sql_risk",        // 7: SQL verbs
    "xss_risk",        // 8: DOM / JS sinks
    "concat_risk",     // 9: String concatenation around quotes
    "dangerous_count", // 10: Unsafe C / shell functions
    "injection_risk",  // 11: SQL clause keywords

    // === Calibration (12, snippet mode only) ===
    "score",           // 12: Dataset mean score
];

/// Total number of snippet features
/// IMPORTANT: Must match FEATURE_LAYOUT.len()!
pub const FEATURE_COUNT: usize = 13;

/// Line-mode features (layout without the calibration column)
pub const LINE_FEATURE_COUNT: usize = 12;

/// Positional indices into the layout
pub mod index {
    pub const LENGTH: usize = 0;
    pub const NUM_LINES: usize = 1;
    pub const NUM_SEMI: usize = 2;
    pub const NUM_IF: usize = 3;
    pub const NUM_FOR: usize = 4;
    pub const NUM_WHILE: usize = 5;
    pub const NUM_EQUAL: usize = 6;
    pub const SQL_RISK: usize = 7;
    pub const XSS_RISK: usize = 8;
    pub const CONCAT_RISK: usize = 9;
    pub const DANGEROUS_COUNT: usize = 10;
    pub const INJECTION_RISK: usize = 11;
    pub const SCORE: usize = 12;
}

// ============================================================================
// LAYOUT HASH
// ============================================================================

/// Compute CRC32 hash of the feature layout
/// Used to detect layout mismatches when loading persisted models
pub fn compute_layout_hash() -> u32 {
    let mut hasher = Hasher::new();

    hasher.update(&[FEATURE_VERSION]);

    for name in FEATURE_LAYOUT {
        hasher.update(name.as_bytes());
        hasher.update(&[0]); // Separator
    }

    hasher.finalize()
}

/// Get layout hash
pub fn layout_hash() -> u32 {
    compute_layout_hash()
}

// ============================================================================
// LAYOUT VALIDATION
// ============================================================================

/// Error when feature layout doesn't match expected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Feature layout mismatch: expected v{expected_version} (hash: {expected_hash:08x}), \
     got v{actual_version} (hash: {actual_hash:08x})"
)]
pub struct LayoutMismatchError {
    pub expected_version: u8,
    pub expected_hash: u32,
    pub actual_version: u8,
    pub actual_hash: u32,
}

/// Validate that incoming data matches current layout
pub fn validate_layout(incoming_version: u8, incoming_hash: u32) -> Result<(), LayoutMismatchError> {
    let current_hash = layout_hash();

    if incoming_version != FEATURE_VERSION || incoming_hash != current_hash {
        return Err(LayoutMismatchError {
            expected_version: FEATURE_VERSION,
            expected_hash: current_hash,
            actual_version: incoming_version,
            actual_hash: incoming_hash,
        });
    }

    Ok(())
}

// ============================================================================
// FEATURE INDEX LOOKUP
// ============================================================================

/// Get feature index by name
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_LAYOUT.iter().position(|&n| n == name)
}

/// Get feature name by index
pub fn feature_name(index: usize) -> Option<&'static str> {
    FEATURE_LAYOUT.get(index).copied()
}

/// Feature names used in line mode
pub fn line_feature_names() -> &'static [&'static str] {
    &FEATURE_LAYOUT[..LINE_FEATURE_COUNT]
}

// ============================================================================
// TESTS
// ============================================================================
