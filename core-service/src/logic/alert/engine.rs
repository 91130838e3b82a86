//! Alert Decision Engine
//!
//! Input: p_vulnerable and the original text.
//! Output: [`AlertDecision`]

use super::rules::{
    AlertThresholds, CONCAT_TAG_LITERALS, DANGEROUS_TAG_KEYWORDS, SQL_TAG_KEYWORDS,
    XSS_TAG_KEYWORDS,
};
use super::types::{AlertDecision, AlertLevel, PatternTag};
use crate::logic::features::patterns::contains_any;

/// Tier for a probability. Boundaries resolve to the lower tier.
pub fn decide(p_vulnerable: f64) -> AlertLevel {
    decide_with_thresholds(p_vulnerable, &AlertThresholds::default())
}

pub fn decide_with_thresholds(p_vulnerable: f64, thresholds: &AlertThresholds) -> AlertLevel {
    if p_vulnerable > thresholds.critical_above {
        AlertLevel::Critical
    } else if p_vulnerable > thresholds.medium_above {
        AlertLevel::Medium
    } else {
        AlertLevel::Low
    }
}

/// Pattern categories present in `text`, in fixed order
pub fn detect_patterns(text: &str) -> Vec<PatternTag> {
    let lowered = text.to_lowercase();

    PatternTag::ALL
        .into_iter()
        .filter(|tag| {
            let keywords = match tag {
                PatternTag::Sql => SQL_TAG_KEYWORDS,
                PatternTag::Xss => XSS_TAG_KEYWORDS,
                PatternTag::UnsafeConcatenation => CONCAT_TAG_LITERALS,
                PatternTag::DangerousFunctions => DANGEROUS_TAG_KEYWORDS,
            };
            contains_any(&lowered, keywords)
        })
        .collect()
}

/// Tier, message and tags in one go
pub fn assess(p_vulnerable: f64, text: &str, thresholds: &AlertThresholds) -> AlertDecision {
    let level = decide_with_thresholds(p_vulnerable, thresholds);
    AlertDecision {
        level,
        message: level.message().to_string(),
        patterns: detect_patterns(text),
    }
}
