//! Diff Scanner
//!
//! Weighted lexical score per added line. Needs no trained model.

use super::parser::added_lines;
use super::types::{DiffLineResult, DiffReport, DiffSummary, RiskBand, RiskyLine};
use crate::logic::features::layout::index;
use crate::logic::features::{extract_line_features, LineFeatures};

// ============================================================================
// WEIGHTS
// ============================================================================

pub const SQL_WEIGHT: u32 = 2;
pub const XSS_WEIGHT: u32 = 2;
pub const CONCAT_WEIGHT: u32 = 3;
pub const DANGEROUS_WEIGHT: u32 = 4;
pub const INJECTION_WEIGHT: u32 = 1;

/// Score above this = high risk
pub const HIGH_RISK_ABOVE: u32 = 5;
/// Score above this (and not high) = medium risk
pub const MEDIUM_RISK_ABOVE: u32 = 2;

/// Stored line text is cut to this many characters
pub const MAX_LINE_CHARS: usize = 100;

// ============================================================================
// SCORING
// ============================================================================

/// `2·sql + 2·xss + 3·concat + 4·dangerous + 1·injection`
pub fn risk_score(features: &LineFeatures) -> u32 {
    let field = |i: usize| features.values[i] as u32;

    SQL_WEIGHT * field(index::SQL_RISK)
        + XSS_WEIGHT * field(index::XSS_RISK)
        + CONCAT_WEIGHT * field(index::CONCAT_RISK)
        + DANGEROUS_WEIGHT * field(index::DANGEROUS_COUNT)
        + INJECTION_WEIGHT * field(index::INJECTION_RISK)
}

pub fn risk_band(score: u32) -> RiskBand {
    if score > HIGH_RISK_ABOVE {
        RiskBand::High
    } else if score > MEDIUM_RISK_ABOVE {
        RiskBand::Medium
    } else {
        RiskBand::Low
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_LINE_CHARS).collect()
}

/// Score every added line of `diff` and summarize
pub fn scan_diff(diff: &str) -> DiffReport {
    let lines: Vec<DiffLineResult> = added_lines(diff)
        .into_iter()
        .map(|added| {
            // Features come from the full line; only the stored text is cut
            let features = extract_line_features(&added.text);
            let risk_score = risk_score(&features);
            DiffLineResult {
                line: truncate(&added.text),
                line_number: added.line_number,
                file: added.file,
                target_line: added.target_line,
                features,
                risk_score,
                band: risk_band(risk_score),
            }
        })
        .collect();

    let summary = summarize(&lines);
    log::debug!(
        "Diff scanned: {} lines, {} high, {} medium",
        summary.total_lines_analyzed,
        summary.high_risk_lines,
        summary.medium_risk_lines
    );

    DiffReport { summary, lines }
}

/// Aggregate scored lines. An empty slice yields [`DiffSummary::empty`].
pub fn summarize(lines: &[DiffLineResult]) -> DiffSummary {
    if lines.is_empty() {
        return DiffSummary::empty();
    }

    let total: u64 = lines.iter().map(|l| u64::from(l.risk_score)).sum();
    let risky_lines = lines
        .iter()
        .filter(|l| l.band == RiskBand::High)
        .map(|l| RiskyLine {
            line: l.line.clone(),
            risk_score: l.risk_score,
            line_number: l.line_number,
        })
        .collect::<Vec<_>>();

    DiffSummary {
        total_lines_analyzed: lines.len(),
        high_risk_lines: risky_lines.len(),
        medium_risk_lines: lines.iter().filter(|l| l.band == RiskBand::Medium).count(),
        max_risk_score: lines.iter().map(|l| l.risk_score).max().unwrap_or(0),
        avg_risk_score: total as f64 / lines.len() as f64,
        risky_lines,
    }
}
