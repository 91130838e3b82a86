use serde::{Deserialize, Serialize};

use crate::logic::features::LineFeatures;

/// Risk band of a single added line
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBand {
    Low,
    Medium,
    High,
}

/// Added line as pulled out of the diff, before scoring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddedLine {
    /// Marker removed, trimmed, never empty
    pub text: String,
    /// 1-based ordinal among kept lines
    pub line_number: usize,
    /// Path from the last `+++` header, if any
    pub file: Option<String>,
    /// Line number in the new file, if a hunk header was seen
    pub target_line: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffLineResult {
    /// Text truncated to 100 characters
    pub line: String,
    pub line_number: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_line: Option<usize>,
    pub features: LineFeatures,
    pub risk_score: u32,
    pub band: RiskBand,
}

/// High-risk entry of the summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskyLine {
    pub line: String,
    pub risk_score: u32,
    pub line_number: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffSummary {
    pub total_lines_analyzed: usize,
    pub high_risk_lines: usize,
    pub medium_risk_lines: usize,
    pub max_risk_score: u32,
    pub avg_risk_score: f64,
    pub risky_lines: Vec<RiskyLine>,
}

impl DiffSummary {
    pub fn empty() -> Self {
        Self {
            total_lines_analyzed: 0,
            high_risk_lines: 0,
            medium_risk_lines: 0,
            max_risk_score: 0,
            avg_risk_score: 0.0,
            risky_lines: Vec::new(),
        }
    }

    pub fn has_high_risk(&self) -> bool {
        self.high_risk_lines > 0
    }
}

impl Default for DiffSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Summary plus every scored line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiffReport {
    pub summary: DiffSummary,
    pub lines: Vec<DiffLineResult>,
}
