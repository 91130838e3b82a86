//! Diff Module - incremental scanning of added lines
//!
//! Pulls the added lines out of a unified diff (or any `+`-prefixed text),
//! gives each a 12-field line vector and a weighted risk score, and rolls them
//! up into a summary a CI gate can act on.

pub mod types;
pub mod parser;
pub mod scanner;

#[cfg(test)]
mod tests;

pub use types::{AddedLine, DiffLineResult, DiffReport, DiffSummary, RiskBand, RiskyLine};
pub use parser::added_lines;
pub use scanner::{risk_band, risk_score, scan_diff, summarize, MAX_LINE_CHARS};
