//! Lexical extraction
//!
//! Total and deterministic: every input produces a vector, nothing here can fail.

use super::layout::{index, FEATURE_COUNT, LINE_FEATURE_COUNT};
use super::patterns::{
    count, count_all, CONCAT_PATTERNS, DANGEROUS_FUNCTIONS, INJECTION_PATTERNS, SQL_PATTERNS,
    XSS_PATTERNS,
};
use super::vector::{FeatureExtractor, FeatureVector, LineFeatures};
use crate::constants::{get_calibration_score, CALIBRATION_SCORE};

/// Raw counts shared by snippet and line mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LexicalCounts {
    pub length: usize,
    pub num_lines: usize,
    pub num_semi: usize,
    pub num_if: usize,
    pub num_for: usize,
    pub num_while: usize,
    pub num_equal: usize,
    pub sql_risk: usize,
    pub xss_risk: usize,
    pub concat_risk: usize,
    pub dangerous_count: usize,
    pub injection_risk: usize,
}

impl LexicalCounts {
    /// Count every signal in `text` (lower-cased first)
    pub fn scan(text: &str) -> Self {
        let text = text.to_lowercase();

        Self {
            length: text.chars().count(),
            num_lines: count(&text, "\n") + 1,
            num_semi: count(&text, ";"),
            num_if: count(&text, "if"),
            num_for: count(&text, "for"),
            num_while: count(&text, "while"),
            num_equal: count(&text, "="),
            sql_risk: count_all(&text, SQL_PATTERNS),
            xss_risk: count_all(&text, XSS_PATTERNS),
            concat_risk: count_all(&text, CONCAT_PATTERNS),
            dangerous_count: count_all(&text, DANGEROUS_FUNCTIONS),
            injection_risk: count_all(&text, INJECTION_PATTERNS),
        }
    }

    fn line_values(&self) -> [f64; LINE_FEATURE_COUNT] {
        let mut values = [0.0; LINE_FEATURE_COUNT];
        values[index::LENGTH] = self.length as f64;
        values[index::NUM_LINES] = self.num_lines as f64;
        values[index::NUM_SEMI] = self.num_semi as f64;
        values[index::NUM_IF] = self.num_if as f64;
        values[index::NUM_FOR] = self.num_for as f64;
        values[index::NUM_WHILE] = self.num_while as f64;
        values[index::NUM_EQUAL] = self.num_equal as f64;
        values[index::SQL_RISK] = self.sql_risk as f64;
        values[index::XSS_RISK] = self.xss_risk as f64;
        values[index::CONCAT_RISK] = self.concat_risk as f64;
        values[index::DANGEROUS_COUNT] = self.dangerous_count as f64;
        values[index::INJECTION_RISK] = self.injection_risk as f64;
        values
    }
}

/// Extractor settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorConfig {
    /// Value written to the `score` column of snippet vectors
    pub calibration_score: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            calibration_score: CALIBRATION_SCORE,
        }
    }
}

impl ExtractorConfig {
    /// Read `VULNGUARD_CALIBRATION_SCORE`, falling back to the built-in constant
    pub fn from_env() -> Self {
        Self {
            calibration_score: get_calibration_score(),
        }
    }
}

impl FeatureExtractor for ExtractorConfig {
    fn extract(&self, text: &str) -> FeatureVector {
        let line = LexicalCounts::scan(text).line_values();
        let mut values = [0.0; FEATURE_COUNT];
        values[..LINE_FEATURE_COUNT].copy_from_slice(&line);
        values[index::SCORE] = self.calibration_score;
        FeatureVector::from_values(values)
    }
}

/// Snippet-mode vector with the default calibration constant
pub fn extract_features(text: &str) -> FeatureVector {
    ExtractorConfig::default().extract(text)
}

/// Line-mode vector (12 fields). `num_lines` is always 1.
pub fn extract_line_features(line: &str) -> LineFeatures {
    let mut counts = LexicalCounts::scan(line);
    counts.num_lines = 1;
    LineFeatures::from_values(counts.line_values())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input() {
        let vector = extract_features("");
        assert_eq!(vector.values[index::NUM_LINES], 1.0);
        assert_eq!(vector.values[index::SCORE], CALIBRATION_SCORE);
        for (i, value) in vector.values.iter().enumerate() {
            if i != index::NUM_LINES && i != index::SCORE {
                assert_eq!(*value, 0.0, "field {} should be zero", i);
            }
        }
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(extract_features("SELECT"), extract_features("select"));
        assert_eq!(extract_features("SELECT").values[index::SQL_RISK], 1.0);
    }

    #[test]
    fn test_shape_counts() {
        let v = extract_features("if (a == b) {\n  for x; while y;\n}");
        assert_eq!(v.values[index::NUM_LINES], 3.0);
        assert_eq!(v.values[index::NUM_SEMI], 2.0);
        assert_eq!(v.values[index::NUM_IF], 1.0);
        assert_eq!(v.values[index::NUM_FOR], 1.0);
        assert_eq!(v.values[index::NUM_WHILE], 1.0);
        assert_eq!(v.values[index::NUM_EQUAL], 2.0);
    }

    #[test]
    fn test_length_counts_characters() {
        let v = extract_features("ñandú");
        assert_eq!(v.values[index::LENGTH], 5.0);
    }

    #[test]
    fn test_concat_patterns() {
        let v = extract_features("q = \"a\" + b + 'c'");
        // `" +` and `+ '`
        assert_eq!(v.values[index::CONCAT_RISK], 2.0);
    }

    #[test]
    fn test_double_counting_across_categories() {
        // "eval" is an xss keyword; "execute" hits "exec" in dangerous functions
        let v = extract_features("eval(x); cursor.execute(q)");
        assert_eq!(v.values[index::XSS_RISK], 1.0);
        assert_eq!(v.values[index::DANGEROUS_COUNT], 1.0);
    }

    #[test]
    fn test_line_mode_has_no_calibration_and_one_line() {
        let line = extract_line_features("a\nb");
        assert_eq!(line.values.len(), LINE_FEATURE_COUNT);
        assert_eq!(line.values[index::NUM_LINES], 1.0);
    }

    #[test]
    fn test_custom_calibration() {
        let config = ExtractorConfig { calibration_score: 1.25 };
        assert_eq!(config.extract("x").values[index::SCORE], 1.25);
    }
}
