use super::*;
use crate::logic::features::extract_line_features;
use proptest::prelude::*;

const QUERY_LINE: &str = "query = \"SELECT * FROM users WHERE id = '\" + uid";

const SAMPLE_DIFF: &str = "\
diff --git a/app.py b/app.py
--- a/app.py
+++ b/app.py
@@ -1,3 +1,5 @@
 import os
+os.system(cmd)
 def f():
+    query = \"SELECT * FROM users WHERE id = '\" + uid
-    old = 1
+
";

#[test]
fn test_risk_score_weights() {
    // sql 1, concat 1, injection 2 (from, where)
    assert_eq!(risk_score(&extract_line_features(QUERY_LINE)), 7);
    // dangerous 1
    assert_eq!(risk_score(&extract_line_features("os.system(cmd)")), 4);
    assert_eq!(risk_score(&extract_line_features("let total = a + b;")), 0);
}

#[test]
fn test_risk_bands() {
    assert_eq!(risk_band(0), RiskBand::Low);
    assert_eq!(risk_band(2), RiskBand::Low);
    assert_eq!(risk_band(3), RiskBand::Medium);
    assert_eq!(risk_band(5), RiskBand::Medium);
    assert_eq!(risk_band(6), RiskBand::High);
}

#[test]
fn test_empty_diff_is_valid() {
    for diff in ["", "-removed only\n context line", "+++ b/a.rs\n+   \n"] {
        let report = scan_diff(diff);
        assert_eq!(report.summary.total_lines_analyzed, 0);
        assert_eq!(report.summary.max_risk_score, 0);
        assert_eq!(report.summary.avg_risk_score, 0.0);
        assert!(report.summary.risky_lines.is_empty());
        assert!(report.lines.is_empty());
    }
}

#[test]
fn test_scan_unified_diff() {
    let report = scan_diff(SAMPLE_DIFF);
    let summary = &report.summary;

    assert_eq!(summary.total_lines_analyzed, 2);
    assert_eq!(summary.high_risk_lines, 1);
    assert_eq!(summary.medium_risk_lines, 1);
    assert_eq!(summary.max_risk_score, 7);
    assert!((summary.avg_risk_score - 5.5).abs() < 1e-9);

    assert_eq!(
        summary.risky_lines,
        vec![RiskyLine {
            line: QUERY_LINE.to_string(),
            risk_score: 7,
            line_number: 2,
        }]
    );
}

#[test]
fn test_scan_tracks_file_and_target_line() {
    let report = scan_diff(SAMPLE_DIFF);

    assert_eq!(report.lines[0].file.as_deref(), Some("app.py"));
    assert_eq!(report.lines[0].target_line, Some(2));
    assert_eq!(report.lines[0].line_number, 1);
    assert_eq!(report.lines[1].target_line, Some(4));
    assert_eq!(report.lines[1].band, RiskBand::High);
}

#[test]
fn test_long_line_is_truncated_for_display_only() {
    let long = format!("+{}", "a".repeat(150));
    let report = scan_diff(&long);
    let line = &report.lines[0];

    assert_eq!(line.line.chars().count(), MAX_LINE_CHARS);
    assert_eq!(line.features.values[0], 150.0);
}

#[test]
fn test_summary_json_keys() {
    let json = serde_json::to_value(scan_diff(SAMPLE_DIFF).summary).unwrap();
    for key in [
        "total_lines_analyzed",
        "high_risk_lines",
        "medium_risk_lines",
        "max_risk_score",
        "avg_risk_score",
        "risky_lines",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert_eq!(json["risky_lines"][0]["line_number"], 2);
}

proptest! {
    #[test]
    fn prop_summary_is_consistent(lines in proptest::collection::vec("[ -~]{0,40}", 0..20)) {
        let diff: String = lines.iter().map(|l| format!("+{}\n", l)).collect();
        let summary = scan_diff(&diff).summary;

        prop_assert!(summary.high_risk_lines + summary.medium_risk_lines <= summary.total_lines_analyzed);
        prop_assert_eq!(summary.risky_lines.len(), summary.high_risk_lines);
        prop_assert!(summary.avg_risk_score <= summary.max_risk_score as f64 + 1e-9);
    }
}
