//! Keyword lists for lexical risk signals
//!
//! All matching is plain substring matching on lower-cased text. A keyword
//! that also appears inside another keyword's context is counted in both
//! categories.

/// SQL verbs (`sql_risk`)
pub const SQL_PATTERNS: &[&str] = &["select", "insert", "update", "delete", "union", "drop", "alter"];

/// DOM / JavaScript sinks (`xss_risk`)
pub const XSS_PATTERNS: &[&str] = &["alert", "document", "innerhtml", "script", "eval", "settimeout"];

/// String concatenation around a quote (`concat_risk`)
pub const CONCAT_PATTERNS: &[&str] = &["' +", "\" +", "+ '", "+ \""];

/// Unsafe or deprecated functions (`dangerous_count`)
pub const DANGEROUS_FUNCTIONS: &[&str] = &["gets", "strcpy", "sprintf", "strcat", "system", "exec"];

/// SQL clause keywords (`injection_risk`)
pub const INJECTION_PATTERNS: &[&str] = &["where", "from", "into", "values"];

/// Non-overlapping occurrences of `pattern` in `text`
pub fn count(text: &str, pattern: &str) -> usize {
    text.matches(pattern).count()
}

/// Sum of occurrences of every pattern
pub fn count_all(text: &str, patterns: &[&str]) -> usize {
    patterns.iter().map(|p| count(text, p)).sum()
}

/// True if any pattern occurs in `text`
pub fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_is_non_overlapping() {
        assert_eq!(count("aaaa", "aa"), 2);
        assert_eq!(count("", "select"), 0);
    }

    #[test]
    fn test_count_all_sums_every_keyword() {
        // "insert into" hits sql (insert) once; "select ... from" once more
        let text = "insert into t select a from b";
        assert_eq!(count_all(text, SQL_PATTERNS), 2);
        assert_eq!(count_all(text, INJECTION_PATTERNS), 2);
    }

    #[test]
    fn test_keyword_inside_identifier_still_counts() {
        // "system" inside "filesystem", "if" inside "diff"
        assert_eq!(count_all("filesystem_path", DANGEROUS_FUNCTIONS), 1);
        assert_eq!(count("diff", "if"), 1);
    }

    #[test]
    fn test_contains_any() {
        assert!(contains_any("x = eval(y)", XSS_PATTERNS));
        assert!(!contains_any("let x = 1;", XSS_PATTERNS));
    }
}
