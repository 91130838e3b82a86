//! Unified diff → added lines
//!
//! Only `+` lines are kept (`+++` file headers excluded). `+++ b/path` and
//! `@@ -a,b +c,d @@` headers are tracked so each line can carry its file and
//! new-file line number; plain text without headers still works.

use super::types::AddedLine;

/// Position tracking across headers and hunks
#[derive(Debug, Default)]
struct Cursor {
    file: Option<String>,
    next_target: Option<usize>,
}

impl Cursor {
    fn advance(&mut self) -> Option<usize> {
        let current = self.next_target;
        if let Some(n) = self.next_target.as_mut() {
            *n += 1;
        }
        current
    }
}

pub fn added_lines(diff: &str) -> Vec<AddedLine> {
    let mut cursor = Cursor::default();
    let mut lines = Vec::new();

    for raw in diff.lines() {
        if let Some(header) = raw.strip_prefix("+++") {
            cursor.file = parse_file_header(header);
            cursor.next_target = None;
            continue;
        }
        if raw.starts_with("---") {
            continue;
        }
        if raw.starts_with("@@") {
            cursor.next_target = parse_hunk_start(raw);
            continue;
        }

        if let Some(rest) = raw.strip_prefix('+') {
            let target_line = cursor.advance();
            let text = rest.trim();
            if text.is_empty() {
                continue;
            }
            lines.push(AddedLine {
                text: text.to_string(),
                line_number: lines.len() + 1,
                file: cursor.file.clone(),
                target_line,
            });
        } else if raw.starts_with(' ') {
            // Context lines exist in both files
            cursor.advance();
        }
    }

    lines
}

/// `+++ b/src/app.py` → `src/app.py`; `/dev/null` → None
fn parse_file_header(header: &str) -> Option<String> {
    let path = header.trim();
    let path = path.split('\t').next().unwrap_or(path);
    if path.is_empty() || path == "/dev/null" {
        return None;
    }
    Some(path.strip_prefix("b/").unwrap_or(path).to_string())
}

/// `@@ -10,4 +12,6 @@ fn x` → 12
fn parse_hunk_start(header: &str) -> Option<usize> {
    let target = header.split_whitespace().find(|part| part.starts_with('+'))?;
    target[1..].split(',').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hunk_start() {
        assert_eq!(parse_hunk_start("@@ -10,4 +12,6 @@ fn main()"), Some(12));
        assert_eq!(parse_hunk_start("@@ -1 +1 @@"), Some(1));
        assert_eq!(parse_hunk_start("@@ garbage @@"), None);
    }

    #[test]
    fn test_file_header() {
        assert_eq!(parse_file_header(" b/src/app.py"), Some("src/app.py".to_string()));
        assert_eq!(parse_file_header(" /dev/null"), None);
        assert_eq!(parse_file_header(" b/x.rs\t2024-01-01"), Some("x.rs".to_string()));
    }

    #[test]
    fn test_added_lines_without_headers() {
        let lines = added_lines("+first\n-removed\n+   \n+second\nplain");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "first");
        assert_eq!(lines[0].line_number, 1);
        assert_eq!(lines[1].text, "second");
        assert_eq!(lines[1].line_number, 2);
        assert!(lines[1].file.is_none());
        assert!(lines[1].target_line.is_none());
    }
}
