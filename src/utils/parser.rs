//! Text extraction primitives.

use regex::Regex;
use std::sync::LazyLock;

static QUOTED_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#""([^"]*)""#).unwrap());

/// Extract the first double-quoted literal on a line, without the quotes.
pub fn extract_quoted(line: &str) -> Option<String> {
    QUOTED_PATTERN
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Split content on `\n`, dropping empty lines at the end of the content.
///
/// Interior blank lines are kept; a trailing `\r` stays on its line.
pub fn lines_trimmed_end(content: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = content.split('\n').collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_quoted_takes_first_literal() {
        assert_eq!(
            extract_quoted(r#"const VERSION string = "v1.2.3""#),
            Some("v1.2.3".to_string())
        );
        assert_eq!(
            extract_quoted(r#"pub const VERSION: &str = "0.1.0"; // "old""#),
            Some("0.1.0".to_string())
        );
        assert_eq!(extract_quoted("const VERSION string = v1"), None);
    }

    #[test]
    fn lines_trimmed_end_drops_only_trailing_blanks() {
        assert_eq!(lines_trimmed_end("a\n\nb\n\n\n"), vec!["a", "", "b"]);
        assert_eq!(lines_trimmed_end("a"), vec!["a"]);
        assert!(lines_trimmed_end("\n\n").is_empty());
    }
}
