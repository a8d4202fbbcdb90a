//! Linter findings and their parsing from line-oriented output.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// `path:line:column: message`, as printed by proselint and `vale --output=line`.
static POSITIONED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:.*?):(\d+):(\d+):\s*(.*)$").unwrap());

/// A single issue reported by a prose linter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Finding {
    /// 1-based line, when the linter reported one.
    pub line: Option<usize>,
    /// 1-based column, when the linter reported one.
    pub column: Option<usize>,
    /// Linter message, including any check name it printed.
    pub message: String,
}

impl Finding {
    /// Create a finding without position information.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            column: None,
            message: message.into(),
        }
    }

    /// Create a finding at a line and column.
    pub fn at(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            column: Some(column),
            message: message.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.column) {
            (Some(line), Some(column)) => write!(f, "{line}:{column}: {}", self.message),
            (Some(line), None) => write!(f, "{line}: {}", self.message),
            _ => f.write_str(&self.message),
        }
    }
}

/// Parse linter output into findings.
///
/// Every non-blank line is one finding. Lines matching
/// `path:line:column: message` keep their position; other lines become
/// message-only findings.
pub fn parse_findings(output: &str) -> Vec<Finding> {
    output
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .map(parse_line)
        .collect()
}

fn parse_line(line: &str) -> Finding {
    let Some(caps) = POSITIONED_RE.captures(line) else {
        return Finding::new(line.trim());
    };
    match (caps[1].parse(), caps[2].parse()) {
        (Ok(row), Ok(column)) => Finding::at(row, column, &caps[3]),
        _ => Finding::new(line.trim()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_proselint_output() {
        let output = "article.md:3:10: weasel_words.very Substitute 'damn' every time you're inclined to write 'very'.\n\
                      article.md:7:1: typography.symbols.ellipsis '...' is an approximation, use the ellipsis symbol '…'.\n";
        let findings = parse_findings(output);
        assert_eq!(findings.len(), 2);
        assert_eq!(findings[0].line, Some(3));
        assert_eq!(findings[0].column, Some(10));
        assert!(findings[0].message.starts_with("weasel_words.very"));
        assert_eq!(findings[1].line, Some(7));
    }

    #[test]
    fn test_parse_vale_line_output() {
        let findings = parse_findings("docs/kb.md:12:4:Vale.Spelling:Did you really mean 'kubelet'?");
        assert_eq!(
            findings,
            vec![Finding::at(
                12,
                4,
                "Vale.Spelling:Did you really mean 'kubelet'?"
            )]
        );
    }

    #[test]
    fn test_parse_path_with_colon() {
        let findings = parse_findings("C:\\kb\\a.md:2:3: message");
        assert_eq!(findings, vec![Finding::at(2, 3, "message")]);
    }

    #[test]
    fn test_parse_unstructured_lines() {
        let findings = parse_findings("\n  Something looks off  \n\n");
        assert_eq!(findings, vec![Finding::new("Something looks off")]);
    }

    #[test]
    fn test_parse_empty_output() {
        assert!(parse_findings("").is_empty());
        assert!(parse_findings("\n \n").is_empty());
    }

    #[test]
    fn test_display() {
        assert_eq!(Finding::at(3, 10, "too wordy").to_string(), "3:10: too wordy");
        assert_eq!(Finding::new("too wordy").to_string(), "too wordy");
    }
}
