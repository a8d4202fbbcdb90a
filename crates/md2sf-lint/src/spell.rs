//! Opt-in, warning-only spellcheck stage.
//!
//! Front matter (when stripped by the renderer), fenced and indented code
//! blocks are skipped; inline code spans, link targets and bare URLs are
//! removed before checking. The external checker runs once per document
//! and its words are mapped back to source lines.

use std::collections::BTreeSet;
use std::io::Write;
use std::process::{Command, Stdio};
use std::sync::LazyLock;

use regex::Regex;

use crate::error::LintError;

static CODE_SPAN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`+[^`]*`+").unwrap());
static LINK_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\]\([^)]*\)").unwrap());
static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+://\S+").unwrap());
static FENCE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^ {0,3}(`{3,}|~{3,})").unwrap());
static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d{1,9}[.)])(?:\s|$)").unwrap());
static WORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{L}\p{N}]+(?:['\u{2019}][\p{L}\p{N}]+)*").unwrap());

/// Lists words a dictionary does not know.
pub trait SpellChecker {
    /// Unknown words in `text`, which may span several lines.
    ///
    /// # Errors
    ///
    /// Returns [`LintError`] if the checker could not be run.
    fn unknown_words(&self, text: &str) -> Result<Vec<String>, LintError>;
}

/// Spell checker backed by an external word lister such as `aspell list`.
///
/// The text is written to stdin; every whitespace-separated word on stdout
/// is treated as unknown.
#[derive(Clone, Debug)]
pub struct CommandSpellChecker {
    program: String,
    args: Vec<String>,
}

impl CommandSpellChecker {
    /// Create a checker running `program` with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Set the arguments.
    #[must_use]
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn io_error(&self, source: std::io::Error) -> LintError {
        LintError::Io {
            program: self.program.clone(),
            source,
        }
    }
}

impl SpellChecker for CommandSpellChecker {
    fn unknown_words(&self, text: &str) -> Result<Vec<String>, LintError> {
        tracing::debug!(program = %self.program, bytes = text.len(), "Running spell checker");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| LintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let newline: &[u8] = if text.ends_with('\n') { b"" } else { b"\n" };
            stdin
                .write_all(text.as_bytes())
                .and_then(|()| stdin.write_all(newline))
                .map_err(|e| self.io_error(e))?;
        }

        let output = child.wait_with_output().map_err(|e| self.io_error(e))?;
        if !output.status.success() {
            return Err(LintError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .split_whitespace()
            .map(str::to_owned)
            .collect())
    }
}

/// Unknown word reported by the spellcheck stage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Misspelling {
    /// 1-based line in the source document.
    pub line: usize,
    pub word: String,
}

impl std::fmt::Display for Misspelling {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: possible misspelling '{}'", self.line, self.word)
    }
}

/// Document spellcheck with a user-supplied allowlist.
///
/// Allowlist matching is case-insensitive.
pub struct SpellCheck {
    checker: Box<dyn SpellChecker>,
    allowlist: BTreeSet<String>,
}

impl SpellCheck {
    /// Create a stage with an empty allowlist.
    pub fn new(checker: impl SpellChecker + 'static) -> Self {
        Self {
            checker: Box::new(checker),
            allowlist: BTreeSet::new(),
        }
    }

    /// Add words that are never reported.
    #[must_use]
    pub fn with_allowlist<I, W>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        self.allowlist
            .extend(words.into_iter().map(|w| w.as_ref().to_lowercase()));
        self
    }

    /// Check the prose of `markdown` with a single checker run.
    ///
    /// Every occurrence of an unknown word is reported against its line.
    /// With `skip_front_matter`, a leading `---` block is not checked.
    ///
    /// # Errors
    ///
    /// Returns [`LintError`] if the checker could not be run.
    pub fn check(
        &self,
        markdown: &str,
        skip_front_matter: bool,
    ) -> Result<Vec<Misspelling>, LintError> {
        let lines = prose_lines(markdown, skip_front_matter);
        if lines.is_empty() {
            return Ok(Vec::new());
        }

        let text = lines
            .iter()
            .map(|(_, text)| text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let unknown: BTreeSet<String> = self
            .checker
            .unknown_words(&text)?
            .into_iter()
            .filter(|word| !self.allowlist.contains(&word.to_lowercase()))
            .collect();

        let mut misspellings = Vec::new();
        if !unknown.is_empty() {
            for (line, text) in &lines {
                for found in WORD_RE.find_iter(text) {
                    let word = found.as_str();
                    if unknown.contains(word) {
                        misspellings.push(Misspelling {
                            line: *line,
                            word: word.to_owned(),
                        });
                    }
                }
            }
        }
        tracing::debug!(
            lines = lines.len(),
            count = misspellings.len(),
            "Spellcheck finished"
        );
        Ok(misspellings)
    }
}

impl std::fmt::Debug for SpellCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpellCheck")
            .field("allowlist", &self.allowlist)
            .finish_non_exhaustive()
    }
}

/// Number of lines taken by a leading `---` front matter block.
///
/// Zero when the document does not open with a closed block.
fn front_matter_len(markdown: &str) -> usize {
    let mut lines = markdown.lines();
    if lines.next().map(str::trim_end) != Some("---") {
        return 0;
    }
    lines
        .position(|line| matches!(line.trim_end(), "---" | "..."))
        .map_or(0, |idx| idx + 2)
}

fn is_indented(line: &str) -> bool {
    line.starts_with("    ") || line.starts_with('\t')
}

/// Non-blank prose lines with their 1-based numbers.
fn prose_lines(markdown: &str, skip_front_matter: bool) -> Vec<(usize, String)> {
    let skip = if skip_front_matter {
        front_matter_len(markdown)
    } else {
        0
    };

    let mut lines = Vec::new();
    // Opening fence character and length.
    let mut fence: Option<(char, usize)> = None;
    let mut prev_blank = true;
    let mut in_indented_code = false;
    let mut in_list = false;

    for (idx, raw) in markdown.lines().enumerate().skip(skip) {
        if let Some((ch, len)) = fence {
            let trimmed = raw.trim();
            if trimmed.len() >= len && trimmed.chars().all(|c| c == ch) {
                fence = None;
            }
            continue;
        }

        let blank = raw.trim().is_empty();
        let was_blank = std::mem::replace(&mut prev_blank, blank);
        if blank {
            continue;
        }

        // Indented code starts after a blank line and continues while indented.
        if is_indented(raw) && !in_list && (was_blank || in_indented_code) {
            in_indented_code = true;
            continue;
        }
        in_indented_code = false;

        if let Some(caps) = FENCE_RE.captures(raw) {
            let marker = &caps[1];
            fence = marker.chars().next().map(|ch| (ch, marker.len()));
            continue;
        }

        if LIST_ITEM_RE.is_match(raw) {
            in_list = true;
        } else if !is_indented(raw) && was_blank {
            in_list = false;
        }

        let text = CODE_SPAN_RE.replace_all(raw, " ");
        let text = LINK_TARGET_RE.replace_all(&text, "]");
        let text = URL_RE.replace_all(&text, " ");
        if !text.trim().is_empty() {
            lines.push((idx + 1, text.into_owned()));
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use pretty_assertions::assert_eq;

    /// Reports every word found in a fixed unknown list.
    struct FakeChecker {
        unknown: Vec<&'static str>,
        seen: Rc<RefCell<Vec<String>>>,
    }

    impl SpellChecker for FakeChecker {
        fn unknown_words(&self, text: &str) -> Result<Vec<String>, LintError> {
            self.seen.borrow_mut().push(text.to_owned());
            Ok(text
                .split(|c: char| !c.is_alphanumeric())
                .filter(|w| self.unknown.iter().any(|u| u == w))
                .map(str::to_owned)
                .collect())
        }
    }

    fn fake(unknown: Vec<&'static str>) -> (FakeChecker, Rc<RefCell<Vec<String>>>) {
        let seen = Rc::new(RefCell::new(Vec::new()));
        (
            FakeChecker {
                unknown,
                seen: Rc::clone(&seen),
            },
            seen,
        )
    }

    #[test]
    fn test_reports_unknown_words_with_lines() {
        let (checker, _) = fake(vec!["teh", "recieve"]);
        let found = SpellCheck::new(checker)
            .check("# Title\n\nWe recieve teh data.\n", false)
            .unwrap();
        assert_eq!(
            found,
            vec![
                Misspelling {
                    line: 3,
                    word: "recieve".to_owned()
                },
                Misspelling {
                    line: 3,
                    word: "teh".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_allowlist_is_case_insensitive() {
        let (checker, _) = fake(vec!["Kubelet", "teh"]);
        let found = SpellCheck::new(checker)
            .with_allowlist(["kubelet"])
            .check("Kubelet runs teh pods.\n", false)
            .unwrap();
        assert_eq!(
            found,
            vec![Misspelling {
                line: 1,
                word: "teh".to_owned()
            }]
        );
    }

    #[test]
    fn test_skips_fenced_code() {
        let (checker, seen) = fake(vec!["fn"]);
        let found = SpellCheck::new(checker)
            .check("Intro\n\n```rust\nfn main() {}\n```\n\nOutro\n", false)
            .unwrap();
        assert!(found.is_empty());
        assert_eq!(*seen.borrow(), vec!["Intro\nOutro".to_owned()]);
    }

    #[test]
    fn test_tilde_fence_needs_matching_close() {
        let lines = prose_lines("~~~~\ncode\n~~~\nstill code\n~~~~\nprose\n", false);
        assert_eq!(lines, vec![(6, "prose".to_owned())]);
    }

    #[test]
    fn test_strips_code_spans_and_urls() {
        let lines = prose_lines(
            "Run `kubectl get` on [docs](https://k8s.io/x) or http://a.b/c now\n",
            false,
        );
        assert_eq!(lines.len(), 1);
        let text = &lines[0].1;
        assert!(!text.contains("kubectl"));
        assert!(!text.contains("k8s.io"));
        assert!(!text.contains("a.b"));
        assert!(text.contains("docs"));
        assert!(text.contains("now"));
    }

    #[test]
    fn test_line_of_only_code_is_skipped() {
        let (checker, seen) = fake(Vec::new());
        SpellCheck::new(checker).check("`only code`\n", false).unwrap();
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_checker_runs_once_per_document() {
        let (checker, seen) = fake(vec!["teh"]);
        let found = SpellCheck::new(checker)
            .check("teh first\n\nsecond line\n\nand teh third\n", false)
            .unwrap();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(
            found,
            vec![
                Misspelling {
                    line: 1,
                    word: "teh".to_owned()
                },
                Misspelling {
                    line: 5,
                    word: "teh".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_no_prose_skips_checker() {
        let (checker, seen) = fake(Vec::new());
        let found = SpellCheck::new(checker)
            .check("```\ncode\n```\n", false)
            .unwrap();
        assert!(found.is_empty());
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn test_skips_indented_code() {
        let lines = prose_lines("Intro\n\n    let x = teh;\n    more();\n\nOutro\n", false);
        assert_eq!(lines, vec![(1, "Intro".to_owned()), (6, "Outro".to_owned())]);
    }

    #[test]
    fn test_indented_list_continuation_is_prose() {
        let lines = prose_lines("- item\n\n    continued here\n", false);
        assert_eq!(
            lines,
            vec![(1, "- item".to_owned()), (3, "    continued here".to_owned())]
        );
    }

    #[test]
    fn test_front_matter_skipped_when_requested() {
        let markdown = "---\ntitle: Reset pasword\n---\n\nBody\n";
        assert_eq!(prose_lines(markdown, true), vec![(5, "Body".to_owned())]);
        assert_eq!(prose_lines(markdown, false).len(), 4);
    }

    #[test]
    fn test_unclosed_front_matter_is_prose() {
        let lines = prose_lines("---\nIntro\n", true);
        assert_eq!(lines, vec![(1, "---".to_owned()), (2, "Intro".to_owned())]);
    }

    #[test]
    fn test_display() {
        let m = Misspelling {
            line: 4,
            word: "teh".to_owned(),
        };
        assert_eq!(m.to_string(), "4: possible misspelling 'teh'");
    }

    #[cfg(unix)]
    #[test]
    fn test_command_checker_reads_stdin() {
        // Echoes back words of three or fewer letters.
        let checker = CommandSpellChecker::new("sh").with_args([
            "-c",
            r"tr -s ' ' '\n' | grep -E '^[a-z]{1,3}$' || true",
        ]);
        let words = checker.unknown_words("a wrong\nteh line").unwrap();
        assert_eq!(words, vec!["a".to_owned(), "teh".to_owned()]);
    }

    #[cfg(unix)]
    #[test]
    fn test_command_checker_failure() {
        let checker = CommandSpellChecker::new("sh").with_args(["-c", "cat >/dev/null; exit 3"]);
        let err = checker.unknown_words("text").unwrap_err();
        assert!(matches!(err, LintError::Failed { .. }));
    }

    #[test]
    fn test_command_checker_missing_program() {
        let err = CommandSpellChecker::new("md2sf-no-such-speller")
            .unknown_words("text")
            .unwrap_err();
        assert!(matches!(err, LintError::Spawn { .. }));
    }
}
