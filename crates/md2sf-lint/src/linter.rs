//! Prose linter abstraction and the external-command implementation.

use std::path::Path;
use std::process::Command;

use crate::error::LintError;
use crate::finding::{Finding, parse_findings};

/// Checks a Markdown file and reports prose issues.
pub trait ProseLinter {
    /// Lint the file at `path`.
    ///
    /// An empty vector means the file is clean.
    ///
    /// # Errors
    ///
    /// Returns [`LintError`] if the linter could not produce a result.
    fn lint(&self, path: &Path) -> Result<Vec<Finding>, LintError>;
}

/// Linter backed by an external program.
///
/// Runs `program [args...] <path>` and parses stdout with
/// [`parse_findings`]. Linters commonly exit non-zero when they report
/// something, so the exit status only matters when stdout is empty.
#[derive(Clone, Debug)]
pub struct CommandLinter {
    program: String,
    args: Vec<String>,
}

impl CommandLinter {
    /// Create a linter running `program` with the file path as its only argument.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Set arguments passed before the file path.
    #[must_use]
    pub fn with_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }
}

impl ProseLinter for CommandLinter {
    fn lint(&self, path: &Path) -> Result<Vec<Finding>, LintError> {
        tracing::debug!(program = %self.program, path = %path.display(), "Running prose linter");

        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .output()
            .map_err(|source| LintError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let findings = parse_findings(&String::from_utf8_lossy(&output.stdout));
        if findings.is_empty() && !output.status.success() {
            return Err(LintError::Failed {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        tracing::debug!(program = %self.program, findings = findings.len(), "Prose linter finished");
        Ok(findings)
    }
}
