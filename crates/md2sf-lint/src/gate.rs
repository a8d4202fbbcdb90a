//! Pass/fail gate in front of conversion.

use std::path::Path;

use crate::error::LintError;
use crate::finding::Finding;
use crate::linter::ProseLinter;

/// Outcome of a gate check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Gate disabled, the linter was not consulted.
    Skipped,
    /// Linter ran and reported nothing.
    Clean,
    /// Linter reported at least one issue.
    Findings(Vec<Finding>),
}

impl Verdict {
    /// Whether conversion may proceed.
    #[must_use]
    pub fn passed(&self) -> bool {
        !matches!(self, Self::Findings(_))
    }
}

/// Runs the configured prose linter when enabled.
///
/// A disabled gate never touches the linter and always passes.
#[derive(Default)]
pub struct QualityGate {
    linter: Option<Box<dyn ProseLinter>>,
}

impl QualityGate {
    /// Gate that always passes.
    #[must_use]
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Gate checking documents with `linter`.
    pub fn new(linter: impl ProseLinter + 'static) -> Self {
        Self {
            linter: Some(Box::new(linter)),
        }
    }

    /// Whether a linter is consulted on [`check`](Self::check).
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.linter.is_some()
    }

    /// Check the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LintError`] if the linter could not be run.
    pub fn check(&self, path: &Path) -> Result<Verdict, LintError> {
        let Some(linter) = &self.linter else {
            tracing::debug!(path = %path.display(), "Quality gate disabled");
            return Ok(Verdict::Skipped);
        };

        let findings = linter.lint(path)?;
        if findings.is_empty() {
            tracing::info!(path = %path.display(), "Quality gate passed");
            Ok(Verdict::Clean)
        } else {
            tracing::info!(path = %path.display(), findings = findings.len(), "Quality gate failed");
            Ok(Verdict::Findings(findings))
        }
    }
}

impl std::fmt::Debug for QualityGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QualityGate")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}
