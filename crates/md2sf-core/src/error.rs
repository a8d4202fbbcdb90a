use std::path::PathBuf;

use md2sf_lint::{Finding, LintError};

/// Fatal conversion error. No output is written when one occurs.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    /// Source document missing or unreadable.
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Quality gate reported findings.
    #[error("Quality gate failed with {} finding(s)", .0.len())]
    LintFailure(Vec<Finding>),

    /// Linter or spell checker could not be run.
    #[error(transparent)]
    Lint(#[from] LintError),

    /// Output could not be persisted.
    #[error("Failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input already carries the output extension and would be overwritten.
    #[error("Input {} already has an .html extension", .0.display())]
    OutputIsInput(PathBuf),
}
