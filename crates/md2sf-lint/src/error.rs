//! Error types for lint operations.

use std::process::ExitStatus;

/// Failure to run an external checker.
///
/// Distinct from findings: a `LintError` means the checker itself could not
/// give an answer.
#[derive(Debug, thiserror::Error)]
pub enum LintError {
    /// The checker program could not be started.
    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Communication with a running checker failed.
    #[error("I/O error talking to `{program}`: {source}")]
    Io {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The checker exited unsuccessfully without reporting anything usable.
    #[error("`{program}` failed ({status}){}", format_stderr(.stderr))]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

fn format_stderr(stderr: &str) -> String {
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {stderr}")
    }
}
