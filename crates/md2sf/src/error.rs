//! CLI error types.

use md2sf_config::ConfigError;
use md2sf_core::ConvertError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Convert(#[from] ConvertError),

    #[error("{0}")]
    Io(#[from] std::io::Error),
}
