//! `md2sf convert` command implementation.

use std::path::PathBuf;

use clap::Args;
use console::Term;
use md2sf_config::{CliSettings, Config};
use md2sf_core::{ConvertError, KbConverter, write_output};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the convert command.
#[derive(Args)]
#[allow(clippy::struct_excessive_bools)]
pub(crate) struct ConvertArgs {
    /// Markdown article to convert.
    file: PathBuf,

    /// Run the prose linter and abort on any finding (overrides config).
    #[arg(long)]
    lint: bool,

    /// Skip the prose linter.
    #[arg(long, conflicts_with = "lint")]
    no_lint: bool,

    /// Report possible misspellings as warnings.
    #[arg(long)]
    spellcheck: bool,

    /// Pass raw HTML through instead of escaping it.
    #[arg(long)]
    raw_html: bool,

    /// Keep local image paths instead of embedding them.
    #[arg(long)]
    no_embed_images: bool,

    /// Print the fragment to stdout instead of writing the .html file.
    #[arg(long)]
    stdout: bool,

    /// Path to configuration file (default: auto-discover md2sf.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl ConvertArgs {
    /// Execute the convert command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the quality gate rejects the
    /// article, or the output cannot be written.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let config = Config::load(self.config.as_deref(), Some(&self.cli_settings()))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(path = %path.display(), "Loaded configuration");
        }
        if config.lint.enabled {
            output.info(&format!("Linting with {}", config.lint.command));
        }

        let converter = KbConverter::from_config(&config);
        let conversion = match converter.convert_file(&self.file) {
            Ok(conversion) => conversion,
            Err(ConvertError::LintFailure(findings)) => {
                output.diagnostics(&self.file, &findings);
                return Err(ConvertError::LintFailure(findings).into());
            }
            Err(err) => return Err(err.into()),
        };

        output.diagnostics(&self.file, &conversion.misspellings);

        if self.stdout {
            Term::stdout().write_str(&conversion.html)?;
        } else {
            write_output(&conversion.output, &conversion.html)?;
            output.success(&format!("Wrote {}", conversion.output.display()));
        }
        Ok(())
    }

    /// Build config overrides from flags. Unset flags leave the file value.
    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            lint_enabled: self.no_lint.then_some(false).or(self.lint.then_some(true)),
            spellcheck_enabled: self.spellcheck.then_some(true),
            raw_html: self.raw_html.then_some(true),
            embed_images: self.no_embed_images.then_some(false),
        }
    }
}
