//! md2sf CLI - Markdown to Salesforce Knowledge HTML.
//!
//! Provides commands for:
//! - `convert`: Convert one Markdown article to a Knowledge HTML fragment

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::ConvertArgs;
use output::Output;

/// md2sf - Markdown to Salesforce Knowledge HTML.
#[derive(Parser)]
#[command(name = "md2sf", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a Markdown article to a Knowledge HTML fragment.
    Convert(ConvertArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Convert(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Convert(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_lint_flags_conflict() {
        let result = Cli::try_parse_from(["md2sf", "convert", "a.md", "--lint", "--no-lint"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_convert() {
        let cli = Cli::try_parse_from([
            "md2sf",
            "convert",
            "kb/a.md",
            "--spellcheck",
            "--stdout",
            "-v",
        ])
        .unwrap();
        let Commands::Convert(args) = cli.command;
        assert!(args.verbose);
    }
}
