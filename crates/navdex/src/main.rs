//! navdex CLI - Sidebar navigation index builder.
//!
//! Provides commands for:
//! - `build`: Load sidebar fragments and write the navigation document
//! - `show`: Print the navigation tree

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, ShowArgs};
use output::Output;

/// navdex - Sidebar navigation index builder.
#[derive(Parser)]
#[command(name = "navdex", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the navigation document from sidebar fragments.
    Build(BuildArgs),
    /// Print the navigation tree built from sidebar fragments.
    Show(ShowArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Build(args) => args.source.verbose,
            Self::Show(args) => args.source.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(&output),
        Commands::Show(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_build() {
        let cli = Cli::try_parse_from(["navdex", "build", "-s", "doc", "--no-legacy", "-v"]).unwrap();

        assert!(matches!(cli.command, Commands::Build(_)));
        assert!(cli.command.verbose());
    }

    #[test]
    fn test_cli_parses_show() {
        let cli = Cli::try_parse_from(["navdex", "show", "--config", "navdex.toml"]).unwrap();

        assert!(matches!(cli.command, Commands::Show(_)));
        assert!(!cli.command.verbose());
    }

    #[test]
    fn test_cli_rejects_conflicting_legacy_flags() {
        let result = Cli::try_parse_from(["navdex", "build", "--legacy", "--no-legacy"]);

        assert!(result.is_err());
    }

    #[test]
    fn test_show_has_no_output_flags() {
        let result = Cli::try_parse_from(["navdex", "show", "--compact"]);

        assert!(result.is_err());
    }
}
