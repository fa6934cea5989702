//! `navdex build` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;
use navdex_config::{CliSettings, Config};
use navdex_index::format::NavigationDocument;

use super::{SourceArgs, load_tree};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Navigation document path (overrides config).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Treat an empty fragment set as nothing to render.
    #[arg(long)]
    allow_empty: bool,

    /// Write compact JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,
}

impl BuildArgs {
    /// Execute the build command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration, loading, building or writing fails.
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = self.cli_settings();
        let config = Config::load(self.source.config.as_deref(), Some(&cli_settings))?;

        let Some(tree) = load_tree(&config, output)? else {
            output.warning("No sidebar fragments found, nothing written");
            return Ok(());
        };

        let target = &config.output_resolved;
        let json = NavigationDocument::from(&tree).to_json(target.pretty)?;
        write_document(&target.path, &json)?;

        output.success(&format!(
            "Wrote {} modules to {}",
            tree.module_count(),
            target.path.display()
        ));
        Ok(())
    }

    fn cli_settings(&self) -> CliSettings {
        CliSettings {
            source_dir: self.source.source_dir.clone(),
            output_path: self.output.clone(),
            legacy: self.source.resolve_legacy(),
            pretty: self.compact.then_some(false),
            allow_empty: self.allow_empty.then_some(true),
        }
    }
}

/// Write the document, creating parent directories as needed.
fn write_document(path: &Path, json: &str) -> Result<(), CliError> {
    let write_error = |source| CliError::Write {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(write_error)?;
    }
    std::fs::write(path, json).map_err(write_error)
}
