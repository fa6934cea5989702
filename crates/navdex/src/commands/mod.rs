//! CLI command implementations.

pub(crate) mod build;
pub(crate) mod show;

pub(crate) use build::BuildArgs;
pub(crate) use show::ShowArgs;

use std::path::PathBuf;

use clap::Args;
use navdex_config::Config;
use navdex_fs::FragmentLoader;
use navdex_index::{FragmentRegistry, NavigationTree};

use crate::error::CliError;
use crate::output::Output;

/// Arguments shared by every command that loads fragments.
#[derive(Args)]
pub(crate) struct SourceArgs {
    /// Path to configuration file (default: auto-discover navdex.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Fragment source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Import legacy sidebar-items.js files.
    #[arg(long)]
    legacy: bool,

    /// Skip legacy sidebar-items.js files.
    #[arg(long, conflicts_with = "legacy")]
    no_legacy: bool,

    /// Enable verbose output (loading logs).
    #[arg(short, long)]
    pub verbose: bool,
}

impl SourceArgs {
    /// Resolve `legacy` from --legacy/--no-legacy flags.
    fn resolve_legacy(&self) -> Option<bool> {
        self.no_legacy
            .then_some(false)
            .or(self.legacy.then_some(true))
    }
}

/// Load all fragments named by `config`, seal the registry and build the tree.
///
/// Returns `None` when nothing was registered and the config allows an
/// empty build.
fn load_tree(config: &Config, output: &Output) -> Result<Option<NavigationTree>, CliError> {
    let source = &config.source_resolved;
    tracing::debug!(config_path = ?config.config_path, legacy = source.legacy, "Resolved configuration");
    output.info(&format!("Source directory: {}", source.dir.display()));

    let loader = FragmentLoader::new(source.dir.clone())
        .with_legacy(source.legacy)
        .with_filenames(&source.record_filename, &source.legacy_filename);

    let registry = FragmentRegistry::new();
    let summary = loader.load_into(&registry)?;
    registry.seal();
    output.info(&format!(
        "Loaded {} fragments ({} items)",
        summary.fragments, summary.items
    ));

    if config.build.allow_empty {
        Ok(registry.build_if_any()?)
    } else {
        Ok(Some(registry.build()?))
    }
}
