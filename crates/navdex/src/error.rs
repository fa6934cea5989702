//! CLI error types.

use std::path::PathBuf;

use navdex_config::ConfigError;
use navdex_fs::LoadError;
use navdex_index::RegistryError;
use navdex_index::format::FormatError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Registry(#[from] RegistryError),

    #[error("{0}")]
    Format(#[from] FormatError),

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
