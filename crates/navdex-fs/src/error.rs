//! Loader error types.

use std::path::PathBuf;

use navdex_index::RegistryError;
use navdex_index::format::FormatError;

/// Error returned when fragments cannot be loaded from disk.
///
/// Every variant except [`LoadError::SourceNotFound`] names the fragment
/// file that caused it.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Source directory does not exist.
    #[error("source directory not found: {}", .0.display())]
    SourceNotFound(PathBuf),
    /// File or directory could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// Path being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Fragment file could not be parsed.
    #[error("invalid fragment {}: {source}", path.display())]
    Format {
        /// Fragment file.
        path: PathBuf,
        /// Parse error.
        #[source]
        source: FormatError,
    },
    /// Registry rejected the fragment.
    #[error("cannot register {}: {source}", path.display())]
    Registry {
        /// Fragment file.
        path: PathBuf,
        /// Registry error.
        #[source]
        source: RegistryError,
    },
    /// Legacy fragment whose location does not name a module.
    #[error("legacy fragment {} is not inside a module directory", path.display())]
    MissingModulePath {
        /// Fragment file.
        path: PathBuf,
    },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, source: impl Into<FormatError>) -> Self {
        Self::Format {
            path: path.into(),
            source: source.into(),
        }
    }
}
