//! Configuration management for navdex.
//!
//! Parses `navdex.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Example
//!
//! ```toml
//! [source]
//! dir = "target/doc"
//! legacy = true
//!
//! [output]
//! path = "${DOCS_OUT:-target/doc}/navigation.json"
//! pretty = true
//!
//! [build]
//! allow_empty = false
//! ```
//!
//! ## Environment Variable Expansion
//!
//! Path values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `source.dir`
//! - `output.path`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override fragment source directory.
    pub source_dir: Option<PathBuf>,
    /// Override navigation document output path.
    pub output_path: Option<PathBuf>,
    /// Override legacy `sidebar-items.js` import.
    pub legacy: Option<bool>,
    /// Override pretty-printed output.
    pub pretty: Option<bool>,
    /// Override whether an empty registry is acceptable.
    pub allow_empty: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "navdex.toml";

/// Default fragment record filename.
const DEFAULT_RECORD_FILENAME: &str = "sidebar-items.json";

/// Default legacy fragment filename.
const DEFAULT_LEGACY_FILENAME: &str = "sidebar-items.js";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Fragment source configuration (paths are relative strings from TOML).
    source: SourceConfigRaw,
    /// Output configuration (paths are relative strings from TOML).
    output: OutputConfigRaw,
    /// Build behavior.
    pub build: BuildConfig,

    /// Resolved source configuration (set after loading).
    #[serde(skip)]
    pub source_resolved: SourceConfig,
    /// Resolved output configuration (set after loading).
    #[serde(skip)]
    pub output_resolved: OutputConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw source configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct SourceConfigRaw {
    dir: Option<String>,
    legacy: Option<bool>,
    record_filename: Option<String>,
    legacy_filename: Option<String>,
}

/// Resolved fragment source configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Directory scanned for fragment files.
    pub dir: PathBuf,
    /// Whether legacy `sidebar-items.js` files are imported.
    pub legacy: bool,
    /// Filename of versioned fragment records.
    pub record_filename: String,
    /// Filename of legacy fragments.
    pub legacy_filename: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("target/doc"),
            legacy: true,
            record_filename: DEFAULT_RECORD_FILENAME.to_owned(),
            legacy_filename: DEFAULT_LEGACY_FILENAME.to_owned(),
        }
    }
}

/// Raw output configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct OutputConfigRaw {
    path: Option<String>,
    pretty: Option<bool>,
}

/// Resolved output configuration with absolute paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    /// Navigation document path.
    pub path: PathBuf,
    /// Pretty-print the JSON document.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("target/doc/navigation.json"),
            pretty: true,
        }
    }
}

/// Build behavior configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Treat "no fragments registered" as nothing to render instead of an error.
    pub allow_empty: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`source.dir`").
        field: String,
        /// Error message (e.g., "${`DOCS_DIR`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a filename field to be a bare file name.
fn require_file_name(value: &str, field: &str) -> Result<(), ConfigError> {
    require_non_empty(value, field)?;
    if value.contains(['/', '\\']) {
        return Err(ConfigError::Validation(format!(
            "{field} must be a file name, not a path"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `navdex.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(source_dir) = &settings.source_dir {
            self.source_resolved.dir.clone_from(source_dir);
        }
        if let Some(output_path) = &settings.output_path {
            self.output_resolved.path.clone_from(output_path);
        }
        if let Some(legacy) = settings.legacy {
            self.source_resolved.legacy = legacy;
        }
        if let Some(pretty) = settings.pretty {
            self.output_resolved.pretty = pretty;
        }
        if let Some(allow_empty) = settings.allow_empty {
            self.build.allow_empty = allow_empty;
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        let source = SourceConfig::default();
        let output = OutputConfig::default();
        Self {
            source: SourceConfigRaw::default(),
            output: OutputConfigRaw::default(),
            build: BuildConfig::default(),
            source_resolved: SourceConfig {
                dir: base.join(source.dir),
                ..source
            },
            output_resolved: OutputConfig {
                path: base.join(output.path),
                ..output
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after CLI overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let source = &self.source_resolved;
        if source.dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "source.dir cannot be empty".to_owned(),
            ));
        }
        require_file_name(&source.record_filename, "source.record_filename")?;
        require_file_name(&source.legacy_filename, "source.legacy_filename")?;
        if source.record_filename == source.legacy_filename {
            return Err(ConfigError::Validation(
                "source.record_filename and source.legacy_filename must differ".to_owned(),
            ));
        }

        if self.output_resolved.path.file_name().is_none() {
            return Err(ConfigError::Validation(
                "output.path must name a file".to_owned(),
            ));
        }

        Ok(())
    }

    /// Expand environment variables in path fields.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.source.dir {
            self.source.dir = Some(expand::expand_env(dir, "source.dir")?);
        }
        if let Some(ref path) = self.output.path {
            self.output.path = Some(expand::expand_env(path, "output.path")?);
        }
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = SourceConfig::default();
        let resolve = |path: Option<&str>, default: &Path| match path {
            Some(p) => config_dir.join(p),
            None => config_dir.join(default),
        };

        self.source_resolved = SourceConfig {
            dir: resolve(self.source.dir.as_deref(), &defaults.dir),
            legacy: self.source.legacy.unwrap_or(defaults.legacy),
            record_filename: self
                .source
                .record_filename
                .clone()
                .unwrap_or(defaults.record_filename),
            legacy_filename: self
                .source
                .legacy_filename
                .clone()
                .unwrap_or(defaults.legacy_filename),
        };

        let output_defaults = OutputConfig::default();
        self.output_resolved = OutputConfig {
            path: resolve(self.output.path.as_deref(), &output_defaults.path),
            pretty: self.output.pretty.unwrap_or(output_defaults.pretty),
        };
    }
}
