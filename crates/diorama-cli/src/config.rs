//! Engine configuration for the CLI
//!
//! The CLI settles on one [`ConfigSource`] per run and loads it. Every
//! failure names the file it came from, so a bad `min_gap` in a system-wide
//! file is not mistaken for a problem with the graph being processed.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use diorama::{DioramaError, config::EngineConfig};

/// Project-local configuration file, relative to the working directory.
const LOCAL_CONFIG: &str = "diorama/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{path}: not found (pass an existing file to --config)")]
    MissingFile { path: PathBuf },

    #[error("{path}: cannot be read: {message}")]
    Unreadable { path: PathBuf, message: String },

    #[error("{path}: invalid TOML: {message}")]
    Toml { path: PathBuf, message: String },

    #[error("{source_name}: {message}")]
    OutOfRange { source_name: String, message: String },
}

impl From<ConfigError> for DioramaError {
    fn from(err: ConfigError) -> Self {
        DioramaError::Config(err.to_string())
    }
}

/// Where the engine configuration for a run comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given with `--config`; must exist.
    Explicit(PathBuf),
    /// `diorama/config.toml` under the working directory.
    Local(PathBuf),
    /// The platform configuration directory.
    System(PathBuf),
    /// Built-in defaults.
    Defaults,
}

impl ConfigSource {
    /// Picks the source for this run.
    ///
    /// An explicit path always wins, even when the file does not exist, so the
    /// mistake surfaces when loading instead of silently falling back.
    pub fn discover(explicit_path: Option<impl AsRef<Path>>) -> Self {
        if let Some(path) = explicit_path {
            return Self::Explicit(path.as_ref().to_path_buf());
        }

        let local = PathBuf::from(LOCAL_CONFIG);
        if local.is_file() {
            return Self::Local(local);
        }

        match ProjectDirs::from("com", "diorama", "diorama") {
            Some(dirs) => {
                let system = dirs.config_dir().join("config.toml");
                if system.is_file() {
                    return Self::System(system);
                }
                let path = system.display().to_string();
                debug!(path = path.as_str(); "System configuration file not found");
            }
            None => debug!("Could not determine platform-specific config directory"),
        }

        Self::Defaults
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(path) | Self::Local(path) | Self::System(path) => Some(path),
            Self::Defaults => None,
        }
    }

    /// Reads, decodes, and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming this source when the file is missing,
    /// unreadable, not valid TOML, or holds out-of-range values.
    pub fn load(&self) -> Result<EngineConfig, ConfigError> {
        let config = match self.path() {
            Some(path) => {
                let source = self.to_string();
                info!(source = source.as_str(); "Loading configuration");
                read_config_file(path)?
            }
            None => {
                debug!("No configuration file found, using default configuration");
                EngineConfig::default()
            }
        };

        config.validate().map_err(|err| ConfigError::OutOfRange {
            source_name: self.to_string(),
            message: match err {
                DioramaError::Config(message) => message,
                other => other.to_string(),
            },
        })?;

        Ok(config)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Explicit(path) => write!(f, "{}", path.display()),
            Self::Local(path) => write!(f, "{} (local)", path.display()),
            Self::System(path) => write!(f, "{} (system)", path.display()),
            Self::Defaults => f.write_str("built-in defaults"),
        }
    }
}

/// Discovers and loads the configuration for one CLI run.
///
/// # Errors
///
/// Returns `DioramaError::Config` with the offending file named in the message.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<EngineConfig, DioramaError> {
    Ok(ConfigSource::discover(explicit_path).load()?)
}

fn read_config_file(path: &Path) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            ConfigError::MissingFile {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Unreadable {
                path: path.to_path_buf(),
                message: err.to_string(),
            }
        }
    })?;

    toml::from_str(&content).map_err(|err| ConfigError::Toml {
        path: path.to_path_buf(),
        message: err.message().to_string(),
    })
}
