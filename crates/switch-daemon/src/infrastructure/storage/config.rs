//! Configuration file loading.
//!
//! Reads the three-token config text (see [`switch_core::config`]) from
//! `config.txt` next to the working directory, or from the path named by
//! the `SWITCH_CONFIG` environment variable. The file is read exactly once
//! at startup and never re-read: a load failure leaves the daemon
//! permanently inert.

use std::fs;
use std::path::{Path, PathBuf};

use switch_core::{ConfigParseError, DaemonConfig};
use thiserror::Error;

/// Path used when `SWITCH_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.txt";

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "SWITCH_CONFIG";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file content did not parse as a config.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigParseError,
    },
}

/// Resolves the config file path from the environment.
pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Loads and parses the configuration file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file is missing, unreadable, or
/// malformed.
pub fn load_config(path: &Path) -> Result<DaemonConfig, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DaemonConfig::parse(&text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
