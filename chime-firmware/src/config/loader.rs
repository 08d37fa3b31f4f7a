//! Config file loading
//!
//! The file path comes from `CHIME_CONFIG`, defaulting to `chime.toml` in
//! the working directory. A missing file is not an error; an unreadable or
//! invalid one is reported and the defaults are used instead.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use chime_core::config::{ChimeConfig, ConfigError};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "CHIME_CONFIG";

/// Config file used when `CHIME_CONFIG` is unset
pub const DEFAULT_CONFIG_PATH: &str = "chime.toml";

/// Contents of the config file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// Chime settings
    pub chime: ChimeConfig,
    /// Tunes, from `[[tune]]` tables
    #[serde(rename = "tune")]
    pub tunes: Vec<TuneEntry>,
}

/// One configured tune
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TuneEntry {
    /// Name used in logs
    pub name: String,
    /// Tune file in the byte-record format, relative to the config file
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Inline `[delay_ms, channel]` pairs
    #[serde(default)]
    pub notes: Vec<(u16, u8)>,
}

/// Errors that can occur when loading the config file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid configuration: {0:?}")]
    Invalid(ConfigError),
}

/// Path of the config file to load
pub fn config_path() -> PathBuf {
    env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Parse config file text
pub fn parse_config(text: &str) -> Result<FileConfig, toml::de::Error> {
    toml::from_str(text)
}

/// Load and validate the config file at `path`
pub fn load(path: &Path) -> Result<FileConfig, LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_owned(),
        source,
    })?;
    let config = parse_config(&text).map_err(|source| LoadError::Parse {
        path: path.to_owned(),
        source,
    })?;
    config.chime.validate().map_err(LoadError::Invalid)?;
    Ok(config)
}

/// Load the config file at `path`, or the defaults if that fails
pub fn load_or_default(path: &Path) -> FileConfig {
    match load(path) {
        Ok(config) => {
            info!(path = %path.display(), tunes = config.tunes.len(), "Loaded configuration");
            debug!(chime = ?config.chime, "chime settings");
            config
        }
        Err(LoadError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            info!(path = %path.display(), "No configuration file, using defaults");
            FileConfig::default()
        }
        Err(e) => {
            warn!(error = %e, "Configuration unusable, using defaults");
            FileConfig::default()
        }
    }
}
