//! Application configuration.
//!
//! # Responsibility
//! - Resolve database path, log directory and log level.
//! - Merge sources with precedence: explicit overrides > environment >
//!   `config.toml` > platform defaults.
//!
//! # Invariants
//! - A missing config file is not an error; a malformed one is.
//! - Resolved paths are never empty.

use crate::logging::default_log_level;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const APP_DIR_NAME: &str = "mybooks";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "mybooks.sqlite3";
const LOG_DIR_NAME: &str = "logs";

pub const ENV_DB_PATH: &str = "MYBOOKS_DB";
pub const ENV_LOG_DIR: &str = "MYBOOKS_LOG_DIR";
pub const ENV_LOG_LEVEL: &str = "MYBOOKS_LOG_LEVEL";

#[derive(Debug)]
pub enum ConfigError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        message: String,
    },
    /// The platform exposes no data directory and nothing else was given.
    NoDataDir,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read config `{}`: {source}", path.display())
            }
            Self::Parse { path, message } => {
                write!(f, "failed to parse config `{}`: {message}", path.display())
            }
            Self::NoDataDir => write!(f, "could not determine a data directory"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Values taken from explicit caller input such as CLI flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// On-disk `config.toml` shape. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub db_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
    pub log_level: Option<String>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
}

impl AppConfig {
    /// Resolves configuration from the default config file and process env.
    pub fn load(overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let config_path = default_config_path();
        Self::load_with(
            config_path.as_deref(),
            |key| std::env::var(key).ok(),
            overrides,
        )
    }

    /// Resolves configuration from an explicit file and env lookup.
    pub fn load_with(
        config_path: Option<&Path>,
        env: impl Fn(&str) -> Option<String>,
        overrides: ConfigOverrides,
    ) -> Result<Self, ConfigError> {
        let file = match config_path {
            Some(path) => read_file_config(path)?,
            None => FileConfig::default(),
        };
        let env_value = |key: &str| env(key).filter(|value| !value.trim().is_empty());

        let db_path = match overrides
            .db_path
            .or_else(|| env_value(ENV_DB_PATH).map(PathBuf::from))
            .or(file.db_path)
        {
            Some(path) => path,
            None => default_app_dir()?.join(DB_FILE_NAME),
        };

        let log_dir = match overrides
            .log_dir
            .or_else(|| env_value(ENV_LOG_DIR).map(PathBuf::from))
            .or(file.log_dir)
        {
            Some(path) => path,
            None => default_app_dir()?.join(LOG_DIR_NAME),
        };

        let log_level = overrides
            .log_level
            .or_else(|| env_value(ENV_LOG_LEVEL))
            .or(file.log_level)
            .unwrap_or_else(|| default_log_level().to_string());

        Ok(Self {
            db_path,
            log_dir,
            log_level,
        })
    }
}

/// `<config_dir>/mybooks/config.toml`, when the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn default_app_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(FileConfig::default())
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    toml::from_str(&contents).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}
