//! Runtime configuration read from the process environment.
//!
//! # Responsibility
//! - Resolve database location and logging settings for catalog binaries.
//!
//! # Invariants
//! - A missing database path selects an in-memory database.
//! - Log level and directory are validated with the same rules as
//!   `logging::init_logging`.

use crate::logging::{default_log_level, normalize_level, normalize_log_dir, LoggingError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

pub const DB_PATH_VAR: &str = "CATALOG_DB_PATH";
pub const LOG_LEVEL_VAR: &str = "CATALOG_LOG_LEVEL";
pub const LOG_DIR_VAR: &str = "CATALOG_LOG_DIR";

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError {
    pub key: &'static str,
    pub source: LoggingError,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid `{}`: {}", self.key, self.source)
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    /// SQLite file; `None` opens an in-memory database.
    pub db_path: Option<PathBuf>,
    pub log_level: String,
    /// Absolute log directory; `None` leaves file logging off.
    pub log_dir: Option<PathBuf>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl CoreConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds config from an arbitrary key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let log_level = match read(LOG_LEVEL_VAR) {
            Some(level) => normalize_level(&level)
                .map_err(|source| ConfigError {
                    key: LOG_LEVEL_VAR,
                    source,
                })?
                .to_string(),
            None => default_log_level().to_string(),
        };

        let log_dir = read(LOG_DIR_VAR)
            .map(|dir| normalize_log_dir(Path::new(&dir)))
            .transpose()
            .map_err(|source| ConfigError {
                key: LOG_DIR_VAR,
                source,
            })?;

        Ok(Self {
            db_path: read(DB_PATH_VAR).map(PathBuf::from),
            log_level,
            log_dir,
        })
    }
}
