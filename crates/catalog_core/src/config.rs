//! Runtime configuration for catalog composition.
//!
//! # Responsibility
//! - Read backend selection, database location and logging options from the
//!   process environment.
//!
//! # Invariants
//! - `BackendKind::Sqlite` always carries a database path.
//! - Unknown backend names and log levels are rejected, never defaulted.

use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const ENV_BACKEND: &str = "CATALOG_BACKEND";
pub const ENV_DB_PATH: &str = "CATALOG_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "CATALOG_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "CATALOG_LOG_DIR";

/// Path value that selects a private in-memory SQLite database.
pub const SQLITE_MEMORY_PATH: &str = ":memory:";

/// Storage backend selected at composition time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Sqlite { db_path: PathBuf },
}

impl BackendKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite { .. } => "sqlite",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub backend: BackendKind,
    pub log_level: &'static str,
    /// Logging stays off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Memory,
            log_level: default_log_level(),
            log_dir: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    UnknownBackend(String),
    MissingDbPath,
    InvalidLogLevel(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBackend(value) => write!(
                f,
                "unsupported {ENV_BACKEND} `{value}`; expected memory|sqlite"
            ),
            Self::MissingDbPath => write!(f, "{ENV_DB_PATH} is required for the sqlite backend"),
            Self::InvalidLogLevel(message) => write!(f, "{ENV_LOG_LEVEL}: {message}"),
        }
    }
}

impl Error for ConfigError {}

impl CatalogConfig {
    /// Reads configuration from process environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let backend = match read(ENV_BACKEND).as_deref() {
            None | Some("memory") => BackendKind::Memory,
            Some("sqlite") => BackendKind::Sqlite {
                db_path: read(ENV_DB_PATH)
                    .map(PathBuf::from)
                    .ok_or(ConfigError::MissingDbPath)?,
            },
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        let log_level = match read(ENV_LOG_LEVEL) {
            Some(level) => normalize_level(&level).map_err(ConfigError::InvalidLogLevel)?,
            None => default_log_level(),
        };

        Ok(Self {
            backend,
            log_level,
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        })
    }
}
