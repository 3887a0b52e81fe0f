//! Seeding run configuration.
//!
//! # Responsibility
//! - Describe where records come from and which database receives them.
//! - Reject unusable settings before any connection is opened.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Input document read when no path is configured.
pub const DEFAULT_INPUT_PATH: &str = "books-data.json";
/// Database file written when no path is configured.
pub const DEFAULT_DATABASE_PATH: &str = "books.sqlite3";

/// Database that receives the seeded catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    File(PathBuf),
    /// Throwaway database; contents vanish when the run ends.
    Memory,
}

impl Default for DatabaseTarget {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_DATABASE_PATH))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub database: DatabaseTarget,
    pub input_path: PathBuf,
    pub log_level: String,
    /// When set, logs are also written to rolling files in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database: DatabaseTarget::default(),
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            log_level: crate::logging::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl SeedConfig {
    /// Checks path settings without touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(ConfigError::EmptyInputPath);
        }
        if let DatabaseTarget::File(path) = &self.database {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyDatabasePath);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyInputPath,
    EmptyDatabasePath,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInputPath => write!(f, "input path cannot be empty"),
            Self::EmptyDatabasePath => write!(f, "database path cannot be empty"),
        }
    }
}

impl Error for ConfigError {}
