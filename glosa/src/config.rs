//! Store configuration
//!
//! Only the database location is configurable. Retention and page sizes are
//! fixed policy and live next to the code that enforces them.

use std::path::PathBuf;

/// Environment variable overriding the database path
pub const DB_PATH_ENV: &str = "GLOSA_DB_PATH";

const DB_FILE_NAME: &str = "glosa.sqlite3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub db_path: PathBuf,
}

impl StoreConfig {
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self { db_path: db_path.into() }
    }

    /// `GLOSA_DB_PATH`, else the platform data directory, else the working directory
    pub fn from_env() -> Self {
        let db_path = std::env::var(DB_PATH_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_db_path);
        Self { db_path }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { db_path: default_db_path() }
    }
}

fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("glosa").join(DB_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(DB_FILE_NAME))
}
