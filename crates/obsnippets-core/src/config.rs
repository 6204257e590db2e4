use crate::error::Result;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const DB_FILENAME: &str = "snippets.json";
pub const LOG_FILENAME: &str = "obsnippets.log";
pub const DB_ENV_VAR: &str = "OBSNIPPETS_DB";

/// Get the obsnippets configuration directory
pub fn get_config_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".obsnippets"))
        .unwrap_or_else(|_| PathBuf::from(".obsnippets"))
}

/// Ensure the configuration directory exists
pub fn ensure_config_dir() -> Result<PathBuf> {
    let config_dir = get_config_dir();
    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }
    Ok(config_dir)
}

/// Get the path to the database file.
///
/// `OBSNIPPETS_DB` takes precedence over the default location.
pub fn get_db_file_path() -> PathBuf {
    match env::var(DB_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => PathBuf::from(path),
        _ => get_config_dir().join(DB_FILENAME),
    }
}

/// Get the path to the log file
pub fn get_log_file_path() -> PathBuf {
    get_config_dir().join(LOG_FILENAME)
}

/// Resolve the database path, preferring an explicit override.
pub fn resolve_db_path(override_path: Option<&Path>) -> PathBuf {
    override_path
        .map(Path::to_path_buf)
        .unwrap_or_else(get_db_file_path)
}
