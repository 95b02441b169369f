//! Data directory layout.

use std::path::{Path, PathBuf};

/// Resolve the Benefactor data directory.
///
/// Uses `BENEFACTOR_DATA_DIR` when set, otherwise `~/.benefactor`.
pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BENEFACTOR_DATA_DIR") {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".benefactor")
}

/// SQLite database file inside the data directory.
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join("benefactor.db")
}

/// SQLite connection URL for the database inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", database_path(data_dir).display())
}

/// Nonce signing key file inside the data directory.
pub fn nonce_key_path(data_dir: &Path) -> PathBuf {
    data_dir.join("nonce.key")
}
