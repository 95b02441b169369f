//! Global configuration loader for Benefactor.
//!
//! Reads `config.toml` from the data directory (`~/.benefactor/` in production)
//! and deserializes it into [`GlobalConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use benefactor_types::config::GlobalConfig;

/// Shortest accepted nonce lifetime, in seconds.
const MIN_NONCE_LIFETIME_SECS: u64 = 60;

/// Load global configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GlobalConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - A nonce lifetime below one minute is raised to one minute.
pub async fn load_global_config(data_dir: &Path) -> GlobalConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GlobalConfig::default();
        }
    };

    let mut config = match toml::from_str::<GlobalConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            return GlobalConfig::default();
        }
    };

    if config.nonce_lifetime_secs < MIN_NONCE_LIFETIME_SECS {
        tracing::warn!(
            configured = config.nonce_lifetime_secs,
            "nonce_lifetime_secs too short, using {MIN_NONCE_LIFETIME_SECS}"
        );
        config.nonce_lifetime_secs = MIN_NONCE_LIFETIME_SECS;
    }

    config
}
