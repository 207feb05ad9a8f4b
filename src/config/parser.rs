use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Environment variable that replaces `challenge.site-key`
pub const SITE_KEY_ENV: &str = "PROBE_BATCH_SITE_KEY";

/// Environment variable that replaces `challenge.script-url`
pub const SCRIPT_URL_ENV: &str = "PROBE_BATCH_SCRIPT_URL";

/// Loads and parses a configuration file from the given path
///
/// Challenge settings may be overridden from the environment
/// (see [`SITE_KEY_ENV`] and [`SCRIPT_URL_ENV`]) before validation runs.
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    // Read the configuration file
    let content = std::fs::read_to_string(path)?;

    // Parse TOML
    let mut config: Config = toml::from_str(&content)?;

    // Environment wins over the file for challenge settings
    apply_overrides(&mut config, |key| std::env::var(key).ok());

    // Validate the configuration
    validate(&config)?;

    Ok(config)
}

/// Applies environment overrides to the challenge section
///
/// `lookup` resolves a variable name to its value, if set.
pub fn apply_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(site_key) = lookup(SITE_KEY_ENV) {
        tracing::debug!("Site key overridden by {}", SITE_KEY_ENV);
        config.challenge.site_key = site_key;
    }

    if let Some(script_url) = lookup(SCRIPT_URL_ENV) {
        tracing::debug!("Script URL overridden by {}", SCRIPT_URL_ENV);
        config.challenge.script_url = Some(script_url);
    }
}

/// Computes a SHA-256 hash of the configuration file content
///
/// # Returns
///
/// * `Ok(String)` - Hex-encoded SHA-256 hash of the file content
/// * `Err(ConfigError)` - Failed to read the file
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
