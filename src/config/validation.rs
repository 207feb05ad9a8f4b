use crate::config::types::{ChallengeConfig, Config, ProbeConfig, UserAgentConfig};
use crate::ConfigError;
use reqwest::header::HeaderName;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_probe_config(&config.probe)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_challenge_config(&config.challenge)?;
    Ok(())
}

/// Validates probe endpoint, pacing and limits
fn validate_probe_config(config: &ProbeConfig) -> Result<(), ConfigError> {
    validate_http_url(&config.endpoint, "endpoint")?;

    if config.request_interval_ms > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_interval_ms must be <= 60000ms, got {}ms",
            config.request_interval_ms
        )));
    }

    if config.request_timeout_ms != 0 && config.request_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "request_timeout_ms must be 0 (disabled) or >= 100ms, got {}ms",
            config.request_timeout_ms
        )));
    }

    if HeaderName::from_bytes(config.credential_header.as_bytes()).is_err() {
        return Err(ConfigError::Validation(format!(
            "credential_header '{}' is not a valid HTTP header name",
            config.credential_header
        )));
    }

    if config.max_batch_size < 1 {
        return Err(ConfigError::Validation(format!(
            "max_batch_size must be >= 1, got {}",
            config.max_batch_size
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    if config.name.is_empty() {
        return Err(ConfigError::Validation(
            "user agent name cannot be empty".to_string(),
        ));
    }

    if !config
        .name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "user agent name must contain only alphanumeric characters and hyphens, got '{}'",
            config.name
        )));
    }

    if config.version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user agent version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates challenge widget configuration
fn validate_challenge_config(config: &ChallengeConfig) -> Result<(), ConfigError> {
    if config.site_key.trim().is_empty() {
        return Err(ConfigError::Validation(
            "site_key cannot be empty".to_string(),
        ));
    }

    if let Some(script_url) = &config.script_url {
        validate_http_url(script_url, "script_url")?;
    }

    Ok(())
}

/// Checks that `value` parses as an http or https URL
fn validate_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{} '{}' must use the http or https scheme",
            field, value
        )));
    }

    Ok(())
}
