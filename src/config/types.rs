use serde::Deserialize;

/// Main configuration structure for Probe-Batch
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub probe: ProbeConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    pub challenge: ChallengeConfig,
}

/// Probe endpoint and pacing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeConfig {
    /// URL every probe request is sent to
    pub endpoint: String,

    /// Delay before each probe request (milliseconds)
    #[serde(rename = "request-interval-ms", default = "default_request_interval_ms")]
    pub request_interval_ms: u64,

    /// Per-call timeout (milliseconds); 0 disables it
    #[serde(rename = "request-timeout-ms", default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Header that carries the challenge credential
    #[serde(rename = "credential-header", default = "default_credential_header")]
    pub credential_header: String,

    /// Largest batch accepted at the submission surface
    #[serde(rename = "max-batch-size", default = "default_max_batch_size")]
    pub max_batch_size: u32,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    pub name: String,
    pub version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Challenge widget configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ChallengeConfig {
    /// Site key handed to the challenge widget
    #[serde(rename = "site-key")]
    pub site_key: String,

    /// Where the challenge widget script is served from
    #[serde(rename = "script-url", default)]
    pub script_url: Option<String>,
}

fn default_request_interval_ms() -> u64 {
    1000
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_credential_header() -> String {
    "aws-waf-token".to_string()
}

fn default_max_batch_size() -> u32 {
    1000
}
