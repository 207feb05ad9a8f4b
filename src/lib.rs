//! Probe-Batch: a paced, challenge-aware request runner
//!
//! This crate issues a batch of sequential probe requests against a single
//! endpoint, pausing the batch when the server demands a CAPTCHA and resuming
//! from the first unfinished request once a credential has been supplied.

pub mod batch;
pub mod challenge;
pub mod config;
pub mod output;

use thiserror::Error;

/// Main error type for Probe-Batch operations
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Batch {batch_id} was superseded by a newer batch")]
    Superseded { batch_id: u64 },

    #[error("Challenge error: {0}")]
    Challenge(#[from] ChallengeError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure of a single probe call before any HTTP status was received
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request timeout")]
    Timeout,

    #[error("Connection failed: {0}")]
    Connect(String),

    #[error("Request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Request(e.to_string())
        }
    }
}

/// Errors raised while obtaining a challenge credential
#[derive(Debug, Error)]
pub enum ChallengeError {
    #[error("Challenge input closed before a credential was entered")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Probe-Batch operations
pub type Result<T> = std::result::Result<T, ProbeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use batch::{
    run_batch, BatchExecutor, BatchRequest, BatchState, ExecutorSettings, HttpProbe, Probe,
    RequestOutcome, CHALLENGE_STATUS, TRANSPORT_FAILURE_STATUS,
};
pub use challenge::{ChallengeProvider, PromptChallengeProvider, StaticChallengeProvider};
pub use config::Config;
