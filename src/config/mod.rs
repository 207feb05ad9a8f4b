//! Configuration module for Probe-Batch
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use probe_batch::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("probe.toml")).unwrap();
//! println!("Probing {} every {}ms", config.probe.endpoint, config.probe.request_interval_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{ChallengeConfig, Config, ProbeConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{
    apply_overrides, compute_config_hash, load_config, load_config_with_hash, SCRIPT_URL_ENV,
    SITE_KEY_ENV,
};
