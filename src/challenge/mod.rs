//! Challenge providers
//!
//! A challenge provider yields one credential once a human has solved the
//! interactive challenge for a site key. The executor never talks to a
//! provider itself; [`crate::batch::run_batch`] feeds the credential back in.

mod prompt;

pub use prompt::{PromptChallengeProvider, CHALLENGE_NOTICE};

use crate::ChallengeError;
use async_trait::async_trait;

/// Produces a credential for a solved challenge
#[async_trait]
pub trait ChallengeProvider: Send + Sync {
    /// Resolves once with the credential for `site_key`
    async fn solve(&self, site_key: &str) -> Result<String, ChallengeError>;
}

/// Provider that hands out a token obtained ahead of time
#[derive(Debug, Clone)]
pub struct StaticChallengeProvider {
    token: String,
}

impl StaticChallengeProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl ChallengeProvider for StaticChallengeProvider {
    async fn solve(&self, site_key: &str) -> Result<String, ChallengeError> {
        tracing::debug!(site_key, "Using pre-supplied challenge token");
        Ok(self.token.clone())
    }
}
