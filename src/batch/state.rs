//! Batch state definitions
//!
//! A batch is submitted as a [`BatchRequest`], produces one [`RequestOutcome`]
//! per completed probe call, and is tracked as a single [`BatchState`] value.

use crate::ProbeError;
use std::fmt;
use std::str::FromStr;

/// A validated batch submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    total_count: u32,
}

impl BatchRequest {
    /// Creates a request for `total_count` probe calls
    ///
    /// Counts below 1 (or beyond `u32::MAX`) are rejected with
    /// [`ProbeError::InvalidArgument`].
    pub fn new(total_count: i64) -> Result<Self, ProbeError> {
        if total_count < 1 {
            return Err(ProbeError::InvalidArgument(format!(
                "batch size must be a positive integer, got {}",
                total_count
            )));
        }

        let total_count = u32::try_from(total_count).map_err(|_| {
            ProbeError::InvalidArgument(format!("batch size {} is too large", total_count))
        })?;

        Ok(Self { total_count })
    }

    /// Number of probe calls requested
    pub fn total_count(&self) -> u32 {
        self.total_count
    }

    /// Rejects requests above the configured submission limit
    pub fn check_limit(self, max_batch_size: u32) -> Result<Self, ProbeError> {
        if self.total_count > max_batch_size {
            return Err(ProbeError::InvalidArgument(format!(
                "batch size must be between 1 and {}, got {}",
                max_batch_size, self.total_count
            )));
        }
        Ok(self)
    }
}

impl FromStr for BatchRequest {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let value: i64 = trimmed.parse().map_err(|_| {
            ProbeError::InvalidArgument(format!("batch size must be an integer, got '{}'", s))
        })?;
        Self::new(value)
    }
}

/// The recorded result of one probe call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOutcome {
    /// 1-based position of the call within its batch
    pub index: u32,

    /// Server status, or the transport failure sentinel
    pub status_code: u16,
}

impl RequestOutcome {
    pub fn new(index: u32, status_code: u16) -> Self {
        Self { index, status_code }
    }
}

impl fmt::Display for RequestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Request {} - Response {}", self.index, self.status_code)
    }
}

/// State of the current batch
///
/// Outcomes are stored in index order with no gaps: `outcomes[i].index == i + 1`.
/// The credential is only replaced by a resume and only discarded when a new
/// batch starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchState {
    /// Incremented every time a batch is started
    pub batch_id: u64,

    /// Number of probe calls requested for this batch
    pub requested: u32,

    /// Outcomes recorded so far, in index order
    pub outcomes: Vec<RequestOutcome>,

    /// Whether the batch is paused waiting for a challenge credential
    pub challenge_pending: bool,

    /// Credential attached to probe calls, once a challenge was solved
    pub credential: Option<String>,
}

impl BatchState {
    /// Creates the initial state of a freshly started batch
    pub(crate) fn fresh(batch_id: u64, requested: u32) -> Self {
        Self {
            batch_id,
            requested,
            ..Self::default()
        }
    }

    /// Number of outcomes recorded so far
    pub fn completed(&self) -> u32 {
        self.outcomes.len() as u32
    }

    /// Number of calls still to be made
    pub fn remaining(&self) -> u32 {
        self.requested.saturating_sub(self.completed())
    }

    /// Returns true once every requested call has an outcome
    pub fn is_complete(&self) -> bool {
        self.requested > 0 && self.remaining() == 0
    }

    /// The most recently recorded outcome
    pub fn last_outcome(&self) -> Option<&RequestOutcome> {
        self.outcomes.last()
    }
}
