//! Batch executor - the paced, resumable request loop
//!
//! The executor owns the single [`BatchState`] of the current batch and is the
//! only thing that mutates it. Probe calls are issued strictly one at a time,
//! each preceded by the pacing interval. A challenge status stops the loop;
//! [`BatchExecutor::resume`] continues from the first unrecorded index with
//! the supplied credential.
//!
//! The state lives in a `tokio::sync::watch` channel so that every append is
//! published to subscribers as it happens. Each run remembers the `batch_id`
//! it was started under; once a newer batch has been started the stale run
//! stops and its late outcomes are dropped.

use crate::batch::probe::Probe;
use crate::batch::state::{BatchRequest, BatchState, RequestOutcome};
use crate::config::ProbeConfig;
use crate::ProbeError;
use reqwest::header::HeaderValue;
use std::time::Duration;
use tokio::sync::watch;

/// Status the server uses to demand a challenge
pub const CHALLENGE_STATUS: u16 = 405;

/// Status recorded when a probe call fails before a response arrives
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Runtime settings for the executor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutorSettings {
    /// Delay before every probe call
    pub request_interval: Duration,
}

impl Default for ExecutorSettings {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_millis(1000),
        }
    }
}

impl From<&ProbeConfig> for ExecutorSettings {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            request_interval: Duration::from_millis(config.request_interval_ms),
        }
    }
}

/// Runs batches of probe calls
pub struct BatchExecutor<P> {
    probe: P,
    settings: ExecutorSettings,
    state: watch::Sender<BatchState>,
}

impl<P: Probe> BatchExecutor<P> {
    /// Creates an executor with an empty state
    pub fn new(probe: P, settings: ExecutorSettings) -> Self {
        let (state, _) = watch::channel(BatchState::default());
        Self {
            probe,
            settings,
            state,
        }
    }

    /// Subscribes to state changes
    ///
    /// The receiver observes every outcome as soon as it is appended, along
    /// with challenge and credential changes and batch resets.
    pub fn subscribe(&self) -> watch::Receiver<BatchState> {
        self.state.subscribe()
    }

    /// Returns a copy of the current state
    pub fn snapshot(&self) -> BatchState {
        self.state.borrow().clone()
    }

    pub fn settings(&self) -> ExecutorSettings {
        self.settings
    }

    /// Starts a new batch of `total_count` probe calls
    ///
    /// Any previous batch, including its credential, is discarded; a run of
    /// that batch still in flight is superseded.
    ///
    /// # Returns
    ///
    /// * `Ok(BatchState)` - The batch either completed or paused on a challenge
    /// * `Err(ProbeError::InvalidArgument)` - `total_count` is not positive
    /// * `Err(ProbeError::Superseded)` - Another batch was started meanwhile
    pub async fn start(&self, total_count: i64) -> Result<BatchState, ProbeError> {
        let request = BatchRequest::new(total_count)?;
        let requested = request.total_count();

        let mut batch_id = 0;
        self.state.send_modify(|state| {
            batch_id = state.batch_id + 1;
            *state = BatchState::fresh(batch_id, requested);
        });

        tracing::info!(batch_id, requested, "Starting batch");
        self.run_from(batch_id, 1, requested).await
    }

    /// Resumes a batch paused on a challenge
    ///
    /// Stores `credential`, clears the pending flag and continues from the
    /// first index without an outcome. A batch that already has all of its
    /// outcomes is left as is.
    ///
    /// # Returns
    ///
    /// * `Err(ProbeError::InvalidState)` - No challenge is pending; nothing changes
    /// * `Err(ProbeError::InvalidArgument)` - `credential` is empty or not a valid
    ///   header value; nothing changes
    pub async fn resume(&self, credential: &str) -> Result<BatchState, ProbeError> {
        let mut plan = Err(ProbeError::InvalidState(
            "resume called while no challenge is pending".to_string(),
        ));

        self.state.send_if_modified(|state| {
            if !state.challenge_pending {
                return false;
            }
            if credential.is_empty() {
                plan = Err(ProbeError::InvalidArgument(
                    "credential cannot be empty".to_string(),
                ));
                return false;
            }
            if HeaderValue::from_str(credential).is_err() {
                plan = Err(ProbeError::InvalidArgument(
                    "credential must be visible ASCII to fit in a request header".to_string(),
                ));
                return false;
            }

            state.challenge_pending = false;
            state.credential = Some(credential.to_string());
            plan = Ok((state.batch_id, state.completed() + 1, state.requested));
            true
        });

        let (batch_id, next_index, requested) = plan?;

        if next_index > requested {
            tracing::info!(batch_id, "Challenge resolved; batch already complete");
            return Ok(self.snapshot());
        }

        tracing::info!(
            batch_id,
            next_index,
            remaining = requested - next_index + 1,
            "Challenge resolved; resuming batch"
        );
        self.run_from(batch_id, next_index, requested).await
    }

    /// Executes calls `start_index..=total_count` in order
    ///
    /// Stops after the first challenge status. Returns `Superseded` as soon
    /// as `batch_id` is no longer the current batch.
    async fn run_from(
        &self,
        batch_id: u64,
        start_index: u32,
        total_count: u32,
    ) -> Result<BatchState, ProbeError> {
        // Resolves once a newer batch has been started
        let cancelled = wait_superseded(self.state.subscribe(), batch_id);
        tokio::pin!(cancelled);

        for index in start_index..=total_count {
            tracing::trace!(index, interval = ?self.settings.request_interval, "Pacing");
            tokio::select! {
                biased;
                _ = &mut cancelled => return Err(self.superseded(batch_id)),
                _ = tokio::time::sleep(self.settings.request_interval) => {}
            }

            let credential = {
                let state = self.state.borrow();
                if state.batch_id != batch_id {
                    return Err(self.superseded(batch_id));
                }
                state.credential.clone().unwrap_or_default()
            };

            // A superseded call is dropped mid-flight, never awaited to completion
            let result = tokio::select! {
                biased;
                _ = &mut cancelled => return Err(self.superseded(batch_id)),
                result = self.probe.send(&credential) => result,
            };

            let status_code = match result {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(
                        index,
                        error = %e,
                        "Probe request failed, recording status {}",
                        TRANSPORT_FAILURE_STATUS
                    );
                    TRANSPORT_FAILURE_STATUS
                }
            };

            let outcome = RequestOutcome::new(index, status_code);
            let challenged = status_code == CHALLENGE_STATUS;

            let appended = self.state.send_if_modified(|state| {
                if state.batch_id != batch_id {
                    return false;
                }
                debug_assert_eq!(state.completed() + 1, index);
                state.outcomes.push(outcome);
                if challenged {
                    state.challenge_pending = true;
                }
                true
            });

            if !appended {
                return Err(self.superseded(batch_id));
            }

            tracing::debug!(batch_id, index, status_code, "Recorded outcome");

            if challenged {
                tracing::info!(
                    batch_id,
                    index,
                    requested = total_count,
                    "Challenge required, pausing batch"
                );
                break;
            }
        }

        Ok(self.snapshot())
    }

    fn superseded(&self, batch_id: u64) -> ProbeError {
        tracing::info!(batch_id, "Discarding run of superseded batch");
        ProbeError::Superseded { batch_id }
    }
}

/// Completes when the state channel moves on to a batch other than `batch_id`
async fn wait_superseded(mut rx: watch::Receiver<BatchState>, batch_id: u64) {
    loop {
        if rx.borrow_and_update().batch_id != batch_id {
            return;
        }
        if rx.changed().await.is_err() {
            // Executor dropped; nothing can supersede this run any more
            std::future::pending::<()>().await;
        }
    }
}
