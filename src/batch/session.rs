//! Credential acquisition glue
//!
//! Drives a batch to completion, asking the challenge provider for a fresh
//! credential every time the executor pauses on a challenge.

use crate::batch::executor::BatchExecutor;
use crate::batch::probe::Probe;
use crate::batch::state::BatchState;
use crate::challenge::ChallengeProvider;
use crate::ProbeError;

/// Runs a batch of `total_count` probe calls through any challenges
///
/// # Returns
///
/// * `Ok(BatchState)` - Every requested call has an outcome
/// * `Err(ProbeError)` - The batch could not start, or no credential was obtained
pub async fn run_batch<P: Probe>(
    executor: &BatchExecutor<P>,
    provider: &dyn ChallengeProvider,
    site_key: &str,
    total_count: i64,
) -> Result<BatchState, ProbeError> {
    let mut state = executor.start(total_count).await?;

    while state.challenge_pending {
        tracing::info!(
            completed = state.completed(),
            requested = state.requested,
            "Waiting for challenge credential"
        );

        let credential = provider.solve(site_key).await?;
        state = executor.resume(&credential).await?;
    }

    tracing::info!(
        batch_id = state.batch_id,
        completed = state.completed(),
        "Batch finished"
    );

    Ok(state)
}
