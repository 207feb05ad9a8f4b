//! Batch summary generation
//!
//! Aggregates the outcomes of a batch and prints them in a readable form.

use crate::batch::{BatchState, CHALLENGE_STATUS};
use std::collections::BTreeMap;

/// Aggregated view of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub batch_id: u64,

    /// Calls requested
    pub requested: u32,

    /// Calls with a recorded outcome
    pub completed: u32,

    /// Count of outcomes per status code
    pub by_status: BTreeMap<u16, u32>,

    /// Outcomes with a 2xx status
    pub successes: u32,

    /// Outcomes that demanded a challenge
    pub challenges: u32,

    /// Whether the batch is still waiting for a credential
    pub challenge_pending: bool,
}

impl BatchSummary {
    /// Builds a summary from a batch state
    pub fn from_state(state: &BatchState) -> Self {
        let mut by_status = BTreeMap::new();
        for outcome in &state.outcomes {
            *by_status.entry(outcome.status_code).or_insert(0) += 1;
        }

        let successes = by_status
            .iter()
            .filter(|(code, _)| (200..300).contains(*code))
            .map(|(_, count)| count)
            .sum();

        let challenges = by_status.get(&CHALLENGE_STATUS).copied().unwrap_or(0);

        Self {
            batch_id: state.batch_id,
            requested: state.requested,
            completed: state.completed(),
            by_status,
            successes,
            challenges,
            challenge_pending: state.challenge_pending,
        }
    }

    /// Share of completed calls that returned 2xx, in percent
    pub fn success_rate(&self) -> f64 {
        if self.completed == 0 {
            return 0.0;
        }
        self.successes as f64 / self.completed as f64 * 100.0
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(summary: &BatchSummary) {
    println!("\n=== Batch Summary ===\n");

    println!("Overview:");
    println!("  Batch: #{}", summary.batch_id);
    println!(
        "  Completed: {} / {} requests",
        summary.completed, summary.requested
    );
    println!("  Challenges: {}", summary.challenges);
    if summary.challenge_pending {
        println!("  Status: paused, challenge pending");
    }
    println!();

    println!("Responses by Status:");
    for (code, count) in &summary.by_status {
        println!("  {}: {}", code, count);
    }
    println!();

    println!(
        "Success Rate: {:.1}% ({} / {} requests returned 2xx)",
        summary.success_rate(),
        summary.successes,
        summary.completed
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::RequestOutcome;

    #[test]
    fn test_summary_from_state() {
        let state = BatchState {
            batch_id: 3,
            requested: 5,
            outcomes: vec![
                RequestOutcome::new(1, 200),
                RequestOutcome::new(2, 405),
                RequestOutcome::new(3, 204),
                RequestOutcome::new(4, 500),
                RequestOutcome::new(5, 200),
            ],
            challenge_pending: false,
            credential: Some("tok-B".to_string()),
        };

        let summary = BatchSummary::from_state(&state);

        assert_eq!(summary.batch_id, 3);
        assert_eq!(summary.completed, 5);
        assert_eq!(summary.successes, 3);
        assert_eq!(summary.challenges, 1);
        assert_eq!(summary.by_status.get(&200), Some(&2));
        assert_eq!(summary.by_status.get(&500), Some(&1));
        assert_eq!(summary.by_status.len(), 4);
        assert!((summary.success_rate() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_summary() {
        let summary = BatchSummary::from_state(&BatchState::default());

        assert_eq!(summary.completed, 0);
        assert!(summary.by_status.is_empty());
        assert_eq!(summary.success_rate(), 0.0);
    }
}
