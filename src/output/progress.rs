//! Live progress rendering
//!
//! Follows the executor's state channel and prints each outcome once, as
//! soon as it is recorded.

use crate::batch::{BatchState, RequestOutcome};
use std::io;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::watch;

/// Formats one outcome as a progress line
pub fn format_outcome(outcome: &RequestOutcome) -> String {
    outcome.to_string()
}

/// Remembers what has already been printed for the current batch
#[derive(Debug, Default)]
pub struct ProgressTracker {
    batch_id: u64,
    printed: usize,
    pause_reported: bool,
}

impl ProgressTracker {
    /// Returns the lines that `state` adds to what was already printed
    pub fn update(&mut self, state: &BatchState) -> Vec<String> {
        if state.batch_id != self.batch_id {
            self.batch_id = state.batch_id;
            self.printed = 0;
            self.pause_reported = false;
        }

        let mut lines: Vec<String> = state
            .outcomes
            .iter()
            .skip(self.printed)
            .map(format_outcome)
            .collect();
        self.printed = state.outcomes.len();

        if state.challenge_pending && !self.pause_reported {
            lines.push(format!(
                "Paused after {} of {} requests: challenge required",
                state.completed(),
                state.requested
            ));
        }
        self.pause_reported = state.challenge_pending;

        lines
    }
}

/// Prints progress to stdout until the executor is dropped
pub async fn print_progress(rx: watch::Receiver<BatchState>) -> io::Result<()> {
    write_progress(rx, tokio::io::stdout()).await
}

/// Writes progress lines to `out` until the executor is dropped
pub async fn write_progress<W: AsyncWrite + Unpin>(
    mut rx: watch::Receiver<BatchState>,
    mut out: W,
) -> io::Result<()> {
    let mut tracker = ProgressTracker::default();

    loop {
        let lines = tracker.update(&rx.borrow_and_update());
        write_lines(&mut out, lines).await?;

        if rx.changed().await.is_err() {
            break;
        }
    }

    // Pick up anything recorded between the last wake-up and the drop
    let lines = tracker.update(&rx.borrow());
    write_lines(&mut out, lines).await
}

async fn write_lines<W: AsyncWrite + Unpin>(out: &mut W, lines: Vec<String>) -> io::Result<()> {
    for line in lines {
        out.write_all(line.as_bytes()).await?;
        out.write_all(b"\n").await?;
    }
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(batch_id: u64, requested: u32, codes: &[u16], pending: bool) -> BatchState {
        BatchState {
            batch_id,
            requested,
            outcomes: codes
                .iter()
                .enumerate()
                .map(|(i, &c)| RequestOutcome::new(i as u32 + 1, c))
                .collect(),
            challenge_pending: pending,
            credential: None,
        }
    }

    #[test]
    fn test_format_outcome() {
        assert_eq!(
            format_outcome(&RequestOutcome::new(1, 200)),
            "Request 1 - Response 200"
        );
    }

    #[test]
    fn test_tracker_prints_each_outcome_once() {
        let mut tracker = ProgressTracker::default();

        assert_eq!(
            tracker.update(&state(1, 3, &[200], false)),
            vec!["Request 1 - Response 200"]
        );
        assert!(tracker.update(&state(1, 3, &[200], false)).is_empty());
        assert_eq!(
            tracker.update(&state(1, 3, &[200, 500, 201], false)),
            vec!["Request 2 - Response 500", "Request 3 - Response 201"]
        );
    }

    #[test]
    fn test_tracker_reports_pause_once_per_challenge() {
        let mut tracker = ProgressTracker::default();

        let lines = tracker.update(&state(1, 4, &[200, 405], true));
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2], "Paused after 2 of 4 requests: challenge required");

        assert!(tracker.update(&state(1, 4, &[200, 405], true)).is_empty());
        assert!(tracker.update(&state(1, 4, &[200, 405], false)).is_empty());

        let lines = tracker.update(&state(1, 4, &[200, 405, 405], true));
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_tracker_restarts_on_new_batch() {
        let mut tracker = ProgressTracker::default();
        tracker.update(&state(1, 2, &[200, 200], false));

        assert_eq!(
            tracker.update(&state(2, 1, &[404], false)),
            vec!["Request 1 - Response 404"]
        );
    }

    #[tokio::test]
    async fn test_write_progress_until_sender_dropped() {
        let (tx, rx) = watch::channel(BatchState::default());
        let writer = tokio::spawn(async move {
            let mut out = Vec::new();
            write_progress(rx, &mut out).await.unwrap();
            String::from_utf8(out).unwrap()
        });

        tx.send_replace(state(1, 2, &[200], false));
        tx.send_replace(state(1, 2, &[200, 503], false));
        drop(tx);

        let written = writer.await.unwrap();
        assert_eq!(written, "Request 1 - Response 200\nRequest 2 - Response 503\n");
    }
}
