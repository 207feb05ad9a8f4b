//! Output module for batch progress and summaries
//!
//! This module handles:
//! - Printing outcomes live as the executor records them
//! - Summarising a finished (or paused) batch

mod progress;
mod summary;

pub use progress::{format_outcome, print_progress, write_progress, ProgressTracker};
pub use summary::{print_summary, BatchSummary};
