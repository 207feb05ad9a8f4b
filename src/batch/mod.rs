//! Batch module for paced probe execution
//!
//! This module contains the core request-execution logic, including:
//! - Batch submission and state types
//! - The probe seam and its HTTP implementation
//! - The paced, resumable executor loop
//! - Glue that feeds challenge credentials back into a paused batch

mod executor;
mod probe;
mod session;
mod state;

pub use executor::{BatchExecutor, ExecutorSettings, CHALLENGE_STATUS, TRANSPORT_FAILURE_STATUS};
pub use probe::{build_http_client, HttpProbe, Probe};
pub use session::run_batch;
pub use state::{BatchRequest, BatchState, RequestOutcome};
