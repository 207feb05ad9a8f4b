//! Integration tests for Probe-Batch
//!
//! These tests use wiremock to stand in for the probe endpoint and drive
//! whole batches through the HTTP probe.

mod batch_tests;
