//! # incubator-observability
//!
//! Tracing subscriber setup, span macros for the pipeline's long-running
//! operations, structured log events, and a degradation tracker.

pub mod degradation;
pub mod tracing_setup;

pub use degradation::{ComponentSummary, DegradationTracker};
pub use tracing_setup::{init_tracing, init_tracing_with_filter};
