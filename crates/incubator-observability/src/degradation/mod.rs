//! Degradation tracking.

pub mod tracker;

pub use tracker::{ComponentSummary, DegradationTracker};
