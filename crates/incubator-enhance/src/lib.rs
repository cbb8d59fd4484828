//! # incubator-enhance
//!
//! Turns a stored concept into an enhanced one: a refined pitch and three
//! feasibility sub-scores, written back in a single store update.
//!
//! At most one enhancement runs per concept. Concurrent callers either
//! attach to the running attempt or are rejected, depending on
//! [`ConcurrentPolicy`](incubator_core::config::ConcurrentPolicy). The work
//! itself runs on a spawned task, so a caller that goes away does not abort
//! an enhancement other callers may be waiting on.

pub mod attempts;
pub mod orchestrator;

pub use attempts::AttemptRegistry;
pub use orchestrator::EnhancementOrchestrator;
