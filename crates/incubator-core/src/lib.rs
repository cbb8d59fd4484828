//! # incubator-core
//!
//! Foundation crate for the Incubator enhancement pipeline.
//! Defines the concept/insight data model, the feasibility scorer, the
//! normalized content blocks, errors, config, constants, the store and
//! generation-backend traits, and the single-flight primitive.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod content;
pub mod errors;
pub mod flight;
pub mod models;
pub mod scoring;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::IncubatorConfig;
pub use content::ContentBlock;
pub use errors::{IncubatorError, IncubatorResult};
pub use flight::{FlightSlot, FlightTicket, Join, SingleFlight};
pub use models::{Concept, ConceptSnapshot, InsightRecord, InsightSummary, Stage};
pub use scoring::FeasibilityScorer;
