//! # incubator-insights
//!
//! Market, risk and roadmap insights per concept, stored as immutable
//! versions.
//!
//! ```text
//! get(id, force)
//!  ├── !force and a version exists → hot tier → store (no provider call)
//!  └── force or nothing stored     → single-flight generation
//!                                     → provider client
//!                                     → optimistic append (previous + 1)
//!                                     → hot tier
//! ```

pub mod cache;
pub mod hot_tier;

pub use cache::InsightsCache;
pub use hot_tier::HotTier;
