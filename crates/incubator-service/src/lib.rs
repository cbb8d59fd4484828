//! # incubator-service
//!
//! The operations exposed to the API layer: concept CRUD, enhancement,
//! versioned insights, title suggestions, and diagnostics. Responses are
//! plain serde structs that serialize as camelCase JSON.

pub mod dto;
pub mod service;

pub use dto::{
    ConceptResponse, EnhanceResponse, ErrorResponse, InsightVersion, InsightsHistoryResponse,
    InsightsResponse, TitleSuggestionsResponse,
};
pub use service::IncubatorService;
