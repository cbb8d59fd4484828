//! Span definitions per operation: enhancement, insights, provider calls.

/// Create an enhancement span.
#[macro_export]
macro_rules! enhancement_span {
    ($concept_id:expr) => {
        tracing::info_span!("incubator.enhancement", concept_id = %$concept_id)
    };
}

/// Create an insights span.
#[macro_export]
macro_rules! insights_span {
    ($concept_id:expr, $force:expr) => {
        tracing::info_span!("incubator.insights", concept_id = %$concept_id, force = $force)
    };
}

/// Create a provider call span.
#[macro_export]
macro_rules! provider_span {
    ($backend:expr, $kind:expr, $concept_id:expr) => {
        tracing::debug_span!(
            "incubator.provider",
            backend = %$backend,
            kind = %$kind,
            concept_id = %$concept_id
        )
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const ENHANCEMENT: &str = "incubator.enhancement";
    pub const INSIGHTS: &str = "incubator.insights";
    pub const PROVIDER: &str = "incubator.provider";
}
