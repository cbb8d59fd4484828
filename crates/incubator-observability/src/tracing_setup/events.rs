//! Structured log events for key pipeline operations.

/// Log a fallback substitution.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

/// Log a completed enhancement.
pub fn enhancement_completed(concept_id: &str, feasibility: f64, is_ai_generated: bool) {
    tracing::info!(
        event = "enhancement_completed",
        concept_id = %concept_id,
        feasibility = feasibility,
        is_ai_generated = is_ai_generated,
        "enhancement completed"
    );
}

/// Log a newly persisted insights version.
pub fn insights_generated(concept_id: &str, version: u32, is_ai_generated: bool) {
    tracing::info!(
        event = "insights_generated",
        concept_id = %concept_id,
        version = version,
        is_ai_generated = is_ai_generated,
        "insights generated"
    );
}

/// Log a caller joining an in-flight generation.
pub fn flight_joined(operation: &str, concept_id: &str) {
    tracing::debug!(
        event = "flight_joined",
        operation = %operation,
        concept_id = %concept_id,
        "joined in-flight generation"
    );
}
