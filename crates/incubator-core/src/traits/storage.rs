use crate::errors::IncubatorResult;
use crate::models::{Concept, ConceptUpdate, InsightRecord, NewInsightRecord};

/// Concept persistence.
pub trait IConceptStore: Send + Sync {
    fn create(&self, concept: &Concept) -> IncubatorResult<()>;
    fn get(&self, id: &str) -> IncubatorResult<Option<Concept>>;
    /// Apply `update` atomically and return the stored result.
    /// A missing concept is `ConceptNotFound`.
    fn update(&self, id: &str, update: &ConceptUpdate) -> IncubatorResult<Concept>;
    /// Delete a concept and every insight record it owns.
    /// Returns whether the concept existed.
    fn delete(&self, id: &str) -> IncubatorResult<bool>;
}

/// Versioned insight persistence. Versions per concept are contiguous and
/// monotonic; an append never replaces an existing version.
pub trait IInsightStore: Send + Sync {
    /// Append the next version. Fails with `VersionConflict` when the
    /// current version is not `record.previous_version`.
    fn append(&self, record: &NewInsightRecord) -> IncubatorResult<InsightRecord>;
    fn get_current(&self, idea_id: &str) -> IncubatorResult<Option<InsightRecord>>;
    /// All versions, ascending.
    fn get_history(&self, idea_id: &str) -> IncubatorResult<Vec<InsightRecord>>;
    /// Remove every version, returning how many were removed.
    fn delete_all(&self, idea_id: &str) -> IncubatorResult<usize>;
}
