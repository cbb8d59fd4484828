//! MemoryStore: dashmap-backed concept and insight store.
//!
//! Insight appends hold the per-concept map entry while checking and
//! bumping the version, so concurrent appends for one concept serialize
//! while other concepts proceed in parallel.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use incubator_core::errors::{IncubatorError, IncubatorResult, StorageError};
use incubator_core::models::{Concept, ConceptUpdate, InsightRecord, NewInsightRecord};
use incubator_core::traits::{IConceptStore, IInsightStore};

#[derive(Default)]
pub struct MemoryStore {
    concepts: DashMap<String, Concept>,
    insights: DashMap<String, Vec<InsightRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn concept_count(&self) -> usize {
        self.concepts.len()
    }
}

impl IConceptStore for MemoryStore {
    fn create(&self, concept: &Concept) -> IncubatorResult<()> {
        match self.concepts.entry(concept.id.clone()) {
            Entry::Occupied(_) => Err(crate::to_storage_err(format!(
                "UNIQUE constraint failed: concepts.id ({})",
                concept.id
            ))),
            Entry::Vacant(entry) => {
                entry.insert(concept.clone());
                Ok(())
            }
        }
    }

    fn get(&self, id: &str) -> IncubatorResult<Option<Concept>> {
        Ok(self.concepts.get(id).map(|c| c.value().clone()))
    }

    fn update(&self, id: &str, update: &ConceptUpdate) -> IncubatorResult<Concept> {
        let mut entry = self
            .concepts
            .get_mut(id)
            .ok_or_else(|| IncubatorError::not_found(id))?;
        // Apply to a copy so a validation failure leaves the stored value intact.
        let mut updated = entry.value().clone();
        updated.apply(update)?;
        *entry = updated.clone();
        Ok(updated)
    }

    fn delete(&self, id: &str) -> IncubatorResult<bool> {
        let existed = self.concepts.remove(id).is_some();
        self.insights.remove(id);
        Ok(existed)
    }
}

impl IInsightStore for MemoryStore {
    fn append(&self, record: &NewInsightRecord) -> IncubatorResult<InsightRecord> {
        // Checked under the entry lock so a concurrent delete cannot leave orphans.
        let mut versions = match self.insights.entry(record.idea_id.clone()) {
            _ if !self.concepts.contains_key(&record.idea_id) => {
                return Err(IncubatorError::not_found(&record.idea_id));
            }
            Entry::Occupied(entry) => entry.into_ref(),
            Entry::Vacant(entry) => entry.insert(Vec::new()),
        };
        let actual = versions.last().map_or(0, |r| r.generation_version);
        if actual != record.previous_version {
            return Err(StorageError::VersionConflict {
                idea_id: record.idea_id.clone(),
                expected: record.previous_version,
                actual,
            }
            .into());
        }
        let stored = record.clone().into_record();
        versions.push(stored.clone());
        Ok(stored)
    }

    fn get_current(&self, idea_id: &str) -> IncubatorResult<Option<InsightRecord>> {
        Ok(self
            .insights
            .get(idea_id)
            .and_then(|versions| versions.last().cloned()))
    }

    fn get_history(&self, idea_id: &str) -> IncubatorResult<Vec<InsightRecord>> {
        Ok(self
            .insights
            .get(idea_id)
            .map(|versions| versions.clone())
            .unwrap_or_default())
    }

    fn delete_all(&self, idea_id: &str) -> IncubatorResult<usize> {
        Ok(self
            .insights
            .remove(idea_id)
            .map_or(0, |(_, versions)| versions.len()))
    }
}
