//! Most recent enhancement attempt per concept.

use dashmap::DashMap;

use incubator_core::errors::{IncubatorError, IncubatorErrorCode};
use incubator_core::models::{AttemptState, EnhancedConcept, EnhancementAttempt};

/// Keeps the latest attempt per concept for inspection. Entries are
/// replaced, never accumulated.
#[derive(Debug, Default)]
pub struct AttemptRegistry {
    attempts: DashMap<String, EnhancementAttempt>,
}

impl AttemptRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&self, concept_id: &str) {
        self.attempts
            .insert(concept_id.to_string(), EnhancementAttempt::start(concept_id));
    }

    /// Record the terminal state of the running attempt.
    pub fn finish(&self, concept_id: &str, result: &Result<EnhancedConcept, IncubatorError>) {
        let Some(mut attempt) = self.attempts.get_mut(concept_id) else {
            return;
        };
        match result {
            Ok(enhanced) if enhanced.is_ai_generated => {
                attempt.finish(AttemptState::Succeeded, enhanced.retries)
            }
            Ok(enhanced) => attempt.finish(AttemptState::FellBack, enhanced.retries),
            Err(e) => {
                let retries = attempt.retries;
                attempt.finish(
                    AttemptState::Failed {
                        code: e.error_code().to_string(),
                        reason: e.to_string(),
                    },
                    retries,
                )
            }
        }
    }

    pub fn get(&self, concept_id: &str) -> Option<EnhancementAttempt> {
        self.attempts.get(concept_id).map(|a| a.clone())
    }

    pub fn remove(&self, concept_id: &str) {
        self.attempts.remove(concept_id);
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }
}
