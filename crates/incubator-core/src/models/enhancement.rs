use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::concept::Concept;

/// Per-concept enhancement lifecycle as seen by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EnhancementState {
    NotEnhanced,
    Enhancing,
    /// `fallback` is true when the latest pitch and scores are templated.
    Enhanced { fallback: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AttemptState {
    Running,
    Succeeded,
    FellBack,
    Failed { code: String, reason: String },
}

impl AttemptState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// Bookkeeping for one enhancement run. Not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancementAttempt {
    pub concept_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    /// Provider retries spent across all calls of the attempt.
    pub retries: u32,
    pub state: AttemptState,
}

impl EnhancementAttempt {
    pub fn start(concept_id: impl Into<String>) -> Self {
        Self {
            concept_id: concept_id.into(),
            started_at: Utc::now(),
            finished_at: None,
            retries: 0,
            state: AttemptState::Running,
        }
    }

    pub fn finish(&mut self, state: AttemptState, retries: u32) {
        self.state = state;
        self.retries = retries;
        self.finished_at = Some(Utc::now());
    }
}

/// The concept as persisted by a completed enhancement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhancedConcept {
    pub concept: Concept,
    pub is_ai_generated: bool,
    pub retries: u32,
}

impl EnhancedConcept {
    pub fn feasibility_score(&self) -> f64 {
        self.concept.feasibility_score()
    }
}
