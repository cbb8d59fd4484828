pub mod concept;
pub mod degradation_event;
pub mod enhancement;
pub mod generation;
pub mod insight;
pub mod progress;
pub mod prompt_record;

pub use concept::{Concept, ConceptSnapshot, ConceptUpdate, EnhancementPatch, NewConcept, Stage};
pub use degradation_event::DegradationEvent;
pub use enhancement::{AttemptState, EnhancedConcept, EnhancementAttempt, EnhancementState};
pub use generation::{
    EnhancementDraft, GenerationRequest, InsightDraft, RequestKind, TitleSuggestions,
};
pub use insight::{InsightRecord, InsightSummary, NewInsightRecord};
pub use progress::{ProgressEvent, ProgressSink};
pub use prompt_record::PromptRecord;
