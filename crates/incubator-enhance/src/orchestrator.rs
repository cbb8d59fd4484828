//! EnhancementOrchestrator: per-concept in-flight guard around the provider
//! client and the single store write.

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn, Instrument};

use incubator_core::config::{ConcurrentPolicy, EnhancementConfig};
use incubator_core::content::render_text;
use incubator_core::errors::{IncubatorError, IncubatorErrorCode, IncubatorResult};
use incubator_core::flight::{Join, SingleFlight};
use incubator_core::models::{
    ConceptSnapshot, ConceptUpdate, EnhancedConcept, EnhancementAttempt, EnhancementPatch,
    EnhancementState, ProgressEvent, ProgressSink,
};
use incubator_core::traits::{IConceptStore, IGenerationBackend};
use incubator_observability::enhancement_span;
use incubator_observability::tracing_setup::events;
use incubator_provider::ProviderClient;

use crate::attempts::AttemptRegistry;

type Outcome = IncubatorResult<EnhancedConcept>;

struct Inner<B> {
    client: Arc<ProviderClient<B>>,
    concepts: Arc<dyn IConceptStore>,
    flights: SingleFlight<Outcome>,
    attempts: AttemptRegistry,
    policy: ConcurrentPolicy,
}

/// Runs enhancements: fetch the concept, ask the provider client for a pitch
/// and sub-scores, write them back in one update.
///
/// Cloning is cheap and clones share in-flight state.
pub struct EnhancementOrchestrator<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for EnhancementOrchestrator<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: IGenerationBackend + 'static> EnhancementOrchestrator<B> {
    pub fn new(
        client: Arc<ProviderClient<B>>,
        concepts: Arc<dyn IConceptStore>,
        config: &EnhancementConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                concepts,
                flights: SingleFlight::new(),
                attempts: AttemptRegistry::new(),
                policy: config.concurrent_policy,
            }),
        }
    }

    pub fn policy(&self) -> ConcurrentPolicy {
        self.inner.policy
    }

    /// Enhance a concept and return it as persisted.
    pub async fn enhance(&self, concept_id: &str) -> Outcome {
        self.run(concept_id, ProgressSink::none()).await
    }

    /// Like [`enhance`](Self::enhance), reporting progress on `progress`.
    pub async fn enhance_with_progress(
        &self,
        concept_id: &str,
        progress: UnboundedSender<ProgressEvent>,
    ) -> Outcome {
        self.run(concept_id, ProgressSink::channel(progress)).await
    }

    /// Enhancement state of a concept. `Enhancing` while an attempt is in
    /// flight; otherwise derived from the stored concept.
    pub fn state(&self, concept_id: &str) -> IncubatorResult<EnhancementState> {
        if self.inner.flights.is_in_flight(concept_id) {
            return Ok(EnhancementState::Enhancing);
        }
        let concept = self
            .inner
            .concepts
            .get(concept_id)?
            .ok_or_else(|| IncubatorError::not_found(concept_id))?;
        Ok(if concept.ai_validated {
            EnhancementState::Enhanced {
                fallback: !concept.is_ai_generated,
            }
        } else {
            EnhancementState::NotEnhanced
        })
    }

    pub fn is_enhancing(&self, concept_id: &str) -> bool {
        self.inner.flights.is_in_flight(concept_id)
    }

    /// The most recent attempt for a concept, running or finished.
    pub fn last_attempt(&self, concept_id: &str) -> Option<EnhancementAttempt> {
        self.inner.attempts.get(concept_id)
    }

    /// Drop bookkeeping for a deleted concept.
    pub fn forget(&self, concept_id: &str) {
        self.inner.attempts.remove(concept_id);
    }

    async fn run(&self, concept_id: &str, progress: ProgressSink) -> Outcome {
        let ticket = match self.inner.flights.join(concept_id) {
            Join::Follower(ticket) => {
                if self.inner.policy == ConcurrentPolicy::Reject {
                    let err = IncubatorError::ConcurrentEnhancementInProgress {
                        id: concept_id.to_string(),
                    };
                    progress.emit(ProgressEvent::Failed {
                        concept_id: concept_id.to_string(),
                        code: err.error_code().to_string(),
                    });
                    return Err(err);
                }
                events::flight_joined("enhance", concept_id);
                progress.emit(ProgressEvent::Attached {
                    concept_id: concept_id.to_string(),
                });
                ticket
            }
            Join::Leader(slot) => {
                progress.emit(ProgressEvent::Started {
                    concept_id: concept_id.to_string(),
                });
                let ticket = slot.ticket();
                let inner = Arc::clone(&self.inner);
                let worker_progress = progress.clone();
                tokio::spawn(
                    async move {
                        let outcome = inner.execute(slot.key(), &worker_progress).await;
                        slot.complete(outcome);
                    }
                    .instrument(enhancement_span!(concept_id)),
                );
                ticket
            }
        };

        let outcome = ticket.wait().await.unwrap_or_else(|| {
            Err(IncubatorError::TaskAborted {
                reason: format!("enhancement of {concept_id} ended without a result"),
            })
        });
        progress.emit(match &outcome {
            Ok(enhanced) => ProgressEvent::Completed {
                concept_id: concept_id.to_string(),
                is_ai_generated: enhanced.is_ai_generated,
            },
            Err(e) => ProgressEvent::Failed {
                concept_id: concept_id.to_string(),
                code: e.error_code().to_string(),
            },
        });
        outcome
    }
}

impl<B: IGenerationBackend> Inner<B> {
    async fn execute(&self, concept_id: &str, progress: &ProgressSink) -> Outcome {
        let concept = self
            .concepts
            .get(concept_id)?
            .ok_or_else(|| IncubatorError::not_found(concept_id))?;

        self.attempts.start(concept_id);
        let outcome = self.enhance_concept(concept.snapshot(), progress).await;
        self.attempts.finish(concept_id, &outcome);

        match &outcome {
            Ok(enhanced) => events::enhancement_completed(
                concept_id,
                enhanced.feasibility_score(),
                enhanced.is_ai_generated,
            ),
            Err(e) => warn!(concept_id, error = %e, "enhancement failed, concept unchanged"),
        }
        outcome
    }

    async fn enhance_concept(
        &self,
        snapshot: ConceptSnapshot,
        progress: &ProgressSink,
    ) -> Outcome {
        progress.emit(ProgressEvent::Generating {
            concept_id: snapshot.id.clone(),
        });
        let draft = self.client.enhance(&snapshot).await?;
        debug!(
            concept_id = %snapshot.id,
            retries = draft.retries,
            is_ai_generated = draft.is_ai_generated,
            "enhancement draft ready"
        );

        progress.emit(ProgressEvent::Persisting {
            concept_id: snapshot.id.clone(),
        });
        let update = ConceptUpdate::enhancement(EnhancementPatch {
            refined_pitch: render_text(&draft.pitch),
            market_potential: draft.market_potential,
            technical_complexity: draft.technical_complexity,
            resource_requirements: draft.resource_requirements,
            is_ai_generated: draft.is_ai_generated,
        });
        let concept = self.concepts.update(&snapshot.id, &update)?;

        Ok(EnhancedConcept {
            concept,
            is_ai_generated: draft.is_ai_generated,
            retries: draft.retries,
        })
    }
}
