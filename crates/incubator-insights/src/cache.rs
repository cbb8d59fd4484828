//! InsightsCache: serve the current insights version or generate a new one.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, Instrument};

use incubator_core::config::InsightsConfig;
use incubator_core::errors::{IncubatorError, IncubatorErrorCode, IncubatorResult, StorageError};
use incubator_core::flight::{Join, SingleFlight};
use incubator_core::models::{
    InsightDraft, InsightRecord, InsightSummary, NewInsightRecord, ProgressEvent, ProgressSink,
};
use incubator_core::traits::{IConceptStore, IGenerationBackend, IInsightStore};
use incubator_observability::insights_span;
use incubator_observability::tracing_setup::events;
use incubator_provider::ProviderClient;

use crate::hot_tier::HotTier;

type Outcome = IncubatorResult<InsightRecord>;

struct Inner<B> {
    client: Arc<ProviderClient<B>>,
    concepts: Arc<dyn IConceptStore>,
    insights: Arc<dyn IInsightStore>,
    hot: HotTier,
    flights: SingleFlight<Outcome>,
    max_append_attempts: u32,
}

/// Versioned insights per concept.
///
/// Reads never call the provider when a version exists and regeneration is
/// not forced. Generation is single-flight per concept: every caller
/// waiting while a generation runs receives the record it produced.
pub struct InsightsCache<B> {
    inner: Arc<Inner<B>>,
}

impl<B> Clone for InsightsCache<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: IGenerationBackend + 'static> InsightsCache<B> {
    pub fn new(
        client: Arc<ProviderClient<B>>,
        concepts: Arc<dyn IConceptStore>,
        insights: Arc<dyn IInsightStore>,
        config: &InsightsConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                client,
                concepts,
                insights,
                hot: HotTier::new(config.hot_cache_size, config.hot_cache_ttl()),
                flights: SingleFlight::new(),
                max_append_attempts: config.max_append_attempts.max(1),
            }),
        }
    }

    /// The current insights for a concept, generating a new version when
    /// `force` is set or none exists yet.
    pub async fn get(&self, concept_id: &str, force: bool) -> Outcome {
        self.get_inner(concept_id, force, ProgressSink::none()).await
    }

    /// Like [`get`](Self::get), reporting generation progress on `progress`.
    /// Nothing is reported when an existing version is served.
    pub async fn get_with_progress(
        &self,
        concept_id: &str,
        force: bool,
        progress: UnboundedSender<ProgressEvent>,
    ) -> Outcome {
        self.get_inner(concept_id, force, ProgressSink::channel(progress))
            .await
    }

    /// Summaries of every stored version, ascending.
    pub fn history(&self, concept_id: &str) -> IncubatorResult<Vec<InsightSummary>> {
        Ok(self
            .inner
            .insights
            .get_history(concept_id)?
            .iter()
            .map(InsightRecord::summary)
            .collect())
    }

    /// Every stored version, ascending.
    pub fn versions(&self, concept_id: &str) -> IncubatorResult<Vec<InsightRecord>> {
        self.inner.insights.get_history(concept_id)
    }

    /// Delete every version for a concept. Returns how many were removed.
    pub fn delete(&self, concept_id: &str) -> IncubatorResult<usize> {
        self.inner.hot.invalidate(concept_id);
        let removed = self.inner.insights.delete_all(concept_id)?;
        self.inner.hot.invalidate(concept_id);
        debug!(concept_id, removed, "insights deleted");
        Ok(removed)
    }

    /// Drop the hot-tier entry for a concept whose rows were removed
    /// elsewhere (e.g. by a cascading concept delete).
    pub fn evict(&self, concept_id: &str) {
        self.inner.hot.invalidate(concept_id);
    }

    pub fn is_generating(&self, concept_id: &str) -> bool {
        self.inner.flights.is_in_flight(concept_id)
    }

    pub fn hot_tier(&self) -> &HotTier {
        &self.inner.hot
    }

    async fn get_inner(&self, concept_id: &str, force: bool, progress: ProgressSink) -> Outcome {
        if !force {
            if let Some(record) = self.inner.hot.get(concept_id) {
                debug!(concept_id, version = record.generation_version, "insights hot-tier hit");
                return Ok(record);
            }
            if let Some(record) = self.inner.insights.get_current(concept_id)? {
                debug!(concept_id, version = record.generation_version, "insights served from store");
                self.inner.hot.insert(record.clone());
                return Ok(record);
            }
        }
        self.generate(concept_id, force, progress).await
    }

    async fn generate(&self, concept_id: &str, force: bool, progress: ProgressSink) -> Outcome {
        let ticket = match self.inner.flights.join(concept_id) {
            Join::Follower(ticket) => {
                events::flight_joined("insights", concept_id);
                progress.emit(ProgressEvent::Attached {
                    concept_id: concept_id.to_string(),
                });
                ticket
            }
            Join::Leader(slot) => {
                if !force {
                    // Another generation may have finished between the store
                    // miss and winning the slot.
                    match self.inner.insights.get_current(concept_id) {
                        Ok(Some(record)) => {
                            debug!(
                                concept_id,
                                version = record.generation_version,
                                "insights appeared before generation"
                            );
                            self.inner.hot.insert(record.clone());
                            slot.complete(Ok(record.clone()));
                            return Ok(record);
                        }
                        Ok(None) => {}
                        Err(e) => {
                            slot.complete(Err(e.clone()));
                            return Err(e);
                        }
                    }
                }
                progress.emit(ProgressEvent::Started {
                    concept_id: concept_id.to_string(),
                });
                let ticket = slot.ticket();
                let inner = Arc::clone(&self.inner);
                let worker_progress = progress.clone();
                tokio::spawn(
                    async move {
                        let outcome = inner.produce(slot.key(), &worker_progress).await;
                        slot.complete(outcome);
                    }
                    .instrument(insights_span!(concept_id, force)),
                );
                ticket
            }
        };

        let outcome = ticket.wait().await.unwrap_or_else(|| {
            Err(IncubatorError::TaskAborted {
                reason: format!("insights generation for {concept_id} ended without a result"),
            })
        });
        progress.emit(match &outcome {
            Ok(record) => ProgressEvent::Completed {
                concept_id: concept_id.to_string(),
                is_ai_generated: record.is_ai_generated,
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
    async fn produce(&self, concept_id: &str, progress: &ProgressSink) -> Outcome {
        let concept = self
            .concepts
            .get(concept_id)?
            .ok_or_else(|| IncubatorError::not_found(concept_id))?;

        progress.emit(ProgressEvent::Generating {
            concept_id: concept_id.to_string(),
        });
        let draft = self.client.generate_insights(&concept.snapshot()).await?;

        progress.emit(ProgressEvent::Persisting {
            concept_id: concept_id.to_string(),
        });
        let record = self.persist(concept_id, draft)?;
        self.hot.insert(record.clone());
        // A concept deleted while we persisted must not stay cached.
        if self.concepts.get(concept_id)?.is_none() {
            self.hot.invalidate(concept_id);
            return Err(IncubatorError::not_found(concept_id));
        }
        events::insights_generated(
            concept_id,
            record.generation_version,
            record.is_ai_generated,
        );
        Ok(record)
    }

    /// Append the draft as the next version. A concurrent append is
    /// detected by the store; re-read the current version and try again.
    fn persist(&self, concept_id: &str, draft: InsightDraft) -> Outcome {
        let generated_at = Utc::now();
        let mut attempt = 1;
        loop {
            let previous_version = self
                .insights
                .get_current(concept_id)?
                .map_or(0, |r| r.generation_version);
            let record = NewInsightRecord {
                idea_id: concept_id.to_string(),
                previous_version,
                market_insights: draft.market_insights.clone(),
                risk_assessment: draft.risk_assessment.clone(),
                implementation_roadmap: draft.implementation_roadmap.clone(),
                is_ai_generated: draft.is_ai_generated,
                generated_at,
            };
            match self.insights.append(&record) {
                Ok(stored) => return Ok(stored),
                Err(IncubatorError::Storage(StorageError::VersionConflict {
                    expected,
                    actual,
                    ..
                })) if attempt < self.max_append_attempts => {
                    debug!(
                        concept_id,
                        expected,
                        actual,
                        attempt,
                        "insights version conflict, retrying append"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
