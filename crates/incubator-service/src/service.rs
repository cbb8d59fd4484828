//! IncubatorService: the operations the API layer calls.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::UnboundedSender;
use tracing::info;

use incubator_core::config::IncubatorConfig;
use incubator_core::errors::{IncubatorError, IncubatorResult};
use incubator_core::models::{
    Concept, ConceptUpdate, DegradationEvent, EnhancementAttempt, EnhancementState, NewConcept,
    ProgressEvent, PromptRecord,
};
use incubator_core::traits::{IConceptStore, IGenerationBackend};
use incubator_enhance::EnhancementOrchestrator;
use incubator_insights::InsightsCache;
use incubator_observability::{ComponentSummary, DegradationTracker};
use incubator_provider::{create_backend, ConfiguredBackend, ProviderClient};
use incubator_storage::{open_stores, StoreHandles};

use crate::dto::{
    EnhanceResponse, InsightsHistoryResponse, InsightsResponse, TitleSuggestionsResponse,
};

/// Facade over stores, provider client, orchestrator and insights cache.
pub struct IncubatorService<B> {
    stores: StoreHandles,
    client: Arc<ProviderClient<B>>,
    orchestrator: EnhancementOrchestrator<B>,
    insights: InsightsCache<B>,
    degradation: Mutex<DegradationTracker>,
}

impl IncubatorService<ConfiguredBackend> {
    /// Validate `config`, open the configured store, pick the backend.
    pub fn open(config: &IncubatorConfig) -> IncubatorResult<Self> {
        config.validate()?;
        let stores = open_stores(&config.storage)?;
        let backend = create_backend(&config.provider)?;
        info!(
            storage = %config.storage.backend,
            provider = backend.name(),
            "incubator service opened"
        );
        Ok(Self::new(backend, stores, config))
    }
}

impl<B: IGenerationBackend + 'static> IncubatorService<B> {
    pub fn new(backend: B, stores: StoreHandles, config: &IncubatorConfig) -> Self {
        let client = Arc::new(ProviderClient::new(backend, &config.provider));
        let orchestrator = EnhancementOrchestrator::new(
            Arc::clone(&client),
            Arc::clone(&stores.concepts),
            &config.enhancement,
        );
        let insights = InsightsCache::new(
            Arc::clone(&client),
            Arc::clone(&stores.concepts),
            Arc::clone(&stores.insights),
            &config.insights,
        );
        Self {
            stores,
            client,
            orchestrator,
            insights,
            degradation: Mutex::new(DegradationTracker::new()),
        }
    }

    // --- concepts ---------------------------------------------------------

    pub fn create_concept(&self, input: NewConcept) -> IncubatorResult<Concept> {
        let concept = Concept::new(uuid::Uuid::new_v4().to_string(), input)?;
        self.stores.concepts.create(&concept)?;
        info!(concept_id = %concept.id, "concept created");
        Ok(concept)
    }

    pub fn get_concept(&self, id: &str) -> IncubatorResult<Concept> {
        self.stores
            .concepts
            .get(id)?
            .ok_or_else(|| IncubatorError::not_found(id))
    }

    /// Edit title, description or stage. Enhancement fields are only ever
    /// written by the orchestrator and are ignored here.
    pub fn update_concept(&self, id: &str, update: ConceptUpdate) -> IncubatorResult<Concept> {
        let update = ConceptUpdate {
            enhancement: None,
            ..update
        };
        self.stores.concepts.update(id, &update)
    }

    /// Delete a concept and all of its insight versions.
    pub fn delete_concept(&self, id: &str) -> IncubatorResult<bool> {
        let existed = self.stores.concepts.delete(id)?;
        self.insights.evict(id);
        self.orchestrator.forget(id);
        if existed {
            info!(concept_id = id, "concept deleted");
        }
        Ok(existed)
    }

    // --- enhancement ------------------------------------------------------

    pub async fn enhance_idea(&self, id: &str) -> IncubatorResult<EnhanceResponse> {
        let result = self.orchestrator.enhance(id).await;
        self.collect_degradations();
        Ok(EnhanceResponse::from(&result?))
    }

    pub async fn enhance_idea_with_progress(
        &self,
        id: &str,
        progress: UnboundedSender<ProgressEvent>,
    ) -> IncubatorResult<EnhanceResponse> {
        let result = self.orchestrator.enhance_with_progress(id, progress).await;
        self.collect_degradations();
        Ok(EnhanceResponse::from(&result?))
    }

    pub fn enhancement_state(&self, id: &str) -> IncubatorResult<EnhancementState> {
        self.orchestrator.state(id)
    }

    pub fn last_enhancement_attempt(&self, id: &str) -> Option<EnhancementAttempt> {
        self.orchestrator.last_attempt(id)
    }

    // --- insights ---------------------------------------------------------

    pub async fn get_insights(&self, id: &str, force: bool) -> IncubatorResult<InsightsResponse> {
        let concept = self.get_concept(id)?;
        let result = self.insights.get(id, force).await;
        self.collect_degradations();
        Ok(InsightsResponse::new(&concept.title, result?))
    }

    pub async fn get_insights_with_progress(
        &self,
        id: &str,
        force: bool,
        progress: UnboundedSender<ProgressEvent>,
    ) -> IncubatorResult<InsightsResponse> {
        let concept = self.get_concept(id)?;
        let result = self.insights.get_with_progress(id, force, progress).await;
        self.collect_degradations();
        Ok(InsightsResponse::new(&concept.title, result?))
    }

    pub fn get_insights_history(&self, id: &str) -> IncubatorResult<InsightsHistoryResponse> {
        self.get_concept(id)?;
        let summaries = self.insights.history(id)?;
        Ok(InsightsHistoryResponse::from_summaries(&summaries))
    }

    /// Delete every insights version for a concept. Returns how many were
    /// removed.
    pub fn delete_insights(&self, id: &str) -> IncubatorResult<usize> {
        self.get_concept(id)?;
        self.insights.delete(id)
    }

    // --- titles -----------------------------------------------------------

    pub async fn optimize_title(&self, id: &str) -> IncubatorResult<TitleSuggestionsResponse> {
        let concept = self.get_concept(id)?;
        let result = self.client.optimize_title(&concept.snapshot()).await;
        self.collect_degradations();
        Ok(TitleSuggestionsResponse::new(&concept, result?))
    }

    // --- diagnostics ------------------------------------------------------

    /// Every prompt sent to the provider, oldest first.
    pub fn prompt_log(&self) -> Vec<PromptRecord> {
        self.client.prompt_log()
    }

    /// Recorded fallback substitutions, oldest first.
    pub fn degradation_events(&self) -> Vec<DegradationEvent> {
        self.collect_degradations();
        self.tracker().events().to_vec()
    }

    pub fn degradation_summary(&self) -> Vec<ComponentSummary> {
        self.collect_degradations();
        self.tracker().summary()
    }

    pub fn provider_name(&self) -> &str {
        self.client.backend_name()
    }

    pub fn stores(&self) -> &StoreHandles {
        &self.stores
    }

    fn collect_degradations(&self) {
        let events = self.client.drain_degradation_events();
        if !events.is_empty() {
            self.tracker().record_all(events);
        }
    }

    fn tracker(&self) -> MutexGuard<'_, DegradationTracker> {
        self.degradation
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
