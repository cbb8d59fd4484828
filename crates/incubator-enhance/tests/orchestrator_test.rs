//! EnhancementOrchestrator: single store write, fallback, in-flight policy,
//! caller cancellation, progress events.

use std::sync::Arc;
use std::time::Duration;

use incubator_core::config::{ConcurrentPolicy, EnhancementConfig, ProviderConfig};
use incubator_core::errors::{IncubatorError, IncubatorResult, ProviderError, StorageError};
use incubator_core::models::{
    AttemptState, Concept, ConceptUpdate, EnhancementState, ProgressEvent, RequestKind, Stage,
};
use incubator_core::traits::IConceptStore;
use incubator_enhance::EnhancementOrchestrator;
use incubator_provider::ProviderClient;
use incubator_storage::MemoryStore;
use test_fixtures::ScriptedBackend;

const ID: &str = "c-1";

struct Harness {
    backend: ScriptedBackend,
    store: Arc<MemoryStore>,
    orchestrator: EnhancementOrchestrator<ScriptedBackend>,
}

fn harness(policy: ConcurrentPolicy) -> Harness {
    let backend = ScriptedBackend::new();
    let store = Arc::new(MemoryStore::new());
    store
        .create(&Concept::new(ID, test_fixtures::sample_concept()).unwrap())
        .unwrap();
    let client = Arc::new(ProviderClient::new(backend.clone(), &ProviderConfig::default()));
    let orchestrator = EnhancementOrchestrator::new(
        client,
        store.clone(),
        &EnhancementConfig {
            concurrent_policy: policy,
        },
    );
    Harness {
        backend,
        store,
        orchestrator,
    }
}

async fn wait_until_enhancing(orchestrator: &EnhancementOrchestrator<ScriptedBackend>) {
    while !orchestrator.is_enhancing(ID) {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn enhancement_writes_pitch_and_scores_once() {
    let h = harness(ConcurrentPolicy::Attach);
    assert_eq!(h.orchestrator.state(ID).unwrap(), EnhancementState::NotEnhanced);

    let enhanced = h.orchestrator.enhance(ID).await.unwrap();

    assert!(enhanced.is_ai_generated);
    assert!((enhanced.feasibility_score() - 7.0).abs() < 1e-9);
    let stored = h.store.get(ID).unwrap().unwrap();
    assert_eq!(stored, enhanced.concept);
    assert!(stored.ai_validated);
    assert!(stored.is_ai_generated);
    assert!(stored
        .refined_pitch
        .as_deref()
        .is_some_and(|p| p.starts_with("Executive Summary")));
    assert_eq!(stored.market_potential, 8.0);
    assert_eq!(
        h.orchestrator.state(ID).unwrap(),
        EnhancementState::Enhanced { fallback: false }
    );
    assert_eq!(
        h.orchestrator.last_attempt(ID).unwrap().state,
        AttemptState::Succeeded
    );
}

#[tokio::test(start_paused = true)]
async fn provider_outage_still_validates_with_fallback_content() {
    let h = harness(ConcurrentPolicy::Attach);
    h.backend.fail_everything(ProviderError::Unavailable {
        provider: "scripted".to_string(),
    });

    let enhanced = h.orchestrator.enhance(ID).await.unwrap();

    assert!(!enhanced.is_ai_generated);
    let stored = enhanced.concept;
    assert!(stored.ai_validated);
    assert!(!stored.is_ai_generated);
    assert!(stored.refined_pitch.as_deref().is_some_and(|p| !p.is_empty()));
    for score in [
        stored.market_potential,
        stored.technical_complexity,
        stored.resource_requirements,
        stored.feasibility_score(),
    ] {
        assert!((0.0..=10.0).contains(&score));
    }
    assert_eq!(
        h.orchestrator.state(ID).unwrap(),
        EnhancementState::Enhanced { fallback: true }
    );
    assert_eq!(
        h.orchestrator.last_attempt(ID).unwrap().state,
        AttemptState::FellBack
    );
}

#[tokio::test(start_paused = true)]
async fn missing_concept_is_not_found_without_provider_calls() {
    let h = harness(ConcurrentPolicy::Attach);

    let err = h.orchestrator.enhance("nope").await.unwrap_err();

    assert!(matches!(err, IncubatorError::ConceptNotFound { .. }));
    assert_eq!(h.backend.total_calls(), 0);
    assert!(h.orchestrator.last_attempt("nope").is_none());
    assert!(!h.orchestrator.is_enhancing("nope"));
}

#[tokio::test(start_paused = true)]
async fn invalid_snapshot_leaves_concept_untouched() {
    let h = harness(ConcurrentPolicy::Attach);
    let mut broken = Concept::new("c-2", test_fixtures::sample_concept()).unwrap();
    broken.description = "  ".to_string();
    h.store.create(&broken).unwrap();

    let err = h.orchestrator.enhance("c-2").await.unwrap_err();

    assert!(matches!(err, IncubatorError::Validation(_)));
    assert_eq!(h.store.get("c-2").unwrap().unwrap(), broken);
    assert_eq!(h.backend.total_calls(), 0);
    assert!(matches!(
        h.orchestrator.last_attempt("c-2").unwrap().state,
        AttemptState::Failed { .. }
    ));
}

#[tokio::test(start_paused = true)]
async fn concurrent_callers_attach_to_one_attempt() {
    let h = harness(ConcurrentPolicy::Attach);
    h.backend.set_delay(Duration::from_secs(5));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let orchestrator = h.orchestrator.clone();
            tokio::spawn(async move { orchestrator.enhance(ID).await })
        })
        .collect();
    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap().unwrap());
    }

    assert_eq!(h.backend.calls(RequestKind::Pitch), 1);
    assert_eq!(h.backend.calls(RequestKind::Feasibility), 1);
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    assert!(!h.orchestrator.is_enhancing(ID));
}

#[tokio::test(start_paused = true)]
async fn reject_policy_refuses_a_second_caller() {
    let h = harness(ConcurrentPolicy::Reject);
    h.backend.set_delay(Duration::from_secs(5));

    let first = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.enhance(ID).await })
    };
    wait_until_enhancing(&h.orchestrator).await;
    assert_eq!(h.orchestrator.state(ID).unwrap(), EnhancementState::Enhancing);

    let err = h.orchestrator.enhance(ID).await.unwrap_err();
    assert!(matches!(
        err,
        IncubatorError::ConcurrentEnhancementInProgress { .. }
    ));

    assert!(first.await.unwrap().is_ok());
    assert_eq!(h.backend.calls(RequestKind::Pitch), 1);
}

#[tokio::test(start_paused = true)]
async fn other_concepts_are_not_blocked() {
    let h = harness(ConcurrentPolicy::Reject);
    h.store
        .create(&Concept::new("c-2", test_fixtures::sample_concepts().remove(1)).unwrap())
        .unwrap();
    h.backend.set_delay(Duration::from_secs(5));

    let first = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.enhance(ID).await })
    };
    wait_until_enhancing(&h.orchestrator).await;

    assert!(h.orchestrator.enhance("c-2").await.is_ok());
    assert!(first.await.unwrap().is_ok());
}

#[tokio::test(start_paused = true)]
async fn cancelled_caller_does_not_abort_the_enhancement() {
    let h = harness(ConcurrentPolicy::Attach);
    h.backend.set_delay(Duration::from_secs(5));

    let caller = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.enhance(ID).await })
    };
    wait_until_enhancing(&h.orchestrator).await;
    caller.abort();
    assert!(caller.await.unwrap_err().is_cancelled());

    tokio::time::sleep(Duration::from_secs(30)).await;

    assert!(!h.orchestrator.is_enhancing(ID));
    assert!(h.store.get(ID).unwrap().unwrap().ai_validated);
}

#[tokio::test(start_paused = true)]
async fn re_enhancement_overwrites_previous_results() {
    let h = harness(ConcurrentPolicy::Attach);
    h.orchestrator.enhance(ID).await.unwrap();

    h.backend.respond(
        RequestKind::Feasibility,
        r#"{"market_potential": 2, "technical_complexity": 9, "resource_requirements": 9}"#,
    );
    h.backend.respond(RequestKind::Pitch, "A much shorter pitch.");
    let second = h.orchestrator.enhance(ID).await.unwrap();

    assert_eq!(
        second.concept.refined_pitch.as_deref(),
        Some("A much shorter pitch.")
    );
    assert_eq!(second.concept.market_potential, 2.0);
    assert!((second.feasibility_score() - 4.0 / 3.0).abs() < 1e-9);
}

#[tokio::test(start_paused = true)]
async fn progress_events_follow_the_attempt() {
    let h = harness(ConcurrentPolicy::Attach);
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

    h.orchestrator.enhance_with_progress(ID, tx).await.unwrap();

    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    let id = ID.to_string();
    assert_eq!(
        events,
        vec![
            ProgressEvent::Started { concept_id: id.clone() },
            ProgressEvent::Generating { concept_id: id.clone() },
            ProgressEvent::Persisting { concept_id: id.clone() },
            ProgressEvent::Completed {
                concept_id: id,
                is_ai_generated: true,
            },
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn attached_caller_sees_attached_then_completed() {
    let h = harness(ConcurrentPolicy::Attach);
    h.backend.set_delay(Duration::from_secs(5));

    let leader = {
        let orchestrator = h.orchestrator.clone();
        tokio::spawn(async move { orchestrator.enhance(ID).await })
    };
    wait_until_enhancing(&h.orchestrator).await;
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
    h.orchestrator.enhance_with_progress(ID, tx).await.unwrap();
    leader.await.unwrap().unwrap();

    assert!(matches!(rx.try_recv(), Ok(ProgressEvent::Attached { .. })));
    assert!(matches!(
        rx.try_recv(),
        Ok(ProgressEvent::Completed { .. })
    ));
    assert!(rx.try_recv().is_err());
}

/// Concept store whose updates always fail.
struct FailingUpdates(MemoryStore);

impl IConceptStore for FailingUpdates {
    fn create(&self, concept: &Concept) -> IncubatorResult<()> {
        self.0.create(concept)
    }

    fn get(&self, id: &str) -> IncubatorResult<Option<Concept>> {
        self.0.get(id)
    }

    fn update(&self, _id: &str, _update: &ConceptUpdate) -> IncubatorResult<Concept> {
        Err(StorageError::SqliteError {
            message: "disk I/O error".to_string(),
        }
        .into())
    }

    fn delete(&self, id: &str) -> IncubatorResult<bool> {
        self.0.delete(id)
    }
}

#[tokio::test(start_paused = true)]
async fn store_failure_surfaces_and_leaves_concept_untouched() {
    let store = Arc::new(FailingUpdates(MemoryStore::new()));
    let concept = Concept::new(ID, test_fixtures::sample_concept()).unwrap();
    store.create(&concept).unwrap();
    let client = Arc::new(ProviderClient::new(
        ScriptedBackend::new(),
        &ProviderConfig::default(),
    ));
    let orchestrator =
        EnhancementOrchestrator::new(client, store.clone(), &EnhancementConfig::default());

    let err = orchestrator.enhance(ID).await.unwrap_err();

    assert!(matches!(err, IncubatorError::Storage(_)));
    assert_eq!(store.get(ID).unwrap().unwrap(), concept);
    assert_eq!(orchestrator.state(ID).unwrap(), EnhancementState::NotEnhanced);
}

#[tokio::test(start_paused = true)]
async fn stage_survives_enhancement() {
    let h = harness(ConcurrentPolicy::Attach);
    let enhanced = h.orchestrator.enhance(ID).await.unwrap();
    assert_eq!(enhanced.concept.stage, Stage::Research);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn sequential_re_enhancements_each_run_a_new_attempt() {
    let h = harness(ConcurrentPolicy::Attach);

    for expected in 1..=300usize {
        h.orchestrator.enhance(ID).await.unwrap();
        assert_eq!(h.backend.calls(RequestKind::Pitch), expected);
    }
    assert!(!h.orchestrator.is_enhancing(ID));
}
