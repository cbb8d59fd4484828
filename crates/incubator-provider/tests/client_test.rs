//! ProviderClient behavior against the scripted backend: retry, timeout,
//! normalization failures, fallback, and the prompt log.
//!
//! Runs on a paused clock so backoff and timeouts resolve instantly.

use std::time::Duration;

use incubator_core::config::ProviderConfig;
use incubator_core::content::{render_text, ContentBlock};
use incubator_core::errors::{ProviderError, ValidationError};
use incubator_core::models::{Concept, ConceptSnapshot, RequestKind, Stage};
use incubator_provider::{create_backend, fallback, ProviderClient};
use test_fixtures::ScriptedBackend;

fn snapshot() -> ConceptSnapshot {
    Concept::new("c-1", test_fixtures::sample_concept())
        .unwrap()
        .snapshot()
}

fn client(backend: &ScriptedBackend) -> ProviderClient<ScriptedBackend> {
    ProviderClient::new(backend.clone(), &ProviderConfig::default())
}

fn transient() -> ProviderError {
    ProviderError::Transient {
        reason: "HTTP 503".to_string(),
    }
}

#[tokio::test(start_paused = true)]
async fn enhance_uses_provider_content_when_healthy() {
    let backend = ScriptedBackend::new();
    let client = client(&backend);

    let draft = client.enhance(&snapshot()).await.unwrap();

    assert!(draft.is_ai_generated);
    assert_eq!(draft.retries, 0);
    assert_eq!(draft.pitch[0], ContentBlock::header("Executive Summary"));
    assert!(draft.pitch.contains(&ContentBlock::numbered([
        "Sign three pilot buildings",
        "Recruit the first 200 subscribers",
        "Measure yield and churn over one season",
    ])));
    assert_eq!(draft.market_potential, 8.0);
    assert_eq!(draft.technical_complexity, 3.0);
    assert_eq!(draft.resource_requirements, 4.0);
    assert_eq!(backend.calls(RequestKind::Pitch), 1);
    assert_eq!(backend.calls(RequestKind::Feasibility), 1);
    assert!(client.drain_degradation_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn transient_failures_are_retried_then_succeed() {
    let backend = ScriptedBackend::new();
    backend.fail_next(RequestKind::Pitch, transient(), 2);
    let client = client(&backend);

    let draft = client.enhance(&snapshot()).await.unwrap();

    assert!(draft.is_ai_generated);
    assert_eq!(draft.retries, 2);
    assert_eq!(backend.calls(RequestKind::Pitch), 3);
}

#[tokio::test(start_paused = true)]
async fn backoff_follows_the_configured_schedule() {
    let backend = ScriptedBackend::new();
    backend.fail_next(RequestKind::TitleOptimization, transient(), 2);
    let client = client(&backend);

    let started = tokio::time::Instant::now();
    client.optimize_title(&snapshot()).await.unwrap();

    // 1s before the first retry, 3s before the second.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(4) && elapsed < Duration::from_secs(5));
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_fall_back_for_that_call_only() {
    let backend = ScriptedBackend::new();
    backend.fail_always(RequestKind::Pitch, transient());
    let client = client(&backend);
    let snap = snapshot();

    let draft = client.enhance(&snap).await.unwrap();

    assert!(!draft.is_ai_generated);
    assert_eq!(draft.pitch, fallback::pitch(&snap));
    assert_eq!(draft.retries, 2);
    assert_eq!(backend.calls(RequestKind::Pitch), 3);
    // Scoring still came from the provider.
    assert_eq!(draft.market_potential, 8.0);

    let events = client.drain_degradation_events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].component, "provider.pitch");
    assert_eq!(events[0].fallback_used, "template");
    assert!(client.drain_degradation_events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn non_transient_failures_skip_retry() {
    let backend = ScriptedBackend::new();
    backend.fail_always(
        RequestKind::Feasibility,
        ProviderError::InvalidRequest {
            reason: "HTTP 400: bad prompt".to_string(),
        },
    );
    let client = client(&backend);
    let snap = snapshot();

    let draft = client.enhance(&snap).await.unwrap();

    assert_eq!(backend.calls(RequestKind::Feasibility), 1);
    assert!(!draft.is_ai_generated);
    let expected = fallback::scores(&snap);
    assert_eq!(draft.market_potential, expected.market_potential);
    assert_eq!(draft.technical_complexity, expected.technical_complexity);
    assert_eq!(draft.resource_requirements, expected.resource_requirements);
}

#[tokio::test(start_paused = true)]
async fn slow_backend_times_out_and_falls_back() {
    let backend = ScriptedBackend::new();
    backend.set_delay(Duration::from_secs(120));
    let client = client(&backend);

    let draft = client.enhance(&snapshot()).await.unwrap();

    assert!(!draft.is_ai_generated);
    assert_eq!(backend.calls(RequestKind::Pitch), 3);
    assert_eq!(backend.calls(RequestKind::Feasibility), 3);
    let events = client.drain_degradation_events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.failure.contains("timed out")));
}

#[tokio::test(start_paused = true)]
async fn malformed_scores_are_retried_like_transient_failures() {
    let backend = ScriptedBackend::new();
    backend.respond(RequestKind::Feasibility, "Scores: pretty good overall");
    let client = client(&backend);

    let draft = client.enhance(&snapshot()).await.unwrap();

    assert_eq!(backend.calls(RequestKind::Feasibility), 3);
    assert!(!draft.is_ai_generated);
    assert!((0.0..=10.0).contains(&draft.market_potential));
}

#[tokio::test(start_paused = true)]
async fn feasibility_prompt_carries_the_refined_pitch() {
    let backend = ScriptedBackend::new();
    let client = client(&backend);
    let snap = snapshot();

    client.enhance(&snap).await.unwrap();

    let log = client.prompt_log();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].kind, RequestKind::Pitch);
    assert_eq!(log[1].kind, RequestKind::Feasibility);
    assert!(log.iter().all(|r| r.concept_id == "c-1"));
    assert!(log.iter().all(|r| r.prompt_hash.len() == 64));

    let draft = client.enhance(&snap).await.unwrap();
    let mut scored = snap.clone();
    scored.refined_pitch = Some(render_text(&draft.pitch));
    let expected = incubator_provider::prompts::build(RequestKind::Feasibility, &scored);
    let log = client.prompt_log();
    assert_eq!(
        log[3].prompt_hash,
        blake3::hash(expected.prompt.as_bytes()).to_hex().to_string()
    );
}

#[tokio::test(start_paused = true)]
async fn invalid_snapshot_is_rejected_before_any_call() {
    let backend = ScriptedBackend::new();
    let client = client(&backend);
    let mut snap = snapshot();
    snap.title = "   ".to_string();

    let err = client.enhance(&snap).await.unwrap_err();

    assert!(matches!(err, ValidationError::Empty { .. }));
    assert_eq!(backend.total_calls(), 0);
    assert!(client.prompt_log().is_empty());
}

#[tokio::test(start_paused = true)]
async fn insights_sections_fall_back_independently() {
    let backend = ScriptedBackend::new();
    backend.respond(RequestKind::RiskAssessment, "Too short.");
    let client = client(&backend);
    let snap = snapshot();

    let draft = client.generate_insights(&snap).await.unwrap();

    assert!(!draft.is_ai_generated);
    assert_eq!(draft.risk_assessment, fallback::risk_assessment(&snap));
    assert_eq!(
        draft.market_insights[0],
        ContentBlock::header("Market Opportunity")
    );
    assert_eq!(
        draft.implementation_roadmap[0],
        ContentBlock::header("Phase 1: Foundation (Months 1-3)")
    );
    assert_eq!(backend.calls(RequestKind::MarketInsights), 1);
    assert_eq!(backend.calls(RequestKind::RiskAssessment), 3);
    assert_eq!(backend.calls(RequestKind::ImplementationRoadmap), 1);
    assert_eq!(draft.retries, 2);
}

#[tokio::test(start_paused = true)]
async fn insights_sections_are_requested_concurrently() {
    let backend = ScriptedBackend::new();
    backend.set_delay(Duration::from_secs(10));
    let client = client(&backend);

    let started = tokio::time::Instant::now();
    let draft = client.generate_insights(&snapshot()).await.unwrap();

    assert!(draft.is_ai_generated);
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(10) && elapsed < Duration::from_secs(20));
}

#[tokio::test(start_paused = true)]
async fn title_suggestions_from_provider_and_fallback() {
    let backend = ScriptedBackend::new();
    let client = client(&backend);
    let snap = snapshot();

    let ok = client.optimize_title(&snap).await.unwrap();
    assert!(ok.is_ai_generated);
    assert!(ok
        .suggestions
        .contains(&ContentBlock::header("Recommendation")));

    backend.fail_always(
        RequestKind::TitleOptimization,
        ProviderError::Unavailable {
            provider: "scripted".to_string(),
        },
    );
    let fallback = client.optimize_title(&snap).await.unwrap();
    assert!(!fallback.is_ai_generated);
    assert_eq!(fallback.suggestions, fallback::title_suggestions(&snap));
}

#[tokio::test(start_paused = true)]
async fn missing_api_key_degrades_everything_to_fallback() {
    let backend = create_backend(&ProviderConfig::default()).unwrap();
    let client = ProviderClient::new(backend, &ProviderConfig::default());
    assert_eq!(client.backend_name(), "offline");
    let snap = ConceptSnapshot {
        id: "c-2".to_string(),
        title: "Crop AI".to_string(),
        description: "Predict yields for smallholder farms".to_string(),
        stage: Stage::Concept,
        refined_pitch: None,
    };

    let draft = client.enhance(&snap).await.unwrap();
    let insights = client.generate_insights(&snap).await.unwrap();

    assert!(!draft.is_ai_generated);
    assert!(!insights.is_ai_generated);
    assert_eq!(draft.market_potential, 7.0);
    assert_eq!(draft.technical_complexity, 7.5);
    assert_eq!(draft.resource_requirements, 8.0);
    assert_eq!(client.drain_degradation_events().len(), 5);
}

#[tokio::test(start_paused = true)]
async fn prompt_log_keeps_only_the_most_recent_records() {
    let backend = ScriptedBackend::new();
    let config = ProviderConfig {
        prompt_log_capacity: 2,
        ..ProviderConfig::default()
    };
    let client = ProviderClient::new(backend.clone(), &config);

    for id in ["c-1", "c-2", "c-3"] {
        let snapshot = Concept::new(id, test_fixtures::sample_concept())
            .unwrap()
            .snapshot();
        client.optimize_title(&snapshot).await.unwrap();
    }

    let ids: Vec<String> = client
        .prompt_log()
        .into_iter()
        .map(|r| r.concept_id)
        .collect();
    assert_eq!(ids, vec!["c-2", "c-3"]);
    assert_eq!(backend.calls(RequestKind::TitleOptimization), 3);
}

#[tokio::test(start_paused = true)]
async fn undrained_degradation_events_are_bounded() {
    let backend = ScriptedBackend::new();
    backend.fail_everything(ProviderError::InvalidRequest {
        reason: "bad".to_string(),
    });
    let config = ProviderConfig {
        prompt_log_capacity: 3,
        ..ProviderConfig::default()
    };
    let client = ProviderClient::new(backend.clone(), &config);

    for _ in 0..5 {
        client.optimize_title(&snapshot()).await.unwrap();
    }

    assert_eq!(client.drain_degradation_events().len(), 3);
    assert!(client.drain_degradation_events().is_empty());
}
