//! ProviderClient: the single entry point for content generation.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn, Instrument};

use incubator_core::config::ProviderConfig;
use incubator_core::content::{render_text, ContentBlock};
use incubator_core::errors::{ProviderError, ValidationError};
use incubator_core::models::{
    ConceptSnapshot, DegradationEvent, EnhancementDraft, GenerationRequest, InsightDraft,
    PromptRecord, RequestKind, TitleSuggestions,
};
use incubator_core::traits::IGenerationBackend;
use incubator_observability::provider_span;

use crate::normalize::{self, SubScores};
use crate::retry::RetryPolicy;
use crate::{fallback, prompts};

const FALLBACK_TEMPLATE: &str = "template";

/// Result of one logical call: the final outcome plus retries spent.
struct Attempted<T> {
    result: Result<T, ProviderError>,
    retries: u32,
}

/// Wraps a generation backend with a per-call timeout, retry with
/// exponential backoff for transient failures, normalization into content
/// blocks, and templated fallback.
///
/// Only snapshot validation errors reach the caller; everything else
/// resolves to provider content or fallback content.
pub struct ProviderClient<B> {
    backend: B,
    retry: RetryPolicy,
    timeout: Duration,
    min_insight_chars: usize,
    log_capacity: usize,
    prompt_log: Mutex<VecDeque<PromptRecord>>,
    degradations: Mutex<VecDeque<DegradationEvent>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    // The guarded vectors stay consistent even if a holder panicked.
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn push_bounded<T>(log: &mut VecDeque<T>, item: T, capacity: usize) {
    if log.len() == capacity {
        log.pop_front();
    }
    log.push_back(item);
}

impl<B: IGenerationBackend> ProviderClient<B> {
    pub fn new(backend: B, config: &ProviderConfig) -> Self {
        Self {
            backend,
            retry: RetryPolicy::from_config(config),
            timeout: config.timeout(),
            min_insight_chars: config.min_insight_chars,
            log_capacity: config.prompt_log_capacity.max(1),
            prompt_log: Mutex::new(VecDeque::new()),
            degradations: Mutex::new(VecDeque::new()),
        }
    }

    /// Override the retry schedule.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Refined pitch plus feasibility sub-scores.
    ///
    /// Two backend calls: the pitch first, then the scores with the refined
    /// pitch as context. Each falls back independently.
    pub async fn enhance(
        &self,
        snapshot: &ConceptSnapshot,
    ) -> Result<EnhancementDraft, ValidationError> {
        snapshot.validate()?;

        let pitch_call = self
            .call(
                prompts::build(RequestKind::Pitch, snapshot),
                normalize::parse_required,
            )
            .await;
        let mut retries = pitch_call.retries;
        let (pitch, pitch_ai) = match pitch_call.result {
            Ok(blocks) => (blocks, true),
            Err(e) => {
                self.degrade(RequestKind::Pitch, &e);
                (fallback::pitch(snapshot), false)
            }
        };

        let mut scored = snapshot.clone();
        scored.refined_pitch = Some(render_text(&pitch));
        let score_call = self
            .call(
                prompts::build(RequestKind::Feasibility, &scored),
                normalize::parse_scores,
            )
            .await;
        retries += score_call.retries;
        let (scores, scores_ai) = match score_call.result {
            Ok(scores) => (scores, true),
            Err(e) => {
                self.degrade(RequestKind::Feasibility, &e);
                (fallback::scores(snapshot), false)
            }
        };

        let SubScores {
            market_potential,
            technical_complexity,
            resource_requirements,
        } = scores;
        Ok(EnhancementDraft {
            pitch,
            market_potential,
            technical_complexity,
            resource_requirements,
            is_ai_generated: pitch_ai && scores_ai,
            retries,
        })
    }

    /// Market, risk and roadmap sections, requested concurrently.
    pub async fn generate_insights(
        &self,
        snapshot: &ConceptSnapshot,
    ) -> Result<InsightDraft, ValidationError> {
        snapshot.validate()?;

        let min_chars = self.min_insight_chars;
        let parse = move |text: &str| normalize::parse_section(text, min_chars);
        let (market, risk, roadmap) = tokio::join!(
            self.call(prompts::build(RequestKind::MarketInsights, snapshot), parse),
            self.call(prompts::build(RequestKind::RiskAssessment, snapshot), parse),
            self.call(
                prompts::build(RequestKind::ImplementationRoadmap, snapshot),
                parse
            ),
        );
        let retries = market.retries + risk.retries + roadmap.retries;

        let mut is_ai_generated = true;
        let mut resolve = |kind: RequestKind,
                           call: Attempted<Vec<ContentBlock>>,
                           template: fn(&ConceptSnapshot) -> Vec<ContentBlock>| {
            match call.result {
                Ok(blocks) => blocks,
                Err(e) => {
                    self.degrade(kind, &e);
                    is_ai_generated = false;
                    template(snapshot)
                }
            }
        };
        let market_insights =
            resolve(RequestKind::MarketInsights, market, fallback::market_insights);
        let risk_assessment =
            resolve(RequestKind::RiskAssessment, risk, fallback::risk_assessment);
        let implementation_roadmap = resolve(
            RequestKind::ImplementationRoadmap,
            roadmap,
            fallback::implementation_roadmap,
        );

        Ok(InsightDraft {
            market_insights,
            risk_assessment,
            implementation_roadmap,
            is_ai_generated,
            retries,
        })
    }

    /// Alternative title suggestions.
    pub async fn optimize_title(
        &self,
        snapshot: &ConceptSnapshot,
    ) -> Result<TitleSuggestions, ValidationError> {
        snapshot.validate()?;

        let call = self
            .call(
                prompts::build(RequestKind::TitleOptimization, snapshot),
                normalize::parse_required,
            )
            .await;
        Ok(match call.result {
            Ok(suggestions) => TitleSuggestions {
                suggestions,
                is_ai_generated: true,
            },
            Err(e) => {
                self.degrade(RequestKind::TitleOptimization, &e);
                TitleSuggestions {
                    suggestions: fallback::title_suggestions(snapshot),
                    is_ai_generated: false,
                }
            }
        })
    }

    /// The most recent prompts sent, oldest first. At most
    /// `prompt_log_capacity` records are kept.
    pub fn prompt_log(&self) -> Vec<PromptRecord> {
        lock(&self.prompt_log).iter().cloned().collect()
    }

    /// Take the degradation events recorded since the last drain. Undrained
    /// events are bounded like the prompt log.
    pub fn drain_degradation_events(&self) -> Vec<DegradationEvent> {
        lock(&self.degradations).drain(..).collect()
    }

    /// One logical call: timeout per attempt, parse, retry transient
    /// failures with backoff.
    async fn call<T, F>(&self, request: GenerationRequest, parse: F) -> Attempted<T>
    where
        F: Fn(&str) -> Result<T, ProviderError>,
    {
        self.record_prompt(&request);
        let span = provider_span!(self.backend.name(), request.kind, request.concept_id);
        async {
            let mut retries = 0;
            loop {
                let attempt = tokio::time::timeout(self.timeout, self.backend.generate(&request));
                let result = match attempt.await {
                    Ok(Ok(text)) => parse(&text),
                    Ok(Err(e)) => Err(e),
                    Err(_) => Err(ProviderError::Timeout {
                        timeout_ms: self.timeout.as_millis() as u64,
                    }),
                };
                match result {
                    Ok(value) => return Attempted { result: Ok(value), retries },
                    Err(e) if e.is_transient() && retries < self.retry.max_retries => {
                        let delay = self.retry.delay_for(retries);
                        debug!(
                            error = %e,
                            retry = retries + 1,
                            delay_ms = delay.as_millis() as u64,
                            "retrying provider call"
                        );
                        tokio::time::sleep(delay).await;
                        retries += 1;
                    }
                    Err(e) => return Attempted { result: Err(e), retries },
                }
            }
        }
        .instrument(span)
        .await
    }

    fn record_prompt(&self, request: &GenerationRequest) {
        let record = PromptRecord {
            kind: request.kind,
            concept_id: request.concept_id.clone(),
            prompt_hash: blake3::hash(request.prompt.as_bytes()).to_hex().to_string(),
            sent_at: Utc::now(),
        };
        push_bounded(&mut lock(&self.prompt_log), record, self.log_capacity);
    }

    fn degrade(&self, kind: RequestKind, error: &ProviderError) {
        let event = DegradationEvent {
            component: format!("provider.{kind}"),
            failure: error.to_string(),
            fallback_used: FALLBACK_TEMPLATE.to_string(),
            timestamp: Utc::now(),
        };
        warn!(kind = %kind, error = %error, "provider call failed, serving fallback content");
        push_bounded(&mut lock(&self.degradations), event, self.log_capacity);
    }
}
