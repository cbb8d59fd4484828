//! Test fixture loader and a scripted generation backend shared by the
//! workspace's tests.
//!
//! Fixture JSON lives under `test-fixtures/` at the workspace root.

use std::collections::{HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::de::DeserializeOwned;

use incubator_core::errors::ProviderError;
use incubator_core::models::{GenerationRequest, NewConcept, RequestKind};
use incubator_core::traits::IGenerationBackend;

/// Root directory of the fixture data.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // Walk up to the workspace root; the fixture crate itself is also
    // called test-fixtures, so look for a data subdirectory.
    while !path.join("test-fixtures").join("provider").exists() {
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
    path.join("test-fixtures")
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Canned provider responses, one per request kind.
pub fn provider_responses() -> HashMap<RequestKind, String> {
    load_fixture("provider/responses.json")
}

/// Sample concept inputs covering every keyword group and several stages.
pub fn sample_concepts() -> Vec<NewConcept> {
    load_fixture("concepts/sample_concepts.json")
}

/// The first sample concept.
pub fn sample_concept() -> NewConcept {
    sample_concepts().remove(0)
}

// ---------------------------------------------------------------------------
// Scripted backend
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Script {
    responses: HashMap<RequestKind, String>,
    queued_failures: HashMap<RequestKind, VecDeque<ProviderError>>,
    permanent_failures: HashMap<RequestKind, ProviderError>,
    calls: HashMap<RequestKind, usize>,
    delay: Duration,
}

/// A generation backend that answers from fixtures.
///
/// Clones share state, so a test can keep one handle for assertions while
/// the provider client owns another. Failures can be queued per request
/// kind (consumed one per call) or made permanent; a delay applies to every
/// call and works with tokio's paused clock.
#[derive(Clone)]
pub struct ScriptedBackend {
    script: Arc<Mutex<Script>>,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    /// Backend answering every kind with the fixture response.
    pub fn new() -> Self {
        Self::with_responses(provider_responses())
    }

    /// Backend with no responses at all; every call is `InvalidRequest`
    /// until one is scripted.
    pub fn empty() -> Self {
        Self::with_responses(HashMap::new())
    }

    pub fn with_responses(responses: HashMap<RequestKind, String>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                responses,
                ..Script::default()
            })),
        }
    }

    fn script(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().expect("scripted backend lock poisoned")
    }

    /// Replace the response for one kind.
    pub fn respond(&self, kind: RequestKind, text: impl Into<String>) -> &Self {
        self.script().responses.insert(kind, text.into());
        self
    }

    /// Fail the next `times` calls of `kind` with `error`.
    pub fn fail_next(&self, kind: RequestKind, error: ProviderError, times: usize) -> &Self {
        let mut script = self.script();
        let queue = script.queued_failures.entry(kind).or_default();
        queue.extend(std::iter::repeat(error).take(times));
        self
    }

    /// Fail every call of `kind` with `error`.
    pub fn fail_always(&self, kind: RequestKind, error: ProviderError) -> &Self {
        self.script().permanent_failures.insert(kind, error);
        self
    }

    /// Fail every call of every kind with `error`.
    pub fn fail_everything(&self, error: ProviderError) -> &Self {
        for kind in ALL_KINDS {
            self.fail_always(kind, error.clone());
        }
        self
    }

    /// Delay every call by `delay` before answering.
    pub fn set_delay(&self, delay: Duration) -> &Self {
        self.script().delay = delay;
        self
    }

    /// Calls made for `kind` so far.
    pub fn calls(&self, kind: RequestKind) -> usize {
        self.script().calls.get(&kind).copied().unwrap_or(0)
    }

    /// Calls made across all kinds.
    pub fn total_calls(&self) -> usize {
        self.script().calls.values().sum()
    }

    fn begin(&self, kind: RequestKind) -> Duration {
        let mut script = self.script();
        *script.calls.entry(kind).or_insert(0) += 1;
        script.delay
    }

    fn outcome(&self, kind: RequestKind) -> Result<String, ProviderError> {
        let mut script = self.script();
        if let Some(error) = script
            .queued_failures
            .get_mut(&kind)
            .and_then(VecDeque::pop_front)
        {
            return Err(error);
        }
        if let Some(error) = script.permanent_failures.get(&kind) {
            return Err(error.clone());
        }
        script
            .responses
            .get(&kind)
            .cloned()
            .ok_or_else(|| ProviderError::InvalidRequest {
                reason: format!("no scripted response for {kind}"),
            })
    }
}

const ALL_KINDS: [RequestKind; 6] = [
    RequestKind::Pitch,
    RequestKind::Feasibility,
    RequestKind::MarketInsights,
    RequestKind::RiskAssessment,
    RequestKind::ImplementationRoadmap,
    RequestKind::TitleOptimization,
];

impl IGenerationBackend for ScriptedBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, ProviderError> {
        let delay = self.begin(request.kind);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        self.outcome(request.kind)
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
