//! Record every degradation event: component, failure mode, fallback used, timestamp.

use std::collections::BTreeMap;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use incubator_core::models::DegradationEvent;

/// Per-component roll-up of recorded degradations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentSummary {
    pub component: String,
    pub count: usize,
    pub last_failure: String,
}

/// Bounded history of degradation events. Oldest events are dropped once
/// `capacity` is reached.
#[derive(Debug, Clone)]
pub struct DegradationTracker {
    events: Vec<DegradationEvent>,
    capacity: usize,
}

impl Default for DegradationTracker {
    fn default() -> Self {
        Self::with_capacity(1_000)
    }
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if self.events.len() == self.capacity {
            self.events.remove(0);
        }
        self.events.push(event);
    }

    pub fn record_all(&mut self, events: impl IntoIterator<Item = DegradationEvent>) {
        for event in events {
            self.record(event);
        }
    }

    pub fn events(&self) -> &[DegradationEvent] {
        &self.events
    }

    /// Count events in the last N seconds for a given component.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|e| e.component == component && e.timestamp > cutoff)
            .count()
    }

    pub fn summary(&self) -> Vec<ComponentSummary> {
        let mut by_component: BTreeMap<&str, ComponentSummary> = BTreeMap::new();
        for event in &self.events {
            let entry = by_component
                .entry(event.component.as_str())
                .or_insert_with(|| ComponentSummary {
                    component: event.component.clone(),
                    count: 0,
                    last_failure: String::new(),
                });
            entry.count += 1;
            entry.last_failure = event.failure.clone();
        }
        by_component.into_values().collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
