//! Local gauge state, keyed by run labels.
//!
//! Values are staged per attempt and committed only once the gateway has
//! accepted them, so the committed state always reflects the last
//! successful push. A failed attempt leaves it stale, never half-written.

use std::collections::HashMap;

use tokio::sync::Mutex;
use trainwatch_core::sample::MetricSample;
use trainwatch_core::types::RunLabels;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GaugeSet {
    pub accuracy: f64,
    pub loss: f64,
    pub learning_rate: f64,
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    pub gpu_usage_percent: f64,
    /// Epochs delivered so far, counting the one being pushed.
    pub epochs_total: u64,
}

impl GaugeSet {
    /// Gauges for `sample`, with the epoch counter advanced by one.
    pub fn advanced_with(&self, sample: &MetricSample) -> Self {
        Self {
            accuracy: sample.accuracy,
            loss: sample.loss,
            learning_rate: sample.learning_rate,
            cpu_usage_percent: sample.cpu_usage_percent,
            memory_usage_percent: sample.memory_usage_percent,
            gpu_usage_percent: sample.gpu_usage_percent,
            epochs_total: self.epochs_total + 1,
        }
    }
}

#[derive(Default)]
pub struct GaugeRegistry {
    committed: Mutex<HashMap<RunLabels, GaugeSet>>,
}

impl GaugeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Candidate gauges for pushing `sample`, built on the committed state.
    pub async fn stage(&self, labels: &RunLabels, sample: &MetricSample) -> GaugeSet {
        let committed = self.committed.lock().await;
        committed
            .get(labels)
            .cloned()
            .unwrap_or_default()
            .advanced_with(sample)
    }

    pub async fn commit(&self, labels: &RunLabels, gauges: GaugeSet) {
        self.committed.lock().await.insert(labels.clone(), gauges);
    }

    /// Gauges from the last successful push for `labels`, if any.
    pub async fn get(&self, labels: &RunLabels) -> Option<GaugeSet> {
        self.committed.lock().await.get(labels).cloned()
    }
}
