use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// One measurement for one completed epoch.
///
/// Samples are never mutated after construction; the run state hands out
/// clones, not references into its own storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricSample {
    /// 1-based epoch index, strictly increasing within a run.
    pub epoch: u32,
    /// Quality score in `[0, 0.95]`, rounded to 4 places.
    pub accuracy: f64,
    /// Cost score, never below `0.1`, rounded to 4 places.
    pub loss: f64,
    pub learning_rate: f64,
    pub cpu_usage_percent: f64,
    pub memory_usage_percent: f64,
    /// Exactly `0.0` when the epoch ran without an accelerator.
    pub gpu_usage_percent: f64,
    pub timestamp: Timestamp,
    pub batch_size: u32,
    pub model_name: String,
}

/// Round `value` to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
