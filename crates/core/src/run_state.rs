//! State of one run, shared between the trainer loop and the status
//! endpoint.
//!
//! The trainer is the only writer. Readers take the lock just long enough
//! to read the sample count, so a health probe can never stall an append
//! for longer than a `Vec::len` call.

use std::time::{Duration, Instant};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::CoreError;
use crate::sample::MetricSample;
use crate::types::{RunLabels, Timestamp};

pub struct RunState {
    labels: RunLabels,
    total_epochs: u32,
    /// Append-only; insertion order is completion order.
    samples: RwLock<Vec<MetricSample>>,
    started_at: Timestamp,
    started: Instant,
}

impl RunState {
    pub fn new(labels: RunLabels, total_epochs: u32) -> Self {
        Self {
            labels,
            total_epochs,
            samples: RwLock::new(Vec::with_capacity(total_epochs as usize)),
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    pub fn labels(&self) -> &RunLabels {
        &self.labels
    }

    pub fn model_name(&self) -> &str {
        &self.labels.model_name
    }

    pub fn total_epochs(&self) -> u32 {
        self.total_epochs
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Append a fully constructed sample.
    ///
    /// Rejects samples beyond the configured epoch count and samples whose
    /// epoch does not advance past the last recorded one. Returns the new
    /// number of completed epochs.
    pub async fn record(&self, sample: MetricSample) -> Result<usize, CoreError> {
        let mut samples = self.samples.write().await;

        if samples.len() >= self.total_epochs as usize {
            return Err(CoreError::Capacity {
                completed: samples.len(),
                total: self.total_epochs,
            });
        }

        if let Some(last) = samples.last() {
            if sample.epoch <= last.epoch {
                return Err(CoreError::Internal(format!(
                    "epoch {} recorded after epoch {}",
                    sample.epoch, last.epoch
                )));
            }
        }

        samples.push(sample);
        Ok(samples.len())
    }

    /// Number of epochs recorded so far. Never decreases.
    pub async fn epochs_completed(&self) -> usize {
        self.samples.read().await.len()
    }

    /// Copy of every recorded sample, in completion order.
    pub async fn snapshot(&self) -> Vec<MetricSample> {
        self.samples.read().await.clone()
    }
}
