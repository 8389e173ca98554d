//! Retrying push client.
//!
//! Each call to [`PushClient::push`] makes up to [`MAX_ATTEMPTS`] attempts,
//! sleeping 1s then 2s between them. Whatever happens, the call returns
//! normally; the outcome is visible only in logs and counters.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures::FutureExt;

use trainwatch_core::clock::Sleeper;
use trainwatch_core::sample::MetricSample;
use trainwatch_core::types::RunLabels;

use crate::config::{backoff_delay, PushConfig, MAX_ATTEMPTS};
use crate::error::{FailureKind, PushError};
use crate::exposition;
use crate::registry::{GaugeRegistry, GaugeSet};
use crate::transport::{job_name, GatewayTransport};

/// Result of one physical push attempt.
#[derive(Debug)]
pub enum PushOutcome {
    Delivered { attempt: u32 },
    Failed { attempt: u32, error: PushError },
}

pub struct PushClient {
    config: PushConfig,
    transport: Arc<dyn GatewayTransport>,
    sleeper: Arc<dyn Sleeper>,
    registry: GaugeRegistry,
    attempts_total: AtomicU64,
    failed_attempts: AtomicU64,
    delivered_total: AtomicU64,
    dropped_total: AtomicU64,
}

impl PushClient {
    pub fn new(
        config: PushConfig,
        transport: Arc<dyn GatewayTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        Self {
            config,
            transport,
            sleeper,
            registry: GaugeRegistry::new(),
            attempts_total: AtomicU64::new(0),
            failed_attempts: AtomicU64::new(0),
            delivered_total: AtomicU64::new(0),
            dropped_total: AtomicU64::new(0),
        }
    }

    /// Deliver `sample`'s gauges for `labels`, best effort.
    pub async fn push(&self, labels: &RunLabels, sample: &MetricSample) {
        for attempt in 1..=MAX_ATTEMPTS {
            match self.attempt(attempt, labels, sample).await {
                PushOutcome::Delivered { attempt } => {
                    self.delivered_total.fetch_add(1, Ordering::Relaxed);
                    tracing::debug!(
                        model_name = %labels.model_name,
                        epoch = sample.epoch,
                        attempt,
                        "Metrics pushed to gateway",
                    );
                    return;
                }
                PushOutcome::Failed { attempt, error } => {
                    self.failed_attempts.fetch_add(1, Ordering::Relaxed);
                    log_failure(labels, sample.epoch, attempt, &error);

                    if attempt < MAX_ATTEMPTS {
                        let delay = backoff_delay(attempt);
                        tracing::debug!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            "Retrying metrics push after backoff",
                        );
                        self.sleeper.sleep(delay).await;
                    }
                }
            }
        }

        self.dropped_total.fetch_add(1, Ordering::Relaxed);
        tracing::error!(
            model_name = %labels.model_name,
            epoch = sample.epoch,
            attempts = MAX_ATTEMPTS,
            "Giving up on metrics push, sample not delivered",
        );
    }

    async fn attempt(&self, attempt: u32, labels: &RunLabels, sample: &MetricSample) -> PushOutcome {
        self.attempts_total.fetch_add(1, Ordering::Relaxed);

        let staged = self.registry.stage(labels, sample).await;
        let sent = AssertUnwindSafe(self.send(labels, &staged))
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| Err(PushError::Unexpected(panic_message(payload.as_ref()))));

        match sent {
            Ok(()) => {
                self.registry.commit(labels, staged).await;
                PushOutcome::Delivered { attempt }
            }
            Err(error) => PushOutcome::Failed { attempt, error },
        }
    }

    async fn send(&self, labels: &RunLabels, gauges: &GaugeSet) -> Result<(), PushError> {
        let body = exposition::render(labels, gauges)?;
        let job = job_name(&labels.model_name);
        let timeout = self.config.timeout();

        match tokio::time::timeout(timeout, self.transport.send(&job, body)).await {
            Ok(result) => result,
            Err(_) => Err(PushError::Timeout(timeout)),
        }
    }

    pub fn config(&self) -> &PushConfig {
        &self.config
    }

    /// Gauges from the last successful push for `labels`.
    pub async fn gauges(&self, labels: &RunLabels) -> Option<GaugeSet> {
        self.registry.get(labels).await
    }

    pub fn attempts_total(&self) -> u64 {
        self.attempts_total.load(Ordering::Relaxed)
    }

    /// Failed attempts, counted individually even when a later retry succeeds.
    pub fn failed_attempts(&self) -> u64 {
        self.failed_attempts.load(Ordering::Relaxed)
    }

    pub fn delivered_total(&self) -> u64 {
        self.delivered_total.load(Ordering::Relaxed)
    }

    /// Pushes abandoned after exhausting every attempt.
    pub fn dropped_total(&self) -> u64 {
        self.dropped_total.load(Ordering::Relaxed)
    }
}

/// A panic while rendering or sending counts as a failed attempt.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("panicked: {msg}")
    } else {
        "panicked".to_string()
    }
}

fn log_failure(labels: &RunLabels, epoch: u32, attempt: u32, error: &PushError) {
    let kind = error.kind();
    match kind {
        FailureKind::Unexpected => tracing::error!(
            model_name = %labels.model_name,
            epoch,
            attempt,
            max_attempts = MAX_ATTEMPTS,
            kind = kind.as_str(),
            error = %error,
            "Unexpected error pushing metrics",
        ),
        _ => tracing::warn!(
            model_name = %labels.model_name,
            epoch,
            attempt,
            max_attempts = MAX_ATTEMPTS,
            kind = kind.as_str(),
            error = %error,
            "Metrics push attempt failed",
        ),
    }
}
