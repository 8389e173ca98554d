//! Epoch loop orchestration.
//!
//! A [`Trainer`] drives one run from start to a terminal
//! [`RunStatus`](trainwatch_core::summary::RunStatus): it starts the status
//! endpoint, then for each epoch waits out the simulated work, generates a
//! sample, records it in the shared [`RunState`], and pushes it to the
//! gateway before moving on. The status endpoint is stopped before `run`
//! returns, whatever the outcome.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio_util::sync::CancellationToken;
use trainwatch_core::clock::{Sleeper, TokioSleeper};
use trainwatch_core::config::RunConfig;
use trainwatch_core::error::CoreError;
use trainwatch_core::generator::{SampleSource, SyntheticGenerator};
use trainwatch_core::run_state::RunState;
use trainwatch_core::summary::RunSummary;
use trainwatch_pushgateway::{GatewayError, GatewayTransport, HttpGateway, PushClient, PushConfig};
use trainwatch_status::StatusServer;

use crate::persist;

/// A validation score is logged every this many epochs.
const VALIDATION_INTERVAL: u32 = 3;

/// Bounds of the multiplicative jitter applied to the validation score.
const VALIDATION_JITTER: (f64, f64) = (0.95, 1.05);

/// Upper bound on simulated work per epoch, matching the env config limit.
const MAX_EPOCH_DURATION_SECS: f64 = 60.0;

enum Stop {
    Failed(CoreError),
    Interrupted,
}

pub struct Trainer {
    config: RunConfig,
    source: Box<dyn SampleSource>,
    push_client: Arc<PushClient>,
    sleeper: Arc<dyn Sleeper>,
    status: Arc<StatusServer>,
}

impl Trainer {
    /// Assemble a trainer from explicit collaborators.
    ///
    /// The push client is built here from `config.push_timeout_secs` and
    /// shares `sleeper` for its backoff delays.
    pub fn new(
        config: RunConfig,
        source: Box<dyn SampleSource>,
        transport: Arc<dyn GatewayTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let push_config = PushConfig::new(config.push_timeout_secs);
        Self::assemble(config, push_config, source, transport, sleeper)
    }

    /// Production wiring: HTTP gateway, real sleeps, entropy-seeded samples.
    pub fn from_config(config: RunConfig) -> Result<Self, GatewayError> {
        let push_config = PushConfig::new(config.push_timeout_secs);
        let gateway = HttpGateway::new(&config.gateway_url, push_config.timeout())?;

        Ok(Self::assemble(
            config,
            push_config,
            Box::new(SyntheticGenerator::from_entropy()),
            Arc::new(gateway),
            Arc::new(TokioSleeper),
        ))
    }

    fn assemble(
        config: RunConfig,
        push_config: PushConfig,
        source: Box<dyn SampleSource>,
        transport: Arc<dyn GatewayTransport>,
        sleeper: Arc<dyn Sleeper>,
    ) -> Self {
        let push_client = Arc::new(PushClient::new(push_config, transport, Arc::clone(&sleeper)));
        let status = Arc::new(StatusServer::new(SocketAddr::from((
            Ipv4Addr::UNSPECIFIED,
            config.status_port,
        ))));

        Self {
            config,
            source,
            push_client,
            sleeper,
            status,
        }
    }

    pub fn status_server(&self) -> Arc<StatusServer> {
        Arc::clone(&self.status)
    }

    pub fn push_client(&self) -> Arc<PushClient> {
        Arc::clone(&self.push_client)
    }

    /// Run every epoch and return the terminal summary.
    ///
    /// Cancelling `cancel` abandons the run at its current suspension point
    /// and yields an interrupted summary; nothing is persisted in that case.
    pub async fn run(mut self, cancel: CancellationToken) -> RunSummary {
        let state = Arc::new(RunState::new(self.config.labels(), self.config.total_epochs));

        tracing::info!(
            model_name = %self.config.model_name,
            model_version = %self.config.model_version,
            total_epochs = self.config.total_epochs,
            "Starting training run",
        );

        if let Err(e) = self.status.start(Arc::clone(&state)).await {
            tracing::warn!(error = %e, "Continuing without status endpoint");
        }

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(Stop::Interrupted),
            result = self.run_epochs(&state) => result.map_err(Stop::Failed),
        };

        let summary = match outcome {
            Ok(()) => self.complete(&state).await,
            Err(Stop::Failed(e)) => {
                let completed = state.epochs_completed().await;
                tracing::error!(error = %e, epochs_completed = completed, "Training failed");
                RunSummary::failed(
                    state.model_name(),
                    state.total_epochs(),
                    completed,
                    state.elapsed(),
                    e.to_string(),
                )
            }
            Err(Stop::Interrupted) => {
                let completed = state.epochs_completed().await;
                tracing::warn!(epochs_completed = completed, "Training interrupted");
                RunSummary::interrupted(
                    state.model_name(),
                    state.total_epochs(),
                    completed,
                    state.elapsed(),
                )
            }
        };

        self.status.stop().await;
        summary
    }

    async fn run_epochs(&mut self, state: &RunState) -> Result<(), CoreError> {
        let total = state.total_epochs();

        for epoch in 1..=total {
            tracing::info!(epoch, total_epochs = total, "Starting epoch");
            let work = self.epoch_duration();
            self.sleeper.sleep(work).await;

            let sample = self.source.generate(epoch, total, state.model_name())?;
            state.record(sample.clone()).await?;

            tracing::info!(
                epoch,
                accuracy = sample.accuracy,
                loss = sample.loss,
                "Epoch completed",
            );

            self.push_client.push(state.labels(), &sample).await;

            if epoch % VALIDATION_INTERVAL == 0 {
                let factor =
                    rand::rng().random_range(VALIDATION_JITTER.0..=VALIDATION_JITTER.1);
                tracing::info!(
                    epoch,
                    val_accuracy = sample.accuracy * factor,
                    "Validation accuracy",
                );
            }
        }

        Ok(())
    }

    async fn complete(&self, state: &RunState) -> RunSummary {
        let samples = state.snapshot().await;
        let summary = match RunSummary::completed(
            state.model_name(),
            state.total_epochs(),
            &samples,
            state.elapsed(),
        ) {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Training finished in an inconsistent state");
                return RunSummary::failed(
                    state.model_name(),
                    state.total_epochs(),
                    samples.len(),
                    state.elapsed(),
                    e.to_string(),
                );
            }
        };

        tracing::info!(
            final_accuracy = ?summary.final_accuracy,
            best_accuracy = ?summary.best_accuracy,
            training_time_seconds = summary.training_time_seconds,
            "Training completed",
        );

        let path = &self.config.metrics_output_path;
        match persist::save_samples(path, &samples).await {
            Ok(()) => tracing::info!(path = %path.display(), "Metrics saved"),
            Err(e) => tracing::error!(error = %e, "Failed to save metrics"),
        }

        summary
    }

    /// Simulated work time for one epoch, drawn from the configured range.
    fn epoch_duration(&self) -> Duration {
        epoch_duration_in(self.config.epoch_duration_secs)
    }
}

/// Draw a work duration from `(min, max)` seconds, both clamped to
/// `0..=MAX_EPOCH_DURATION_SECS`. Non-finite bounds count as zero.
fn epoch_duration_in((min, max): (f64, f64)) -> Duration {
    let clamp = |v: f64| {
        if v.is_finite() {
            v.clamp(0.0, MAX_EPOCH_DURATION_SECS)
        } else {
            0.0
        }
    };
    let (min, max) = (clamp(min), clamp(max));
    let secs = if max > min {
        rand::rng().random_range(min..=max)
    } else {
        min
    };
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO)
}
