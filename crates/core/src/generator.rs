//! Synthetic per-epoch metric generation.
//!
//! [`SyntheticGenerator`] produces numbers shaped like a training run that
//! is slowly converging: accuracy climbs, loss falls, the learning rate
//! decays in steps, and resource utilization hovers in fixed bands. The
//! values carry no statistical meaning; they exist to exercise the
//! reporting pipeline.

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::CoreError;
use crate::sample::{round_to, MetricSample};

/// Batch size reported with every sample.
pub const BATCH_SIZE: u32 = 32;

/// Learning rate at epoch 0.
pub const BASE_LEARNING_RATE: f64 = 0.001;

/// Multiplicative decay applied once per [`LEARNING_RATE_STEP`] epochs.
pub const LEARNING_RATE_DECAY: f64 = 0.9;

/// Number of epochs between learning-rate decay steps.
pub const LEARNING_RATE_STEP: u32 = 3;

const ACCURACY_BASELINE: f64 = 0.6;
const ACCURACY_GAIN: f64 = 0.3;
const ACCURACY_CEILING: f64 = 0.95;
const ACCURACY_NOISE: f64 = 0.05;

const LOSS_BASELINE: f64 = 1.0;
const LOSS_DROP: f64 = 0.7;
const LOSS_FLOOR: f64 = 0.1;
const LOSS_NOISE: f64 = 0.1;

const CPU_RANGE: (f64, f64) = (60.0, 90.0);
const MEMORY_RANGE: (f64, f64) = (70.0, 85.0);
const GPU_RANGE: (f64, f64) = (80.0, 95.0);

/// Probability that an epoch runs without an accelerator.
const GPU_ABSENT_PROBABILITY: f64 = 0.3;

/// Anything that can produce the sample for one epoch.
///
/// The trainer depends on this trait rather than on the synthetic
/// generator so a failing source can be substituted.
pub trait SampleSource: Send + Sync {
    fn generate(
        &mut self,
        epoch: u32,
        total_epochs: u32,
        model_name: &str,
    ) -> Result<MetricSample, CoreError>;
}

/// Step-decayed learning rate for `epoch`.
///
/// Constant within each block of [`LEARNING_RATE_STEP`] epochs and strictly
/// smaller at every block boundary.
pub fn learning_rate_for(epoch: u32) -> f64 {
    BASE_LEARNING_RATE * LEARNING_RATE_DECAY.powi((epoch / LEARNING_RATE_STEP) as i32)
}

pub struct SyntheticGenerator<R = StdRng> {
    rng: R,
}

impl SyntheticGenerator<StdRng> {
    /// Generator seeded from the operating system.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Deterministic generator, for tests and reproducible demos.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng + Send + Sync> SyntheticGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Produce the sample for `epoch` of `total_epochs`. Never fails.
    pub fn sample(&mut self, epoch: u32, total_epochs: u32, model_name: &str) -> MetricSample {
        let progress = f64::from(epoch) / f64::from(total_epochs.max(1));

        let base_accuracy = ACCURACY_BASELINE + progress * ACCURACY_GAIN;
        let accuracy = (base_accuracy + self.noise(ACCURACY_NOISE))
            .min(ACCURACY_CEILING)
            .max(0.0);

        let base_loss = LOSS_BASELINE - progress * LOSS_DROP;
        let loss = (base_loss + self.noise(LOSS_NOISE)).max(LOSS_FLOOR);

        let cpu = self.rng.random_range(CPU_RANGE.0..=CPU_RANGE.1);
        let memory = self.rng.random_range(MEMORY_RANGE.0..=MEMORY_RANGE.1);
        let gpu = if self.rng.random::<f64>() > GPU_ABSENT_PROBABILITY {
            self.rng.random_range(GPU_RANGE.0..=GPU_RANGE.1)
        } else {
            0.0
        };

        MetricSample {
            epoch,
            accuracy: round_to(accuracy, 4),
            loss: round_to(loss, 4),
            learning_rate: learning_rate_for(epoch),
            cpu_usage_percent: round_to(cpu, 2),
            memory_usage_percent: round_to(memory, 2),
            gpu_usage_percent: round_to(gpu, 2),
            timestamp: Utc::now(),
            batch_size: BATCH_SIZE,
            model_name: model_name.to_string(),
        }
    }

    fn noise(&mut self, amplitude: f64) -> f64 {
        self.rng.random_range(-amplitude..=amplitude)
    }
}

impl<R: Rng + Send + Sync> SampleSource for SyntheticGenerator<R> {
    fn generate(
        &mut self,
        epoch: u32,
        total_epochs: u32,
        model_name: &str,
    ) -> Result<MetricSample, CoreError> {
        Ok(self.sample(epoch, total_epochs, model_name))
    }
}
