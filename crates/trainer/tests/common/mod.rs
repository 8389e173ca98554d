#![allow(dead_code)]

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Notify;
use trainwatch_core::clock::Sleeper;
use trainwatch_core::config::RunConfig;
use trainwatch_core::error::CoreError;
use trainwatch_core::generator::{SampleSource, SyntheticGenerator};
use trainwatch_core::sample::MetricSample;
use trainwatch_pushgateway::{GatewayTransport, PushError};

/// Config for a fast test run on an ephemeral status port.
pub fn test_config(model_name: &str, total_epochs: u32, output: &Path) -> RunConfig {
    RunConfig {
        model_name: model_name.to_string(),
        model_version: "v1.0".to_string(),
        total_epochs,
        status_port: 0,
        push_timeout_secs: 5,
        gateway_url: "http://127.0.0.1:9".to_string(),
        metrics_output_path: output.to_path_buf(),
        epoch_duration_secs: (1.0, 3.0),
    }
}

/// Gateway that accepts everything, or rejects everything.
pub struct StubGateway {
    fail: bool,
    calls: AtomicUsize,
}

impl StubGateway {
    pub fn accepting() -> Arc<Self> {
        Arc::new(Self {
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn refusing() -> Arc<Self> {
        Arc::new(Self {
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GatewayTransport for StubGateway {
    async fn send(&self, _job: &str, _body: String) -> Result<(), PushError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(PushError::ConnectionRefused("connection refused".into()))
        } else {
            Ok(())
        }
    }
}

/// Sleeper that records delays and returns immediately.
#[derive(Default)]
pub struct RecordingSleeper {
    slept: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn slept(&self) -> Vec<Duration> {
        self.slept.lock().unwrap().clone()
    }
}

#[async_trait]
impl Sleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.slept.lock().unwrap().push(duration);
    }
}

/// Sleeper that parks on its `hold_at`-th call until released.
///
/// With an accepting gateway the only sleeps are the per-epoch work
/// sleeps, so parking on call N freezes the run with N-1 epochs done.
pub struct GateSleeper {
    hold_at: usize,
    calls: AtomicUsize,
    pub reached: Notify,
    pub release: Notify,
}

impl GateSleeper {
    pub fn holding_at(hold_at: usize) -> Arc<Self> {
        Arc::new(Self {
            hold_at,
            calls: AtomicUsize::new(0),
            reached: Notify::new(),
            release: Notify::new(),
        })
    }
}

#[async_trait]
impl Sleeper for GateSleeper {
    async fn sleep(&self, _duration: Duration) {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.hold_at {
            self.reached.notify_one();
            self.release.notified().await;
        }
    }
}

/// Synthetic source that fails once it reaches `fail_at`.
pub struct FailingSource {
    inner: SyntheticGenerator,
    fail_at: u32,
}

impl FailingSource {
    pub fn at(fail_at: u32) -> Box<Self> {
        Box::new(Self {
            inner: SyntheticGenerator::seeded(5),
            fail_at,
        })
    }
}

impl SampleSource for FailingSource {
    fn generate(
        &mut self,
        epoch: u32,
        total_epochs: u32,
        model_name: &str,
    ) -> Result<MetricSample, CoreError> {
        if epoch == self.fail_at {
            return Err(CoreError::Generator {
                epoch,
                reason: "simulated fault".to_string(),
            });
        }
        Ok(self.inner.sample(epoch, total_epochs, model_name))
    }
}

pub fn read_snapshot(path: &Path) -> Vec<MetricSample> {
    serde_json::from_slice(&std::fs::read(path).expect("snapshot written"))
        .expect("snapshot is a JSON array of samples")
}
