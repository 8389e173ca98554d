//! Shared fakes for push client tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use trainwatch_core::clock::Sleeper;
use trainwatch_core::sample::MetricSample;
use trainwatch_pushgateway::{GatewayTransport, PushError};

/// Transport that replays a script of results, then succeeds forever.
#[derive(Default)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<(), PushError>>>,
    calls: AtomicUsize,
    bodies: Mutex<Vec<(String, String)>>,
}

impl ScriptedTransport {
    pub fn new(script: impl IntoIterator<Item = Result<(), PushError>>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            ..Default::default()
        }
    }

    pub fn failing(times: usize) -> Self {
        Self::new((0..times).map(|_| Err(PushError::ConnectionRefused("refused".into()))))
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(job, body)` for every call, in order.
    pub fn bodies(&self) -> Vec<(String, String)> {
        self.bodies.lock().unwrap().clone()
    }
}

#[async_trait]
impl GatewayTransport for ScriptedTransport {
    async fn send(&self, job: &str, body: String) -> Result<(), PushError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().unwrap().push((job.to_string(), body));
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
    }
}

/// Transport that never answers within any reasonable timeout.
#[derive(Default)]
pub struct HangingTransport {
    pub calls: AtomicUsize,
}

#[async_trait]
impl GatewayTransport for HangingTransport {
    async fn send(&self, _job: &str, _body: String) -> Result<(), PushError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(())
    }
}

/// Transport whose every call panics mid-send.
#[derive(Default)]
pub struct PanickingTransport {
    pub calls: AtomicUsize,
}

#[async_trait]
impl GatewayTransport for PanickingTransport {
    async fn send(&self, _job: &str, _body: String) -> Result<(), PushError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        panic!("gateway payload invariant broken");
    }
}

/// Sleeper that records requested delays and returns immediately.
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

pub fn sample(epoch: u32, accuracy: f64) -> MetricSample {
    MetricSample {
        epoch,
        accuracy,
        loss: 0.5,
        learning_rate: 0.001,
        cpu_usage_percent: 70.0,
        memory_usage_percent: 75.0,
        gpu_usage_percent: 85.5,
        timestamp: chrono::Utc::now(),
        batch_size: 32,
        model_name: "demo-model".to_string(),
    }
}
