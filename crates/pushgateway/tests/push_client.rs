//! Integration tests for the retrying push client.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use common::{sample, HangingTransport, PanickingTransport, RecordingSleeper, ScriptedTransport};
use trainwatch_core::types::RunLabels;
use trainwatch_pushgateway::{PushClient, PushConfig, PushError};

fn labels() -> RunLabels {
    RunLabels::new("demo-model", "v1.0")
}

fn client(
    transport: Arc<dyn trainwatch_pushgateway::GatewayTransport>,
    sleeper: Arc<RecordingSleeper>,
) -> PushClient {
    PushClient::new(PushConfig::new(5), transport, sleeper)
}

// ---------------------------------------------------------------------------
// Test: first attempt succeeds -> no retries, gauges committed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn successful_push_commits_gauges_without_sleeping() {
    let transport = Arc::new(ScriptedTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = client(transport.clone(), sleeper.clone());

    client.push(&labels(), &sample(1, 0.71)).await;

    assert_eq!(transport.calls(), 1);
    assert!(sleeper.slept().is_empty());
    assert_eq!(client.delivered_total(), 1);
    assert_eq!(client.failed_attempts(), 0);

    let gauges = client.gauges(&labels()).await.expect("gauges committed");
    assert_eq!(gauges.accuracy, 0.71);
    assert_eq!(gauges.gpu_usage_percent, 85.5);
    assert_eq!(gauges.epochs_total, 1);

    let (job, body) = &transport.bodies()[0];
    assert_eq!(job, "ml-training-demo-model");
    assert!(body.contains("training_accuracy{model_name=\"demo-model\",model_version=\"v1.0\"} 0.71"));
}

// ---------------------------------------------------------------------------
// Test: two failures then success -> 3 attempts, sleeps of 1s then 2s
// ---------------------------------------------------------------------------

#[tokio::test]
async fn recovers_on_third_attempt_after_two_backoffs() {
    let transport = Arc::new(ScriptedTransport::new([
        Err(PushError::Timeout(Duration::from_secs(5))),
        Err(PushError::Transport("502 Bad Gateway".into())),
        Ok(()),
    ]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = client(transport.clone(), sleeper.clone());

    client.push(&labels(), &sample(1, 0.65)).await;

    assert_eq!(transport.calls(), 3);
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
    assert_eq!(client.attempts_total(), 3);
    assert_eq!(client.failed_attempts(), 2);
    assert_eq!(client.delivered_total(), 1);
    assert_eq!(client.dropped_total(), 0);
    assert_eq!(client.gauges(&labels()).await.unwrap().epochs_total, 1);
}

// ---------------------------------------------------------------------------
// Test: every attempt fails -> 3 failures counted, call still returns
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exhausted_attempts_are_absorbed() {
    let transport = Arc::new(ScriptedTransport::failing(3));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = client(transport.clone(), sleeper.clone());

    client.push(&labels(), &sample(1, 0.65)).await;

    assert_eq!(transport.calls(), 3);
    assert_eq!(client.failed_attempts(), 3);
    assert_eq!(client.dropped_total(), 1);
    assert_eq!(client.delivered_total(), 0);
    // No sleep after the final attempt.
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
    assert!(client.gauges(&labels()).await.is_none());
}

// ---------------------------------------------------------------------------
// Test: a failed push leaves the previous successful gauges untouched
// ---------------------------------------------------------------------------

#[tokio::test]
async fn failed_push_keeps_last_committed_gauges() {
    let transport = Arc::new(ScriptedTransport::new([
        Ok(()),
        Err(PushError::ConnectionRefused("refused".into())),
        Err(PushError::ConnectionRefused("refused".into())),
        Err(PushError::ConnectionRefused("refused".into())),
    ]));
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = client(transport.clone(), sleeper);

    client.push(&labels(), &sample(1, 0.61)).await;
    client.push(&labels(), &sample(2, 0.77)).await;

    let gauges = client.gauges(&labels()).await.unwrap();
    assert_eq!(gauges.accuracy, 0.61);
    assert_eq!(gauges.epochs_total, 1);
    assert_eq!(client.failed_attempts(), 3);

    // The next success resumes counting from the committed state.
    client.push(&labels(), &sample(3, 0.8)).await;
    let gauges = client.gauges(&labels()).await.unwrap();
    assert_eq!(gauges.accuracy, 0.8);
    assert_eq!(gauges.epochs_total, 2);
}

// ---------------------------------------------------------------------------
// Test: unexpected (payload) faults follow the same retry policy
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unexpected_fault_is_retried_and_absorbed() {
    let transport = Arc::new(ScriptedTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = client(transport.clone(), sleeper.clone());

    client.push(&labels(), &sample(1, f64::NAN)).await;

    // Rendering fails before the transport is reached.
    assert_eq!(transport.calls(), 0);
    assert_eq!(client.attempts_total(), 3);
    assert_eq!(client.failed_attempts(), 3);
    assert_eq!(sleeper.slept().len(), 2);
}

// ---------------------------------------------------------------------------
// Test: a panicking transport counts as a failed attempt, not a crash
// ---------------------------------------------------------------------------

#[tokio::test]
async fn panicking_transport_is_retried_and_absorbed() {
    let transport = Arc::new(PanickingTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = Arc::new(client(transport.clone(), sleeper.clone()));

    let task_client = Arc::clone(&client);
    let pushed = tokio::spawn(async move {
        task_client.push(&labels(), &sample(1, 0.7)).await;
    })
    .await;

    assert!(pushed.is_ok(), "push must return normally");
    assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    assert_eq!(client.attempts_total(), 3);
    assert_eq!(client.failed_attempts(), 3);
    assert_eq!(client.dropped_total(), 1);
    assert_eq!(
        sleeper.slept(),
        vec![Duration::from_secs(1), Duration::from_secs(2)]
    );
    assert!(client.gauges(&labels()).await.is_none());
}

// ---------------------------------------------------------------------------
// Test: a hanging gateway is cut off by the per-attempt timeout
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn hanging_gateway_times_out_each_attempt() {
    let transport = Arc::new(HangingTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = PushClient::new(PushConfig::new(2), transport.clone(), sleeper);

    let started = tokio::time::Instant::now();
    client.push(&labels(), &sample(1, 0.7)).await;

    assert_eq!(transport.calls.load(Ordering::SeqCst), 3);
    assert_eq!(client.failed_attempts(), 3);
    // Three 2s timeouts; backoff went through the recording sleeper.
    assert!(started.elapsed() >= Duration::from_secs(6));
    assert!(started.elapsed() < Duration::from_secs(60));
}

// ---------------------------------------------------------------------------
// Test: separate runs keep separate gauge state
// ---------------------------------------------------------------------------

#[tokio::test]
async fn gauges_are_keyed_by_name_and_version() {
    let transport = Arc::new(ScriptedTransport::default());
    let sleeper = Arc::new(RecordingSleeper::default());
    let client = client(transport, sleeper);

    let v1 = RunLabels::new("demo-model", "v1");
    let v2 = RunLabels::new("demo-model", "v2");
    client.push(&v1, &sample(1, 0.6)).await;
    client.push(&v1, &sample(2, 0.62)).await;
    client.push(&v2, &sample(1, 0.9)).await;

    assert_eq!(client.gauges(&v1).await.unwrap().epochs_total, 2);
    assert_eq!(client.gauges(&v2).await.unwrap().epochs_total, 1);
    assert_eq!(client.gauges(&v2).await.unwrap().accuracy, 0.9);
}
