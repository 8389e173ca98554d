#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use trainwatch_core::generator::SyntheticGenerator;
use trainwatch_core::run_state::RunState;
use trainwatch_core::types::RunLabels;

/// Run state for `model_name` with `completed` of `total` epochs recorded.
pub async fn run_state(model_name: &str, total: u32, completed: u32) -> Arc<RunState> {
    let state = Arc::new(RunState::new(RunLabels::new(model_name, "v1.0"), total));
    let mut generator = SyntheticGenerator::seeded(42);
    for epoch in 1..=completed {
        state
            .record(generator.sample(epoch, total, model_name))
            .await
            .unwrap();
    }
    state
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
