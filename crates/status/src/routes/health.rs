use std::sync::Arc;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use trainwatch_core::run_state::RunState;

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_name: String,
    /// Read from the run state at request time.
    pub epochs_completed: usize,
    pub total_epochs: u32,
    /// RFC 3339 / ISO-8601.
    pub timestamp: String,
}

/// GET /health -- liveness plus run progress.
async fn health_check(State(state): State<Arc<RunState>>) -> Json<HealthResponse> {
    let epochs_completed = state.epochs_completed().await;

    Json(HealthResponse {
        status: "healthy",
        model_name: state.model_name().to_string(),
        epochs_completed,
        total_epochs: state.total_epochs(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub fn router() -> Router<Arc<RunState>> {
    Router::new().route("/health", get(health_check))
}
