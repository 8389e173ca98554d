pub mod health;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use trainwatch_core::run_state::RunState;

/// Full status router: `/health`, an empty 404 for every other path, and
/// panic recovery so a bad request can never take the listener down.
///
/// No trace layer is installed; the endpoint does not log per request.
pub fn router(state: Arc<RunState>) -> Router {
    Router::new()
        .merge(health::router())
        .fallback(|| async { StatusCode::NOT_FOUND })
        .layer(CatchPanicLayer::new())
        .with_state(state)
}
