//! Run configuration loaded from environment variables.
//!
//! | Variable                | Default                       |
//! |-------------------------|-------------------------------|
//! | `MODEL_NAME`            | `demo-model`                  |
//! | `MODEL_VERSION`         | `v1.0`                        |
//! | `TRAINING_EPOCHS`       | `10`                          |
//! | `HEALTH_CHECK_PORT`     | `8080`                        |
//! | `PUSHGATEWAY_URL`       | `http://localhost:9091`       |
//! | `PUSHGATEWAY_TIMEOUT`   | `10` (clamped to 1-60 by the push client) |
//! | `METRICS_OUTPUT_PATH`   | `/tmp/training_metrics.json`  |
//! | `EPOCH_DURATION_MIN_MS` | `1000`                        |
//! | `EPOCH_DURATION_MAX_MS` | `3000`                        |

use std::path::PathBuf;

use reqwest::Url;
use trainwatch_core::config::{
    validate_model_name, validate_port, validate_training_epochs, RunConfig, DEFAULT_GATEWAY_URL,
    DEFAULT_METRICS_OUTPUT_PATH, DEFAULT_MODEL_NAME, DEFAULT_MODEL_VERSION,
    DEFAULT_PUSH_TIMEOUT_SECS, DEFAULT_STATUS_PORT, DEFAULT_TRAINING_EPOCHS,
};
use trainwatch_core::error::CoreError;

const MAX_EPOCH_DURATION_MS: i64 = 60_000;
const MAX_PUSH_TIMEOUT_SECS: i64 = 3_600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {var}: {source}")]
    Invalid {
        var: &'static str,
        #[source]
        source: CoreError,
    },

    #[error("Invalid PUSHGATEWAY_URL '{0}': expected an http or https URL")]
    GatewayUrl(String),
}

/// Load configuration from the process environment.
pub fn from_env() -> Result<RunConfig, ConfigError> {
    from_lookup(|name| std::env::var(name).ok())
}

/// Load configuration through `lookup`, which returns the raw value of an
/// environment variable if set.
pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<RunConfig, ConfigError> {
    let model_name = match lookup("MODEL_NAME") {
        Some(raw) => validate_model_name(raw.trim()).map_err(invalid("MODEL_NAME"))?,
        None => DEFAULT_MODEL_NAME.to_string(),
    };

    let model_version = lookup("MODEL_VERSION")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL_VERSION.to_string());

    let total_epochs = match lookup("TRAINING_EPOCHS") {
        Some(raw) => validate_training_epochs(&raw).map_err(invalid("TRAINING_EPOCHS"))?,
        None => DEFAULT_TRAINING_EPOCHS,
    };

    let status_port = match lookup("HEALTH_CHECK_PORT") {
        Some(raw) => validate_port(&raw).map_err(invalid("HEALTH_CHECK_PORT"))?,
        None => DEFAULT_STATUS_PORT,
    };

    let gateway_url = lookup("PUSHGATEWAY_URL")
        .map(|v| v.trim().to_string())
        .unwrap_or_else(|| DEFAULT_GATEWAY_URL.to_string());
    match Url::parse(&gateway_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        _ => return Err(ConfigError::GatewayUrl(gateway_url)),
    }

    let push_timeout_secs = get_env_int(
        &lookup,
        "PUSHGATEWAY_TIMEOUT",
        DEFAULT_PUSH_TIMEOUT_SECS as i64,
        0,
        MAX_PUSH_TIMEOUT_SECS,
    ) as u64;

    let metrics_output_path = lookup("METRICS_OUTPUT_PATH")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_METRICS_OUTPUT_PATH));

    let min_ms = get_env_int(&lookup, "EPOCH_DURATION_MIN_MS", 1_000, 0, MAX_EPOCH_DURATION_MS);
    let max_ms = get_env_int(&lookup, "EPOCH_DURATION_MAX_MS", 3_000, min_ms, MAX_EPOCH_DURATION_MS);

    Ok(RunConfig {
        model_name,
        model_version,
        total_epochs,
        status_port,
        push_timeout_secs,
        gateway_url,
        metrics_output_path,
        epoch_duration_secs: (min_ms as f64 / 1000.0, max_ms as f64 / 1000.0),
    })
}

/// Read an integer setting leniently.
///
/// Missing or unparsable values fall back to `default`; the result is then
/// clamped into `[min, max]`.
pub fn get_env_int(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: i64,
    min: i64,
    max: i64,
) -> i64 {
    let value = match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(name, raw = %raw, default, "Ignoring non-integer setting");
            default
        }),
        None => default,
    };
    value.clamp(min, max)
}

fn invalid(var: &'static str) -> impl Fn(CoreError) -> ConfigError {
    move |source| ConfigError::Invalid { var, source }
}
