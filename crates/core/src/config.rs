//! Run configuration and the validators for its documented ranges.
//!
//! The trainer consumes an already-validated [`RunConfig`]. Reading raw
//! values out of the environment is the binary's job; these validators are
//! what it calls to reject bad input.

use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::RunLabels;

pub const MODEL_NAME_LEN: RangeInclusive<usize> = 3..=50;
pub const TRAINING_EPOCHS_RANGE: RangeInclusive<u32> = 1..=1000;
pub const STATUS_PORT_RANGE: RangeInclusive<u16> = 1024..=65535;

pub const DEFAULT_MODEL_NAME: &str = "demo-model";
pub const DEFAULT_MODEL_VERSION: &str = "v1.0";
pub const DEFAULT_TRAINING_EPOCHS: u32 = 10;
pub const DEFAULT_STATUS_PORT: u16 = 8080;
pub const DEFAULT_PUSH_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_GATEWAY_URL: &str = "http://localhost:9091";
pub const DEFAULT_METRICS_OUTPUT_PATH: &str = "/tmp/training_metrics.json";

/// Simulated per-epoch work duration bounds, in seconds.
pub const DEFAULT_EPOCH_DURATION_SECS: (f64, f64) = (1.0, 3.0);

static MODEL_NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("static regex is valid"));

#[derive(Debug, Clone)]
pub struct RunConfig {
    /// 3-50 characters of `[A-Za-z0-9_-]`.
    pub model_name: String,
    pub model_version: String,
    /// 1-1000.
    pub total_epochs: u32,
    /// 1024-65535 in production; 0 asks the OS for an ephemeral port.
    pub status_port: u16,
    /// Unclamped; the push client clamps to 1-60 itself.
    pub push_timeout_secs: u64,
    pub gateway_url: String,
    pub metrics_output_path: PathBuf,
    pub epoch_duration_secs: (f64, f64),
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            model_name: DEFAULT_MODEL_NAME.to_string(),
            model_version: DEFAULT_MODEL_VERSION.to_string(),
            total_epochs: DEFAULT_TRAINING_EPOCHS,
            status_port: DEFAULT_STATUS_PORT,
            push_timeout_secs: DEFAULT_PUSH_TIMEOUT_SECS,
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            metrics_output_path: PathBuf::from(DEFAULT_METRICS_OUTPUT_PATH),
            epoch_duration_secs: DEFAULT_EPOCH_DURATION_SECS,
        }
    }
}

impl RunConfig {
    pub fn labels(&self) -> RunLabels {
        RunLabels::new(&self.model_name, &self.model_version)
    }
}

/// Accept a model name of 3-50 characters drawn from `[A-Za-z0-9_-]`.
pub fn validate_model_name(name: &str) -> Result<String, CoreError> {
    let len = name.chars().count();
    if !MODEL_NAME_LEN.contains(&len) {
        return Err(CoreError::Validation(format!(
            "model name '{name}' must be between {} and {} characters, got {len}",
            MODEL_NAME_LEN.start(),
            MODEL_NAME_LEN.end(),
        )));
    }
    if !MODEL_NAME_PATTERN.is_match(name) {
        return Err(CoreError::Validation(format!(
            "model name '{name}' may only contain letters, digits, '-' and '_'"
        )));
    }
    Ok(name.to_string())
}

/// Parse an epoch count and check it lies in 1-1000.
pub fn validate_training_epochs(raw: &str) -> Result<u32, CoreError> {
    let epochs: i64 = raw.trim().parse().map_err(|_| {
        CoreError::Validation(format!("training epochs '{raw}' is not a valid integer"))
    })?;

    u32::try_from(epochs)
        .ok()
        .filter(|e| TRAINING_EPOCHS_RANGE.contains(e))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "training epochs must be between {} and {}, got {epochs}",
                TRAINING_EPOCHS_RANGE.start(),
                TRAINING_EPOCHS_RANGE.end(),
            ))
        })
}

/// Parse a status port and check it lies in 1024-65535.
pub fn validate_port(raw: &str) -> Result<u16, CoreError> {
    let port: i64 = raw
        .trim()
        .parse()
        .map_err(|_| CoreError::Validation(format!("port '{raw}' is not a valid integer")))?;

    u16::try_from(port)
        .ok()
        .filter(|p| STATUS_PORT_RANGE.contains(p))
        .ok_or_else(|| {
            CoreError::Validation(format!(
                "port must be between {} and {}, got {port}",
                STATUS_PORT_RANGE.start(),
                STATUS_PORT_RANGE.end(),
            ))
        })
}
