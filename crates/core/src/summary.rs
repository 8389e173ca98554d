//! Terminal result of a run.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::sample::{round_to, MetricSample};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Completed,
    Failed,
    /// Stopped by an operator signal before finishing.
    Interrupted,
}

impl RunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::Failed => "failed",
            RunStatus::Interrupted => "interrupted",
        }
    }

    /// Process exit code for this outcome (130 mirrors SIGINT).
    pub fn exit_code(self) -> i32 {
        match self {
            RunStatus::Completed => 0,
            RunStatus::Failed => 1,
            RunStatus::Interrupted => 130,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub model_name: String,
    pub status: RunStatus,
    pub total_epochs: u32,
    pub epochs_completed: usize,
    pub training_time_seconds: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub best_accuracy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_loss: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunSummary {
    /// Summary of a run that finished every epoch.
    ///
    /// Fails if `samples` is empty, since a completed run must have a
    /// final sample to report.
    pub fn completed(
        model_name: &str,
        total_epochs: u32,
        samples: &[MetricSample],
        elapsed: Duration,
    ) -> Result<Self, CoreError> {
        let last = samples
            .last()
            .ok_or_else(|| CoreError::Internal("completed run has no samples".to_string()))?;

        let best_accuracy = samples
            .iter()
            .map(|s| s.accuracy)
            .fold(f64::NEG_INFINITY, f64::max);

        Ok(Self {
            model_name: model_name.to_string(),
            status: RunStatus::Completed,
            total_epochs,
            epochs_completed: samples.len(),
            training_time_seconds: round_to(elapsed.as_secs_f64(), 2),
            final_accuracy: Some(last.accuracy),
            best_accuracy: Some(best_accuracy),
            final_loss: Some(last.loss),
            error: None,
        })
    }

    pub fn failed(
        model_name: &str,
        total_epochs: u32,
        epochs_completed: usize,
        elapsed: Duration,
        error: impl Into<String>,
    ) -> Self {
        Self {
            model_name: model_name.to_string(),
            status: RunStatus::Failed,
            total_epochs,
            epochs_completed,
            training_time_seconds: round_to(elapsed.as_secs_f64(), 2),
            final_accuracy: None,
            best_accuracy: None,
            final_loss: None,
            error: Some(error.into()),
        }
    }

    pub fn interrupted(
        model_name: &str,
        total_epochs: u32,
        epochs_completed: usize,
        elapsed: Duration,
    ) -> Self {
        Self {
            model_name: model_name.to_string(),
            status: RunStatus::Interrupted,
            total_epochs,
            epochs_completed,
            training_time_seconds: round_to(elapsed.as_secs_f64(), 2),
            final_accuracy: None,
            best_accuracy: None,
            final_loss: None,
            error: Some("interrupted by signal".to_string()),
        }
    }
}
