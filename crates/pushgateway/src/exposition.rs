//! Prometheus text exposition (format 0.0.4) for a run's gauge set.

use std::fmt::Write;

use trainwatch_core::metric_names::{
    LABEL_MODEL_NAME, LABEL_MODEL_VERSION, METRIC_ACCURACY, METRIC_CPU_USAGE, METRIC_EPOCHS_TOTAL,
    METRIC_GPU_USAGE, METRIC_LEARNING_RATE, METRIC_LOSS, METRIC_MEMORY_USAGE,
};
use trainwatch_core::types::RunLabels;

use crate::error::PushError;
use crate::registry::GaugeSet;

pub const CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Render `gauges` as an exposition body with every series labelled by
/// `labels`.
///
/// Non-finite values are rejected: the gateway would accept them, but they
/// can only come from a bug upstream.
pub fn render(labels: &RunLabels, gauges: &GaugeSet) -> Result<String, PushError> {
    let label_set = format!(
        "{LABEL_MODEL_NAME}=\"{}\",{LABEL_MODEL_VERSION}=\"{}\"",
        escape_label_value(&labels.model_name),
        escape_label_value(&labels.model_version),
    );

    let series: [(&str, &str, &str, f64); 7] = [
        (METRIC_ACCURACY, "Current training accuracy", "gauge", gauges.accuracy),
        (METRIC_LOSS, "Current training loss", "gauge", gauges.loss),
        (METRIC_LEARNING_RATE, "Current learning rate", "gauge", gauges.learning_rate),
        (METRIC_CPU_USAGE, "CPU usage percentage", "gauge", gauges.cpu_usage_percent),
        (METRIC_MEMORY_USAGE, "Memory usage percentage", "gauge", gauges.memory_usage_percent),
        (METRIC_GPU_USAGE, "GPU usage percentage", "gauge", gauges.gpu_usage_percent),
        (
            METRIC_EPOCHS_TOTAL,
            "Total training epochs completed",
            "counter",
            gauges.epochs_total as f64,
        ),
    ];

    let mut body = String::new();
    for (name, help, kind, value) in series {
        if !value.is_finite() {
            return Err(PushError::Unexpected(format!(
                "{name} has non-finite value {value}"
            )));
        }
        // Writing to a String cannot fail.
        let _ = writeln!(body, "# HELP {name} {help}");
        let _ = writeln!(body, "# TYPE {name} {kind}");
        let _ = writeln!(body, "{name}{{{label_set}}} {value}");
    }
    Ok(body)
}

fn escape_label_value(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
}
