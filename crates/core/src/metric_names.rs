//! Well-known metric and label names pushed to the metrics gateway.
//!
//! Dashboards and alert rules query these names directly, so they are part
//! of the external contract.

/// Current epoch accuracy (quality score, 0-1).
pub const METRIC_ACCURACY: &str = "training_accuracy";

/// Current epoch loss (cost score, >= 0).
pub const METRIC_LOSS: &str = "training_loss";

/// Current learning rate after step decay.
pub const METRIC_LEARNING_RATE: &str = "learning_rate";

/// Host CPU utilization percentage (0-100).
pub const METRIC_CPU_USAGE: &str = "cpu_usage_percent";

/// Host memory utilization percentage (0-100).
pub const METRIC_MEMORY_USAGE: &str = "memory_usage_percent";

/// Accelerator utilization percentage (0-100). Zero when no GPU is present.
pub const METRIC_GPU_USAGE: &str = "gpu_usage_percent";

/// Counter of epochs successfully reported to the gateway.
pub const METRIC_EPOCHS_TOTAL: &str = "training_epochs_total";

/// Label carrying the run's logical name.
pub const LABEL_MODEL_NAME: &str = "model_name";

/// Label carrying the run's version tag.
pub const LABEL_MODEL_VERSION: &str = "model_version";
