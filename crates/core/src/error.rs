#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Run state is full: {completed} of {total} epochs already recorded")]
    Capacity { completed: usize, total: u32 },

    #[error("Sample generation failed at epoch {epoch}: {reason}")]
    Generator { epoch: u32, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),
}
