use std::time::Duration;

/// Why a single push attempt failed.
///
/// Every variant is retried the same way; the classification only drives
/// logging.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PushError {
    #[error("push timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("gateway unreachable: {0}")]
    ConnectionRefused(String),

    #[error("transport error: {0}")]
    Transport(String),

    /// Not a network fault: the payload could not be built, or the
    /// transport broke an invariant.
    #[error("unexpected push failure: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Timeout,
    ConnectionRefused,
    Transport,
    Unexpected,
}

impl FailureKind {
    pub fn as_str(self) -> &'static str {
        match self {
            FailureKind::Timeout => "timeout",
            FailureKind::ConnectionRefused => "connection_refused",
            FailureKind::Transport => "transport",
            FailureKind::Unexpected => "unexpected",
        }
    }
}

impl PushError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PushError::Timeout(_) => FailureKind::Timeout,
            PushError::ConnectionRefused(_) => FailureKind::ConnectionRefused,
            PushError::Transport(_) => FailureKind::Transport,
            PushError::Unexpected(_) => FailureKind::Unexpected,
        }
    }
}

/// Errors building an [`HttpGateway`](crate::transport::HttpGateway).
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("invalid gateway URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}
