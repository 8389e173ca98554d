use std::ops::RangeInclusive;
use std::time::Duration;

/// Attempts per push, including the first.
pub const MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubles for each later retry.
pub const BACKOFF_BASE: Duration = Duration::from_secs(1);

pub const TIMEOUT_RANGE_SECS: RangeInclusive<u64> = 1..=60;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Push client settings.
///
/// Only the per-attempt timeout is configurable. Out-of-range values are
/// clamped into [`TIMEOUT_RANGE_SECS`] with a warning instead of rejected.
#[derive(Debug, Clone)]
pub struct PushConfig {
    timeout: Duration,
    clamped: bool,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_SECS)
    }
}

impl PushConfig {
    pub fn new(timeout_secs: u64) -> Self {
        let bounded = timeout_secs.clamp(*TIMEOUT_RANGE_SECS.start(), *TIMEOUT_RANGE_SECS.end());
        let clamped = bounded != timeout_secs;
        if clamped {
            tracing::warn!(
                requested_secs = timeout_secs,
                clamped_secs = bounded,
                "Push timeout out of range, clamping",
            );
        }
        Self {
            timeout: Duration::from_secs(bounded),
            clamped,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Whether the requested timeout had to be clamped.
    pub fn was_clamped(&self) -> bool {
        self.clamped
    }
}

/// Delay to wait after failed attempt `attempt` (1-based): 1s, 2s, 4s, ...
pub fn backoff_delay(attempt: u32) -> Duration {
    let exponent = attempt.saturating_sub(1).min(16);
    BACKOFF_BASE * 2u32.pow(exponent)
}
