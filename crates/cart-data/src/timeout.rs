//! Timeout configuration for fetch operations.

use std::time::Duration;

/// Connect timeout applied by the HTTP client to every request.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(1);

/// Timeout configuration for a fetch operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeoutConfig {
    /// Total time allowed for one attempt, body included.
    pub total: Duration,
}

impl TimeoutConfig {
    /// Create from a single total timeout.
    pub fn from_total(total: Duration) -> Self {
        Self { total }
    }

    /// Create from a millisecond count, as read from configuration files.
    pub fn from_millis(millis: u64) -> Self {
        Self::from_total(Duration::from_millis(millis))
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            total: Duration::from_secs(3),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_millis() {
        assert_eq!(
            TimeoutConfig::from_millis(250).total,
            Duration::from_millis(250)
        );
    }
}
