//! Configuration for the pack runtime.

use std::time::Duration;

/// Timing configuration for the pack runtime.
#[derive(Debug, Clone)]
pub struct PackConfig {
    /// How long to wait between polls when no action is available, and
    /// after an absorbed take-action failure.
    pub polling_interval: Duration,
    /// How long to wait before the single registration retry.
    pub registration_backoff: Duration,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            polling_interval: Duration::from_secs(5),
            registration_backoff: Duration::from_secs(3),
        }
    }
}
