//! Retry with exponential backoff for optimistic merge conflicts.
//!
//! When a profile's `version` moves between load and save the pipeline
//! re-reads the profile and merges again. Attempts and delays come from the
//! `[merge]` config section.

use std::time::Duration;

use umw_config::MergeConfig;

use crate::error::DatabaseError;

/// Configuration for retry behavior on stale profile versions.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub const fn from_merge_config(config: &MergeConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }

    /// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`,
    /// capped at `max_delay`.
    #[must_use]
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt.saturating_sub(1)).unwrap_or(u32::MAX);
        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |d| d.min(self.max_delay))
    }
}

/// Only a lost compare-and-swap is worth another attempt.
#[must_use]
pub const fn is_retryable(e: &DatabaseError) -> bool {
    matches!(e, DatabaseError::StaleVersion { .. })
}
