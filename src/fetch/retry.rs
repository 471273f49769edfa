use crate::config::FetchConfig;
use std::time::Duration;

/// Retry and backoff settings for one fetch
///
/// After the n-th failed attempt the client sleeps
/// `multiplier * 2^(n-1)`, clamped to `[min_delay, max_delay]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Scale of the exponential curve
    pub multiplier: Duration,

    /// Shortest sleep between attempts
    pub min_delay: Duration,

    /// Longest sleep between attempts
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&FetchConfig::default())
    }
}

impl RetryPolicy {
    /// Builds a policy from fetch configuration
    pub fn from_config(config: &FetchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            multiplier: Duration::from_millis(config.backoff_multiplier_ms),
            min_delay: Duration::from_millis(config.backoff_min_ms),
            max_delay: Duration::from_millis(config.backoff_max_ms),
        }
    }

    /// A policy that never retries
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            multiplier: Duration::ZERO,
            min_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
        }
    }

    /// Returns true if another attempt is allowed after `failures` failures
    pub fn should_retry(&self, failures: u32) -> bool {
        failures < self.max_attempts
    }

    /// Sleep before the next attempt, given how many attempts have failed
    pub fn delay_after(&self, failures: u32) -> Duration {
        let exponent = failures.saturating_sub(1).min(31);
        let raw = self.multiplier.saturating_mul(1u32 << exponent);
        raw.max(self.min_delay).min(self.max_delay.max(self.min_delay))
    }
}
