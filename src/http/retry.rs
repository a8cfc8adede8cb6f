//! Retry policies for HTTP requests.
//!
//! Mutations (login, subscriptions, deposits, KYC uploads) are never retried.
//! Reads may be retried on transport failures and gateway errors.

use std::time::Duration;

/// Retry policy for an HTTP request.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// Single attempt. Default for every mutating endpoint.
    #[default]
    None,
    /// Retry reads on transport failures, 429 and 502/503/504.
    Idempotent,
    /// Caller-provided retry logic.
    Custom(RetryConfig),
}

/// Configuration for retry behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_delay: Duration,
    /// Upper bound for any single delay.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Spread delays by ±25%.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// The config used for `RetryPolicy::Idempotent` (GET endpoints).
    pub fn idempotent() -> Self {
        Self {
            max_retries: 2,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    pub fn is_retryable_status(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_millis() as f64
            * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let spread = capped * 0.25;
            (capped + (rand::random::<f64>() - 0.5) * 2.0 * spread).max(0.0)
        } else {
            capped
        };

        Duration::from_millis(final_ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(initial_ms: u64, max_ms: u64, factor: f64) -> RetryConfig {
        RetryConfig {
            max_retries: 3,
            initial_delay: Duration::from_millis(initial_ms),
            max_delay: Duration::from_millis(max_ms),
            backoff_factor: factor,
            jitter: false,
            retryable_statuses: vec![503],
        }
    }

    #[test]
    fn test_mutations_default_to_single_attempt() {
        assert!(matches!(RetryPolicy::default(), RetryPolicy::None));
    }

    #[test]
    fn test_idempotent_statuses() {
        let config = RetryConfig::idempotent();
        for status in [429, 502, 503, 504] {
            assert!(config.is_retryable_status(status));
        }
        assert!(!config.is_retryable_status(500));
        assert!(!config.is_retryable_status(401));
    }

    #[test]
    fn test_exponential_backoff() {
        let config = fixed(100, 10_000, 2.0);
        let delays: Vec<_> = (0..3)
            .map(|a| config.delay_for_attempt(a).as_millis())
            .collect();
        assert_eq!(delays, [100, 200, 400]);
    }

    #[test]
    fn test_backoff_is_capped() {
        let config = fixed(1000, 2000, 10.0);
        assert_eq!(config.delay_for_attempt(3).as_millis(), 2000);
    }

    #[test]
    fn test_jitter_stays_within_quarter() {
        let config = RetryConfig {
            jitter: true,
            ..fixed(400, 10_000, 1.0)
        };
        for _ in 0..50 {
            let ms = config.delay_for_attempt(0).as_millis();
            assert!((300..=500).contains(&ms), "delay {ms} outside jitter band");
        }
    }
}
