//! Retry policy for rate-limited requests.

use std::time::Duration;

/// Exponential backoff: `base * factor^attempt`, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    /// Delay before the first retry
    pub base: Duration,
    /// Multiplier applied for each further retry
    pub factor: f64,
    /// Upper bound on any single delay
    pub max: Duration,
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(100),
            factor: 2.0,
            max: Duration::from_secs(1),
        }
    }
}

impl Backoff {
    /// Delay before retry number `attempt` (0-based).
    pub fn delay(self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let seconds = self.base.as_secs_f64() * self.factor.powi(exponent);
        Duration::from_secs_f64(seconds.min(self.max.as_secs_f64()))
    }
}

/// When and how often a request is retried.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of retries; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    /// Delay schedule between attempts.
    pub backoff: Backoff,
    /// HTTP status codes that trigger a retry.
    pub retry_on_status: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Backoff::default(),
            retry_on_status: vec![429],
        }
    }
}

impl RetryConfig {
    /// Retry rate-limited requests up to `max_retries` times.
    pub fn exponential(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }

    /// Never retry.
    pub fn disabled() -> Self {
        Self::exponential(0)
    }

    /// Whether a response with `status` on attempt `attempt` (0-based) should be retried.
    pub fn should_retry(&self, status: u16, attempt: u32) -> bool {
        attempt < self.max_retries && self.retry_on_status.contains(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 100)]
    #[case(1, 200)]
    #[case(2, 400)]
    #[case(3, 800)]
    #[case(4, 1000)]
    #[case(40, 1000)]
    fn test_default_backoff(#[case] attempt: u32, #[case] expected_ms: u64) {
        let delay = Backoff::default().delay(attempt);
        assert_eq!(delay.as_millis(), u128::from(expected_ms));
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::exponential(2);
        assert!(config.should_retry(429, 0));
        assert!(config.should_retry(429, 1));
        assert!(!config.should_retry(429, 2));
        assert!(!config.should_retry(500, 0));
    }

    #[test]
    fn test_disabled() {
        assert!(!RetryConfig::disabled().should_retry(429, 0));
    }
}
