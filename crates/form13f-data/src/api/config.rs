//! Client configuration.

use super::retry::RetryConfig;
use crate::error::{DataError, Result};
use std::time::Duration;

/// Default base URL of the filings service.
pub const DEFAULT_BASE_URL: &str = "https://forms13f.com";

/// Default user agent (the SEC-derived services ask for identifying information).
pub const DEFAULT_USER_AGENT: &str = "form13f/0.1 (contact@example.com)";

/// Environment variable overriding the base URL.
pub const ENV_BASE_URL: &str = "FORM13F_API_URL";
/// Environment variable overriding the user agent.
pub const ENV_USER_AGENT: &str = "FORM13F_USER_AGENT";
/// Environment variable overriding the request timeout, in seconds.
pub const ENV_TIMEOUT_SECS: &str = "FORM13F_TIMEOUT_SECS";
/// Environment variable overriding the minimum interval between requests, in milliseconds.
pub const ENV_MIN_INTERVAL_MS: &str = "FORM13F_MIN_INTERVAL_MS";
/// Environment variable overriding the number of retries on HTTP 429.
pub const ENV_MAX_RETRIES: &str = "FORM13F_MAX_RETRIES";

/// Settings for [`Forms13fClient`](super::Forms13fClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Service base URL, without the `/api/v1` suffix
    pub base_url: String,
    /// User agent sent with every request
    pub user_agent: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// Minimum time between two requests
    pub min_interval: Duration,
    /// Retry policy for rate-limited responses
    pub retry: RetryConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(30),
            min_interval: Duration::from_millis(100),
            retry: RetryConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Defaults overridden by any `FORM13F_*` environment variables that are set.
    ///
    /// # Errors
    /// Returns `DataError::Config` if a numeric variable does not parse.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_BASE_URL) {
            config.base_url = url;
        }
        if let Some(agent) = lookup(ENV_USER_AGENT) {
            config.user_agent = agent;
        }
        if let Some(secs) = parse_var(&lookup, ENV_TIMEOUT_SECS)? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var(&lookup, ENV_MIN_INTERVAL_MS)? {
            config.min_interval = Duration::from_millis(ms);
        }
        if let Some(retries) = parse_var(&lookup, ENV_MAX_RETRIES)? {
            config.retry.max_retries = u32::try_from(retries)
                .map_err(|_| DataError::Config(format!("{ENV_MAX_RETRIES} out of range")))?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Replace the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the retry policy.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Check that the base URL is an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(DataError::Config(format!(
                "base URL must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }
        Ok(())
    }
}

fn parse_var(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<u64>> {
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<u64>()
                .map_err(|e| DataError::Config(format!("{key}='{raw}': {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_env() {
        let config = ClientConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.retry.max_retries, 5);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup_from(&[
            (ENV_BASE_URL, "http://localhost:8080"),
            (ENV_TIMEOUT_SECS, "5"),
            (ENV_MIN_INTERVAL_MS, "250"),
            (ENV_MAX_RETRIES, "2"),
        ]))
        .unwrap();

        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.min_interval, Duration::from_millis(250));
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn test_bad_number() {
        let result = ClientConfig::from_lookup(lookup_from(&[(ENV_TIMEOUT_SECS, "soon")]));
        assert!(matches!(result, Err(DataError::Config(_))));
    }

    #[test]
    fn test_bad_url() {
        let result = ClientConfig::from_lookup(lookup_from(&[(ENV_BASE_URL, "forms13f.com")]));
        assert!(matches!(result, Err(DataError::Config(_))));
    }
}
