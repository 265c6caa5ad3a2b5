//! Forms 13F REST client with rate limiting and retry.

use super::config::ClientConfig;
use crate::error::{DataError, Result};
use crate::model::{FilingHeader, FundSummary, HoldingLine};
use crate::source::{FilingSource, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};

/// Rate limiter to keep a minimum interval between requests
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now()
                .checked_sub(min_interval)
                .unwrap_or_else(Instant::now),
            min_interval,
        }
    }

    async fn wait(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            sleep(self.min_interval - elapsed).await;
        }
        self.last_request = Instant::now();
    }
}

/// HTTP client for the Forms 13F service.
///
/// Requests are serialized through a shared rate limiter, and responses with
/// a retryable status (HTTP 429 by default) are retried with exponential
/// backoff before surfacing as [`DataError::RateLimit`].
pub struct Forms13fClient {
    client: reqwest::Client,
    rate_limiter: Arc<Mutex<RateLimiter>>,
    config: ClientConfig,
}

impl Forms13fClient {
    /// Create a client from a configuration.
    ///
    /// # Errors
    /// Returns `DataError::Config` for an invalid base URL and
    /// `DataError::Network` if the HTTP client cannot be built.
    ///
    /// # Example
    /// ```no_run
    /// use form13f_data::api::{ClientConfig, Forms13fClient};
    ///
    /// # fn example() -> form13f_data::Result<()> {
    /// let client = Forms13fClient::new(ClientConfig::from_env()?)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .build()
            .map_err(DataError::Network)?;

        Ok(Self {
            client,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(config.min_interval))),
            config,
        })
    }

    /// The configuration this client was built with.
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Full URL of an `/api/v1` endpoint.
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/v1/{}",
            self.config.base_url.trim().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET an endpoint and decode its JSON body, retrying rate-limited responses.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T> {
        let url = self.endpoint(path);
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            self.rate_limiter.lock().await.wait().await;

            tracing::debug!(%url, ?query, attempt, "GET");
            let response = self
                .client
                .get(&url)
                .query(query)
                .send()
                .await
                .map_err(DataError::Network)?;

            let status = response.status();
            if status.is_success() {
                let body = response.text().await.map_err(DataError::Network)?;
                return Ok(serde_json::from_str(&body)?);
            }

            let code = status.as_u16();
            if retry.should_retry(code, attempt) {
                let delay = retry.backoff.delay(attempt);
                tracing::warn!(
                    %url,
                    status = code,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    "request throttled, retrying"
                );
                sleep(delay).await;
                attempt += 1;
                continue;
            }

            if code == 429 {
                return Err(DataError::RateLimit {
                    retry_after_ms: retry.backoff.delay(attempt).as_millis() as u64,
                });
            }
            return Err(DataError::Http { status: code, url });
        }
    }
}

/// Trim a CIK and check that it is purely numeric.
fn normalize_cik(cik: &str) -> Result<&str> {
    let cik = cik.trim();
    if cik.is_empty() || !cik.bytes().all(|b| b.is_ascii_digit()) {
        return Err(DataError::InvalidCik(cik.to_string()));
    }
    Ok(cik)
}

fn page_query(page: PageRequest) -> [(&'static str, String); 2] {
    [
        ("offset", page.offset.to_string()),
        ("limit", page.limit.to_string()),
    ]
}

#[async_trait]
impl FilingSource for Forms13fClient {
    async fn find_funds(&self, name: &str, page: PageRequest) -> Result<Vec<FundSummary>> {
        let mut query = vec![("name", name.trim().to_string())];
        query.extend(page_query(page));
        self.get_json("funds", &query).await
    }

    async fn list_filings(
        &self,
        cik: &str,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<Vec<FilingHeader>> {
        let cik = normalize_cik(cik)?;
        let mut query = vec![
            ("cik", cik.to_string()),
            ("from", from.format("%Y-%m-%d").to_string()),
            ("to", to.format("%Y-%m-%d").to_string()),
        ];
        query.extend(page_query(page));
        self.get_json("forms", &query).await
    }

    async fn list_filing_lines(
        &self,
        cik: &str,
        accession_number: &str,
        page: PageRequest,
    ) -> Result<Vec<HoldingLine>> {
        let cik = normalize_cik(cik)?;
        let mut query = vec![
            ("accession_number", accession_number.trim().to_string()),
            ("cik", cik.to_string()),
        ];
        query.extend(page_query(page));
        self.get_json("form", &query).await
    }
}

impl std::fmt::Debug for Forms13fClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Forms13fClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::retry::RetryConfig;
    use rstest::rstest;

    fn client_for(base_url: &str) -> Forms13fClient {
        Forms13fClient::new(ClientConfig::default().with_base_url(base_url)).unwrap()
    }

    #[rstest]
    #[case("https://forms13f.com", "forms", "https://forms13f.com/api/v1/forms")]
    #[case("https://forms13f.com/", "/form", "https://forms13f.com/api/v1/form")]
    #[case(" http://localhost:8080 ", "funds", "http://localhost:8080/api/v1/funds")]
    fn test_endpoint(#[case] base: &str, #[case] path: &str, #[case] expected: &str) {
        assert_eq!(client_for(base).endpoint(path), expected);
    }

    #[rstest]
    #[case("1067983", true)]
    #[case(" 0001067983 ", true)]
    #[case("", false)]
    #[case("BRK", false)]
    #[case("10679-83", false)]
    fn test_normalize_cik(#[case] cik: &str, #[case] valid: bool) {
        assert_eq!(normalize_cik(cik).is_ok(), valid);
    }

    #[test]
    fn test_rejects_invalid_base_url() {
        let result = Forms13fClient::new(ClientConfig::default().with_base_url("ftp://x"));
        assert!(matches!(result, Err(DataError::Config(_))));
    }

    #[test]
    fn test_debug_hides_internals() {
        let client = client_for("https://forms13f.com");
        let debug = format!("{client:?}");
        assert!(debug.contains("forms13f.com"));
        assert!(!debug.contains("rate_limiter"));
    }

    #[tokio::test]
    async fn test_invalid_cik_fails_before_any_request() {
        let config = ClientConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_retry(RetryConfig::disabled());
        let client = Forms13fClient::new(config).unwrap();
        let day = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();

        let result = client
            .list_filings("not-a-cik", day, day, PageRequest::default())
            .await;
        assert!(matches!(result, Err(DataError::InvalidCik(_))));
    }

    #[tokio::test]
    async fn test_rate_limiter_spacing() {
        let mut limiter = RateLimiter::new(Duration::from_millis(50));
        let start = Instant::now();
        limiter.wait().await;
        limiter.wait().await;
        limiter.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(100));
    }
}
