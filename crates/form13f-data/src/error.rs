//! Error types for data operations.

use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while talking to the filings service.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("HTTP {status} from {url}")]
    Http {
        /// Status code returned by the service
        status: u16,
        /// Request URL
        url: String,
    },

    /// Rate limit error
    #[error("Rate limit exceeded, please retry after {retry_after_ms}ms")]
    RateLimit {
        /// Milliseconds to wait before retrying
        retry_after_ms: u64,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid CIK
    #[error("Invalid CIK: {0}")]
    InvalidCik(String),

    /// Invalid client configuration
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl DataError {
    /// Whether the service asked us to slow down.
    pub const fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimit { .. } | Self::Http { status: 429, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited() {
        let http_429 = DataError::Http {
            status: 429,
            url: "https://example.com".to_string(),
        };
        assert!(http_429.is_rate_limited());
        assert!(DataError::RateLimit { retry_after_ms: 100 }.is_rate_limited());

        let http_500 = DataError::Http {
            status: 500,
            url: "https://example.com".to_string(),
        };
        assert!(!http_500.is_rate_limited());
        assert!(!DataError::InvalidCik(String::new()).is_rate_limited());
    }

    #[test]
    fn test_display() {
        let err = DataError::Http {
            status: 404,
            url: "https://example.com/api/v1/forms".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP 404 from https://example.com/api/v1/forms");
    }
}
