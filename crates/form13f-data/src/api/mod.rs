//! HTTP access to the Form 13F filings service.
//!
//! This module provides:
//! - [`ClientConfig`], loaded from defaults or `FORM13F_*` environment variables
//! - [`RetryConfig`], exponential backoff for rate-limited responses
//! - [`Forms13fClient`], the [`FilingSource`](crate::FilingSource) implementation
//!
//! # Example
//!
//! ```no_run
//! use form13f_data::api::{ClientConfig, Forms13fClient};
//! use form13f_data::{FilingSource, PageRequest};
//! use chrono::NaiveDate;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Forms13fClient::new(ClientConfig::default())?;
//!     let period = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
//!     let filings = client
//!         .list_filings("1067983", period, period, PageRequest::default())
//!         .await?;
//!     println!("Found {} filings", filings.len());
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod retry;

pub use client::Forms13fClient;
pub use config::ClientConfig;
pub use retry::{Backoff, RetryConfig};
