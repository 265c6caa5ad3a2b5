#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/form13f/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod collection;
pub mod consolidate;
pub mod discovery;
pub mod error;
pub mod filing;
pub mod period;
pub mod report;

// Re-export the data-access crate
pub use form13f_data as data;

pub use aggregate::{HoldingsAccumulator, aggregate_holdings, sort_by_issuer};
pub use collection::QuarterlyCollection;
pub use consolidate::{chronological, consolidate};
pub use discovery::{FUND_SEARCH_LIMIT, find_ciks_by_name, latest_period_of_report};
pub use error::{Form13fError, Result};
pub use filing::{Filing, fetch_filings_for_period};
pub use period::{Quarter, quarter_to_period_of_report};
pub use report::{QuarterReport, ReportHeader, assemble_quarter_report};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
