//! The data-access collaborator consumed by the consolidation core.

use crate::error::Result;
use crate::model::{FilingHeader, FundSummary, HoldingLine};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Default page size for filing and holding listings.
pub const DEFAULT_PAGE_SIZE: usize = 250;

/// One page of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// Number of records to skip
    pub offset: usize,
    /// Maximum number of records to return
    pub limit: usize,
}

impl PageRequest {
    /// Create a page request.
    pub const fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// First page with the given size.
    pub const fn first(limit: usize) -> Self {
        Self::new(0, limit)
    }

    /// The page following this one.
    pub const fn next(self) -> Self {
        Self::new(self.offset + self.limit, self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Paginated access to Form 13F filings.
///
/// Implementations own transport concerns (retries, rate limiting, timeouts).
/// Every operation must return at most `page.limit` records; a page shorter
/// than `page.limit` signals the end of the listing.
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// Search funds whose name contains `name`.
    async fn find_funds(&self, name: &str, page: PageRequest) -> Result<Vec<FundSummary>>;

    /// List filing headers for `cik` whose period of report lies in `from..=to`.
    ///
    /// No ordering is guaranteed; callers sort.
    async fn list_filings(
        &self,
        cik: &str,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<Vec<FilingHeader>>;

    /// List the information table lines of one filing.
    async fn list_filing_lines(
        &self,
        cik: &str,
        accession_number: &str,
        page: PageRequest,
    ) -> Result<Vec<HoldingLine>>;
}
