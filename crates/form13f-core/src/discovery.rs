//! Looking up funds and their most recent filing period.

use crate::error::Result;
use chrono::NaiveDate;
use form13f_data::{DEFAULT_PAGE_SIZE, FilingSource, PageRequest, collect_pages};

/// Maximum number of funds returned by a name search.
pub const FUND_SEARCH_LIMIT: usize = 10;

/// Earliest period searched for a fund's filings.
fn search_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2010, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// Latest period searched for a fund's filings.
fn search_window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2030, 1, 1).unwrap_or(NaiveDate::MAX)
}

/// CIKs of the funds whose name matches `name`, at most [`FUND_SEARCH_LIMIT`].
pub async fn find_ciks_by_name<S>(source: &S, name: &str) -> Result<Vec<String>>
where
    S: FilingSource + ?Sized,
{
    let funds = source
        .find_funds(name, PageRequest::first(FUND_SEARCH_LIMIT))
        .await?;
    tracing::debug!(name, found = funds.len(), "searched funds");
    Ok(funds.into_iter().map(|fund| fund.cik).collect())
}

/// Most recent period of report `cik` has filed for, or `None` without filings.
pub async fn latest_period_of_report<S>(source: &S, cik: &str) -> Result<Option<NaiveDate>>
where
    S: FilingSource + ?Sized,
{
    let (from, to) = (search_window_start(), search_window_end());
    let headers = collect_pages(DEFAULT_PAGE_SIZE, |page| source.list_filings(cik, from, to, page)).await?;
    Ok(headers.iter().map(|header| header.period_of_report).max())
}
