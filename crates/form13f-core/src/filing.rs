//! A filing together with its aggregated holdings.

use crate::aggregate::aggregate_holdings;
use crate::error::Result;
use chrono::NaiveDate;
use form13f_data::{
    Amendment, DEFAULT_PAGE_SIZE, FilingHeader, FilingSource, HoldingLine, collect_pages,
};
use serde::{Deserialize, Serialize};

/// One submitted 13F document and its holdings, unique by CUSIP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filing {
    /// Cover page and header data
    pub header: FilingHeader,
    /// Aggregated holdings, ordered by issuer name
    pub holdings: Vec<HoldingLine>,
}

impl Filing {
    /// Build a filing from raw information table lines, aggregating them by CUSIP.
    pub fn new(header: FilingHeader, lines: impl IntoIterator<Item = HoldingLine>) -> Self {
        Self {
            header,
            holdings: aggregate_holdings(lines),
        }
    }

    /// Fetch every information table line of `header` and aggregate them.
    pub async fn fetch<S>(source: &S, header: FilingHeader) -> Result<Self>
    where
        S: FilingSource + ?Sized,
    {
        let lines = collect_pages(DEFAULT_PAGE_SIZE, |page| {
            source.list_filing_lines(&header.cik, &header.accession_number, page)
        })
        .await?;

        tracing::debug!(
            accession_number = %header.accession_number,
            lines = lines.len(),
            "fetched information table"
        );
        Ok(Self::new(header, lines))
    }

    /// Accession number of the filing.
    pub fn accession_number(&self) -> &str {
        &self.header.accession_number
    }

    /// Date the filing was accepted.
    pub const fn filed_as_of_date(&self) -> NaiveDate {
        self.header.filed_as_of_date
    }

    /// Period of report.
    pub const fn period_of_report(&self) -> NaiveDate {
        self.header.period_of_report
    }

    /// Amendment marker.
    pub fn amendment(&self) -> Amendment {
        self.header.amendment()
    }

    /// Sum of holding values.
    pub fn total_value(&self) -> i64 {
        self.holdings.iter().map(|h| h.value).sum()
    }
}

/// Fetch all filings of `cik` for one period of report, ordered by filing date.
///
/// Each filing's information table is fetched and aggregated. Requests are
/// issued one at a time.
pub async fn fetch_filings_for_period<S>(
    source: &S,
    cik: &str,
    period_of_report: NaiveDate,
) -> Result<Vec<Filing>>
where
    S: FilingSource + ?Sized,
{
    let mut headers = collect_pages(DEFAULT_PAGE_SIZE, |page| {
        source.list_filings(cik, period_of_report, period_of_report, page)
    })
    .await?;
    headers.sort_by_key(|header| header.filed_as_of_date);

    tracing::debug!(cik, %period_of_report, filings = headers.len(), "listed filings");

    let mut filings = Vec::with_capacity(headers.len());
    for header in headers {
        filings.push(Filing::fetch(source, header).await?);
    }
    Ok(filings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use form13f_data::InMemorySource;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_aggregates_across_pages() {
        let period = date(2023, 12, 31);
        let header = FilingHeader::new("0001", "1067983", date(2024, 2, 14), period);
        // 300 lines over 150 securities, so the listing spans two pages
        let lines = (0..300).map(|i| {
            let n = i % 150;
            HoldingLine::new("0001", "1067983", format!("ISSUER {n:03}"), format!("C{n:03}"))
                .with_position(10, 1)
        });
        let source = InMemorySource::new().with_filing(header.clone(), lines);

        let filing = Filing::fetch(&source, header).await.unwrap();

        assert_eq!(filing.holdings.len(), 150);
        assert!(filing.holdings.iter().all(|h| h.value == 20 && h.ssh_prnamt == 2));
        assert_eq!(filing.total_value(), 3000);
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_fetch_filings_sorted_by_filing_date() {
        let period = date(2023, 12, 31);
        let late = FilingHeader::new("0002", "1067983", date(2024, 5, 15), period)
            .with_amendment(Amendment::NewHoldings);
        let early = FilingHeader::new("0001", "1067983", date(2024, 2, 14), period);
        let other_period = FilingHeader::new("0003", "1067983", date(2023, 11, 14), date(2023, 9, 30));
        let source = InMemorySource::new()
            .with_filing(late, [HoldingLine::new("0002", "1067983", "B", "2")])
            .with_filing(early, [HoldingLine::new("0001", "1067983", "A", "1")])
            .with_filing(other_period, Vec::<HoldingLine>::new());

        let filings = fetch_filings_for_period(&source, "1067983", period).await.unwrap();

        let accessions: Vec<&str> = filings.iter().map(Filing::accession_number).collect();
        assert_eq!(accessions, ["0001", "0002"]);
        assert_eq!(filings[1].amendment(), Amendment::NewHoldings);
    }

    #[tokio::test]
    async fn test_no_filings() {
        let source = InMemorySource::new();
        let filings = fetch_filings_for_period(&source, "1067983", date(2023, 12, 31))
            .await
            .unwrap();
        assert!(filings.is_empty());
    }
}
