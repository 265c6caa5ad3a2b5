//! Consolidated report of one fund for one quarter.

use crate::consolidate::{chronological, consolidate};
use crate::error::Result;
use crate::filing::{Filing, fetch_filings_for_period};
use crate::period::Quarter;
use chrono::NaiveDate;
use form13f_data::{FilingSource, HoldingLine};
use serde::{Deserialize, Serialize};

/// Header merged from every filing of a quarter.
///
/// List fields hold one entry per filing in filing order. Scalar metadata
/// comes from the earliest filing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportHeader {
    /// Document URLs of the filings that carry one
    pub urls: Vec<String>,
    /// Accession numbers
    pub accession_numbers: Vec<String>,
    /// Filing dates
    pub filing_dates: Vec<NaiveDate>,
    /// Quarter the report covers
    pub report_quarter: Quarter,
    /// Period of report shared by all filings
    pub period_of_report: NaiveDate,
    /// Filer CIK
    pub cik: String,
    /// Filer name
    pub company_name: Option<String>,
    /// Submission type of the earliest filing
    pub submission_type: Option<String>,
    /// Number of public documents in the submission
    pub public_document_count: Option<i64>,
    /// Date of the last change to the filer's record
    pub date_as_of_change: Option<String>,
    /// Effectiveness date
    pub effectiveness_date: Option<String>,
    /// Form type of the earliest filing
    pub form_type: Option<String>,
    /// IRS employer identification number
    pub irs_number: Option<String>,
    /// State of incorporation
    pub state_of_incorporation: Option<String>,
    /// Fiscal year end (MMDD)
    pub fiscal_year_end: Option<String>,
    /// Securities act
    pub sec_act: Option<String>,
    /// Business address
    pub business_address: Option<String>,
    /// Business phone
    pub business_phone: Option<String>,
    /// Information table value total of the earliest filing
    pub table_value_total: Option<i64>,
    /// Information table entry total of the earliest filing
    pub table_entry_total: Option<i64>,
}

impl ReportHeader {
    /// Merge the headers of `filings`, or `None` if there are none.
    pub fn merge(quarter: Quarter, filings: &[Filing]) -> Option<Self> {
        let ordered = chronological(filings);
        let first = &ordered.first()?.header;

        Some(Self {
            urls: ordered.iter().filter_map(|f| f.header.url.clone()).collect(),
            accession_numbers: ordered
                .iter()
                .map(|f| f.accession_number().to_string())
                .collect(),
            filing_dates: ordered.iter().map(|f| f.filed_as_of_date()).collect(),
            report_quarter: quarter,
            period_of_report: first.period_of_report,
            cik: first.cik.clone(),
            company_name: first.company_name.clone(),
            submission_type: first.submission_type.clone(),
            public_document_count: first.public_document_count,
            date_as_of_change: first.date_as_of_change.clone(),
            effectiveness_date: first.effectiveness_date.clone(),
            form_type: first.form_type.clone(),
            irs_number: first.irs_number.clone(),
            state_of_incorporation: first.state_of_incorporation.clone(),
            fiscal_year_end: first.fiscal_year_end.clone(),
            sec_act: first.sec_act.clone(),
            business_address: first.business_address.clone(),
            business_phone: first.business_phone.clone(),
            table_value_total: first.table_value_total,
            table_entry_total: first.table_entry_total,
        })
    }
}

/// Net holdings of one fund for one quarter.
///
/// A report without a header means the fund filed nothing for the quarter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterReport {
    /// Quarter covered
    pub quarter: Quarter,
    /// Merged header, `None` when there were no filings
    pub header: Option<ReportHeader>,
    /// Consolidated holdings ordered by issuer name
    pub holdings: Vec<HoldingLine>,
}

impl QuarterReport {
    /// A report with no filings.
    pub const fn empty(quarter: Quarter) -> Self {
        Self {
            quarter,
            header: None,
            holdings: Vec::new(),
        }
    }

    /// Build a report from the filings of one period.
    ///
    /// # Errors
    /// Propagates any consolidation error.
    pub fn from_filings(quarter: Quarter, filings: &[Filing]) -> Result<Self> {
        let holdings = consolidate(filings)?;
        Ok(Self {
            quarter,
            header: ReportHeader::merge(quarter, filings),
            holdings,
        })
    }

    /// Fetch and consolidate the report for a `YYYY-Q<1-4>` token.
    ///
    /// # Errors
    /// Returns `InvalidFormat` for a malformed token, otherwise any error of
    /// [`assemble_quarter_report`].
    pub async fn fetch<S>(source: &S, cik: &str, token: &str) -> Result<Self>
    where
        S: FilingSource + ?Sized,
    {
        let quarter: Quarter = token.parse()?;
        assemble_quarter_report(source, cik, quarter).await
    }

    /// Whether the report has neither header nor holdings.
    pub fn is_empty(&self) -> bool {
        self.header.is_none() && self.holdings.is_empty()
    }

    /// Sum of holding values.
    pub fn total_value(&self) -> i64 {
        self.holdings.iter().map(|h| h.value).sum()
    }
}

/// Fetch every filing of `cik` for `quarter` and consolidate them.
///
/// A quarter without filings yields an empty report.
///
/// # Errors
/// Returns data-access errors from the source and consolidation errors
/// from [`consolidate`].
pub async fn assemble_quarter_report<S>(source: &S, cik: &str, quarter: Quarter) -> Result<QuarterReport>
where
    S: FilingSource + ?Sized,
{
    let filings = fetch_filings_for_period(source, cik, quarter.period_of_report()).await?;
    if filings.is_empty() {
        tracing::info!(cik, %quarter, "no filings for quarter");
        return Ok(QuarterReport::empty(quarter));
    }

    let report = QuarterReport::from_filings(quarter, &filings)?;
    tracing::info!(
        cik,
        %quarter,
        filings = filings.len(),
        holdings = report.holdings.len(),
        "assembled quarter report"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Form13fError;
    use form13f_data::{Amendment, FilingHeader, InMemorySource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn source() -> InMemorySource {
        let period = date(2023, 12, 31);
        let mut original = FilingHeader::new("0001", "1067983", date(2024, 2, 14), period)
            .with_company_name("BERKSHIRE HATHAWAY INC")
            .with_url("https://example.com/0001.xml")
            .with_totals(170, 3);
        original.public_document_count = Some(2);
        original.date_as_of_change = Some("2024-02-14".to_string());
        original.effectiveness_date = Some("2024-02-14".to_string());
        original.sec_act = Some("1934 Act".to_string());
        let amendment = FilingHeader::new("0002", "1067983", date(2024, 5, 15), period)
            .with_amendment(Amendment::NewHoldings)
            .with_company_name("Berkshire Hathaway Inc.")
            .with_totals(30, 1);
        InMemorySource::new()
            .with_filing(
                amendment,
                [HoldingLine::new("0002", "1067983", "CHUBB LIMITED", "H1467J104").with_position(30, 3)],
            )
            .with_filing(
                original,
                [
                    HoldingLine::new("0001", "1067983", "APPLE INC", "037833100").with_position(100, 10),
                    HoldingLine::new("0001", "1067983", "APPLE INC", "037833100").with_position(50, 5),
                    HoldingLine::new("0001", "1067983", "BANK AMER CORP", "060505104").with_position(20, 2),
                ],
            )
    }

    #[tokio::test]
    async fn test_fetch_merges_header_and_holdings() {
        let report = QuarterReport::fetch(&source(), "1067983", "2023-Q4").await.unwrap();

        assert_eq!(report.quarter.to_string(), "2023-Q4");
        let header = report.header.as_ref().unwrap();
        assert_eq!(header.accession_numbers, ["0001", "0002"]);
        assert_eq!(header.filing_dates, [date(2024, 2, 14), date(2024, 5, 15)]);
        assert_eq!(header.urls, ["https://example.com/0001.xml"]);
        assert_eq!(header.company_name.as_deref(), Some("BERKSHIRE HATHAWAY INC"));
        assert_eq!(header.period_of_report, date(2023, 12, 31));
        assert_eq!(header.table_value_total, Some(170));
        assert_eq!(header.table_entry_total, Some(3));
        assert_eq!(header.public_document_count, Some(2));
        assert_eq!(header.date_as_of_change.as_deref(), Some("2024-02-14"));
        assert_eq!(header.effectiveness_date.as_deref(), Some("2024-02-14"));
        assert_eq!(header.sec_act.as_deref(), Some("1934 Act"));

        let issuers: Vec<&str> = report.holdings.iter().map(|h| h.name_of_issuer.as_str()).collect();
        assert_eq!(issuers, ["APPLE INC", "BANK AMER CORP", "CHUBB LIMITED"]);
        assert_eq!(report.holdings[0].value, 150);
        assert_eq!(report.total_value(), 200);
    }

    #[tokio::test]
    async fn test_quarter_without_filings_is_empty() {
        let report = QuarterReport::fetch(&source(), "1067983", "2023-Q3").await.unwrap();
        assert!(report.is_empty());
        assert_eq!(report.total_value(), 0);
    }

    #[tokio::test]
    async fn test_invalid_token_makes_no_request() {
        let source = source();
        let err = QuarterReport::fetch(&source, "1067983", "2023/Q4").await.unwrap_err();
        assert!(matches!(err, Form13fError::InvalidFormat(_)));
        assert_eq!(source.request_count(), 0);
    }

    #[test]
    fn test_merged_header_serializes_totals() {
        let quarter: Quarter = "2023-Q4".parse().unwrap();
        let header = FilingHeader::new("0001", "1067983", date(2024, 2, 14), date(2023, 12, 31))
            .with_totals(354_000, 47);

        let merged = ReportHeader::merge(quarter, &[Filing::new(header, Vec::<HoldingLine>::new())]).unwrap();
        let json = serde_json::to_value(&merged).unwrap();

        assert_eq!(json["table_value_total"], 354_000);
        assert_eq!(json["table_entry_total"], 47);
    }

    #[test]
    fn test_merge_of_nothing() {
        let quarter: Quarter = "2023-Q4".parse().unwrap();
        assert!(ReportHeader::merge(quarter, &[]).is_none());
    }
}
