//! Quarterly reports of one fund over a range of years.

use crate::error::Result;
use crate::period::Quarter;
use crate::report::{QuarterReport, assemble_quarter_report};
use chrono::{NaiveDate, Utc};
use form13f_data::FilingSource;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Non-empty quarterly reports of one fund, ordered by quarter.
///
/// Built once over an inclusive year range. Quarters after the current one
/// are never requested and quarters without filings are left out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuarterlyCollection {
    cik: String,
    from_year: i32,
    to_year: i32,
    reports: BTreeMap<Quarter, QuarterReport>,
}

impl QuarterlyCollection {
    /// Assemble every quarter of `from_year..=to_year` up to today.
    ///
    /// # Errors
    /// Returns `InvalidYearRange` if `from_year > to_year`, and aborts on the
    /// first quarter that fails to assemble.
    pub async fn build<S>(source: &S, cik: &str, from_year: i32, to_year: i32) -> Result<Self>
    where
        S: FilingSource + ?Sized,
    {
        Self::build_as_of(source, cik, from_year, to_year, Utc::now().date_naive()).await
    }

    /// Like [`Self::build`], treating `today` as the current date.
    pub async fn build_as_of<S>(
        source: &S,
        cik: &str,
        from_year: i32,
        to_year: i32,
        today: NaiveDate,
    ) -> Result<Self>
    where
        S: FilingSource + ?Sized,
    {
        Self::build_with_progress(source, cik, from_year, to_year, today, |_, _| {}).await
    }

    /// Like [`Self::build_as_of`], calling `on_quarter` after each quarter is assembled.
    pub async fn build_with_progress<S, F>(
        source: &S,
        cik: &str,
        from_year: i32,
        to_year: i32,
        today: NaiveDate,
        mut on_quarter: F,
    ) -> Result<Self>
    where
        S: FilingSource + ?Sized,
        F: FnMut(Quarter, &QuarterReport),
    {
        let quarters = Quarter::range(from_year, to_year, today)?;
        tracing::info!(cik, from_year, to_year, quarters = quarters.len(), "building collection");

        let mut reports = Vec::with_capacity(quarters.len());
        for quarter in quarters {
            let report = assemble_quarter_report(source, cik, quarter).await?;
            on_quarter(quarter, &report);
            reports.push(report);
        }

        Ok(Self::from_reports(cik, from_year, to_year, reports))
    }

    /// Collect already assembled reports, dropping empty ones.
    pub fn from_reports(
        cik: impl Into<String>,
        from_year: i32,
        to_year: i32,
        reports: impl IntoIterator<Item = QuarterReport>,
    ) -> Self {
        Self {
            cik: cik.into(),
            from_year,
            to_year,
            reports: reports
                .into_iter()
                .filter(|report| !report.is_empty())
                .map(|report| (report.quarter, report))
                .collect(),
        }
    }

    /// Fund CIK.
    pub fn cik(&self) -> &str {
        &self.cik
    }

    /// Requested inclusive year range.
    pub const fn year_range(&self) -> (i32, i32) {
        (self.from_year, self.to_year)
    }

    /// Report for `quarter`, if the fund filed for it.
    pub fn get(&self, quarter: &Quarter) -> Option<&QuarterReport> {
        self.reports.get(quarter)
    }

    /// Reports in ascending quarter order.
    pub fn iter(&self) -> impl Iterator<Item = (&Quarter, &QuarterReport)> {
        self.reports.iter()
    }

    /// Quarters present, ascending.
    pub fn quarters(&self) -> impl Iterator<Item = Quarter> + '_ {
        self.reports.keys().copied()
    }

    /// Most recent report.
    pub fn latest(&self) -> Option<&QuarterReport> {
        self.reports.values().next_back()
    }

    /// Number of reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// Whether no quarter produced a report.
    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl<'a> IntoIterator for &'a QuarterlyCollection {
    type Item = (&'a Quarter, &'a QuarterReport);
    type IntoIter = std::collections::btree_map::Iter<'a, Quarter, QuarterReport>;

    fn into_iter(self) -> Self::IntoIter {
        self.reports.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Form13fError;
    use form13f_data::{FilingHeader, HoldingLine, InMemorySource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn quarter(token: &str) -> Quarter {
        token.parse().unwrap()
    }

    fn source() -> InMemorySource {
        let mut source = InMemorySource::new();
        for (accession, filed, period) in [
            ("0001", date(2023, 5, 15), date(2023, 3, 31)),
            ("0002", date(2023, 11, 14), date(2023, 9, 30)),
            ("0003", date(2024, 2, 14), date(2023, 12, 31)),
        ] {
            let header = FilingHeader::new(accession, "1067983", filed, period);
            let line = HoldingLine::new(accession, "1067983", "APPLE INC", "037833100").with_position(100, 10);
            source = source.with_filing(header, [line]);
        }
        source
    }

    #[tokio::test]
    async fn test_skips_empty_quarters() {
        let collection = QuarterlyCollection::build_as_of(&source(), "1067983", 2023, 2023, date(2025, 1, 1))
            .await
            .unwrap();

        let quarters: Vec<String> = collection.quarters().map(|q| q.to_string()).collect();
        assert_eq!(quarters, ["2023-Q1", "2023-Q3", "2023-Q4"]);
        assert!(collection.get(&quarter("2023-Q2")).is_none());
        assert_eq!(collection.latest().unwrap().quarter, quarter("2023-Q4"));
        assert_eq!(collection.year_range(), (2023, 2023));
        assert_eq!(collection.cik(), "1067983");
    }

    #[tokio::test]
    async fn test_never_requests_future_quarters() {
        let source = source();
        let mut seen = Vec::new();

        let collection = QuarterlyCollection::build_with_progress(
            &source,
            "1067983",
            2023,
            2030,
            date(2023, 8, 1),
            |q, _| seen.push(q.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(seen, ["2023-Q1", "2023-Q2", "2023-Q3"]);
        assert_eq!(collection.len(), 2);
        // one listing request per quarter plus one line request per filing found
        assert_eq!(source.request_count(), 5);
    }

    #[tokio::test]
    async fn test_reversed_range() {
        let err = QuarterlyCollection::build_as_of(&source(), "1067983", 2024, 2023, date(2025, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, Form13fError::InvalidYearRange { from: 2024, to: 2023 }));
    }

    #[test]
    fn test_from_reports_drops_empty() {
        let collection = QuarterlyCollection::from_reports(
            "1067983",
            2023,
            2023,
            [QuarterReport::empty(quarter("2023-Q1"))],
        );
        assert!(collection.is_empty());
        assert_eq!(collection.iter().count(), 0);
    }
}
