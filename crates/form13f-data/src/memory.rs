//! In-memory filing source.
//!
//! Serves funds, filings and information table lines from memory with the
//! same paging contract as the HTTP service. Snapshots can be loaded from
//! and saved to JSON, which makes it usable for offline runs as well as tests.

use crate::error::Result;
use crate::model::{FilingHeader, FundSummary, HoldingLine};
use crate::source::{FilingSource, PageRequest};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [`FilingSource`] backed by vectors.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct InMemorySource {
    /// Funds returned by the name search
    #[serde(default)]
    pub funds: Vec<FundSummary>,
    /// Filing headers
    #[serde(default)]
    pub filings: Vec<FilingHeader>,
    /// Raw information table lines of every filing
    #[serde(default)]
    pub lines: Vec<HoldingLine>,
    #[serde(skip)]
    requests: AtomicUsize,
}

impl InMemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fund to the search index.
    pub fn with_fund(mut self, cik: impl Into<String>, name: impl Into<String>) -> Self {
        self.funds.push(FundSummary {
            cik: cik.into(),
            name: Some(name.into()),
        });
        self
    }

    /// Add a filing together with its raw lines.
    pub fn with_filing(
        mut self,
        header: FilingHeader,
        lines: impl IntoIterator<Item = HoldingLine>,
    ) -> Self {
        self.filings.push(header);
        self.lines.extend(lines);
        self
    }

    /// Load a snapshot from JSON.
    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write the snapshot as JSON.
    pub fn to_writer(&self, writer: impl Write) -> Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Number of page requests served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::Relaxed)
    }

    fn record_request(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

/// CIKs compare equal with or without zero padding.
fn same_cik(a: &str, b: &str) -> bool {
    a.trim().trim_start_matches('0') == b.trim().trim_start_matches('0')
}

fn page_of<'a, T: Clone + 'a>(items: impl Iterator<Item = &'a T>, page: PageRequest) -> Vec<T> {
    items.skip(page.offset).take(page.limit).cloned().collect()
}

#[async_trait]
impl FilingSource for InMemorySource {
    async fn find_funds(&self, name: &str, page: PageRequest) -> Result<Vec<FundSummary>> {
        self.record_request();
        let needle = name.trim().to_lowercase();
        let matches = self.funds.iter().filter(|fund| {
            fund.name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle))
        });
        Ok(page_of(matches, page))
    }

    async fn list_filings(
        &self,
        cik: &str,
        from: NaiveDate,
        to: NaiveDate,
        page: PageRequest,
    ) -> Result<Vec<FilingHeader>> {
        self.record_request();
        let matches = self.filings.iter().filter(|filing| {
            same_cik(&filing.cik, cik)
                && filing.period_of_report >= from
                && filing.period_of_report <= to
        });
        Ok(page_of(matches, page))
    }

    async fn list_filing_lines(
        &self,
        cik: &str,
        accession_number: &str,
        page: PageRequest,
    ) -> Result<Vec<HoldingLine>> {
        self.record_request();
        let matches = self
            .lines
            .iter()
            .filter(|line| line.accession_number == accession_number && same_cik(&line.cik, cik));
        Ok(page_of(matches, page))
    }
}
