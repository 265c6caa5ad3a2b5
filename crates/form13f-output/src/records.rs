//! Flat per-holding rows joining report header and holding fields.

use crate::export::{ExportError, ExportFormat, Exporter, export_with, records_to_csv};
use chrono::NaiveDate;
use form13f_core::{Quarter, QuarterReport, QuarterlyCollection};
use serde::{Deserialize, Serialize};

/// One holding of one quarterly report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingRecord {
    /// Filer CIK
    pub cik: String,
    /// Filer name
    pub company_name: Option<String>,
    /// Period of report
    pub period_of_report: NaiveDate,
    /// Quarter of the report
    pub report_quarter: Quarter,
    /// Issuer name
    pub name_of_issuer: String,
    /// Security class title
    pub title_of_class: String,
    /// CUSIP
    pub cusip: String,
    /// Ticker symbol
    pub ticker: Option<String>,
    /// Market value as reported
    pub value: i64,
    /// Share or principal amount
    pub ssh_prnamt: i64,
    /// Quantity type code
    pub ssh_prnamt_type: Option<String>,
}

impl HoldingRecord {
    /// Rows of one report, in holdings order. A report without header has none.
    pub fn from_report(report: &QuarterReport) -> Vec<Self> {
        let Some(header) = &report.header else {
            return Vec::new();
        };

        report
            .holdings
            .iter()
            .map(|holding| Self {
                cik: header.cik.clone(),
                company_name: header.company_name.clone(),
                period_of_report: header.period_of_report,
                report_quarter: header.report_quarter,
                name_of_issuer: holding.name_of_issuer.clone(),
                title_of_class: holding.title_of_class.clone(),
                cusip: holding.cusip.clone(),
                ticker: holding.ticker.clone(),
                value: holding.value,
                ssh_prnamt: holding.ssh_prnamt,
                ssh_prnamt_type: holding.ssh_prnamt_type.clone(),
            })
            .collect()
    }

    /// Rows of every report, quarters ascending.
    pub fn from_collection(collection: &QuarterlyCollection) -> Vec<Self> {
        collection
            .iter()
            .flat_map(|(_, report)| Self::from_report(report))
            .collect()
    }
}

/// Render rows as a fixed-width table.
pub fn to_ascii_table(records: &[HoldingRecord]) -> String {
    let mut output = String::new();

    if let Some(first) = records.first() {
        output.push_str(&format!(
            "\n{} ({}) {}\n",
            first.company_name.as_deref().unwrap_or("UNKNOWN FILER"),
            first.cik,
            first.report_quarter
        ));
        output.push_str(&format!("Period of report: {}\n", first.period_of_report));
    }
    output.push_str(&"=".repeat(96));
    output.push('\n');
    output.push_str(&format!(
        "{:<36} {:<14} {:<10} {:<8} {:>15} {:>15}\n",
        "Issuer", "Class", "CUSIP", "Symbol", "Value", "Shares"
    ));
    output.push_str(&"-".repeat(96));
    output.push('\n');

    for record in records {
        output.push_str(&format!(
            "{:<36} {:<14} {:<10} {:<8} {:>15} {:>15}\n",
            truncate(&record.name_of_issuer, 36),
            truncate(&record.title_of_class, 14),
            record.cusip,
            record.ticker.as_deref().unwrap_or(""),
            record.value,
            record.ssh_prnamt
        ));
    }

    output.push_str(&"-".repeat(96));
    output.push('\n');
    let total: i64 = records.iter().map(|r| r.value).sum();
    output.push_str(&format!("{:<72} {:>15}\n", format!("{} holdings", records.len()), total));
    output
}

fn truncate(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}

impl Exporter for Vec<HoldingRecord> {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_with(self, format, || records_to_csv(self))
    }
}
