//! Holdings over quarters, one row per security and one column per quarter.

use crate::export::{ExportError, ExportFormat, Exporter, export_with, finish_csv};
use form13f_core::{Quarter, QuarterlyCollection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fmt;
use std::str::FromStr;

/// Quantity shown in each pivot cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PivotMetric {
    /// Market value in thousands of dollars
    #[default]
    Value,
    /// Share or principal amount
    Shares,
    /// Percentage of the quarter's total value.
    ///
    /// Each column sums to 100 on its own; cells are not shares of the value
    /// summed over all quarters.
    Fraction,
}

impl PivotMetric {
    fn title(self, company_name: &str) -> String {
        match self {
            Self::Value => format!("Value in thousands $ Over Quarters Held by {company_name}"),
            Self::Shares => format!("Number of Shares Over Quarters Held by {company_name}"),
            Self::Fraction => format!("Percentage Over Quarters Held by {company_name}"),
        }
    }

    fn format_cell(self, cell: f64) -> String {
        match self {
            Self::Fraction => format!("{cell:.2}"),
            Self::Value | Self::Shares => format!("{cell:.0}"),
        }
    }
}

impl fmt::Display for PivotMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => write!(f, "value"),
            Self::Shares => write!(f, "shares"),
            Self::Fraction => write!(f, "fraction"),
        }
    }
}

impl FromStr for PivotMetric {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "value" => Ok(Self::Value),
            "shares" => Ok(Self::Shares),
            "fraction" => Ok(Self::Fraction),
            other => Err(ExportError::InvalidMetric(other.to_string())),
        }
    }
}

/// One security across quarters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PivotRow {
    /// Issuer name
    pub name_of_issuer: String,
    /// Ticker symbol
    pub ticker: Option<String>,
    /// One cell per pivot column, `0` where the security was not held
    pub cells: Vec<f64>,
}

/// Quarter-by-quarter view of a fund's holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingsPivot {
    /// Caption naming the metric and the filer
    pub title: String,
    /// Metric shown in the cells
    pub metric: PivotMetric,
    /// Quarters, ascending
    pub quarters: Vec<Quarter>,
    /// Rows, by first-quarter cell descending
    pub rows: Vec<PivotRow>,
}

impl HoldingsPivot {
    /// Pivot every report of `collection`, or `None` when it has no reports.
    ///
    /// Rows are keyed by issuer name and ticker; if a key appears more than
    /// once in a quarter the first holding wins.
    pub fn from_collection(collection: &QuarterlyCollection, metric: PivotMetric) -> Option<Self> {
        let latest = collection.latest()?;
        let company_name = latest
            .header
            .as_ref()
            .and_then(|header| header.company_name.as_deref())
            .unwrap_or_default()
            .to_uppercase();

        let quarters: Vec<Quarter> = collection.quarters().collect();
        let mut index: HashMap<(String, Option<String>), usize> = HashMap::new();
        let mut rows: Vec<PivotRow> = Vec::new();

        for (column, (_, report)) in collection.iter().enumerate() {
            let total = report.total_value() as f64;
            let mut filled = vec![false; rows.len()];

            for holding in &report.holdings {
                let key = (holding.name_of_issuer.clone(), holding.ticker.clone());
                let row = match index.entry(key) {
                    Entry::Occupied(slot) => *slot.get(),
                    Entry::Vacant(slot) => {
                        rows.push(PivotRow {
                            name_of_issuer: holding.name_of_issuer.clone(),
                            ticker: holding.ticker.clone(),
                            cells: vec![0.0; quarters.len()],
                        });
                        filled.push(false);
                        *slot.insert(rows.len() - 1)
                    }
                };
                if filled[row] {
                    continue;
                }
                filled[row] = true;

                rows[row].cells[column] = match metric {
                    PivotMetric::Value => holding.value as f64 / 1000.0,
                    PivotMetric::Shares => holding.ssh_prnamt as f64,
                    PivotMetric::Fraction if total != 0.0 => {
                        (holding.value as f64 / total * 10_000.0).round() / 100.0
                    }
                    PivotMetric::Fraction => 0.0,
                };
            }
        }

        rows.sort_by(|a, b| b.cells[0].total_cmp(&a.cells[0]));

        Some(Self {
            title: metric.title(&company_name),
            metric,
            quarters,
            rows,
        })
    }

    /// Render the pivot as a fixed-width table.
    pub fn to_ascii_table(&self) -> String {
        let width = 48 + 13 * self.quarters.len();
        let mut output = String::new();

        output.push_str(&format!("\n{}\n", self.title));
        output.push_str(&"=".repeat(width));
        output.push('\n');
        output.push_str(&format!("{:<38} {:<8}", "Name", "Symbol"));
        for quarter in &self.quarters {
            output.push_str(&format!(" {:>12}", quarter.to_string()));
        }
        output.push('\n');
        output.push_str(&"-".repeat(width));
        output.push('\n');

        for row in &self.rows {
            let name: String = row.name_of_issuer.chars().take(38).collect();
            output.push_str(&format!(
                "{:<38} {:<8}",
                name,
                row.ticker.as_deref().unwrap_or("")
            ));
            for cell in &row.cells {
                output.push_str(&format!(" {:>12}", self.metric.format_cell(*cell)));
            }
            output.push('\n');
        }

        output
    }
}

impl Exporter for HoldingsPivot {
    fn export_to_string(&self, format: ExportFormat) -> Result<String, ExportError> {
        export_with(self, format, || {
            let mut wtr = csv::Writer::from_writer(vec![]);
            let mut header = vec!["Name".to_string(), "Symbol".to_string()];
            header.extend(self.quarters.iter().map(ToString::to_string));
            wtr.write_record(&header)?;

            for row in &self.rows {
                let mut record = vec![
                    row.name_of_issuer.clone(),
                    row.ticker.clone().unwrap_or_default(),
                ];
                record.extend(row.cells.iter().map(|cell| self.metric.format_cell(*cell)));
                wtr.write_record(&record)?;
            }
            finish_csv(wtr)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use form13f_core::{Filing, QuarterReport};
    use form13f_data::{FilingHeader, HoldingLine};
    use rstest::rstest;

    fn report(token: &str, company: &str, holdings: &[(&str, Option<&str>, &str, i64, i64)]) -> QuarterReport {
        let quarter: Quarter = token.parse().unwrap();
        let period = quarter.period_of_report();
        let filed = period.checked_add_days(Days::new(45)).unwrap();
        let header = FilingHeader::new(token, "1067983", filed, period).with_company_name(company);
        let lines = holdings.iter().map(|(issuer, ticker, cusip, value, shares)| {
            let line = HoldingLine::new(token, "1067983", *issuer, *cusip).with_position(*value, *shares);
            match ticker {
                Some(t) => line.with_ticker(*t),
                None => line,
            }
        });
        QuarterReport::from_filings(quarter, &[Filing::new(header, lines)]).unwrap()
    }

    fn collection() -> QuarterlyCollection {
        QuarterlyCollection::from_reports(
            "1067983",
            2023,
            2023,
            [
                report(
                    "2023-Q4",
                    "Berkshire Hathaway Inc.",
                    &[
                        ("APPLE INC", Some("AAPL"), "037833100", 300_000, 30),
                        ("CHUBB LIMITED", Some("CB"), "H1467J104", 100_000, 10),
                    ],
                ),
                report(
                    "2023-Q3",
                    "BERKSHIRE HATHAWAY INC",
                    &[
                        ("APPLE INC", Some("AAPL"), "037833100", 150_000, 15),
                        ("BANK AMER CORP", Some("BAC"), "060505104", 250_000, 25),
                        ("BANK AMER CORP", Some("BAC"), "060505682", 1_000, 1),
                    ],
                ),
            ],
        )
    }

    #[rstest]
    #[case("value", PivotMetric::Value)]
    #[case("shares", PivotMetric::Shares)]
    #[case("fraction", PivotMetric::Fraction)]
    fn test_metric_from_str(#[case] text: &str, #[case] expected: PivotMetric) {
        assert_eq!(text.parse::<PivotMetric>().unwrap(), expected);
        assert_eq!(expected.to_string(), text);
    }

    #[test]
    fn test_invalid_metric() {
        assert!(matches!(
            "weight".parse::<PivotMetric>(),
            Err(ExportError::InvalidMetric(m)) if m == "weight"
        ));
    }

    #[test]
    fn test_empty_collection() {
        let empty = QuarterlyCollection::from_reports("1067983", 2023, 2023, Vec::<QuarterReport>::new());
        assert!(HoldingsPivot::from_collection(&empty, PivotMetric::Value).is_none());
    }

    #[test]
    fn test_value_pivot() {
        let pivot = HoldingsPivot::from_collection(&collection(), PivotMetric::Value).unwrap();

        assert_eq!(pivot.title, "Value in thousands $ Over Quarters Held by BERKSHIRE HATHAWAY INC.");
        let quarters: Vec<String> = pivot.quarters.iter().map(ToString::to_string).collect();
        assert_eq!(quarters, ["2023-Q3", "2023-Q4"]);

        let names: Vec<&str> = pivot.rows.iter().map(|r| r.name_of_issuer.as_str()).collect();
        assert_eq!(names, ["BANK AMER CORP", "APPLE INC", "CHUBB LIMITED"]);
        // first holding of a repeated (issuer, ticker) key wins
        assert_eq!(pivot.rows[0].cells, [250.0, 0.0]);
        assert_eq!(pivot.rows[1].cells, [150.0, 300.0]);
        assert_eq!(pivot.rows[2].cells, [0.0, 100.0]);
    }

    #[test]
    fn test_fraction_pivot_per_quarter() {
        let pivot = HoldingsPivot::from_collection(&collection(), PivotMetric::Fraction).unwrap();

        let apple = pivot.rows.iter().find(|r| r.name_of_issuer == "APPLE INC").unwrap();
        assert_eq!(apple.cells, [37.41, 75.0]);
        assert!(pivot.title.starts_with("Percentage Over Quarters"));
    }

    #[test]
    fn test_shares_pivot_csv() {
        let pivot = HoldingsPivot::from_collection(&collection(), PivotMetric::Shares).unwrap();

        let csv = pivot.export_to_string(ExportFormat::Csv).unwrap();

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Name,Symbol,2023-Q3,2023-Q4");
        assert_eq!(lines[1], "BANK AMER CORP,BAC,25,0");
        assert_eq!(lines[2], "APPLE INC,AAPL,15,30");
    }

    #[test]
    fn test_ascii_table() {
        let pivot = HoldingsPivot::from_collection(&collection(), PivotMetric::Fraction).unwrap();

        let table = pivot.to_ascii_table();

        assert!(table.contains("Percentage Over Quarters Held by"));
        assert!(table.contains("2023-Q4"));
        assert!(table.contains("37.41"));
    }
}
