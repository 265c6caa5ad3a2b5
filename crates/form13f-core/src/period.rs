//! Calendar quarters and their period-of-report dates.

use crate::error::{Form13fError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar quarter such as `2023-Q4`.
///
/// Quarters order chronologically, which is also the order of their tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quarter {
    year: i32,
    quarter: u8,
}

impl Quarter {
    /// Create a quarter, checking that `quarter` is 1 through 4 and the year is a valid date year.
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        let candidate = Self { year, quarter };
        if !(1..=4).contains(&quarter) || candidate.end_date().is_none() {
            return Err(Form13fError::InvalidFormat(candidate.to_string()));
        }
        Ok(candidate)
    }

    /// The quarter a date falls in.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3 + 1) as u8,
        }
    }

    /// Calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Quarter number, 1 through 4.
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Last calendar day of the quarter, the date 13F filings report as of.
    pub fn period_of_report(&self) -> NaiveDate {
        // the year is range-checked when the quarter is built
        self.end_date().unwrap_or(NaiveDate::MAX)
    }

    /// The following quarter.
    pub const fn next(&self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// All quarters of `from_year..=to_year` in order, stopping at the quarter containing `today`.
    ///
    /// # Errors
    /// Returns `Form13fError::InvalidYearRange` if `from_year > to_year`.
    pub fn range(from_year: i32, to_year: i32, today: NaiveDate) -> Result<Vec<Self>> {
        if from_year > to_year {
            return Err(Form13fError::InvalidYearRange {
                from: from_year,
                to: to_year,
            });
        }

        let current = Self::containing(today);
        let mut quarters = Vec::new();
        for year in from_year..=to_year {
            for quarter in 1..=4 {
                let q = Self::new(year, quarter)?;
                if q > current {
                    return Ok(quarters);
                }
                quarters.push(q);
            }
        }
        Ok(quarters)
    }

    fn end_date(&self) -> Option<NaiveDate> {
        let (month, day) = match self.quarter {
            1 => (3, 31),
            2 => (6, 30),
            3 => (9, 30),
            4 => (12, 31),
            _ => return None,
        };
        NaiveDate::from_ymd_opt(self.year, month, day)
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-Q{}", self.year, self.quarter)
    }
}

impl FromStr for Quarter {
    type Err = Form13fError;

    /// Parse a token of exactly the form `YYYY-Q<1-4>`.
    fn from_str(token: &str) -> Result<Self> {
        let invalid = || Form13fError::InvalidFormat(token.to_string());

        let (year, quarter) = token.split_once("-Q").ok_or_else(invalid)?;
        if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let quarter = match quarter {
            "1" => 1,
            "2" => 2,
            "3" => 3,
            "4" => 4,
            _ => return Err(invalid()),
        };
        let year = year.parse().map_err(|_| invalid())?;

        Self::new(year, quarter).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Quarter {
    type Error = Form13fError;

    fn try_from(token: String) -> Result<Self> {
        token.parse()
    }
}

impl From<Quarter> for String {
    fn from(quarter: Quarter) -> Self {
        quarter.to_string()
    }
}

/// Convert a `YYYY-Q<1-4>` token to its period of report as `YYYY-MM-DD`.
///
/// # Example
/// ```
/// use form13f_core::quarter_to_period_of_report;
///
/// assert_eq!(quarter_to_period_of_report("2023-Q1").unwrap(), "2023-03-31");
/// assert!(quarter_to_period_of_report("2023/Q1").is_err());
/// ```
pub fn quarter_to_period_of_report(token: &str) -> Result<String> {
    let quarter: Quarter = token.parse()?;
    Ok(quarter.period_of_report().format("%Y-%m-%d").to_string())
}
