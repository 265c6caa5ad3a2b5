//! Error types for consolidation and report assembly.

use chrono::NaiveDate;
use form13f_data::DataError;
use thiserror::Error;

/// Result type for core operations.
pub type Result<T> = std::result::Result<T, Form13fError>;

/// Errors raised while resolving periods or consolidating filings.
///
/// Every variant except [`Form13fError::Data`] is fatal to the single call
/// that raised it; no partial result is returned.
#[derive(Debug, Error)]
pub enum Form13fError {
    /// Quarter token does not match `YYYY-Q<1-4>`
    #[error("Invalid quarter format '{0}'. Use format YYYY-Q<1-4>")]
    InvalidFormat(String),

    /// Filings in one batch refer to different periods
    #[error("Filing {accession_number} is for period {found}, expected {expected}")]
    PeriodMismatch {
        /// Filing with the differing period
        accession_number: String,
        /// Period of the first filing in the batch
        expected: NaiveDate,
        /// Period of the offending filing
        found: NaiveDate,
    },

    /// More than one filing in the batch is not an amendment
    #[error("At most one original filing is allowed per period, found {}", accession_numbers.join(", "))]
    MultipleOriginals {
        /// Accession numbers of all original filings
        accession_numbers: Vec<String>,
    },

    /// The original filing was filed after an amendment
    #[error(
        "Original filing {accession_number} (filed {filed}) is not the earliest; {first_accession_number} was filed {first_filed}"
    )]
    OriginalNotFirst {
        /// Accession number of the original filing
        accession_number: String,
        /// Filing date of the original
        filed: NaiveDate,
        /// Accession number of the earliest filing
        first_accession_number: String,
        /// Filing date of the earliest filing
        first_filed: NaiveDate,
    },

    /// Amendment type other than RESTATEMENT or NEW HOLDINGS
    #[error("Filing {accession_number} has unknown amendment type '{amendment_type}'")]
    UnknownAmendmentType {
        /// Amendment filing
        accession_number: String,
        /// Raw amendment type (empty when missing)
        amendment_type: String,
    },

    /// A NEW HOLDINGS amendment repeats a security already held
    #[error("NEW HOLDINGS amendment {accession_number} repeats CUSIP {cusip}")]
    OverlappingNewHoldings {
        /// Amendment filing
        accession_number: String,
        /// Repeated security
        cusip: String,
    },

    /// Start year after end year
    #[error("Invalid year range: {from} is after {to}")]
    InvalidYearRange {
        /// First year requested
        from: i32,
        /// Last year requested
        to: i32,
    },

    /// Error surfaced by the data-access collaborator
    #[error(transparent)]
    Data(#[from] DataError),
}
