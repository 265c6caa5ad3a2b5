//! Wire model of the Form 13F filings service.
//!
//! Field names follow the service's JSON (which in turn follows the SEC's
//! information table column names, e.g. `ssh_prnamt` for the share or
//! principal amount).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amendment type string for a complete restatement of a prior filing.
pub const RESTATEMENT: &str = "RESTATEMENT";

/// Amendment type string for an amendment adding previously unreported positions.
pub const NEW_HOLDINGS: &str = "NEW HOLDINGS";

/// A fund returned by the name search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FundSummary {
    /// Central Index Key
    pub cik: String,
    /// Registered fund name
    #[serde(default)]
    pub name: Option<String>,
}

/// One security position reported on one line of a filing's information table.
///
/// A filer may split one security across several lines (for example one per
/// voting-authority type), so lines are not unique by CUSIP until aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingLine {
    /// Accession number of the filing this line belongs to
    pub accession_number: String,
    /// CIK of the filer
    pub cik: String,
    /// Issuer name
    pub name_of_issuer: String,
    /// Title of the security class (e.g. "COM", "CL A")
    #[serde(default)]
    pub title_of_class: String,
    /// CUSIP security identifier
    pub cusip: String,
    /// Ticker symbol, when the service could map the CUSIP
    #[serde(default)]
    pub ticker: Option<String>,
    /// Market value as reported
    #[serde(default)]
    pub value: i64,
    /// Share or principal amount
    #[serde(default)]
    pub ssh_prnamt: i64,
    /// Quantity type code ("SH" or "PRN")
    #[serde(default)]
    pub ssh_prnamt_type: Option<String>,
    /// Investment discretion code ("SOLE", "DFND", "OTR")
    #[serde(default)]
    pub investment_discretion: Option<String>,
    /// Shares with sole voting authority
    #[serde(default)]
    pub voting_authority_sole: i64,
    /// Shares with shared voting authority
    #[serde(default)]
    pub voting_authority_shared: i64,
    /// Shares with no voting authority
    #[serde(default)]
    pub voting_authority_none: i64,
}

impl HoldingLine {
    /// Create a line with all quantities zero and no optional codes.
    pub fn new(
        accession_number: impl Into<String>,
        cik: impl Into<String>,
        name_of_issuer: impl Into<String>,
        cusip: impl Into<String>,
    ) -> Self {
        Self {
            accession_number: accession_number.into(),
            cik: cik.into(),
            name_of_issuer: name_of_issuer.into(),
            title_of_class: String::new(),
            cusip: cusip.into(),
            ticker: None,
            value: 0,
            ssh_prnamt: 0,
            ssh_prnamt_type: None,
            investment_discretion: None,
            voting_authority_sole: 0,
            voting_authority_shared: 0,
            voting_authority_none: 0,
        }
    }

    /// Set the title of class.
    pub fn with_title_of_class(mut self, title: impl Into<String>) -> Self {
        self.title_of_class = title.into();
        self
    }

    /// Set the ticker symbol.
    pub fn with_ticker(mut self, ticker: impl Into<String>) -> Self {
        self.ticker = Some(ticker.into());
        self
    }

    /// Set the market value and share amount.
    pub const fn with_position(mut self, value: i64, ssh_prnamt: i64) -> Self {
        self.value = value;
        self.ssh_prnamt = ssh_prnamt;
        self
    }

    /// Set the voting authority counts (sole, shared, none).
    pub const fn with_voting(mut self, sole: i64, shared: i64, none: i64) -> Self {
        self.voting_authority_sole = sole;
        self.voting_authority_shared = shared;
        self.voting_authority_none = none;
        self
    }

    /// Set the quantity type and investment discretion codes.
    pub fn with_codes(
        mut self,
        ssh_prnamt_type: impl Into<String>,
        investment_discretion: impl Into<String>,
    ) -> Self {
        self.ssh_prnamt_type = Some(ssh_prnamt_type.into());
        self.investment_discretion = Some(investment_discretion.into());
        self
    }

    /// Add the numeric fields of `other` into this line.
    ///
    /// Identity fields (issuer, class, codes) are left untouched.
    pub const fn accumulate(&mut self, other: &Self) {
        self.value += other.value;
        self.ssh_prnamt += other.ssh_prnamt;
        self.voting_authority_sole += other.voting_authority_sole;
        self.voting_authority_shared += other.voting_authority_shared;
        self.voting_authority_none += other.voting_authority_none;
    }
}

/// How a filing relates to the other filings for its period of report.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Amendment {
    /// Not an amendment: the original 13F-HR.
    Original,
    /// An amendment replacing everything reported before it.
    Restatement,
    /// An amendment reporting positions missing from earlier filings.
    NewHoldings,
    /// An amendment whose type is missing or not one of the above.
    Unrecognized(String),
}

impl Amendment {
    /// Build the marker from the service's `is_amendment` and `amendment_type` fields.
    pub fn from_wire(is_amendment: Option<bool>, amendment_type: Option<&str>) -> Self {
        if !is_amendment.unwrap_or(false) {
            return Self::Original;
        }

        let kind = amendment_type.map(str::trim).unwrap_or_default();
        if kind.eq_ignore_ascii_case(RESTATEMENT) {
            Self::Restatement
        } else if kind.eq_ignore_ascii_case(NEW_HOLDINGS) {
            Self::NewHoldings
        } else {
            Self::Unrecognized(kind.to_string())
        }
    }

    /// Whether this is an amendment of any kind.
    pub const fn is_amendment(&self) -> bool {
        !matches!(self, Self::Original)
    }
}

impl fmt::Display for Amendment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Original => write!(f, "ORIGINAL"),
            Self::Restatement => write!(f, "{RESTATEMENT}"),
            Self::NewHoldings => write!(f, "{NEW_HOLDINGS}"),
            Self::Unrecognized(kind) if kind.is_empty() => write!(f, "<missing>"),
            Self::Unrecognized(kind) => write!(f, "{kind}"),
        }
    }
}

/// Cover page and header data of one submitted 13F document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilingHeader {
    /// Accession number (unique filing identifier)
    pub accession_number: String,
    /// CIK of the filer
    pub cik: String,
    /// Date the filing was accepted
    pub filed_as_of_date: NaiveDate,
    /// Quarter-end date the holdings refer to
    pub period_of_report: NaiveDate,
    /// Submission type (e.g. "13F-HR", "13F-HR/A")
    #[serde(default)]
    pub submission_type: Option<String>,
    /// Set when the filing is an amendment
    #[serde(default)]
    pub is_amendment: Option<bool>,
    /// Amendment type ("RESTATEMENT" or "NEW HOLDINGS")
    #[serde(default)]
    pub amendment_type: Option<String>,
    /// Number of public documents in the submission
    #[serde(default)]
    pub public_document_count: Option<i64>,
    /// Date of the last change to the filer's record
    #[serde(default)]
    pub date_as_of_change: Option<String>,
    /// Effectiveness date
    #[serde(default)]
    pub effectiveness_date: Option<String>,
    /// Filer name
    #[serde(default)]
    pub company_name: Option<String>,
    /// IRS employer identification number
    #[serde(default)]
    pub irs_number: Option<String>,
    /// State of incorporation
    #[serde(default)]
    pub state_of_incorporation: Option<String>,
    /// Fiscal year end (MMDD)
    #[serde(default)]
    pub fiscal_year_end: Option<String>,
    /// Form type
    #[serde(default)]
    pub form_type: Option<String>,
    /// Securities act
    #[serde(default)]
    pub sec_act: Option<String>,
    /// Business address
    #[serde(default)]
    pub business_address: Option<String>,
    /// Business phone
    #[serde(default)]
    pub business_phone: Option<String>,
    /// Information table value total, as reported on the summary page
    #[serde(default)]
    pub table_value_total: Option<i64>,
    /// Information table entry total, as reported on the summary page
    #[serde(default)]
    pub table_entry_total: Option<i64>,
    /// URL of the filing document
    #[serde(default)]
    pub url: Option<String>,
}

impl FilingHeader {
    /// Create an original (non-amendment) header with no descriptive metadata.
    pub fn new(
        accession_number: impl Into<String>,
        cik: impl Into<String>,
        filed_as_of_date: NaiveDate,
        period_of_report: NaiveDate,
    ) -> Self {
        Self {
            accession_number: accession_number.into(),
            cik: cik.into(),
            filed_as_of_date,
            period_of_report,
            submission_type: None,
            is_amendment: None,
            amendment_type: None,
            public_document_count: None,
            date_as_of_change: None,
            effectiveness_date: None,
            company_name: None,
            irs_number: None,
            state_of_incorporation: None,
            fiscal_year_end: None,
            form_type: None,
            sec_act: None,
            business_address: None,
            business_phone: None,
            table_value_total: None,
            table_entry_total: None,
            url: None,
        }
    }

    /// Mark the header with the given amendment kind.
    pub fn with_amendment(mut self, amendment: Amendment) -> Self {
        match amendment {
            Amendment::Original => {
                self.is_amendment = None;
                self.amendment_type = None;
            }
            Amendment::Restatement => {
                self.is_amendment = Some(true);
                self.amendment_type = Some(RESTATEMENT.to_string());
            }
            Amendment::NewHoldings => {
                self.is_amendment = Some(true);
                self.amendment_type = Some(NEW_HOLDINGS.to_string());
            }
            Amendment::Unrecognized(kind) => {
                self.is_amendment = Some(true);
                self.amendment_type = (!kind.is_empty()).then_some(kind);
            }
        }
        self
    }

    /// Set the filer name.
    pub fn with_company_name(mut self, name: impl Into<String>) -> Self {
        self.company_name = Some(name.into());
        self
    }

    /// Set the information table value and entry totals.
    pub fn with_totals(mut self, value_total: i64, entry_total: i64) -> Self {
        self.table_value_total = Some(value_total);
        self.table_entry_total = Some(entry_total);
        self
    }

    /// Set the document URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// The closed amendment marker for this filing.
    pub fn amendment(&self) -> Amendment {
        Amendment::from_wire(self.is_amendment, self.amendment_type.as_deref())
    }
}
