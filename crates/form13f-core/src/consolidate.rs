//! Reduction of all filings for one period into a single holdings snapshot.
//!
//! A fund files an original 13F-HR for a quarter and may later file
//! amendments. A `RESTATEMENT` amendment replaces everything reported so far,
//! a `NEW HOLDINGS` amendment adds positions that were left out. Applying the
//! amendments in filing order yields the net position for the quarter.

use crate::aggregate::sort_by_issuer;
use crate::error::{Form13fError, Result};
use crate::filing::Filing;
use form13f_data::{Amendment, HoldingLine};
use std::collections::HashSet;

/// Filings ordered by filing date.
///
/// The sort is stable, so filings with equal dates keep their input order.
pub fn chronological(filings: &[Filing]) -> Vec<&Filing> {
    let mut ordered: Vec<&Filing> = filings.iter().collect();
    ordered.sort_by_key(|filing| filing.filed_as_of_date());
    ordered
}

/// Consolidate the filings of one period into the net holdings, ordered by issuer name.
///
/// Empty input yields an empty snapshot.
///
/// # Errors
/// - [`Form13fError::PeriodMismatch`] when the filings cover different periods
/// - [`Form13fError::MultipleOriginals`] when more than one filing is not an amendment
/// - [`Form13fError::OriginalNotFirst`] when an amendment precedes the original in filing order
/// - [`Form13fError::UnknownAmendmentType`] for an amendment type other than
///   `RESTATEMENT` or `NEW HOLDINGS`
/// - [`Form13fError::OverlappingNewHoldings`] when a `NEW HOLDINGS` amendment
///   repeats a security already held
pub fn consolidate(filings: &[Filing]) -> Result<Vec<HoldingLine>> {
    let Some(first) = filings.first() else {
        return Ok(Vec::new());
    };

    let expected = first.period_of_report();
    if let Some(other) = filings.iter().find(|f| f.period_of_report() != expected) {
        return Err(Form13fError::PeriodMismatch {
            accession_number: other.accession_number().to_string(),
            expected,
            found: other.period_of_report(),
        });
    }

    let originals: Vec<&Filing> = filings
        .iter()
        .filter(|f| !f.amendment().is_amendment())
        .collect();
    if originals.len() > 1 {
        return Err(Form13fError::MultipleOriginals {
            accession_numbers: originals
                .iter()
                .map(|f| f.accession_number().to_string())
                .collect(),
        });
    }

    let ordered = chronological(filings);
    let (seed, rest) = match ordered.split_first() {
        Some(split) => split,
        None => return Ok(Vec::new()),
    };
    if let Some(original) = originals.first() {
        if !std::ptr::eq(*original, *seed) {
            return Err(original_not_first(original, seed));
        }
    }

    let mut snapshot = seed.holdings.clone();
    tracing::debug!(
        accession_number = seed.accession_number(),
        holdings = snapshot.len(),
        "seeded snapshot"
    );

    for filing in rest {
        match filing.amendment() {
            Amendment::Restatement => {
                snapshot = filing.holdings.clone();
                tracing::debug!(
                    accession_number = filing.accession_number(),
                    holdings = snapshot.len(),
                    "applied restatement"
                );
            }
            Amendment::NewHoldings => {
                let held: HashSet<&str> = snapshot.iter().map(|h| h.cusip.as_str()).collect();
                if let Some(repeat) = filing.holdings.iter().find(|h| held.contains(h.cusip.as_str())) {
                    return Err(Form13fError::OverlappingNewHoldings {
                        accession_number: filing.accession_number().to_string(),
                        cusip: repeat.cusip.clone(),
                    });
                }
                snapshot.extend(filing.holdings.iter().cloned());
                tracing::debug!(
                    accession_number = filing.accession_number(),
                    added = filing.holdings.len(),
                    "applied new holdings"
                );
            }
            Amendment::Unrecognized(amendment_type) => {
                return Err(Form13fError::UnknownAmendmentType {
                    accession_number: filing.accession_number().to_string(),
                    amendment_type,
                });
            }
            Amendment::Original => return Err(original_not_first(filing, seed)),
        }
    }

    sort_by_issuer(&mut snapshot);
    Ok(snapshot)
}

fn original_not_first(original: &Filing, first: &Filing) -> Form13fError {
    Form13fError::OriginalNotFirst {
        accession_number: original.accession_number().to_string(),
        filed: original.filed_as_of_date(),
        first_accession_number: first.accession_number().to_string(),
        first_filed: first.filed_as_of_date(),
    }
}
