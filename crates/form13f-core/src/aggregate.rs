//! Merging of information table lines by security.
//!
//! The SEC lets a filer report one security on several lines, for instance
//! one line per voting-authority type or investment discretion. Those lines
//! describe a single position, so their quantities are summed rather than
//! deduplicated away.

use form13f_data::HoldingLine;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Accumulates lines into one entry per CUSIP, keeping first-seen order.
///
/// Identity fields (issuer, class, ticker, codes, accession number, CIK) come
/// from the first line seen for a CUSIP; value, share amount and the three
/// voting-authority counts are summed over every line.
#[derive(Debug, Default, Clone)]
pub struct HoldingsAccumulator {
    index: HashMap<String, usize>,
    holdings: Vec<HoldingLine>,
}

impl HoldingsAccumulator {
    /// Create an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one line.
    pub fn push(&mut self, line: HoldingLine) {
        match self.index.entry(line.cusip.clone()) {
            Entry::Occupied(slot) => self.holdings[*slot.get()].accumulate(&line),
            Entry::Vacant(slot) => {
                slot.insert(self.holdings.len());
                self.holdings.push(line);
            }
        }
    }

    /// Number of distinct securities seen.
    pub fn len(&self) -> usize {
        self.holdings.len()
    }

    /// Whether no line has been added.
    pub fn is_empty(&self) -> bool {
        self.holdings.is_empty()
    }

    /// The merged holdings, ordered by issuer name.
    pub fn finish(self) -> Vec<HoldingLine> {
        let mut holdings = self.holdings;
        sort_by_issuer(&mut holdings);
        holdings
    }
}

impl Extend<HoldingLine> for HoldingsAccumulator {
    fn extend<I: IntoIterator<Item = HoldingLine>>(&mut self, lines: I) {
        for line in lines {
            self.push(line);
        }
    }
}

/// Merge raw lines into one holding per CUSIP, ordered by issuer name.
///
/// # Example
/// ```
/// use form13f_core::aggregate_holdings;
/// use form13f_data::HoldingLine;
///
/// let lines = vec![
///     HoldingLine::new("0001", "1067983", "APPLE INC", "037833100").with_position(100, 10),
///     HoldingLine::new("0001", "1067983", "APPLE INC", "037833100").with_position(50, 5),
/// ];
/// let holdings = aggregate_holdings(lines);
/// assert_eq!(holdings.len(), 1);
/// assert_eq!(holdings[0].value, 150);
/// ```
pub fn aggregate_holdings(lines: impl IntoIterator<Item = HoldingLine>) -> Vec<HoldingLine> {
    let mut accumulator = HoldingsAccumulator::new();
    accumulator.extend(lines);
    accumulator.finish()
}

/// Stable sort by issuer name; equal names keep their current order.
pub fn sort_by_issuer(holdings: &mut [HoldingLine]) {
    holdings.sort_by(|a, b| a.name_of_issuer.cmp(&b.name_of_issuer));
}
