//! Daily ledger output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of simulation output for one rate observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub date: NaiveDate,
    pub daily_rate_percent: f64,

    /// Principal plus contributions up to and including this date
    pub total_contributed: f64,

    /// Value before tax
    pub gross_value: f64,

    /// `gross_value - total_contributed`
    pub gross_gain: f64,

    /// Hypothetical tax if redeemed today; negative when `gross_gain` is
    pub tax_due: f64,

    /// `gross_value - tax_due`
    pub net_value: f64,
}

/// Complete day-by-day simulation output, in rate series order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyLedger {
    pub entries: Vec<LedgerEntry>,
}

impl DailyLedger {
    pub fn new(entries: Vec<LedgerEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LedgerEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LedgerEntry> {
        self.entries.last()
    }

    /// Gross value on the last day
    pub fn final_gross_value(&self) -> Option<f64> {
        self.last().map(|e| e.gross_value)
    }

    /// Net value on the last day
    pub fn final_net_value(&self) -> Option<f64> {
        self.last().map(|e| e.net_value)
    }

    /// Final totals; `None` for an empty ledger
    pub fn summary(&self) -> Option<LedgerSummary> {
        let first = self.entries.first()?;
        let last = self.entries.last()?;

        Some(LedgerSummary {
            total_days: self.entries.len(),
            start_date: first.date,
            end_date: last.date,
            total_contributed: last.total_contributed,
            final_gross_value: last.gross_value,
            final_gross_gain: last.gross_gain,
            final_tax_due: last.tax_due,
            final_net_value: last.net_value,
        })
    }
}

impl<'a> IntoIterator for &'a DailyLedger {
    type Item = &'a LedgerEntry;
    type IntoIter = std::slice::Iter<'a, LedgerEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Headline figures of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LedgerSummary {
    pub total_days: usize,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_contributed: f64,
    pub final_gross_value: f64,
    pub final_gross_gain: f64,
    pub final_tax_due: f64,
    pub final_net_value: f64,
}
