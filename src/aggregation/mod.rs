//! Monthly and annual roll-ups of the daily ledger
//!
//! A period summary is the last ledger entry of the period, not a sum.
//! Groups come out in first-seen order, which is chronological because the
//! ledger is date-ordered. Nothing is re-sorted.

use crate::projection::{DailyLedger, LedgerEntry};
use chrono::Datelike;
use serde::{Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;

/// Period a summary belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodKey {
    /// Rendered as `YYYY-MM`
    Month { year: i32, month: u32 },
    /// Rendered as `YYYY`, serialized as an integer
    Year(i32),
}

impl PeriodKey {
    pub fn month_of(entry: &LedgerEntry) -> Self {
        PeriodKey::Month {
            year: entry.date.year(),
            month: entry.date.month(),
        }
    }

    pub fn year_of(entry: &LedgerEntry) -> Self {
        PeriodKey::Year(entry.date.year())
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKey::Month { year, month } => write!(f, "{:04}-{:02}", year, month),
            PeriodKey::Year(year) => write!(f, "{}", year),
        }
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodKey::Month { .. } => serializer.collect_str(self),
            PeriodKey::Year(year) => serializer.serialize_i32(*year),
        }
    }
}

/// Closing figures of one month or year
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PeriodSummary {
    pub period: PeriodKey,
    pub total_contributed: f64,
    pub gross_value: f64,
    pub gross_gain: f64,
    pub tax_due: f64,
    pub net_value: f64,
}

impl PeriodSummary {
    fn project(period: PeriodKey, entry: &LedgerEntry) -> Self {
        Self {
            period,
            total_contributed: entry.total_contributed,
            gross_value: entry.gross_value,
            gross_gain: entry.gross_gain,
            tax_due: entry.tax_due,
            net_value: entry.net_value,
        }
    }
}

/// Last entry of every month present in the ledger
pub fn to_monthly(ledger: &DailyLedger) -> Vec<PeriodSummary> {
    last_per_period(ledger, PeriodKey::month_of)
}

/// Last entry of every year present in the ledger
pub fn to_annual(ledger: &DailyLedger) -> Vec<PeriodSummary> {
    last_per_period(ledger, PeriodKey::year_of)
}

/// Keep the last entry per key, groups in order of first appearance
fn last_per_period<F>(ledger: &DailyLedger, key_of: F) -> Vec<PeriodSummary>
where
    F: Fn(&LedgerEntry) -> PeriodKey,
{
    let mut positions: HashMap<PeriodKey, usize> = HashMap::new();
    let mut summaries: Vec<PeriodSummary> = Vec::new();

    for entry in ledger {
        let key = key_of(entry);
        let summary = PeriodSummary::project(key, entry);
        match positions.get(&key) {
            Some(&index) => summaries[index] = summary,
            None => {
                positions.insert(key, summaries.len());
                summaries.push(summary);
            }
        }
    }

    summaries
}
