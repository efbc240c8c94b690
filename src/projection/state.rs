//! Accumulation state carried from one day to the next

use crate::rates::RateObservation;
use super::ledger::LedgerEntry;
use chrono::Datelike;

/// Running balance of the investment
///
/// This is the only state that crosses day boundaries. Each day depends on
/// the previous day's state, so a series cannot be split and simulated in
/// independent chunks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccumulationState {
    /// Gross value of the investment
    pub current_value: f64,

    /// Principal plus every contribution applied so far
    pub total_contributed: f64,
}

impl AccumulationState {
    /// State before the first observation
    pub fn from_principal(principal: f64) -> Self {
        Self {
            current_value: principal,
            total_contributed: principal,
        }
    }

    /// Advance by one observation
    ///
    /// The contribution is made on the 1st of a month, except on the first
    /// observation of the series, and before that day's rate is applied.
    /// Only the day-of-month is checked: a month whose 1st is missing from
    /// the series gets no contribution.
    pub fn step(self, index: usize, observation: &RateObservation, monthly_contribution: f64) -> Self {
        let (current_value, total_contributed) = if index > 0 && observation.date.day() == 1 {
            (
                self.current_value + monthly_contribution,
                self.total_contributed + monthly_contribution,
            )
        } else {
            (self.current_value, self.total_contributed)
        };

        Self {
            current_value: current_value * observation.growth_factor(),
            total_contributed,
        }
    }

    /// Gain over everything put in
    pub fn gross_gain(&self) -> f64 {
        self.current_value - self.total_contributed
    }

    /// Ledger row for this state; tax is not floored, losses yield a credit
    pub fn to_entry(&self, observation: &RateObservation, tax_rate_percent: f64) -> LedgerEntry {
        let gross_gain = self.gross_gain();
        let tax_due = gross_gain * (tax_rate_percent / 100.0);

        LedgerEntry {
            date: observation.date,
            daily_rate_percent: observation.daily_rate_percent,
            total_contributed: self.total_contributed,
            gross_value: self.current_value,
            gross_gain,
            tax_due,
            net_value: self.current_value - tax_due,
        }
    }
}
