//! Compounding engine: one forward pass over the rate series

use crate::config::SimulationConfig;
use crate::rates::RateObservation;
use super::ledger::{DailyLedger, LedgerEntry};
use super::state::AccumulationState;
use log::debug;

/// Daily compounding simulator
///
/// Pure and deterministic: no I/O, no errors, same inputs give the same
/// ledger. The engine does not validate its configuration; negative amounts
/// produce meaningless figures but never panic. Use
/// [`SimulationConfig::validate`] at the boundary.
#[derive(Debug, Clone)]
pub struct CompoundingEngine {
    config: SimulationConfig,
}

impl CompoundingEngine {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Simulate over a date-ascending series, one ledger entry per observation
    pub fn simulate(&self, rates: &[RateObservation]) -> DailyLedger {
        let SimulationConfig {
            principal,
            monthly_contribution,
            tax_rate_percent,
        } = self.config;

        let entries: Vec<LedgerEntry> = rates
            .iter()
            .enumerate()
            .scan(AccumulationState::from_principal(principal), |state, (index, observation)| {
                *state = state.step(index, observation, monthly_contribution);
                Some(state.to_entry(observation, tax_rate_percent))
            })
            .collect();

        if let Some(last) = entries.last() {
            debug!(
                "Simulated {} days, final gross {:.2}, contributed {:.2}",
                entries.len(),
                last.gross_value,
                last.total_contributed
            );
        }

        DailyLedger::new(entries)
    }
}

/// Convenience wrapper around [`CompoundingEngine::simulate`]
pub fn simulate(
    principal: f64,
    monthly_contribution: f64,
    tax_rate_percent: f64,
    rates: &[RateObservation],
) -> DailyLedger {
    CompoundingEngine::new(SimulationConfig {
        principal,
        monthly_contribution,
        tax_rate_percent,
    })
    .simulate(rates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{Datelike, Days, NaiveDate};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn obs(y: i32, m: u32, day: u32, rate: f64) -> RateObservation {
        RateObservation::new(d(y, m, day), rate)
    }

    /// Weekday-only series with a constant rate, like a real Selic feed
    fn business_days(start: NaiveDate, days: u64, rate: f64) -> Vec<RateObservation> {
        (0..days)
            .map(|offset| start + Days::new(offset))
            .filter(|date| date.weekday().number_from_monday() <= 5)
            .map(|date| RateObservation::new(date, rate))
            .collect()
    }

    #[test]
    fn test_empty_series() {
        let ledger = simulate(1000.0, 100.0, 15.0, &[]);
        assert!(ledger.is_empty());
        assert_eq!(ledger.final_gross_value(), None);
        assert!(ledger.summary().is_none());
    }

    #[test]
    fn test_single_day() {
        let ledger = simulate(1000.0, 0.0, 15.0, &[obs(2020, 1, 2, 0.03)]);
        assert_eq!(ledger.len(), 1);

        let entry = &ledger.entries[0];
        assert_eq!(entry.date, d(2020, 1, 2));
        assert_relative_eq!(entry.gross_value, 1000.30, epsilon = 1e-9);
        assert_relative_eq!(entry.gross_gain, 0.30, epsilon = 1e-9);
        assert_relative_eq!(entry.tax_due, 0.045, epsilon = 1e-9);
        assert_relative_eq!(entry.net_value, 1000.255, epsilon = 1e-9);
    }

    #[test]
    fn test_no_contribution_on_first_entry() {
        let ledger = simulate(1000.0, 100.0, 15.0, &[obs(2020, 2, 1, 0.03), obs(2020, 2, 3, 0.03)]);

        assert_eq!(ledger.entries[0].total_contributed, 1000.0);
        assert_relative_eq!(ledger.entries[0].gross_value, 1000.30, epsilon = 1e-9);
        assert_eq!(ledger.entries[1].total_contributed, 1000.0);
    }

    #[test]
    fn test_contribution_on_first_of_month() {
        let r1 = 0.02;
        let r2 = 0.05;
        let ledger = simulate(1000.0, 100.0, 15.0, &[obs(2020, 1, 31, r1), obs(2020, 2, 1, r2)]);

        let first = &ledger.entries[0];
        let second = &ledger.entries[1];
        assert_eq!(second.total_contributed - first.total_contributed, 100.0);

        let expected = (1000.0 * (1.0 + r1 / 100.0) + 100.0) * (1.0 + r2 / 100.0);
        assert_relative_eq!(second.gross_value, expected, epsilon = 1e-9);
        assert_relative_eq!(second.gross_gain, expected - 1100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_missing_first_of_month_gets_no_contribution() {
        // 2022-05-01 is a Sunday, so the series jumps from April 29 to May 2
        let ledger = simulate(
            1000.0,
            100.0,
            15.0,
            &[obs(2022, 4, 29, 0.04), obs(2022, 5, 2, 0.04), obs(2022, 6, 1, 0.04)],
        );

        let contributed: Vec<f64> = ledger.iter().map(|e| e.total_contributed).collect();
        assert_eq!(contributed, vec![1000.0, 1000.0, 1100.0]);
    }

    #[test]
    fn test_total_contributed_monotonic() {
        let rates = business_days(d(2020, 1, 1), 800, 0.02);
        let ledger = simulate(500.0, 75.0, 15.0, &rates);

        for (prev, next) in ledger.entries.iter().zip(ledger.entries.iter().skip(1)) {
            let step = next.total_contributed - prev.total_contributed;
            if next.date.day() == 1 {
                assert_eq!(step, 75.0);
            } else {
                assert_eq!(step, 0.0);
            }
        }

        let firsts = rates.iter().skip(1).filter(|o| o.date.day() == 1).count();
        let last = ledger.last().unwrap();
        assert_abs_diff_eq!(last.total_contributed, 500.0 + 75.0 * firsts as f64, epsilon = 1e-9);
    }

    #[test]
    fn test_ledger_identities_hold() {
        let rates = business_days(d(2021, 3, 1), 400, 0.035);
        let ledger = simulate(2500.0, 200.0, 17.5, &rates);

        assert_eq!(ledger.len(), rates.len());
        for (entry, observation) in ledger.iter().zip(&rates) {
            assert_eq!(entry.date, observation.date);
            assert_relative_eq!(entry.gross_gain, entry.gross_value - entry.total_contributed);
            assert_relative_eq!(entry.tax_due, entry.gross_gain * 0.175, epsilon = 1e-9);
            assert_relative_eq!(entry.net_value, entry.gross_value - entry.tax_due);
        }
    }

    #[test]
    fn test_negative_gain_gives_tax_credit() {
        let ledger = simulate(1000.0, 0.0, 15.0, &[obs(2020, 1, 2, -1.0)]);
        let entry = &ledger.entries[0];

        assert_relative_eq!(entry.gross_gain, -10.0, epsilon = 1e-9);
        assert_relative_eq!(entry.tax_due, -1.5, epsilon = 1e-9);
        assert!(entry.net_value > entry.gross_value);
    }

    #[test]
    fn test_deterministic() {
        let rates = business_days(d(2020, 1, 1), 365, 0.0171);
        let config = SimulationConfig {
            principal: 1000.0,
            monthly_contribution: 100.0,
            tax_rate_percent: 22.5,
        };
        let engine = CompoundingEngine::new(config);

        assert_eq!(engine.simulate(&rates), engine.simulate(&rates));
    }

    #[test]
    fn test_multi_year_drift_below_a_cent() {
        let rates = business_days(d(2015, 1, 1), 3650, 0.04);
        let ledger = simulate(10_000.0, 0.0, 15.0, &rates);

        let expected = 10_000.0 * (1.0004_f64).powi(rates.len() as i32);
        assert_abs_diff_eq!(ledger.final_gross_value().unwrap(), expected, epsilon = 0.01);
    }

    #[test]
    fn test_negative_inputs_do_not_panic() {
        let rates = business_days(d(2020, 1, 1), 60, 0.03);
        let ledger = simulate(-1000.0, -50.0, 15.0, &rates);
        assert_eq!(ledger.len(), rates.len());
    }

    #[test]
    fn test_summary_matches_last_entry() {
        let rates = business_days(d(2020, 1, 1), 120, 0.03);
        let ledger = simulate(1000.0, 100.0, 20.0, &rates);
        let summary = ledger.summary().unwrap();
        let last = ledger.last().unwrap();

        assert_eq!(summary.total_days, rates.len());
        assert_eq!(summary.start_date, rates[0].date);
        assert_eq!(summary.end_date, last.date);
        assert_eq!(summary.final_gross_value, last.gross_value);
        assert_eq!(summary.final_net_value, last.net_value);
        assert_eq!(Some(summary.final_net_value), ledger.final_net_value());
    }
}
