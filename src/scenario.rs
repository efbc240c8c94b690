//! Scenario runner for repeated simulations over one rate series
//!
//! Fetch the series once, then run any number of configurations against it.
//! Scenarios are independent, so batches run in parallel; a single run is
//! always sequential.

use crate::aggregation::{to_annual, to_monthly, PeriodSummary};
use crate::config::{SimulationConfig, TaxRate};
use crate::error::Result;
use crate::projection::{CompoundingEngine, DailyLedger, LedgerSummary};
use crate::rates::RateSeries;
use rayon::prelude::*;
use serde::Serialize;

/// Daily ledger plus its monthly and annual views
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub config: SimulationConfig,
    pub daily: DailyLedger,
    pub monthly: Vec<PeriodSummary>,
    pub annual: Vec<PeriodSummary>,
}

impl SimulationResult {
    /// Derive both roll-ups from a ledger
    pub fn from_ledger(config: SimulationConfig, daily: DailyLedger) -> Self {
        let monthly = to_monthly(&daily);
        let annual = to_annual(&daily);
        Self { config, daily, monthly, annual }
    }

    pub fn final_gross_value(&self) -> Option<f64> {
        self.daily.final_gross_value()
    }

    pub fn final_net_value(&self) -> Option<f64> {
        self.daily.final_net_value()
    }

    pub fn summary(&self) -> Option<LedgerSummary> {
        self.daily.summary()
    }
}

/// Pre-loaded runner for batch simulations
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(series);
///
/// for (rate, result) in runner.run_tax_brackets(1000.0, 100.0) {
///     println!("{}: {:?}", rate, result.final_net_value());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    series: RateSeries,
}

impl ScenarioRunner {
    pub fn new(series: RateSeries) -> Self {
        Self { series }
    }

    pub fn series(&self) -> &RateSeries {
        &self.series
    }

    /// Run one configuration without validating it
    pub fn run(&self, config: SimulationConfig) -> SimulationResult {
        let ledger = CompoundingEngine::new(config).simulate(self.series.as_slice());
        SimulationResult::from_ledger(config, ledger)
    }

    /// Validate then run
    pub fn run_validated(&self, config: SimulationConfig) -> Result<SimulationResult> {
        config.validate()?;
        Ok(self.run(config))
    }

    /// Run several configurations in parallel, results in input order
    pub fn run_scenarios(&self, configs: &[SimulationConfig]) -> Vec<SimulationResult> {
        configs.par_iter().map(|config| self.run(*config)).collect()
    }

    /// Same amounts under every supported tax bracket
    pub fn run_tax_brackets(&self, principal: f64, monthly_contribution: f64) -> Vec<(TaxRate, SimulationResult)> {
        let base = SimulationConfig::new(principal, monthly_contribution, TaxRate::default());
        TaxRate::ALL[..]
            .par_iter()
            .map(|&rate| (rate, self.run(base.with_tax_rate(rate))))
            .collect()
    }
}
