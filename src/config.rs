//! Simulation inputs and their validation

use crate::error::{Result, SimulationError};
use serde::{Deserialize, Serialize};

/// Default initial investment
pub const DEFAULT_PRINCIPAL: f64 = 1000.0;

/// Default monthly contribution
pub const DEFAULT_MONTHLY_CONTRIBUTION: f64 = 100.0;

/// Income tax brackets applicable to fixed-income gains, by holding period
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
pub enum TaxRate {
    /// Held more than 720 days
    #[default]
    #[value(name = "15")]
    Fifteen,
    /// 361 to 720 days
    #[value(name = "17.5")]
    SeventeenHalf,
    /// 181 to 360 days
    #[value(name = "20")]
    Twenty,
    /// Up to 180 days
    #[value(name = "22.5")]
    TwentyTwoHalf,
}

impl TaxRate {
    /// Every supported bracket, highest first
    pub const ALL: [TaxRate; 4] = [
        TaxRate::TwentyTwoHalf,
        TaxRate::Twenty,
        TaxRate::SeventeenHalf,
        TaxRate::Fifteen,
    ];

    /// Rate as a percentage (15.0 means 15%)
    pub fn percent(self) -> f64 {
        match self {
            TaxRate::Fifteen => 15.0,
            TaxRate::SeventeenHalf => 17.5,
            TaxRate::Twenty => 20.0,
            TaxRate::TwentyTwoHalf => 22.5,
        }
    }
}

impl TryFrom<f64> for TaxRate {
    type Error = SimulationError;

    fn try_from(percent: f64) -> Result<Self> {
        TaxRate::ALL
            .into_iter()
            .find(|rate| (rate.percent() - percent).abs() < 1e-9)
            .ok_or_else(|| {
                SimulationError::InvalidConfiguration(format!(
                    "unsupported tax rate {}% (expected one of 15, 17.5, 20, 22.5)",
                    percent
                ))
            })
    }
}

impl std::fmt::Display for TaxRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}%", self.percent())
    }
}

/// Scalar inputs of one simulation run
///
/// The engine accepts any values; `validate` is the configuration boundary
/// that rejects negative amounts and unknown tax rates before a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Initial investment, applied before the first day's rate
    pub principal: f64,

    /// Deposit made on each 1st of the month (never on the first series day)
    pub monthly_contribution: f64,

    /// Flat tax on gross gains, as a percentage
    pub tax_rate_percent: f64,
}

impl SimulationConfig {
    pub fn new(principal: f64, monthly_contribution: f64, tax_rate: TaxRate) -> Self {
        Self {
            principal,
            monthly_contribution,
            tax_rate_percent: tax_rate.percent(),
        }
    }

    /// Same amounts, different tax bracket
    pub fn with_tax_rate(self, tax_rate: TaxRate) -> Self {
        Self {
            tax_rate_percent: tax_rate.percent(),
            ..self
        }
    }

    /// Reject inputs the engine is not meant to see
    pub fn validate(&self) -> Result<()> {
        check_amount("principal", self.principal)?;
        check_amount("monthly contribution", self.monthly_contribution)?;
        TaxRate::try_from(self.tax_rate_percent)?;
        Ok(())
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRINCIPAL, DEFAULT_MONTHLY_CONTRIBUTION, TaxRate::default())
    }
}

fn check_amount(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(SimulationError::InvalidConfiguration(format!(
            "{} must be a finite number, got {}",
            name, value
        )));
    }
    if value < 0.0 {
        return Err(SimulationError::InvalidConfiguration(format!(
            "{} must be non-negative, got {:.2}",
            name, value
        )));
    }
    Ok(())
}
