//! Daily rate series: observations, validation and providers
//!
//! The engine only needs a date-ascending slice of `(date, rate)` pairs.
//! Everything that produces such a slice (HTTP, CSV, cache) lives here and
//! validates ordering once, at the boundary.

mod clock;
mod cache;
pub mod loader;
pub mod provider;

pub use clock::{Clock, SystemClock};
pub use cache::{CachedRateProvider, DEFAULT_CACHE_TTL_SECS};
pub use loader::{load_rates, load_rates_from_reader, CsvRateProvider};
pub use provider::{BcbSelicProvider, RateProvider};

use crate::error::{Result, SimulationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One day's published rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateObservation {
    pub date: NaiveDate,

    /// Rate for that day as a percentage (0.04 means 0.04% for the day)
    pub daily_rate_percent: f64,
}

impl RateObservation {
    pub fn new(date: NaiveDate, daily_rate_percent: f64) -> Self {
        Self { date, daily_rate_percent }
    }

    /// Multiplicative growth factor for the day
    pub fn growth_factor(&self) -> f64 {
        1.0 + self.daily_rate_percent / 100.0
    }
}

/// Inclusive date range used to query a provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(SimulationError::InvalidConfiguration(format!(
                "window start {} is after end {}",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// Date-ordered daily rates, validated on construction
///
/// Dates are strictly ascending (no duplicates) and every rate is finite.
/// An empty series is valid; providers decide whether that means "no data".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateSeries {
    observations: Vec<RateObservation>,
}

impl RateSeries {
    pub fn new(observations: Vec<RateObservation>) -> Result<Self> {
        if let Some(bad) = observations.iter().find(|o| !o.daily_rate_percent.is_finite()) {
            return Err(SimulationError::MalformedSeries(format!(
                "non-numeric rate on {}",
                bad.date
            )));
        }

        if let Some(pair) = observations.windows(2).find(|w| w[1].date <= w[0].date) {
            return Err(SimulationError::MalformedSeries(format!(
                "dates not strictly ascending: {} followed by {}",
                pair[0].date, pair[1].date
            )));
        }

        Ok(Self { observations })
    }

    /// Sub-series restricted to a window
    pub fn within(&self, window: &DateWindow) -> RateSeries {
        RateSeries {
            observations: self
                .observations
                .iter()
                .filter(|o| window.contains(o.date))
                .copied()
                .collect(),
        }
    }

    pub fn as_slice(&self) -> &[RateObservation] {
        &self.observations
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.observations.first().map(|o| o.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.observations.last().map(|o| o.date)
    }

    pub fn into_inner(self) -> Vec<RateObservation> {
        self.observations
    }
}

impl AsRef<[RateObservation]> for RateSeries {
    fn as_ref(&self) -> &[RateObservation] {
        &self.observations
    }
}
