//! Error taxonomy for the simulator boundary
//!
//! The compounding engine and the period aggregator are total and never fail.
//! Everything here is raised at the edges: rate providers, the CSV loader and
//! configuration validation.

use thiserror::Error;

/// Errors raised before a simulation runs
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Provider returned nothing (or failed) for the requested window.
    /// Callers should surface this as a non-fatal message and skip the run.
    #[error("No rate data available: {0}")]
    NoDataAvailable(String),

    /// Rate series is not strictly ascending or carries unusable values.
    #[error("Malformed rate series: {0}")]
    MalformedSeries(String),

    /// Negative amounts, unknown tax rate or an inverted date window.
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The HTTP client for a remote provider could not be built.
    #[error("HTTP client setup failed: {0}")]
    HttpClient(reqwest::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SimulationError {
    /// Whether the error only means "nothing to simulate" rather than a defect
    pub fn is_no_data(&self) -> bool {
        matches!(self, SimulationError::NoDataAvailable(_))
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SimulationError>;
