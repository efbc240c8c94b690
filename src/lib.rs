//! Selic Simulator - daily compounding investment simulation over the Selic rate
//!
//! This library provides:
//! - A daily compounding engine with monthly contributions and flat income tax
//! - Monthly and annual roll-ups of the daily ledger
//! - Rate series providers (BCB SGS API, CSV files) with a TTL cache
//! - Batch scenario runs, e.g. comparing tax brackets

pub mod error;
pub mod config;
pub mod rates;
pub mod projection;
pub mod aggregation;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use error::SimulationError;
pub use config::{SimulationConfig, TaxRate};
pub use rates::{DateWindow, RateObservation, RateProvider, RateSeries};
pub use projection::{simulate, CompoundingEngine, DailyLedger, LedgerEntry};
pub use aggregation::{to_annual, to_monthly, PeriodKey, PeriodSummary};
pub use scenario::{ScenarioRunner, SimulationResult};
