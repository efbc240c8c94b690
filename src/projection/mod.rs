//! Compounding engine and the daily ledger it produces

mod state;
mod engine;
mod ledger;

pub use state::AccumulationState;
pub use engine::{simulate, CompoundingEngine};
pub use ledger::{DailyLedger, LedgerEntry, LedgerSummary};
