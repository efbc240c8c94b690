//! CSV export of simulation views

use crate::aggregation::PeriodSummary;
use crate::error::Result;
use crate::projection::DailyLedger;
use crate::scenario::SimulationResult;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

/// Write any serializable rows as CSV with a header line
pub fn write_csv<W: Write, T: Serialize>(writer: W, rows: &[T]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_daily<W: Write>(writer: W, ledger: &DailyLedger) -> Result<()> {
    write_csv(writer, &ledger.entries)
}

pub fn write_periods<W: Write>(writer: W, summaries: &[PeriodSummary]) -> Result<()> {
    write_csv(writer, summaries)
}

/// Write `daily.csv`, `monthly.csv` and `annual.csv` into `dir`
pub fn write_result_files(dir: &Path, result: &SimulationResult) -> Result<()> {
    std::fs::create_dir_all(dir)?;

    write_daily(std::fs::File::create(dir.join("daily.csv"))?, &result.daily)?;
    write_periods(std::fs::File::create(dir.join("monthly.csv"))?, &result.monthly)?;
    write_periods(std::fs::File::create(dir.join("annual.csv"))?, &result.annual)?;

    info!("Wrote daily, monthly and annual tables to {}", dir.display());
    Ok(())
}
