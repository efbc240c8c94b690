//! Load daily rate series from CSV
//!
//! Expected header: `date,daily_rate_percent`. Dates may be ISO
//! (`2020-01-02`) or the BCB export format (`02/01/2020`).

use super::provider::RateProvider;
use super::{DateWindow, RateObservation, RateSeries};
use crate::error::{Result, SimulationError};
use async_trait::async_trait;
use chrono::NaiveDate;
use csv::Reader;
use log::info;
use std::path::Path;

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: String,
    daily_rate_percent: f64,
}

impl CsvRow {
    fn to_observation(&self) -> Result<RateObservation> {
        let date = parse_date(&self.date).ok_or_else(|| {
            SimulationError::MalformedSeries(format!("unrecognized date '{}'", self.date))
        })?;
        Ok(RateObservation::new(date, self.daily_rate_percent))
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%d/%m/%Y"))
        .ok()
}

/// Load a rate series from a CSV file
pub fn load_rates<P: AsRef<Path>>(path: P) -> Result<RateSeries> {
    let path = path.as_ref();
    let series = load_rates_from_reader(std::fs::File::open(path)?)?;
    info!("Loaded {} daily rates from {}", series.len(), path.display());
    Ok(series)
}

/// Load a rate series from any reader (string buffer, network stream)
pub fn load_rates_from_reader<R: std::io::Read>(reader: R) -> Result<RateSeries> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut observations = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result.map_err(|e| {
            SimulationError::MalformedSeries(format!("unreadable rate row: {}", e))
        })?;
        observations.push(row.to_observation()?);
    }

    RateSeries::new(observations)
}

/// Serves windows out of a series loaded up front
#[derive(Debug, Clone)]
pub struct CsvRateProvider {
    series: RateSeries,
}

impl CsvRateProvider {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { series: load_rates(path)? })
    }

    pub fn from_series(series: RateSeries) -> Self {
        Self { series }
    }
}

#[async_trait]
impl RateProvider for CsvRateProvider {
    fn id(&self) -> &'static str {
        "CSV"
    }

    async fn fetch_rates(&self, window: &DateWindow) -> Result<RateSeries> {
        let series = self.series.within(window);
        if series.is_empty() {
            return Err(SimulationError::NoDataAvailable(format!(
                "rate file has no observations in {}",
                window
            )));
        }
        Ok(series)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "date,daily_rate_percent\n\
        2020-01-30,0.017089\n\
        31/01/2020,0.017089\n\
        2020-02-03,0.016\n";

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_load_mixed_date_formats() {
        let series = load_rates_from_reader(SAMPLE.as_bytes()).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.as_slice()[1].date, d(2020, 1, 31));
        assert_eq!(series.as_slice()[2].daily_rate_percent, 0.016);
    }

    #[test]
    fn test_bad_rows_rejected() {
        let bad_rate = "date,daily_rate_percent\n2020-01-02,abc\n";
        assert!(matches!(
            load_rates_from_reader(bad_rate.as_bytes()),
            Err(SimulationError::MalformedSeries(_))
        ));

        let bad_date = "date,daily_rate_percent\nJan 2 2020,0.01\n";
        assert!(matches!(
            load_rates_from_reader(bad_date.as_bytes()),
            Err(SimulationError::MalformedSeries(_))
        ));

        let unordered = "date,daily_rate_percent\n2020-01-03,0.01\n2020-01-02,0.01\n";
        assert!(matches!(
            load_rates_from_reader(unordered.as_bytes()),
            Err(SimulationError::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_rates("does/not/exist.csv");
        assert!(matches!(result, Err(SimulationError::Io(_))));
    }

    #[tokio::test]
    async fn test_csv_provider_filters_window() {
        let provider =
            CsvRateProvider::from_series(load_rates_from_reader(SAMPLE.as_bytes()).unwrap());

        let window = DateWindow::new(d(2020, 2, 1), d(2020, 2, 29)).unwrap();
        let series = provider.fetch_rates(&window).await.unwrap();
        assert_eq!(series.len(), 1);

        let empty = DateWindow::new(d(2021, 1, 1), d(2021, 12, 31)).unwrap();
        assert!(provider.fetch_rates(&empty).await.unwrap_err().is_no_data());
    }
}
