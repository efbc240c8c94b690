//! Rate provider trait and the Banco Central do Brasil (SGS) client
//!
//! The core treats any provider failure as "no data available"; there is no
//! retry or backoff here. Callers surface the error and skip the run.

use super::clock::{Clock, SystemClock};
use super::{DateWindow, RateObservation, RateSeries};
use crate::error::{Result, SimulationError};
use async_trait::async_trait;
use chrono::{Days, NaiveDate};
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Source of a date-ascending daily rate series
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Short identifier used in logs
    fn id(&self) -> &'static str;

    /// Fetch the series covering `window` (inclusive)
    ///
    /// Returns `NoDataAvailable` when the source has nothing for the window
    /// or could not be reached, `MalformedSeries` when it answered with
    /// unusable data.
    async fn fetch_rates(&self, window: &DateWindow) -> Result<RateSeries>;
}

/// Public SGS endpoint
pub const BCB_BASE_URL: &str = "https://api.bcb.gov.br/dados/serie";

/// SGS series 11: Selic daily rate, % per day
pub const SELIC_DAILY_SERIES: u32 = 11;

/// The daily series endpoint refuses windows longer than ten years
pub const MAX_HISTORY_DAYS: u64 = 365 * 10;

const BCB_DATE_FORMAT: &str = "%d/%m/%Y";

/// Row of the SGS JSON payload: `{"data": "02/01/2020", "valor": "0.017089"}`
#[derive(Debug, Deserialize)]
struct SgsRow {
    data: String,
    valor: serde_json::Value,
}

/// Client for the BCB SGS daily Selic series
pub struct BcbSelicProvider<C: Clock = SystemClock> {
    client: Client,
    base_url: String,
    series_code: u32,
    clock: C,
}

impl BcbSelicProvider<SystemClock> {
    pub fn new() -> Result<Self> {
        Self::with_clock(SystemClock)
    }
}

impl<C: Clock> BcbSelicProvider<C> {
    pub fn with_clock(clock: C) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(SimulationError::HttpClient)?;

        Ok(Self {
            client,
            base_url: BCB_BASE_URL.to_string(),
            series_code: SELIC_DAILY_SERIES,
            clock,
        })
    }

    /// Point at a different host (mirrors, local fixtures)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Window actually requested after applying the ten-year history limit
    pub fn effective_window(&self, window: &DateWindow) -> Result<DateWindow> {
        let earliest = self
            .clock
            .today()
            .checked_sub_days(Days::new(MAX_HISTORY_DAYS))
            .unwrap_or(NaiveDate::MIN);

        if window.end < earliest {
            return Err(SimulationError::NoDataAvailable(format!(
                "window {} ends before the earliest available date {}",
                window, earliest
            )));
        }

        if window.start < earliest {
            warn!(
                "Requested start {} exceeds the {}-day history limit, clamping to {}",
                window.start, MAX_HISTORY_DAYS, earliest
            );
            return DateWindow::new(earliest, window.end);
        }

        Ok(*window)
    }

    fn url(&self, window: &DateWindow) -> String {
        format!(
            "{}/bcdata.sgs.{}/dados?formato=json&dataInicial={}&dataFinal={}",
            self.base_url,
            self.series_code,
            window.start.format(BCB_DATE_FORMAT),
            window.end.format(BCB_DATE_FORMAT),
        )
    }
}

#[async_trait]
impl<C: Clock> RateProvider for BcbSelicProvider<C> {
    fn id(&self) -> &'static str {
        "BCB_SGS"
    }

    async fn fetch_rates(&self, window: &DateWindow) -> Result<RateSeries> {
        let window = self.effective_window(window)?;
        let url = self.url(&window);
        info!("Fetching Selic daily rates for {}", window);
        debug!("GET {}", url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!("BCB request failed: {}", e);
            SimulationError::NoDataAvailable(format!("request to BCB failed: {}", e))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("BCB responded with HTTP {}", status);
            return Err(SimulationError::NoDataAvailable(format!(
                "BCB responded with HTTP {}",
                status
            )));
        }

        let body = response.text().await.map_err(|e| {
            SimulationError::NoDataAvailable(format!("failed to read BCB response: {}", e))
        })?;

        let series = parse_sgs_response(&body)?;
        info!("Received {} daily rates from BCB", series.len());
        Ok(series)
    }
}

/// Parse an SGS JSON body into a validated series
pub fn parse_sgs_response(body: &str) -> Result<RateSeries> {
    let rows: Vec<SgsRow> = serde_json::from_str(body).map_err(|e| {
        SimulationError::NoDataAvailable(format!("unexpected BCB response body: {}", e))
    })?;

    if rows.is_empty() {
        return Err(SimulationError::NoDataAvailable(
            "BCB returned an empty series".to_string(),
        ));
    }

    let observations = rows
        .into_iter()
        .map(SgsRow::into_observation)
        .collect::<Result<Vec<_>>>()?;

    RateSeries::new(observations)
}

impl SgsRow {
    fn into_observation(self) -> Result<RateObservation> {
        let date = NaiveDate::parse_from_str(&self.data, BCB_DATE_FORMAT).map_err(|e| {
            SimulationError::MalformedSeries(format!("bad date '{}': {}", self.data, e))
        })?;

        let rate = match &self.valor {
            serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
            serde_json::Value::Number(n) => n.as_f64(),
            _ => None,
        }
        .ok_or_else(|| {
            SimulationError::MalformedSeries(format!("bad rate {} on {}", self.valor, date))
        })?;

        Ok(RateObservation::new(date, rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn provider_on(y: i32, m: u32, day: u32) -> BcbSelicProvider<FixedClock> {
        BcbSelicProvider::with_clock(FixedClock(Utc.with_ymd_and_hms(y, m, day, 12, 0, 0).unwrap())).unwrap()
    }

    #[test]
    fn test_parse_sgs_body() {
        let body = r#"[
            {"data": "02/01/2020", "valor": "0.017089"},
            {"data": "03/01/2020", "valor": "0.017089"},
            {"data": "06/01/2020", "valor": 0.0171}
        ]"#;

        let series = parse_sgs_response(body).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.first_date(), Some(d(2020, 1, 2)));
        assert_eq!(series.as_slice()[0].daily_rate_percent, 0.017089);
        assert_eq!(series.as_slice()[2].daily_rate_percent, 0.0171);
    }

    #[test]
    fn test_empty_body_is_no_data() {
        let err = parse_sgs_response("[]").unwrap_err();
        assert!(err.is_no_data());

        let err = parse_sgs_response(r#"{"error": "Value(s) not found"}"#).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_bad_rows_are_malformed() {
        let bad_value = r#"[{"data": "02/01/2020", "valor": "abc"}]"#;
        assert!(matches!(
            parse_sgs_response(bad_value),
            Err(SimulationError::MalformedSeries(_))
        ));

        let bad_date = r#"[{"data": "2020-01-02", "valor": "0.01"}]"#;
        assert!(matches!(
            parse_sgs_response(bad_date),
            Err(SimulationError::MalformedSeries(_))
        ));

        let unordered = r#"[
            {"data": "03/01/2020", "valor": "0.01"},
            {"data": "02/01/2020", "valor": "0.01"}
        ]"#;
        assert!(matches!(
            parse_sgs_response(unordered),
            Err(SimulationError::MalformedSeries(_))
        ));
    }

    #[test]
    fn test_window_clamped_to_history_limit() {
        let provider = provider_on(2035, 6, 1);
        let window = DateWindow::new(d(2020, 1, 1), d(2035, 6, 1)).unwrap();

        let effective = provider.effective_window(&window).unwrap();
        assert_eq!(effective.start, d(2035, 6, 1) - Days::new(MAX_HISTORY_DAYS));
        assert_eq!(effective.end, d(2035, 6, 1));
    }

    #[test]
    fn test_recent_window_untouched() {
        let provider = provider_on(2025, 6, 1);
        let window = DateWindow::new(d(2020, 1, 1), d(2025, 6, 1)).unwrap();
        assert_eq!(provider.effective_window(&window).unwrap(), window);
    }

    #[test]
    fn test_window_entirely_too_old() {
        let provider = provider_on(2040, 1, 1);
        let window = DateWindow::new(d(2020, 1, 1), d(2020, 12, 31)).unwrap();
        assert!(provider.effective_window(&window).unwrap_err().is_no_data());
    }

    #[test]
    fn test_request_url_format() {
        let provider = provider_on(2025, 6, 1).with_base_url("http://localhost:8080");
        let window = DateWindow::new(d(2020, 1, 1), d(2020, 2, 15)).unwrap();
        assert_eq!(
            provider.url(&window),
            "http://localhost:8080/bcdata.sgs.11/dados?formato=json&dataInicial=01/01/2020&dataFinal=15/02/2020"
        );
    }

    #[tokio::test]
    async fn test_unreachable_host_is_no_data() {
        // Nothing listens on port 1
        let provider = provider_on(2025, 6, 1).with_base_url("http://127.0.0.1:1");
        let window = DateWindow::new(d(2025, 1, 1), d(2025, 5, 30)).unwrap();

        let err = provider.fetch_rates(&window).await.unwrap_err();
        assert!(err.is_no_data(), "unexpected error: {}", err);
    }

    #[tokio::test]
    async fn test_too_old_window_fails_before_request() {
        let provider = provider_on(2040, 1, 1).with_base_url("http://127.0.0.1:1");
        let window = DateWindow::new(d(2020, 1, 1), d(2020, 12, 31)).unwrap();

        let err = provider.fetch_rates(&window).await.unwrap_err();
        assert!(err.to_string().contains("earliest available date"));
    }
}
