//! AWS Lambda handler for running simulations over HTTP
//!
//! Accepts the simulation inputs as JSON and returns the monthly and annual
//! summaries (and optionally the daily ledger) plus the final totals.
//! Rates come from the request body when supplied, otherwise from the BCB
//! API through a process-wide cache that survives warm invocations.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use chrono::{NaiveDate, Utc};
use lambda_http::{run, service_fn, Body, Error, Request, Response};
use selic_simulator::config::{DEFAULT_MONTHLY_CONTRIBUTION, DEFAULT_PRINCIPAL};
use selic_simulator::projection::{LedgerEntry, LedgerSummary};
use selic_simulator::rates::{BcbSelicProvider, CachedRateProvider};
use selic_simulator::{
    DateWindow, PeriodSummary, RateObservation, RateProvider, RateSeries, ScenarioRunner,
    SimulationConfig, SimulationError, TaxRate,
};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Input for one simulation
#[derive(Debug, Deserialize)]
pub struct SimulationRequest {
    /// Initial investment (default: 1000)
    #[serde(default = "default_principal")]
    pub principal: f64,

    /// Deposit on the 1st of each month (default: 100)
    #[serde(default = "default_contribution")]
    pub monthly_contribution: f64,

    /// One of 15, 17.5, 20, 22.5 (default: 15)
    #[serde(default = "default_tax_rate")]
    pub tax_rate_percent: f64,

    /// Window start (default: 2020-01-01)
    #[serde(default = "default_start")]
    pub start: NaiveDate,

    /// Window end (default: today)
    #[serde(default)]
    pub end: Option<NaiveDate>,

    /// Caller-supplied series; skips the BCB fetch when present
    #[serde(default)]
    pub rates: Option<Vec<RateObservation>>,

    /// Include the full daily ledger in the response
    #[serde(default)]
    pub include_daily: bool,
}

fn default_principal() -> f64 { DEFAULT_PRINCIPAL }
fn default_contribution() -> f64 { DEFAULT_MONTHLY_CONTRIBUTION }
fn default_tax_rate() -> f64 { TaxRate::default().percent() }
fn default_start() -> NaiveDate { NaiveDate::from_ymd_opt(2020, 1, 1).unwrap_or_default() }

/// Output of one simulation
#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub config: SimulationConfig,
    pub rate_source: &'static str,
    pub final_gross_value: Option<f64>,
    pub final_net_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<LedgerSummary>,
    pub monthly: Vec<PeriodSummary>,
    pub annual: Vec<PeriodSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily: Option<Vec<LedgerEntry>>,
    pub execution_time_ms: u64,
}

static BCB_PROVIDER: OnceLock<CachedRateProvider<BcbSelicProvider>> = OnceLock::new();

fn bcb_provider() -> Result<&'static CachedRateProvider<BcbSelicProvider>, SimulationError> {
    if let Some(provider) = BCB_PROVIDER.get() {
        return Ok(provider);
    }
    let provider = CachedRateProvider::new(BcbSelicProvider::new()?);
    Ok(BCB_PROVIDER.get_or_init(|| provider))
}

fn status_for(error: &SimulationError) -> u16 {
    match error {
        SimulationError::NoDataAvailable(_) => 404,
        SimulationError::MalformedSeries(_) | SimulationError::InvalidConfiguration(_) => 400,
        SimulationError::HttpClient(_) | SimulationError::Csv(_) | SimulationError::Io(_) => 500,
    }
}

fn error_response(status: u16, message: &str) -> Result<Response<Body>, Error> {
    let body = serde_json::json!({ "error": message });
    Ok(Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .body(Body::Text(body.to_string()))?)
}

fn json_response(body: &SimulationResponse) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(200)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "POST, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type")
        .body(Body::Text(serde_json::to_string(body)?))?)
}

async fn run_request(request: SimulationRequest) -> Result<SimulationResponse, SimulationError> {
    let start = std::time::Instant::now();

    let config = SimulationConfig {
        principal: request.principal,
        monthly_contribution: request.monthly_contribution,
        tax_rate_percent: request.tax_rate_percent,
    };
    config.validate()?;

    let (series, rate_source) = match request.rates {
        Some(rates) => {
            let series = RateSeries::new(rates)?;
            if series.is_empty() {
                return Err(SimulationError::NoDataAvailable(
                    "request contained an empty rate series".to_string(),
                ));
            }
            (series, "REQUEST")
        }
        None => {
            let end = request.end.unwrap_or_else(|| Utc::now().date_naive());
            let window = DateWindow::new(request.start, end)?;
            let provider = bcb_provider()?;
            (provider.fetch_rates(&window).await?, provider.id())
        }
    };

    let result = ScenarioRunner::new(series).run(config);

    Ok(SimulationResponse {
        config,
        rate_source,
        final_gross_value: result.final_gross_value(),
        final_net_value: result.final_net_value(),
        summary: result.summary(),
        monthly: result.monthly,
        annual: result.annual,
        daily: request.include_daily.then_some(result.daily.entries),
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

/// Lambda handler function
async fn handler(event: Request) -> Result<Response<Body>, Error> {
    // Handle CORS preflight
    if event.method().as_str() == "OPTIONS" {
        return Ok(Response::builder()
            .status(200)
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "POST, OPTIONS")
            .header("Access-Control-Allow-Headers", "Content-Type")
            .body(Body::Empty)?);
    }

    let body_str = match event.body() {
        Body::Text(s) => s.clone(),
        Body::Binary(b) => String::from_utf8_lossy(b).to_string(),
        Body::Empty => "{}".to_string(),
    };

    let request: SimulationRequest = match serde_json::from_str(&body_str) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e)),
    };

    match run_request(request).await {
        Ok(response) => json_response(&response),
        Err(e) => {
            log::warn!("Simulation request failed: {}", e);
            error_response(status_for(&e), &e.to_string())
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
