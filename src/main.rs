//! Selic Simulator CLI
//!
//! Fetches the daily Selic series (or reads it from CSV), runs the
//! simulation and prints the monthly and annual summaries.

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use selic_simulator::rates::{BcbSelicProvider, CsvRateProvider};
use selic_simulator::{
    report, DateWindow, PeriodSummary, RateProvider, ScenarioRunner, SimulationConfig,
    SimulationError, TaxRate,
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "selic-sim", version, about = "Simulate an investment compounding daily at the Selic rate")]
struct Args {
    /// Initial investment
    #[arg(long, default_value_t = 1000.0)]
    principal: f64,

    /// Deposit made on the 1st of each month
    #[arg(long, default_value_t = 100.0)]
    contribution: f64,

    /// Income tax bracket applied to gains
    #[arg(long, value_enum, default_value = "15")]
    tax_rate: TaxRate,

    /// First day of the simulation window
    #[arg(long, default_value = "2020-01-01")]
    start: NaiveDate,

    /// Last day of the simulation window (defaults to today)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Read rates from a CSV file (date,daily_rate_percent) instead of the BCB API
    #[arg(long)]
    rates_csv: Option<PathBuf>,

    /// Write daily.csv, monthly.csv and annual.csv into this directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print final values under every tax bracket
    #[arg(long)]
    compare_tax_rates: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SimulationConfig::new(args.principal, args.contribution, args.tax_rate);
    config.validate()?;

    let end = args.end.unwrap_or_else(|| Utc::now().date_naive());
    let window = DateWindow::new(args.start, end)?;

    println!("Selic Simulator v{}", env!("CARGO_PKG_VERSION"));
    println!("======================\n");

    let provider: Box<dyn RateProvider> = match &args.rates_csv {
        Some(path) => Box::new(
            CsvRateProvider::from_path(path)
                .with_context(|| format!("failed to load rates from {}", path.display()))?,
        ),
        None => Box::new(BcbSelicProvider::new()?),
    };

    let series = match provider.fetch_rates(&window).await {
        Ok(series) => series,
        Err(SimulationError::NoDataAvailable(reason)) => {
            println!("Could not get rate data for {}: {}", window, reason);
            println!("Try again later or pass --rates-csv.");
            return Ok(());
        }
        Err(e) => return Err(e).context("rate series rejected"),
    };

    println!("Rates: {} days from {} ({})", series.len(), provider.id(), window);
    println!("Initial investment: {:.2}", config.principal);
    println!("Monthly contribution: {:.2}", config.monthly_contribution);
    println!("Tax rate: {}\n", args.tax_rate);

    let runner = ScenarioRunner::new(series);
    let result = runner.run(config);

    print_periods("Monthly Summary", "Month", &result.monthly);
    print_periods("Annual Summary", "Year", &result.annual);

    if let Some(summary) = result.summary() {
        println!("\nFinal Value (Gross): {:.2}", summary.final_gross_value);
        println!("Final Value (Net):   {:.2}", summary.final_net_value);
        println!("Total Contributed:   {:.2}", summary.total_contributed);
    }

    if args.compare_tax_rates {
        println!("\nBy tax bracket:");
        for (rate, bracket) in runner.run_tax_brackets(config.principal, config.monthly_contribution) {
            if let (Some(gross), Some(net)) = (bracket.final_gross_value(), bracket.final_net_value()) {
                println!("  {:>6}  gross {:>14.2}  net {:>14.2}", rate.to_string(), gross, net);
            }
        }
    }

    if let Some(dir) = &args.output_dir {
        report::write_result_files(dir, &result)
            .with_context(|| format!("failed to write tables to {}", dir.display()))?;
        println!("\nFull results written to: {}", dir.display());
    }

    Ok(())
}

fn print_periods(title: &str, label: &str, rows: &[PeriodSummary]) {
    println!("{}:", title);
    println!("{:>8} {:>14} {:>14} {:>12} {:>14}", label, "Gross", "Gross Gain", "Tax", "Net");
    println!("{}", "-".repeat(66));
    for row in rows {
        println!(
            "{:>8} {:>14.2} {:>14.2} {:>12.2} {:>14.2}",
            row.period.to_string(),
            row.gross_value,
            row.gross_gain,
            row.tax_due,
            row.net_value,
        );
    }
    println!();
}
