use anyhow::Context;
use chrono::NaiveDate;
use clap::{Arg, Command};
use std::env;
use std::path::PathBuf;
use tracing::info;

use flight_batch::fetch::{ClientConfig, SerpApiClient};
use flight_batch::pipeline::{run_batch, BatchOptions, RunMode};

fn parse_dates(raw: &str) -> anyhow::Result<Vec<NaiveDate>> {
    raw.split(',')
        .map(|d| {
            NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d")
                .with_context(|| format!("invalid date '{}', expected YYYY-MM-DD", d.trim()))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let matches = Command::new("flight-batch")
        .version("0.1.0")
        .about("Batch fetch & process flight data for lists of cities and dates")
        .arg(
            Arg::new("cities")
                .long("cities")
                .value_name("CODES")
                .help("Comma-separated IATA codes of cities (e.g. DEL,BOM,BLR)")
                .required(true),
        )
        .arg(
            Arg::new("depart-dates")
                .long("depart-dates")
                .value_name("DATES")
                .help("Comma-separated departure dates YYYY-MM-DD")
                .required(true),
        )
        .arg(
            Arg::new("return-dates")
                .long("return-dates")
                .value_name("DATES")
                .help("Comma-separated return dates YYYY-MM-DD (for round-trip)"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .value_name("MODE")
                .help("Which flight types to fetch: one-way, round-trip, or both")
                .default_value("both"),
        )
        .arg(
            Arg::new("out-dir")
                .long("out-dir")
                .value_name("DIR")
                .help("Directory for raw JSON and CSV artifacts")
                .default_value("."),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .value_name("KEY")
                .help("SerpApi key (or set SERPAPI_API_KEY env var)"),
        )
        .get_matches();

    // Configuration problems surface here, before any fetch begins
    let api_key = matches
        .get_one::<String>("api-key")
        .cloned()
        .or_else(|| env::var("SERPAPI_API_KEY").ok())
        .context("SerpApi key is required. Set SERPAPI_API_KEY or use --api-key")?;

    let cities: Vec<String> = matches
        .get_one::<String>("cities")
        .unwrap()
        .split(',')
        .map(|c| c.trim().to_string())
        .collect();
    let depart_dates = parse_dates(matches.get_one::<String>("depart-dates").unwrap())?;
    let return_dates = match matches.get_one::<String>("return-dates") {
        Some(raw) => parse_dates(raw)?,
        None => Vec::new(),
    };
    let mode: RunMode = matches
        .get_one::<String>("mode")
        .unwrap()
        .parse()
        .map_err(anyhow::Error::msg)?;
    let out_dir = PathBuf::from(matches.get_one::<String>("out-dir").unwrap());
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("cannot create output directory {}", out_dir.display()))?;

    let client = SerpApiClient::new(ClientConfig::new(api_key))?;
    let options = BatchOptions {
        cities,
        depart_dates,
        return_dates,
        mode,
        out_dir,
    };

    let summary = run_batch(&client, &options).await?;
    info!(
        "fetched {} documents, wrote {} records",
        summary.documents_fetched, summary.records_written
    );
    Ok(())
}
