// Batch orchestration: enumerate query tuples, then fetch, persist and
// normalize each one to completion before moving to the next.
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::combos;
use crate::fetch::{FetchError, FlightSearchApi};
use crate::normalize::{ItineraryProcessor, ProcessingError, TripType};
use crate::output::{self, OutputError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("normalization failed: {0}")]
    Processing(#[from] ProcessingError),

    #[error("artifact write failed: {0}")]
    Output(#[from] OutputError),
}

// Which legs of the batch to run; the two enumerations never interact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    OneWay,
    RoundTrip,
    Both,
}

impl RunMode {
    pub fn includes_one_way(self) -> bool {
        matches!(self, RunMode::OneWay | RunMode::Both)
    }

    pub fn includes_round_trip(self) -> bool {
        matches!(self, RunMode::RoundTrip | RunMode::Both)
    }
}

impl FromStr for RunMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-way" => Ok(RunMode::OneWay),
            "round-trip" => Ok(RunMode::RoundTrip),
            "both" => Ok(RunMode::Both),
            other => Err(format!(
                "unknown mode '{other}', expected one-way, round-trip or both"
            )),
        }
    }
}

#[derive(Debug, Clone)]
pub struct BatchOptions {
    pub cities: Vec<String>,
    pub depart_dates: Vec<NaiveDate>,
    pub return_dates: Vec<NaiveDate>,
    pub mode: RunMode,
    pub out_dir: PathBuf,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BatchSummary {
    pub documents_fetched: usize,
    pub records_written: usize,
}

// Runs the whole sweep sequentially. A failed tuple aborts the batch and
// leaves the artifacts of the tuples completed before it in place.
pub async fn run_batch(
    client: &dyn FlightSearchApi,
    options: &BatchOptions,
) -> Result<BatchSummary, PipelineError> {
    let processor = ItineraryProcessor::new();
    let mut summary = BatchSummary::default();

    if options.mode.includes_one_way() {
        for query in combos::one_way_combinations(&options.cities, &options.depart_dates) {
            info!(
                "fetching one-way {}->{} on {}",
                query.origin, query.destination, query.outbound_date
            );
            let document = client.fetch_one_way(&query).await?;
            let stem = query.file_stem();
            output::write_raw_document(&options.out_dir.join(format!("{stem}.json")), &document)?;

            let parsed = processor.parse_document(&document)?;
            let records = processor.normalize(&parsed, TripType::OneWay)?;
            output::write_records(&options.out_dir.join(format!("{stem}.csv")), &records)?;

            summary.documents_fetched += 1;
            summary.records_written += records.len();
        }
    }

    if options.mode.includes_round_trip() {
        for query in combos::round_trip_combinations(
            &options.cities,
            &options.depart_dates,
            &options.return_dates,
        ) {
            info!(
                "fetching round-trip {}->{} {} to {}",
                query.origin, query.destination, query.outbound_date, query.return_date
            );
            let document = client.fetch_round_trip(&query).await?;
            let stem = query.file_stem();
            output::write_raw_document(&options.out_dir.join(format!("{stem}.json")), &document)?;

            let parsed = processor.parse_document(&document)?;
            let records = processor.normalize(&parsed, TripType::RoundTrip)?;
            output::write_records(&options.out_dir.join(format!("{stem}.csv")), &records)?;

            summary.documents_fetched += 1;
            summary.records_written += records.len();
        }
    }

    info!(
        "batch complete: {} documents, {} records",
        summary.documents_fetched, summary.records_written
    );
    Ok(summary)
}
