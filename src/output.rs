// Artifact writers: raw provider documents as pretty JSON, flat records as
// CSV. Column order comes from the record struct field order and is part of
// the downstream contract.
use std::io::{self, Write};
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::normalize::FlatRecord;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV serialization error: {0}")]
    Csv(#[from] csv::Error),
}

// Verbatim document, including any injected `_fetched_at`
pub fn write_raw_document(path: &Path, document: &Value) -> Result<(), OutputError> {
    let pretty = serde_json::to_string_pretty(document)?;
    std::fs::write(path, pretty)?;
    Ok(())
}

pub fn write_records(path: &Path, records: &[FlatRecord]) -> Result<(), OutputError> {
    let mut writer = csv::Writer::from_path(path)?;
    serialize_records(&mut writer, records)?;
    writer.flush()?;
    Ok(())
}

// In-memory rendering of the same CSV, for embedders and tests
pub fn records_to_csv(records: &[FlatRecord]) -> Result<String, OutputError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    serialize_records(&mut writer, records)?;
    let bytes = writer
        .into_inner()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e).into())
}

fn serialize_records<W: Write>(
    writer: &mut csv::Writer<W>,
    records: &[FlatRecord],
) -> Result<(), csv::Error> {
    for record in records {
        match record {
            FlatRecord::OneWay(row) => writer.serialize(row)?,
            FlatRecord::RoundTrip(row) => writer.serialize(row)?,
        }
    }
    Ok(())
}
