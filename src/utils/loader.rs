// Flight table loading from a comma-separated file

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{PlannerError, Result};
use crate::models::{FlightRecord, FlightTable};

/// Columns every flight table must provide
pub const REQUIRED_COLUMNS: [&str; 5] = ["source", "destination", "airline", "price", "time"];

// Position of each required column within a row
struct ColumnIndex {
    source: usize,
    destination: usize,
    airline: usize,
    price: usize,
    time: usize,
}

impl ColumnIndex {
    fn from_header(header: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            header
                .iter()
                .position(|h| h.trim().trim_start_matches('\u{feff}').eq_ignore_ascii_case(name))
                .ok_or_else(|| PlannerError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            source: find("source")?,
            destination: find("destination")?,
            airline: find("airline")?,
            price: find("price")?,
            time: find("time")?,
        })
    }
}

/// Loads the flight table from `path`
pub fn load_flights(path: &Path) -> Result<FlightTable> {
    info!(path = %path.display(), "loading flight table");

    let file = File::open(path).map_err(|e| PlannerError::DataUnavailable {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let records = parse_flights(file).map_err(|e| match e {
        PlannerError::DataUnavailable { reason, .. } => PlannerError::DataUnavailable {
            path: path.display().to_string(),
            reason,
        },
        other => other,
    })?;
    info!(flights = records.len(), "loaded flight table");

    Ok(FlightTable::new(records))
}

// Errors with a position point at a bad row; the rest are read failures
fn csv_error(err: csv::Error) -> PlannerError {
    match err.position() {
        Some(pos) => PlannerError::MalformedRow {
            line: pos.line() as usize,
            reason: err.to_string(),
        },
        None => PlannerError::DataUnavailable {
            path: "<input>".to_string(),
            reason: err.to_string(),
        },
    }
}

/// Parses flight records from any reader.
///
/// The first row is the header; extra columns are ignored and blank lines
/// are skipped. Quoted fields may span lines.
pub fn parse_flights<R: Read>(reader: R) -> Result<Vec<FlightRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);

    let header = reader.headers().map_err(csv_error)?.clone();
    if header.is_empty() {
        // No header at all: treat as a table without the first required column
        return Err(PlannerError::MissingColumn(REQUIRED_COLUMNS[0].to_string()));
    }
    let index = ColumnIndex::from_header(&header)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.map_err(csv_error)?;
        let line = row.position().map_or(0, |pos| pos.line() as usize);
        let field = |i: usize| row.get(i).unwrap_or_default();

        let price = parse_amount(field(index.price), "price", line)?;
        let time = parse_amount(field(index.time), "time", line)?;

        records.push(FlightRecord::new(
            field(index.source),
            field(index.destination),
            field(index.airline),
            price,
            time,
        ));
    }

    debug!(rows = records.len(), "parsed flight rows");
    Ok(records)
}

// Non-negative, finite number
fn parse_amount(raw: &str, column: &str, line: usize) -> Result<f64> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|_| PlannerError::MalformedRow {
            line,
            reason: format!("{column} \"{}\" is not a number", raw.trim()),
        })?;

    if !value.is_finite() || value < 0.0 {
        return Err(PlannerError::MalformedRow {
            line,
            reason: format!("{column} must be a non-negative number, got {value}"),
        });
    }

    Ok(value)
}
