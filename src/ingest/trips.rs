//! Trip record ingestion.
//!
//! Each row becomes one [`TripRequest`]:
//! - pickup time = start date combined with the trimmed pickup time; rows
//!   where either part does not parse keep `pickup_time = None` and are
//!   reported by validation before allocation
//! - route = trimmed, delimiter-normalized, then aliased
//! - category = car type mapped and merged per [`FleetConfig`]

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::io::Read;
use std::path::Path;

use super::{column_indices, normalize_route};
use crate::config::FleetConfig;
use crate::error::IngestError;
use crate::models::TripRequest;

/// Columns a trip file must contain.
pub const REQUIRED_TRIP_COLUMNS: [&str; 5] = [
    "Booking Id",
    "Start Date (DD-MMM-YYYY)",
    "Pickup Time",
    "Route",
    "Car Type",
];

const DATE_FORMATS: [&str; 3] = ["%d-%b-%Y", "%Y-%m-%d", "%d/%m/%Y"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%d-%b-%Y %H:%M:%S"];
const TIME_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(raw, f).ok())
        .or_else(|| {
            DATE_TIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
                .map(|dt| dt.date())
        })
}

/// Combines a start-date cell and a pickup-time cell.
///
/// Returns `None` if either part is empty or does not parse.
pub fn parse_pickup(start_date: &str, pickup_time: &str) -> Option<NaiveDateTime> {
    let date = parse_date(start_date.trim())?;
    let time = TIME_FORMATS
        .iter()
        .find_map(|f| NaiveTime::parse_from_str(pickup_time.trim(), f).ok())?;
    Some(date.and_time(time))
}

/// Reads trip records from CSV.
///
/// `source_label` names the input in error messages.
///
/// # Errors
/// [`IngestError::MissingColumn`] if a required column is absent,
/// [`IngestError::InvalidValue`] for an empty booking ID or route,
/// [`IngestError::Csv`] for malformed CSV.
pub fn read_trips<R: Read>(
    reader: R,
    source_label: &str,
    config: &FleetConfig,
) -> Result<Vec<TripRequest>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let [booking_col, date_col, time_col, route_col, car_col] =
        column_indices(&headers, &REQUIRED_TRIP_COLUMNS, source_label)?;

    let mut trips = Vec::new();
    let mut unparsed = 0usize;
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let cell = |col: usize| record.get(col).unwrap_or("").trim();

        let booking_id = cell(booking_col);
        if booking_id.is_empty() {
            return Err(missing_value(source_label, row, "Booking Id"));
        }
        let raw_route = cell(route_col);
        if raw_route.is_empty() {
            return Err(missing_value(source_label, row, "Route"));
        }

        let route = config.resolve_route_alias(&normalize_route(raw_route));
        let category = config.categorize(cell(car_col));
        let trip = match parse_pickup(cell(date_col), cell(time_col)) {
            Some(pickup) => TripRequest::new(booking_id, category, route, pickup),
            None => {
                unparsed += 1;
                log::warn!(
                    "{source_label}: row {row} (booking {booking_id}): cannot parse pickup from '{}' '{}'",
                    cell(date_col),
                    cell(time_col)
                );
                TripRequest::with_unparsed_pickup(booking_id, category, route)
            }
        };
        trips.push(trip);
    }

    log::info!(
        "{source_label}: read {} trips ({} with unparseable pickup)",
        trips.len(),
        unparsed
    );
    Ok(trips)
}

/// Reads trip records from a CSV file.
pub fn read_trips_file(
    path: impl AsRef<Path>,
    config: &FleetConfig,
) -> Result<Vec<TripRequest>, IngestError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|error| IngestError::Io {
        source_label: label.clone(),
        error,
    })?;
    read_trips(file, &label, config)
}

fn missing_value(source_label: &str, row: usize, column: &str) -> IngestError {
    IngestError::InvalidValue {
        source_label: source_label.to_string(),
        row,
        column: column.to_string(),
        value: String::new(),
        reason: "required value is empty".to_string(),
    }
}
