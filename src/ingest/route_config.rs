//! Route-group configuration ingestion.

use std::io::Read;
use std::path::Path;

use super::column_indices;
use crate::error::IngestError;
use crate::models::RouteConfigRow;

/// Columns a route configuration file must contain.
pub const REQUIRED_CONFIG_COLUMNS: [&str; 4] = ["Route Group", "Duration", "Break Time", "Max Trips"];

struct RowContext<'a> {
    source_label: &'a str,
    row: usize,
}

impl RowContext<'_> {
    fn invalid(&self, column: &str, value: &str, reason: &str) -> IngestError {
        IngestError::InvalidValue {
            source_label: self.source_label.to_string(),
            row: self.row,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    fn hours(&self, column: &str, raw: &str) -> Result<f64, IngestError> {
        let value: f64 = raw
            .parse()
            .map_err(|_| self.invalid(column, raw, "not a number"))?;
        if !value.is_finite() || value < 0.0 {
            return Err(self.invalid(column, raw, "must be a non-negative number of hours"));
        }
        Ok(value)
    }

    /// Accepts `"3"` and integral decimals such as `"3.0"`; zero is rejected.
    fn trip_cap(&self, column: &str, raw: &str) -> Result<u32, IngestError> {
        let value = match raw.parse::<u32>() {
            Ok(value) => Some(value),
            Err(_) => match raw.parse::<f64>() {
                Ok(value) if value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64 => {
                    Some(value as u32)
                }
                _ => None,
            },
        };
        match value {
            Some(value) if value > 0 => Ok(value),
            _ => Err(self.invalid(column, raw, "must be a positive whole number")),
        }
    }
}

/// Reads route-group configuration rows from CSV.
///
/// Labels are passed through untouched; splitting and symmetry are handled
/// by [`RouteConfigIndex::from_rows`](crate::models::RouteConfigIndex::from_rows).
///
/// # Errors
/// [`IngestError::MissingColumn`] if a required column is absent,
/// [`IngestError::InvalidValue`] for non-numeric or negative values, or a
/// zero trip cap.
pub fn read_route_config<R: Read>(
    reader: R,
    source_label: &str,
) -> Result<Vec<RouteConfigRow>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let headers = reader.headers()?.clone();
    let [group_col, duration_col, break_col, max_col] =
        column_indices(&headers, &REQUIRED_CONFIG_COLUMNS, source_label)?;

    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let ctx = RowContext {
            source_label,
            row: i + 1,
        };
        let cell = |col: usize| record.get(col).unwrap_or("").trim();

        let route_group = cell(group_col);
        if route_group.is_empty() {
            log::warn!("{source_label}: row {} has no route group, skipping", ctx.row);
            continue;
        }
        rows.push(RouteConfigRow::new(
            route_group,
            ctx.hours("Duration", cell(duration_col))?,
            ctx.hours("Break Time", cell(break_col))?,
            ctx.trip_cap("Max Trips", cell(max_col))?,
        ));
    }

    log::info!("{source_label}: read {} route groups", rows.len());
    Ok(rows)
}

/// Reads route-group configuration rows from a CSV file.
pub fn read_route_config_file(path: impl AsRef<Path>) -> Result<Vec<RouteConfigRow>, IngestError> {
    let path = path.as_ref();
    let label = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|error| IngestError::Io {
        source_label: label.clone(),
        error,
    })?;
    read_route_config(file, &label)
}
