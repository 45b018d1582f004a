//! Error types.
//!
//! | Error | Raised by |
//! |-------|-----------|
//! | `AllocationError` | `AllocationEngine::allocate`, before any vehicle is allocated |
//! | `IngestError` | CSV readers in `ingest` |
//! | `ConfigError` | `FleetConfig` loading |

use crate::validation::ValidationError;

/// Failure of an allocation run.
#[derive(thiserror::Error, Debug)]
pub enum AllocationError {
    /// One or more trip records failed validation; holds every problem found.
    #[error("{} trip record(s) failed validation: {}", .0.len(), summarize(.0))]
    InvalidTrips(Vec<ValidationError>),
    /// A trip's route allows zero trips per vehicle per day.
    #[error("Cannot allocate booking {booking_id}: route '{route}' allows no trips per day")]
    ZeroDailyCap { booking_id: String, route: String },
    /// Pickup plus the route turnaround is not a representable time.
    #[error("Cannot compute next availability for booking {booking_id}: turnaround of route '{route}' is out of range")]
    TurnaroundOutOfRange { booking_id: String, route: String },
}

/// Failure while reading trip or route configuration input.
#[derive(thiserror::Error, Debug)]
pub enum IngestError {
    /// The input could not be opened or read.
    #[error("Failed to read {source_label}: {error}")]
    Io {
        source_label: String,
        error: std::io::Error,
    },
    /// Malformed CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
    /// A required column is absent from the header row.
    #[error("{source_label}: Could not find column '{column}'")]
    MissingColumn {
        source_label: String,
        column: String,
    },
    /// A cell holds a value that cannot be used. `row` is 1-based, header excluded.
    #[error("{source_label}: row {row}, column '{column}': invalid value '{value}' ({reason})")]
    InvalidValue {
        source_label: String,
        row: usize,
        column: String,
        value: String,
        reason: String,
    },
}

/// Failure while loading a fleet configuration.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file {path}: {error}")]
    Io { path: String, error: std::io::Error },
    /// The configuration is not valid TOML for `FleetConfig`.
    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

fn summarize(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
