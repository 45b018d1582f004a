//! Greedy fleet sizing for intercity trip batches.
//!
//! Given a batch of trip requests and per-route operating parameters, assigns
//! every trip to a vehicle of its category, reusing vehicles that are free,
//! parked at the pickup city and under their daily trip cap, and
//! commissioning new ones otherwise. The number of vehicles commissioned is
//! the fleet-size estimate.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `TripRequest`, `Category`, `RouteConfigIndex`,
//!   `Allocation`
//! - **`allocation`**: `AllocationEngine`, utilization analysis, schedule queries
//! - **`validation`**: Batch checks before allocation and invariant audits after
//! - **`ingest`**: CSV readers for trip records and route configuration
//! - **`config`**: TOML fleet configuration (car-type mapping, aliases, policy)
//! - **`report`**: Serializable `FleetReport`
//! - **`error`**: Error types
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_fleet::allocation::AllocationEngine;
//! use u_fleet::models::{Category, RouteConfigIndex, RouteConfigRow, TripRequest};
//!
//! let routes = RouteConfigIndex::from_rows(vec![
//!     RouteConfigRow::new("Chennai-Vellore", 2.0, 1.0, 3),
//! ]);
//! let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
//! let trips = vec![
//!     TripRequest::new("B1", Category::Sedan, "Chennai-Vellore", day.and_hms_opt(6, 0, 0).unwrap()),
//!     TripRequest::new("B2", Category::Sedan, "Vellore-Chennai", day.and_hms_opt(9, 0, 0).unwrap()),
//! ];
//!
//! let allocation = AllocationEngine::new(&routes).allocate(&trips).unwrap();
//! assert_eq!(allocation.vehicle_count(Category::Sedan), 1);
//! ```
//!
//! # References
//!
//! - Bodin et al. (1983), "Routing and Scheduling of Vehicles and Crews"
//! - Daduna & Paixão (1995), "Vehicle Scheduling for Public Mass Transit"

pub mod allocation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod report;
pub mod validation;
