//! Greedy vehicle allocation and its derived views.
//!
//! # Algorithm
//!
//! `AllocationEngine` assigns each trip, in input order, to the first vehicle
//! of its category (by creation order) that is free, parked at the trip's
//! source and under its daily cap, and commissions a new vehicle otherwise.
//! It is a single-pass heuristic; the fleet it produces is not guaranteed to
//! be minimal.
//!
//! # Views
//!
//! - `UtilizationAnalyzer`: trip count per vehicle against the category mean.
//! - `ScheduleIndex`: a vehicle's trips in pickup order, with route cities.

mod engine;
mod pool;
mod schedule_index;
mod utilization;

pub use engine::{sort_for_allocation, AllocationEngine, SelectionPolicy};
pub use schedule_index::{ScheduleIndex, ScheduleRow};
pub use utilization::{UtilizationAnalyzer, UtilizationReport, VehicleUtilization};
