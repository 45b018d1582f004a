//! Fleet report assembly.
//!
//! Collects everything a consumer of one allocation run needs into a single
//! serializable value: fleet size per category, the route parameters that
//! were in effect, the augmented trips, utilization outliers and, optionally,
//! one vehicle's schedule.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::allocation::{
    ScheduleIndex, ScheduleRow, SelectionPolicy, UtilizationAnalyzer, VehicleUtilization,
};
use crate::models::{AllocatedTrip, Allocation, Category, RouteConfigIndex};

/// Number of over-utilized vehicles listed in a report.
pub const TOP_OVER_UTILIZED: usize = 10;
/// Number of under-utilized vehicles listed in a report.
pub const TOP_UNDER_UTILIZED: usize = 5;
/// Categories always listed in `vehicle_counts`, with zero when unused.
pub const REPORTED_CATEGORIES: [Category; 3] =
    [Category::Suv, Category::Hatchback, Category::Sedan];

/// A configured route pair as shown to users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfigDisplayRow {
    /// `"CityA ↔ CityB"`.
    pub route: String,
    /// Driving time (hours).
    pub duration_hours: f64,
    /// Break time (hours).
    pub break_hours: f64,
    /// Trips per vehicle per day.
    pub max_trips_per_day: u32,
}

/// One vehicle's schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleSchedule {
    /// Category queried.
    pub category: Category,
    /// Vehicle queried.
    pub vehicle_id: u32,
    /// Trips in pickup order; empty for an unknown vehicle.
    pub rows: Vec<ScheduleRow>,
}

/// Summary of one allocation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    /// Policy the engine ran with.
    pub policy: SelectionPolicy,
    /// Vehicles put into service per category. Every category in
    /// [`REPORTED_CATEGORIES`] is present.
    pub vehicle_counts: BTreeMap<Category, usize>,
    /// Sum of `vehicle_counts`.
    pub total_vehicles: usize,
    /// Configured route pairs in sorted order.
    pub route_configs: Vec<RouteConfigDisplayRow>,
    /// Trips with their assignment, in input order.
    pub allocations: Vec<AllocatedTrip>,
    /// Most over-utilized vehicles first.
    pub over_utilized: Vec<VehicleUtilization>,
    /// Most under-utilized vehicles first.
    pub under_utilized: Vec<VehicleUtilization>,
    /// Trips per vehicle, per category.
    pub trip_counts: BTreeMap<Category, BTreeMap<u32, usize>>,
    /// Schedule of a single selected vehicle.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub vehicle_schedule: Option<VehicleSchedule>,
}

impl FleetReport {
    /// Builds a report from an allocation and the route index it ran against.
    pub fn build(
        allocation: &Allocation,
        routes: &RouteConfigIndex,
        policy: SelectionPolicy,
    ) -> Self {
        let utilization = UtilizationAnalyzer::analyze(allocation);
        let route_configs = routes
            .entries()
            .map(|(pair, config)| RouteConfigDisplayRow {
                route: format!("{} ↔ {}", pair.first(), pair.second()),
                duration_hours: config.duration_hours,
                break_hours: config.break_hours,
                max_trips_per_day: config.max_trips_per_day,
            })
            .collect();

        let mut vehicle_counts = allocation.vehicle_counts.clone();
        for category in REPORTED_CATEGORIES {
            vehicle_counts.entry(category).or_insert(0);
        }

        Self {
            policy,
            vehicle_counts,
            total_vehicles: allocation.total_vehicles(),
            route_configs,
            allocations: allocation.trips.clone(),
            over_utilized: utilization.top_over(TOP_OVER_UTILIZED).to_vec(),
            under_utilized: utilization.top_under(TOP_UNDER_UTILIZED).to_vec(),
            trip_counts: UtilizationAnalyzer::trip_counts(allocation),
            vehicle_schedule: None,
        }
    }

    /// Attaches the schedule of one vehicle.
    ///
    /// An unknown category or vehicle yields an empty schedule.
    pub fn with_vehicle_schedule(
        mut self,
        allocation: &Allocation,
        category: Category,
        vehicle_id: u32,
    ) -> Self {
        let rows = ScheduleIndex::new(allocation).query(category, vehicle_id);
        self.vehicle_schedule = Some(VehicleSchedule {
            category,
            vehicle_id,
            rows,
        });
        self
    }

    /// Pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
