//! Greedy per-category vehicle allocation.
//!
//! # Algorithm
//!
//! 1. Validate the whole batch; any invalid record aborts before allocation.
//! 2. For each trip, in input order, resolve the route configuration of its
//!    unordered city pair (default on miss).
//! 3. Scan the trip's category pool in creation order and take the first
//!    vehicle that is available at pickup, parked at the source city and
//!    under the daily cap for the pickup date.
//! 4. Otherwise put a new vehicle into service with the next ID.
//! 5. The serving vehicle becomes available at `pickup + (duration + break)`
//!    and is parked at the destination city.
//!
//! The result depends on input order. Trips are expected sorted by
//! `(category, pickup)` with a stable tie-break, see [`sort_for_allocation`].
//! First-fit over creation order does not guarantee a minimal fleet.
//!
//! # Complexity
//! O(n * v) where n = trips, v = vehicles in the largest category pool.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::pool::{Demand, VehiclePool};
use crate::error::AllocationError;
use crate::models::{
    AllocatedTrip, Allocation, Category, RouteConfigIndex, ScheduleEntry, TripRequest,
};
use crate::validation::parse_trips;

/// How a vehicle is chosen among those able to serve a trip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Lowest vehicle ID (creation order) wins.
    #[default]
    FirstFit,
    /// Vehicle that became available earliest wins; ties go to the lower ID.
    ///
    /// Produces different vehicle IDs, and possibly different fleet sizes,
    /// than [`SelectionPolicy::FirstFit`].
    EarliestAvailable,
}

impl SelectionPolicy {
    /// Policy label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::FirstFit => "first-fit",
            SelectionPolicy::EarliestAvailable => "earliest-available",
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "first-fit" => Ok(SelectionPolicy::FirstFit),
            "earliest-available" => Ok(SelectionPolicy::EarliestAvailable),
            other => Err(format!(
                "unknown selection policy '{other}', expected 'first-fit' or 'earliest-available'"
            )),
        }
    }
}

/// Sorts trips by category, then pickup time.
///
/// The sort is stable: trips with equal category and pickup keep their
/// relative input order, which decides which of them gets the lower vehicle ID.
pub fn sort_for_allocation(trips: &mut [TripRequest]) {
    trips.sort_by_key(|t| (t.category, t.pickup_time));
}

/// Greedy vehicle allocation engine.
///
/// Each call to [`allocate`](Self::allocate) starts from empty pools; no
/// state is carried between runs.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_fleet::allocation::AllocationEngine;
/// use u_fleet::models::{Category, RouteConfigIndex, RouteConfigRow, TripRequest};
///
/// let day = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
/// let trips = vec![
///     TripRequest::new("B1", Category::Sedan, "Chennai-Vellore", day.and_hms_opt(8, 0, 0).unwrap()),
///     TripRequest::new("B2", Category::Sedan, "Vellore-Chennai", day.and_hms_opt(12, 0, 0).unwrap()),
/// ];
/// let routes = RouteConfigIndex::from_rows(vec![
///     RouteConfigRow::new("Chennai-Vellore", 2.5, 1.0, 4),
/// ]);
///
/// let allocation = AllocationEngine::new(&routes).allocate(&trips).unwrap();
/// assert_eq!(allocation.vehicle_count(Category::Sedan), 1);
/// assert_eq!(allocation.trips[1].vehicle_id, 1);
/// ```
#[derive(Debug, Clone)]
pub struct AllocationEngine<'a> {
    routes: &'a RouteConfigIndex,
    policy: SelectionPolicy,
}

impl<'a> AllocationEngine<'a> {
    /// Creates a first-fit engine over the given route configuration.
    pub fn new(routes: &'a RouteConfigIndex) -> Self {
        Self {
            routes,
            policy: SelectionPolicy::FirstFit,
        }
    }

    /// Sets the selection policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The selection policy in use.
    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    /// Allocates vehicles to trips, in input order.
    ///
    /// # Errors
    /// [`AllocationError::InvalidTrips`] with every validation problem if any
    /// record is invalid, [`AllocationError::ZeroDailyCap`] if a trip's route
    /// allows no trips per day, or [`AllocationError::TurnaroundOutOfRange`]
    /// if a route's turnaround cannot be added to a pickup time. In every case
    /// no vehicle has been allocated.
    pub fn allocate(&self, trips: &[TripRequest]) -> Result<Allocation, AllocationError> {
        let demands = self.prepare(trips)?;

        let mut pools: BTreeMap<Category, VehiclePool> = BTreeMap::new();
        let mut allocation = Allocation::new();
        allocation.trips.reserve(demands.len());

        for demand in demands {
            let category = demand.trip.category;
            let pool = pools.entry(category).or_default();

            let reused = pool
                .select(self.policy, &demand)
                .and_then(|index| pool.reuse(index, &demand));
            let vehicle_id = match reused {
                Some(id) => {
                    log::debug!(
                        "{} {}: reusing vehicle {} at {}",
                        category,
                        demand.trip.booking_id,
                        id,
                        demand.source
                    );
                    id
                }
                None => {
                    let id = pool.commission(&demand);
                    log::debug!(
                        "{} {}: commissioning vehicle {} at {}",
                        category,
                        demand.trip.booking_id,
                        id,
                        demand.source
                    );
                    id
                }
            };

            allocation
                .schedules
                .entry(category)
                .or_default()
                .push(ScheduleEntry {
                    vehicle_id,
                    booking_id: demand.trip.booking_id.clone(),
                    pickup_time: demand.pickup,
                    return_time: demand.available_at,
                });
            allocation.trips.push(AllocatedTrip {
                trip: demand.trip.clone(),
                vehicle_id,
                next_available_time: demand.available_at,
                start_point: demand.source,
            });
            allocation.vehicle_counts.insert(category, pool.len());
        }

        log::info!(
            "allocated {} trips to {} vehicles ({}) using {}",
            allocation.trip_count(),
            allocation.total_vehicles(),
            allocation
                .vehicle_counts
                .iter()
                .map(|(c, n)| format!("{c}: {n}"))
                .collect::<Vec<_>>()
                .join(", "),
            self.policy
        );

        Ok(allocation)
    }

    /// Validates the batch and resolves every trip's route parameters.
    fn prepare<'t>(&self, trips: &'t [TripRequest]) -> Result<Vec<Demand<'t>>, AllocationError> {
        let parsed = parse_trips(trips).map_err(AllocationError::InvalidTrips)?;

        let mut demands = Vec::with_capacity(trips.len());
        for (trip, (leg, pickup)) in trips.iter().zip(parsed) {
            let config = self.routes.lookup(&leg.source, &leg.destination);
            if config.max_trips_per_day == 0 {
                return Err(AllocationError::ZeroDailyCap {
                    booking_id: trip.booking_id.clone(),
                    route: trip.route.clone(),
                });
            }
            let available_at = config
                .turnaround()
                .and_then(|turnaround| pickup.checked_add_signed(turnaround))
                .ok_or_else(|| AllocationError::TurnaroundOutOfRange {
                    booking_id: trip.booking_id.clone(),
                    route: trip.route.clone(),
                })?;
            demands.push(Demand {
                trip,
                source: leg.source,
                destination: leg.destination,
                pickup,
                date: pickup.date(),
                max_trips: config.max_trips_per_day,
                available_at,
            });
        }
        Ok(demands)
    }
}
