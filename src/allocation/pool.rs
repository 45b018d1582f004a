//! Per-category vehicle pools.
//!
//! A pool owns the vehicles of one category for the duration of one
//! allocation run. Vehicles are never removed; their position in the pool is
//! their creation order, which is also the scan order for reuse.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::HashMap;

use super::SelectionPolicy;
use crate::models::TripRequest;

/// A validated trip with its resolved route parameters.
#[derive(Debug, Clone)]
pub(crate) struct Demand<'t> {
    pub trip: &'t TripRequest,
    pub source: String,
    pub destination: String,
    pub pickup: NaiveDateTime,
    pub date: NaiveDate,
    pub max_trips: u32,
    /// Pickup plus the route turnaround.
    pub available_at: NaiveDateTime,
}

/// One vehicle already put into service.
#[derive(Debug, Clone)]
pub(crate) struct Vehicle {
    pub id: u32,
    pub available_at: NaiveDateTime,
    pub location: String,
    daily_counts: HashMap<NaiveDate, u32>,
}

impl Vehicle {
    fn commission(id: u32, demand: &Demand<'_>) -> Self {
        let mut vehicle = Self {
            id,
            available_at: demand.available_at,
            location: demand.destination.clone(),
            daily_counts: HashMap::new(),
        };
        vehicle.daily_counts.insert(demand.date, 1);
        vehicle
    }

    /// Trips served on a calendar date.
    pub fn trips_on(&self, date: NaiveDate) -> u32 {
        self.daily_counts.get(&date).copied().unwrap_or(0)
    }

    /// Whether the vehicle is free, parked at the source and under its cap.
    pub fn can_serve(&self, demand: &Demand<'_>) -> bool {
        self.available_at <= demand.pickup
            && self.trips_on(demand.date) < demand.max_trips
            && self.location == demand.source
    }

    fn serve(&mut self, demand: &Demand<'_>) {
        self.available_at = demand.available_at;
        self.location.clone_from(&demand.destination);
        *self.daily_counts.entry(demand.date).or_insert(0) += 1;
    }
}

/// Vehicles of one category, in creation order.
#[derive(Debug, Clone, Default)]
pub(crate) struct VehiclePool {
    vehicles: Vec<Vehicle>,
}

impl VehiclePool {
    /// Index of the vehicle that should serve `demand`, if any qualifies.
    pub fn select(&self, policy: SelectionPolicy, demand: &Demand<'_>) -> Option<usize> {
        let mut qualifying = self
            .vehicles
            .iter()
            .enumerate()
            .filter(|(_, v)| v.can_serve(demand));
        match policy {
            SelectionPolicy::FirstFit => qualifying.next().map(|(i, _)| i),
            SelectionPolicy::EarliestAvailable => qualifying
                .min_by_key(|(i, v)| (v.available_at, *i))
                .map(|(i, _)| i),
        }
    }

    /// Assigns `demand` to the vehicle at `index` and returns its ID.
    pub fn reuse(&mut self, index: usize, demand: &Demand<'_>) -> Option<u32> {
        let vehicle = self.vehicles.get_mut(index)?;
        vehicle.serve(demand);
        Some(vehicle.id)
    }

    /// Puts a new vehicle into service for `demand` and returns its ID.
    pub fn commission(&mut self, demand: &Demand<'_>) -> u32 {
        let id = self.vehicles.len() as u32 + 1;
        self.vehicles.push(Vehicle::commission(id, demand));
        id
    }

    /// Number of vehicles in service.
    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    /// Vehicles in creation order.
    #[cfg(test)]
    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }
}
