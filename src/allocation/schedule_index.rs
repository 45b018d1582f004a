//! Per-vehicle schedule queries.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::models::{Allocation, Category, Leg, ScheduleEntry};

/// A schedule entry enriched with the trip's cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    /// Vehicle ID.
    pub vehicle_id: u32,
    /// Booking served.
    pub booking_id: String,
    /// Pickup time.
    pub pickup_time: NaiveDateTime,
    /// Time the vehicle becomes available again.
    pub return_time: NaiveDateTime,
    /// Departure city, if the booking is known.
    pub source: Option<String>,
    /// Arrival city, if the booking is known.
    pub destination: Option<String>,
}

/// Query surface over an allocation's schedules.
#[derive(Debug, Clone)]
pub struct ScheduleIndex<'a> {
    allocation: &'a Allocation,
    legs: HashMap<&'a str, Leg>,
}

impl<'a> ScheduleIndex<'a> {
    /// Indexes an allocation's trips by booking ID.
    pub fn new(allocation: &'a Allocation) -> Self {
        let legs = allocation
            .trips
            .iter()
            .filter_map(|t| t.trip.leg().map(|leg| (t.trip.booking_id.as_str(), leg)))
            .collect();
        Self { allocation, legs }
    }

    /// Schedule of one vehicle, sorted by pickup time.
    ///
    /// Empty if the category or vehicle has no entries.
    pub fn query(&self, category: Category, vehicle_id: u32) -> Vec<ScheduleRow> {
        let mut entries: Vec<&ScheduleEntry> = self
            .allocation
            .schedule(category)
            .iter()
            .filter(|e| e.vehicle_id == vehicle_id)
            .collect();
        entries.sort_by_key(|e| e.pickup_time);

        entries
            .into_iter()
            .map(|e| {
                let leg = self.legs.get(e.booking_id.as_str());
                ScheduleRow {
                    vehicle_id: e.vehicle_id,
                    booking_id: e.booking_id.clone(),
                    pickup_time: e.pickup_time,
                    return_time: e.return_time,
                    source: leg.map(|l| l.source.clone()),
                    destination: leg.map(|l| l.destination.clone()),
                }
            })
            .collect()
    }

    /// Distinct vehicle IDs with at least one entry, ascending.
    pub fn vehicle_ids(&self, category: Category) -> Vec<u32> {
        self.allocation
            .schedule(category)
            .iter()
            .map(|e| e.vehicle_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Categories with at least one entry.
    pub fn categories(&self) -> Vec<Category> {
        self.allocation
            .schedules
            .iter()
            .filter(|(_, entries)| !entries.is_empty())
            .map(|(c, _)| *c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::AllocationEngine;
    use crate::models::{RouteConfigIndex, RouteConfigRow, TripRequest};
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn sample_allocation() -> Allocation {
        let routes =
            RouteConfigIndex::from_rows(vec![RouteConfigRow::new("Chennai-Vellore", 2.0, 1.0, 3)]);
        let trips = vec![
            TripRequest::new("B1", Category::Sedan, "Chennai-Vellore", at(6)),
            TripRequest::new("B2", Category::Sedan, "Chennai-Vellore", at(7)),
            TripRequest::new("B3", Category::Sedan, "Vellore-Chennai", at(9)),
            TripRequest::new("B4", Category::Sedan, "Chennai-Vellore", at(12)),
        ];
        AllocationEngine::new(&routes).allocate(&trips).unwrap()
    }

    #[test]
    fn test_query_vehicle_schedule() {
        let allocation = sample_allocation();
        let index = ScheduleIndex::new(&allocation);

        let rows = index.query(Category::Sedan, 1);
        let bookings: Vec<&str> = rows.iter().map(|r| r.booking_id.as_str()).collect();
        assert_eq!(bookings, vec!["B1", "B3", "B4"]);
        assert_eq!(rows[1].source.as_deref(), Some("Vellore"));
        assert_eq!(rows[1].destination.as_deref(), Some("Chennai"));
        assert_eq!(rows[1].return_time, at(12));
    }

    #[test]
    fn test_query_sorted_by_pickup() {
        let mut allocation = sample_allocation();
        if let Some(entries) = allocation.schedules.get_mut(&Category::Sedan) {
            entries.reverse();
        }
        let index = ScheduleIndex::new(&allocation);
        let pickups: Vec<NaiveDateTime> = index
            .query(Category::Sedan, 1)
            .iter()
            .map(|r| r.pickup_time)
            .collect();
        assert_eq!(pickups, vec![at(6), at(9), at(12)]);
    }

    #[test]
    fn test_unknown_pairs_are_empty() {
        let allocation = sample_allocation();
        let index = ScheduleIndex::new(&allocation);
        assert!(index.query(Category::Sedan, 99).is_empty());
        assert!(index.query(Category::Suv, 1).is_empty());
        assert!(index.vehicle_ids(Category::Suv).is_empty());
    }

    #[test]
    fn test_vehicle_ids_and_categories() {
        let allocation = sample_allocation();
        let index = ScheduleIndex::new(&allocation);
        assert_eq!(index.vehicle_ids(Category::Sedan), vec![1, 2]);
        assert_eq!(index.categories(), vec![Category::Sedan]);
    }
}
