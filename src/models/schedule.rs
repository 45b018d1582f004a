//! Allocation (solution) model.
//!
//! An allocation is the result of one engine run: every input trip paired
//! with the vehicle that serves it, the number of vehicles put into service
//! per category, and per-category schedules in assignment order. A
//! [`Violation`] describes a broken allocation invariant found by an audit.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Category, TripRequest};

/// One trip-to-vehicle assignment, recorded in assignment order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Vehicle ID (1-based within its category).
    pub vehicle_id: u32,
    /// Booking served.
    pub booking_id: String,
    /// Pickup time.
    pub pickup_time: NaiveDateTime,
    /// Time the vehicle becomes available again.
    pub return_time: NaiveDateTime,
}

/// A trip together with the fields derived by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedTrip {
    /// The original request.
    pub trip: TripRequest,
    /// Vehicle serving the trip.
    pub vehicle_id: u32,
    /// The vehicle's availability after this trip.
    pub next_available_time: NaiveDateTime,
    /// Departure city (equal to the trip source).
    pub start_point: String,
}

/// Result of an allocation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Input trips in input order, augmented with their assignment.
    pub trips: Vec<AllocatedTrip>,
    /// Vehicles put into service per category.
    pub vehicle_counts: BTreeMap<Category, usize>,
    /// Schedule entries per category, in assignment order.
    pub schedules: BTreeMap<Category, Vec<ScheduleEntry>>,
}

/// A broken allocation invariant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Category of the offending vehicle.
    pub category: Category,
    /// Offending vehicle.
    pub vehicle_id: u32,
    /// Booking that exposed the violation.
    pub booking_id: String,
    /// Human-readable description.
    pub message: String,
}

/// Classification of allocation violations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViolationType {
    /// A pickup precedes the vehicle's availability after its previous trip.
    Overlap,
    /// A trip departs from a city other than where the vehicle was parked.
    LocationMismatch,
    /// A vehicle serves more trips on one date than the route allows.
    DailyCapExceeded,
    /// The trip cannot be audited (unsplittable route, missing pickup).
    Unauditable,
}

impl Violation {
    /// Creates a violation.
    pub fn new(
        violation_type: ViolationType,
        category: Category,
        vehicle_id: u32,
        booking_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            violation_type,
            category,
            vehicle_id,
            booking_id: booking_id.into(),
            message: message.into(),
        }
    }
}

impl Allocation {
    /// Creates an empty allocation.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total vehicles across all categories.
    pub fn total_vehicles(&self) -> usize {
        self.vehicle_counts.values().sum()
    }

    /// Vehicles used by one category (0 if never seen).
    pub fn vehicle_count(&self, category: Category) -> usize {
        self.vehicle_counts.get(&category).copied().unwrap_or(0)
    }

    /// Schedule entries of one category, in assignment order.
    pub fn schedule(&self, category: Category) -> &[ScheduleEntry] {
        self.schedules
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Finds the allocated trip for a booking.
    pub fn trip_for_booking(&self, booking_id: &str) -> Option<&AllocatedTrip> {
        self.trips.iter().find(|t| t.trip.booking_id == booking_id)
    }

    /// Allocated trips served by one vehicle, in input order.
    pub fn trips_for_vehicle(&self, category: Category, vehicle_id: u32) -> Vec<&AllocatedTrip> {
        self.trips
            .iter()
            .filter(|t| t.trip.category == category && t.vehicle_id == vehicle_id)
            .collect()
    }

    /// Number of allocated trips.
    pub fn trip_count(&self) -> usize {
        self.trips.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn allocated(id: &str, category: Category, vehicle_id: u32, h: u32) -> AllocatedTrip {
        AllocatedTrip {
            trip: TripRequest::new(id, category, "A-B", at(h)),
            vehicle_id,
            next_available_time: at(h + 3),
            start_point: "A".to_string(),
        }
    }

    fn sample_allocation() -> Allocation {
        let mut a = Allocation::new();
        a.trips.push(allocated("B1", Category::Sedan, 1, 8));
        a.trips.push(allocated("B2", Category::Sedan, 2, 9));
        a.trips.push(allocated("B3", Category::Suv, 1, 9));
        a.vehicle_counts.insert(Category::Sedan, 2);
        a.vehicle_counts.insert(Category::Suv, 1);
        a
    }

    #[test]
    fn test_total_vehicles() {
        let a = sample_allocation();
        assert_eq!(a.total_vehicles(), 3);
        assert_eq!(a.vehicle_count(Category::Sedan), 2);
        assert_eq!(a.vehicle_count(Category::Hatchback), 0);
    }

    #[test]
    fn test_trip_lookup() {
        let a = sample_allocation();
        assert_eq!(a.trip_for_booking("B2").unwrap().vehicle_id, 2);
        assert!(a.trip_for_booking("B99").is_none());
        assert_eq!(a.trips_for_vehicle(Category::Sedan, 1).len(), 1);
        assert!(a.trips_for_vehicle(Category::Unknown, 1).is_empty());
    }

    #[test]
    fn test_empty_schedule_slice() {
        let a = Allocation::new();
        assert!(a.schedule(Category::Sedan).is_empty());
        assert_eq!(a.total_vehicles(), 0);
        assert_eq!(a.trip_count(), 0);
    }

    #[test]
    fn test_serialize_category_keys() {
        let a = sample_allocation();
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["vehicle_counts"]["sedan"], 2);
        assert_eq!(json["vehicle_counts"]["SUV"], 1);
    }
}
