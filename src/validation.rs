//! Input validation and allocation audit.
//!
//! [`validate_trips`] checks trip records before allocation. Detects:
//! - Empty and duplicate booking IDs
//! - Routes that do not split into exactly two cities
//! - Pickup times that could not be parsed
//!
//! [`audit_allocation`] re-checks a finished allocation against the
//! per-vehicle invariants: non-overlapping legs, location continuity and the
//! daily trip cap.

use chrono::{NaiveDate, NaiveDateTime};
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use crate::models::{
    Allocation, Category, Leg, RouteConfigIndex, TripRequest, Violation, ViolationType,
    ROUTE_DELIMITER,
};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Offending record (booking ID, or input position when the ID is empty).
    pub record: String,
    /// Offending field.
    pub field: &'static str,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two trips share the same booking ID.
    DuplicateId,
    /// A trip has an empty booking ID.
    EmptyBookingId,
    /// A route does not split into exactly two cities.
    MalformedRoute,
    /// A pickup time is missing or could not be parsed.
    UnparseablePickupTime,
}

impl ValidationError {
    fn new(
        kind: ValidationErrorKind,
        record: impl Into<String>,
        field: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            record: record.into(),
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.record, self.field, self.message)
    }
}

/// Validates trip records before allocation.
///
/// Checks:
/// 1. Every booking ID is non-empty
/// 2. No duplicate booking IDs
/// 3. Every route splits into exactly two cities
/// 4. Every pickup time was parsed
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_trips(trips: &[TripRequest]) -> ValidationResult {
    parse_trips(trips).map(|_| ())
}

/// Runs the [`validate_trips`] checks and returns every trip's leg and
/// pickup time, one entry per input trip in input order.
pub(crate) fn parse_trips(
    trips: &[TripRequest],
) -> Result<Vec<(Leg, NaiveDateTime)>, Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut parsed = Vec::with_capacity(trips.len());
    let mut booking_ids = HashSet::new();

    for (position, trip) in trips.iter().enumerate() {
        let record = if trip.booking_id.trim().is_empty() {
            errors.push(ValidationError::new(
                ValidationErrorKind::EmptyBookingId,
                format!("#{position}"),
                "booking_id",
                format!("Trip at position {position} has an empty booking ID"),
            ));
            format!("#{position}")
        } else {
            if !booking_ids.insert(trip.booking_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::DuplicateId,
                    &trip.booking_id,
                    "booking_id",
                    format!("Duplicate booking ID: {}", trip.booking_id),
                ));
            }
            trip.booking_id.clone()
        };

        let leg = trip.leg();
        if leg.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::MalformedRoute,
                record.clone(),
                "route",
                format!(
                    "Route '{}' does not split into two cities on '{}'",
                    trip.route, ROUTE_DELIMITER
                ),
            ));
        }

        if trip.pickup_time.is_none() {
            errors.push(ValidationError::new(
                ValidationErrorKind::UnparseablePickupTime,
                record,
                "pickup_time",
                "Pickup time is missing or could not be parsed",
            ));
        }

        if let (Some(leg), Some(pickup)) = (leg, trip.pickup_time) {
            parsed.push((leg, pickup));
        }
    }

    if errors.is_empty() {
        Ok(parsed)
    } else {
        Err(errors)
    }
}

struct AuditLeg<'a> {
    booking_id: &'a str,
    pickup: NaiveDateTime,
    available_at: NaiveDateTime,
    source: String,
    destination: String,
    max_trips: u32,
}

/// Audits an allocation against the per-vehicle invariants.
///
/// Each vehicle's trips are walked in pickup order (stable, so trips with
/// equal pickups keep input order). Returns every violation found; an empty
/// vector means the allocation is consistent with `routes`.
pub fn audit_allocation(allocation: &Allocation, routes: &RouteConfigIndex) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut by_vehicle: BTreeMap<(Category, u32), Vec<AuditLeg<'_>>> = BTreeMap::new();

    for allocated in &allocation.trips {
        let trip = &allocated.trip;
        let key = (trip.category, allocated.vehicle_id);
        let (Some(leg), Some(pickup)) = (trip.leg(), trip.pickup_time) else {
            violations.push(Violation::new(
                ViolationType::Unauditable,
                key.0,
                key.1,
                &trip.booking_id,
                "Trip has no valid route or pickup time",
            ));
            continue;
        };
        let config = routes.lookup(&leg.source, &leg.destination);
        let Some(available_at) = config
            .turnaround()
            .and_then(|turnaround| pickup.checked_add_signed(turnaround))
        else {
            violations.push(Violation::new(
                ViolationType::Unauditable,
                key.0,
                key.1,
                &trip.booking_id,
                "Route turnaround is not representable",
            ));
            continue;
        };
        by_vehicle.entry(key).or_default().push(AuditLeg {
            booking_id: &trip.booking_id,
            pickup,
            available_at,
            source: leg.source,
            destination: leg.destination,
            max_trips: config.max_trips_per_day,
        });
    }

    for ((category, vehicle_id), mut legs) in by_vehicle {
        legs.sort_by_key(|l| l.pickup);
        let mut daily: HashMap<NaiveDate, u32> = HashMap::new();

        for (i, leg) in legs.iter().enumerate() {
            if i > 0 {
                let prev = &legs[i - 1];
                if leg.pickup < prev.available_at {
                    violations.push(Violation::new(
                        ViolationType::Overlap,
                        category,
                        vehicle_id,
                        leg.booking_id,
                        format!(
                            "Pickup {} precedes availability {} after booking {}",
                            leg.pickup, prev.available_at, prev.booking_id
                        ),
                    ));
                }
                if leg.source != prev.destination {
                    violations.push(Violation::new(
                        ViolationType::LocationMismatch,
                        category,
                        vehicle_id,
                        leg.booking_id,
                        format!(
                            "Departs from '{}' but vehicle was left at '{}'",
                            leg.source, prev.destination
                        ),
                    ));
                }
            }

            let count = daily.entry(leg.pickup.date()).or_insert(0);
            *count += 1;
            if *count > leg.max_trips {
                violations.push(Violation::new(
                    ViolationType::DailyCapExceeded,
                    category,
                    vehicle_id,
                    leg.booking_id,
                    format!(
                        "Trip {} on {} exceeds the cap of {}",
                        count,
                        leg.pickup.date(),
                        leg.max_trips
                    ),
                ));
            }
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AllocatedTrip, RouteConfigRow};
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn sample_trips() -> Vec<TripRequest> {
        vec![
            TripRequest::new("B1", Category::Sedan, "Chennai-Vellore", at(8, 0)),
            TripRequest::new("B2", Category::Sedan, "Vellore-Chennai", at(12, 0)),
            TripRequest::new("B3", Category::Suv, "Chennai-Bangalore", at(9, 30)),
        ]
    }

    fn assign(trip: TripRequest, vehicle_id: u32) -> AllocatedTrip {
        let start_point = trip.leg().unwrap().source;
        let next = trip.pickup_time.unwrap();
        AllocatedTrip {
            trip,
            vehicle_id,
            next_available_time: next,
            start_point,
        }
    }

    fn routes() -> RouteConfigIndex {
        RouteConfigIndex::from_rows(vec![RouteConfigRow::new("Chennai-Vellore", 2.0, 1.0, 2)])
    }

    #[test]
    fn test_valid_trips() {
        assert!(validate_trips(&sample_trips()).is_ok());
        assert!(validate_trips(&[]).is_ok());
    }

    #[test]
    fn test_duplicate_booking_id() {
        let mut trips = sample_trips();
        trips[2].booking_id = "B1".to_string();

        let errors = validate_trips(&trips).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, ValidationErrorKind::DuplicateId);
        assert_eq!(errors[0].record, "B1");
    }

    #[test]
    fn test_empty_booking_id() {
        let mut trips = sample_trips();
        trips[1].booking_id = "  ".to_string();

        let errors = validate_trips(&trips).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::EmptyBookingId);
        assert_eq!(errors[0].record, "#1");
    }

    #[test]
    fn test_malformed_route() {
        let mut trips = sample_trips();
        trips[0].route = "Chennai".to_string();

        let errors = validate_trips(&trips).unwrap_err();
        assert!(errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::MalformedRoute
                && e.record == "B1"
                && e.field == "route"));
    }

    #[test]
    fn test_unparseable_pickup() {
        let trips = vec![TripRequest::with_unparsed_pickup("B9", Category::Sedan, "A-B")];
        let errors = validate_trips(&trips).unwrap_err();
        assert_eq!(errors[0].kind, ValidationErrorKind::UnparseablePickupTime);
        assert_eq!(errors[0].to_string(), "B9 [pickup_time]: Pickup time is missing or could not be parsed");
    }

    #[test]
    fn test_parse_trips_keeps_every_trip() {
        let trips = sample_trips();
        let parsed = parse_trips(&trips).unwrap();
        assert_eq!(parsed.len(), trips.len());
        assert_eq!(parsed[1].0.source, "Vellore");
        assert_eq!(parsed[1].0.destination, "Chennai");
        assert_eq!(parsed[2].1, at(9, 30));

        let mut broken = sample_trips();
        broken[1].route = "Vellore".to_string();
        assert!(parse_trips(&broken).is_err());
    }

    #[test]
    fn test_multiple_errors() {
        let trips = vec![
            TripRequest::with_unparsed_pickup("B1", Category::Sedan, "A-B-C"),
            TripRequest::new("B1", Category::Sedan, "A-B", at(8, 0)),
        ];
        let errors = validate_trips(&trips).unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_audit_clean() {
        let mut allocation = Allocation::new();
        let trips = sample_trips();
        allocation.trips.push(assign(trips[0].clone(), 1));
        allocation.trips.push(assign(trips[1].clone(), 1));
        allocation.trips.push(assign(trips[2].clone(), 1));

        assert!(audit_allocation(&allocation, &routes()).is_empty());
    }

    #[test]
    fn test_audit_overlap() {
        let mut allocation = Allocation::new();
        allocation.trips.push(assign(
            TripRequest::new("B1", Category::Sedan, "Chennai-Vellore", at(8, 0)),
            1,
        ));
        // Vehicle 1 is free at 11:00; 10:59 overlaps.
        allocation.trips.push(assign(
            TripRequest::new("B2", Category::Sedan, "Vellore-Chennai", at(10, 59)),
            1,
        ));

        let violations = audit_allocation(&allocation, &routes());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::Overlap);
        assert_eq!(violations[0].booking_id, "B2");
    }

    #[test]
    fn test_audit_location_mismatch() {
        let mut allocation = Allocation::new();
        allocation.trips.push(assign(
            TripRequest::new("B1", Category::Sedan, "Chennai-Vellore", at(8, 0)),
            1,
        ));
        allocation.trips.push(assign(
            TripRequest::new("B2", Category::Sedan, "Chennai-Vellore", at(12, 0)),
            1,
        ));

        let violations = audit_allocation(&allocation, &routes());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::LocationMismatch);
    }

    #[test]
    fn test_audit_daily_cap() {
        let mut allocation = Allocation::new();
        for (i, (route, h)) in [
            ("Chennai-Vellore", 0),
            ("Vellore-Chennai", 3),
            ("Chennai-Vellore", 6),
        ]
        .into_iter()
        .enumerate()
        {
            allocation.trips.push(assign(
                TripRequest::new(format!("B{i}"), Category::Sedan, route, at(h, 0)),
                1,
            ));
        }

        let violations = audit_allocation(&allocation, &routes());
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].violation_type, ViolationType::DailyCapExceeded);
        assert_eq!(violations[0].booking_id, "B2");
    }

    #[test]
    fn test_audit_unauditable() {
        let mut allocation = Allocation::new();
        allocation.trips.push(AllocatedTrip {
            trip: TripRequest::with_unparsed_pickup("B1", Category::Sedan, "A-B"),
            vehicle_id: 1,
            next_available_time: at(0, 0),
            start_point: "A".to_string(),
        });

        let violations = audit_allocation(&allocation, &routes());
        assert_eq!(violations[0].violation_type, ViolationType::Unauditable);
    }
}
