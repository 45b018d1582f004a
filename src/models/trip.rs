//! Trip request model.
//!
//! A trip request is one booking to be served by a vehicle of its category,
//! travelling from the source city to the destination city of its route.
//!
//! # Time Representation
//! Pickup times are naive local timestamps (`chrono::NaiveDateTime`). The
//! calendar date of the pickup is the key for daily trip quotas.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::route::split_route;
use super::Category;

/// A trip to be served.
///
/// Immutable to the allocation engine; the engine returns the trip wrapped in
/// an [`AllocatedTrip`](super::AllocatedTrip) instead of mutating it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRequest {
    /// Booking identifier, used only for correlation.
    pub booking_id: String,
    /// Vehicle class that must serve this trip.
    pub category: Category,
    /// Normalized route string, `"Source-Destination"`.
    pub route: String,
    /// Pickup timestamp. `None` if the source data could not be parsed.
    pub pickup_time: Option<NaiveDateTime>,
}

/// Source and destination cities of a trip.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Leg {
    /// Departure city.
    pub source: String,
    /// Arrival city.
    pub destination: String,
}

impl TripRequest {
    /// Creates a trip request with a known pickup time.
    pub fn new(
        booking_id: impl Into<String>,
        category: Category,
        route: impl Into<String>,
        pickup_time: NaiveDateTime,
    ) -> Self {
        Self {
            booking_id: booking_id.into(),
            category,
            route: route.into(),
            pickup_time: Some(pickup_time),
        }
    }

    /// Creates a trip request whose pickup time could not be parsed.
    pub fn with_unparsed_pickup(
        booking_id: impl Into<String>,
        category: Category,
        route: impl Into<String>,
    ) -> Self {
        Self {
            booking_id: booking_id.into(),
            category,
            route: route.into(),
            pickup_time: None,
        }
    }

    /// Splits the route into its two cities.
    ///
    /// Returns `None` unless the route has exactly two non-empty tokens.
    pub fn leg(&self) -> Option<Leg> {
        split_route(&self.route).map(|(source, destination)| Leg {
            source,
            destination,
        })
    }

    /// Calendar date of the pickup.
    pub fn pickup_date(&self) -> Option<NaiveDate> {
        self.pickup_time.map(|t| t.date())
    }
}
