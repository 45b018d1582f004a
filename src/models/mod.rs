//! Fleet allocation domain models.
//!
//! Provides the data types for trip requests, route configuration and
//! allocation results.
//!
//! # Domain Mappings
//!
//! | u-fleet | Meaning |
//! |---------|---------|
//! | TripRequest | A booking to be served |
//! | Category | Vehicle class with its own pool |
//! | RouteConfig | Duration, break and daily cap of a city pair |
//! | Allocation | Trips paired with vehicles, plus per-category schedules |

mod category;
mod route;
mod schedule;
mod trip;

pub use category::{Category, ParseCategoryError};
pub use route::{RouteConfig, RouteConfigIndex, RouteConfigRow, RoutePair, ROUTE_DELIMITER};
pub use schedule::{AllocatedTrip, Allocation, ScheduleEntry, Violation, ViolationType};
pub use trip::{Leg, TripRequest};
