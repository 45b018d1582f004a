//! Tabular ingestion of trip records and route configuration.
//!
//! Both readers take CSV with a header row. A missing required column fails
//! the whole file with [`IngestError::MissingColumn`](crate::error::IngestError)
//! before any row is read.

mod route_config;
mod trips;

pub use route_config::{read_route_config, read_route_config_file, REQUIRED_CONFIG_COLUMNS};
pub use trips::{parse_pickup, read_trips, read_trips_file, REQUIRED_TRIP_COLUMNS};

use csv::StringRecord;

use crate::error::IngestError;
use crate::models::{Category, RoutePair, TripRequest, ROUTE_DELIMITER};

/// Trims a route string and removes whitespace around the delimiter.
pub fn normalize_route(raw: &str) -> String {
    let delimiter = ROUTE_DELIMITER.to_string();
    raw.trim()
        .split(ROUTE_DELIMITER)
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(delimiter.as_str())
}

/// Positions of the named columns in a header row.
fn column_indices<const N: usize>(
    headers: &StringRecord,
    columns: &[&str; N],
    source_label: &str,
) -> Result<[usize; N], IngestError> {
    let mut indices = [0; N];
    for (slot, column) in indices.iter_mut().zip(columns) {
        *slot = headers
            .iter()
            .position(|h| h.trim() == *column)
            .ok_or_else(|| IngestError::MissingColumn {
                source_label: source_label.to_string(),
                column: column.to_string(),
            })?;
    }
    Ok(indices)
}

/// Narrows a trip batch before allocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TripFilter {
    /// Keep only trips on this city pair, in either direction.
    pub route: Option<RoutePair>,
    /// Keep only trips of this category.
    pub category: Option<Category>,
}

impl TripFilter {
    /// A filter that keeps everything.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one route pair.
    pub fn with_route(mut self, route: RoutePair) -> Self {
        self.route = Some(route);
        self
    }

    /// Restricts to one category.
    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    /// Whether a trip passes the filter.
    ///
    /// Trips whose route cannot be split never match a route filter.
    pub fn matches(&self, trip: &TripRequest) -> bool {
        let route_ok = match &self.route {
            None => true,
            Some(pair) => RoutePair::parse(&trip.route).as_ref() == Some(pair),
        };
        let category_ok = self.category.map_or(true, |c| c == trip.category);
        route_ok && category_ok
    }

    /// Keeps the trips that pass, preserving order.
    pub fn apply(&self, trips: Vec<TripRequest>) -> Vec<TripRequest> {
        trips.into_iter().filter(|t| self.matches(t)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn trip(id: &str, category: Category, route: &str) -> TripRequest {
        let pickup = NaiveDate::from_ymd_opt(2025, 1, 6)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        TripRequest::new(id, category, route, pickup)
    }

    #[test]
    fn test_normalize_route() {
        assert_eq!(normalize_route("  Chennai -  Vellore "), "Chennai-Vellore");
        assert_eq!(normalize_route("Chennai-Vellore"), "Chennai-Vellore");
        assert_eq!(normalize_route("Chennai"), "Chennai");
        assert_eq!(normalize_route("A - B - C"), "A-B-C");
    }

    #[test]
    fn test_column_indices() {
        let headers = StringRecord::from(vec!["x", " Route ", "Car Type"]);
        let idx = column_indices(&headers, &["Car Type", "Route"], "Trip File").unwrap();
        assert_eq!(idx, [2, 1]);

        let err = column_indices(&headers, &["Booking Id"], "Trip File").unwrap_err();
        assert_eq!(err.to_string(), "Trip File: Could not find column 'Booking Id'");
    }

    #[test]
    fn test_filter_route_is_direction_agnostic() {
        let filter = TripFilter::all().with_route(RoutePair::new("Chennai", "Vellore"));
        assert!(filter.matches(&trip("1", Category::Sedan, "Vellore-Chennai")));
        assert!(filter.matches(&trip("2", Category::Suv, "Chennai-Vellore")));
        assert!(!filter.matches(&trip("3", Category::Sedan, "Chennai-Bangalore")));
        assert!(!filter.matches(&trip("4", Category::Sedan, "Chennai")));
    }

    #[test]
    fn test_filter_category() {
        let trips = vec![
            trip("1", Category::Sedan, "A-B"),
            trip("2", Category::Suv, "A-B"),
            trip("3", Category::Sedan, "B-C"),
        ];
        let kept = TripFilter::all()
            .with_category(Category::Sedan)
            .with_route(RoutePair::new("A", "B"))
            .apply(trips.clone());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].booking_id, "1");
        assert_eq!(TripFilter::all().apply(trips).len(), 3);
    }
}
