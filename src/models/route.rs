//! Route configuration model.
//!
//! Operating parameters are attached to an unordered city pair, so a row for
//! `"Chennai-Vellore"` answers lookups for trips in both directions. Pairs
//! without a row resolve to [`RouteConfig::DEFAULT`] (or the index default
//! when one has been configured).

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Delimiter between the two cities of a route string or route-group label.
pub const ROUTE_DELIMITER: char = '-';

/// Splits a route string into exactly two trimmed, non-empty city tokens.
pub(crate) fn split_route(route: &str) -> Option<(String, String)> {
    let mut tokens = route.split(ROUTE_DELIMITER).map(str::trim);
    let first = tokens.next()?;
    let second = tokens.next()?;
    if tokens.next().is_some() || first.is_empty() || second.is_empty() {
        return None;
    }
    Some((first.to_string(), second.to_string()))
}

/// An unordered pair of cities, stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RoutePair {
    first: String,
    second: String,
}

impl RoutePair {
    /// Creates a pair from two cities in either order.
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let (a, b) = (a.into(), b.into());
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    /// Parses a `"CityA-CityB"` label. `None` unless it has exactly two tokens.
    pub fn parse(label: &str) -> Option<Self> {
        split_route(label).map(|(a, b)| Self::new(a, b))
    }

    /// Lexicographically smaller city.
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Lexicographically larger city.
    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for RoutePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, ROUTE_DELIMITER, self.second)
    }
}

/// Operating parameters for a route pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteConfig {
    /// Driving time for one trip (hours, may be fractional).
    pub duration_hours: f64,
    /// Mandatory rest after the trip (hours, may be fractional).
    pub break_hours: f64,
    /// Per-vehicle cap on trips served on one calendar date.
    pub max_trips_per_day: u32,
}

impl RouteConfig {
    /// Parameters used for pairs without a configuration row.
    pub const DEFAULT: RouteConfig = RouteConfig {
        duration_hours: 5.0,
        break_hours: 3.0,
        max_trips_per_day: 3,
    };

    /// Creates a route configuration.
    pub fn new(duration_hours: f64, break_hours: f64, max_trips_per_day: u32) -> Self {
        Self {
            duration_hours,
            break_hours,
            max_trips_per_day,
        }
    }

    /// Time from pickup until the vehicle is free again.
    ///
    /// Duration and break are summed first and converted once, at millisecond
    /// resolution. `None` for negative, non-finite or out-of-range values.
    pub fn turnaround(&self) -> Option<TimeDelta> {
        let hours = self.duration_hours + self.break_hours;
        if !hours.is_finite() || hours < 0.0 {
            return None;
        }
        let ms = (hours * 3_600_000.0).round();
        if ms > i64::MAX as f64 {
            return None;
        }
        TimeDelta::try_milliseconds(ms as i64)
    }
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One row of route-group configuration input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteConfigRow {
    /// `"CityA-CityB"` label.
    pub route_group: String,
    /// Driving time (hours).
    pub duration_hours: f64,
    /// Break time (hours).
    pub break_hours: f64,
    /// Trips per vehicle per day.
    pub max_trips_per_day: u32,
}

impl RouteConfigRow {
    /// Creates a row.
    pub fn new(
        route_group: impl Into<String>,
        duration_hours: f64,
        break_hours: f64,
        max_trips_per_day: u32,
    ) -> Self {
        Self {
            route_group: route_group.into(),
            duration_hours,
            break_hours,
            max_trips_per_day,
        }
    }
}

/// Direction-agnostic lookup of route configuration.
///
/// # Example
///
/// ```
/// use u_fleet::models::{RouteConfig, RouteConfigIndex, RouteConfigRow};
///
/// let index = RouteConfigIndex::from_rows(vec![
///     RouteConfigRow::new("Chennai-Vellore", 3.0, 1.0, 4),
/// ]);
/// assert_eq!(index.lookup("Vellore", "Chennai").max_trips_per_day, 4);
/// assert_eq!(*index.lookup("Chennai", "Bangalore"), RouteConfig::DEFAULT);
/// ```
#[derive(Debug, Clone)]
pub struct RouteConfigIndex {
    routes: BTreeMap<RoutePair, RouteConfig>,
    default: RouteConfig,
}

impl RouteConfigIndex {
    /// Creates an empty index with [`RouteConfig::DEFAULT`] as fallback.
    pub fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
            default: RouteConfig::DEFAULT,
        }
    }

    /// Builds an index from configuration rows.
    ///
    /// Rows whose label does not split into exactly two cities, and rows
    /// with a daily cap of zero, are skipped. A later row for the same pair
    /// replaces an earlier one.
    pub fn from_rows(rows: impl IntoIterator<Item = RouteConfigRow>) -> Self {
        let mut index = Self::new();
        for row in rows {
            if row.max_trips_per_day == 0 {
                log::warn!(
                    "skipping route group '{}': max trips per day must be positive",
                    row.route_group
                );
                continue;
            }
            match RoutePair::parse(&row.route_group) {
                Some(pair) => index.insert(
                    pair,
                    RouteConfig::new(row.duration_hours, row.break_hours, row.max_trips_per_day),
                ),
                None => log::warn!(
                    "skipping route group '{}': expected two cities separated by '{}'",
                    row.route_group,
                    ROUTE_DELIMITER
                ),
            }
        }
        index
    }

    /// Replaces the fallback configuration.
    pub fn with_default(mut self, default: RouteConfig) -> Self {
        self.default = default;
        self
    }

    /// Inserts or replaces the configuration for a pair.
    pub fn insert(&mut self, pair: RoutePair, config: RouteConfig) {
        self.routes.insert(pair, config);
    }

    /// Configuration for a pair, or the fallback.
    pub fn get(&self, pair: &RoutePair) -> &RouteConfig {
        self.routes.get(pair).unwrap_or(&self.default)
    }

    /// Configuration for travel between two cities, in either direction.
    pub fn lookup(&self, source: &str, destination: &str) -> &RouteConfig {
        self.get(&RoutePair::new(source, destination))
    }

    /// Whether a pair has an explicit row.
    pub fn contains(&self, pair: &RoutePair) -> bool {
        self.routes.contains_key(pair)
    }

    /// Fallback configuration.
    pub fn default_config(&self) -> &RouteConfig {
        &self.default
    }

    /// Configured pairs in sorted order, one entry per unordered pair.
    pub fn entries(&self) -> impl Iterator<Item = (&RoutePair, &RouteConfig)> {
        self.routes.iter()
    }

    /// Number of configured pairs.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no pair is configured.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RouteConfigIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_is_direction_agnostic() {
        let ab = RoutePair::new("Vellore", "Chennai");
        let ba = RoutePair::new("Chennai", "Vellore");
        assert_eq!(ab, ba);
        assert_eq!(ab.first(), "Chennai");
        assert_eq!(ab.to_string(), "Chennai-Vellore");
    }

    #[test]
    fn test_config_symmetry() {
        let index = RouteConfigIndex::from_rows(vec![RouteConfigRow::new(
            "Vellore - Chennai",
            3.5,
            1.0,
            4,
        )]);
        let forward = index.lookup("Chennai", "Vellore");
        let backward = index.lookup("Vellore", "Chennai");
        assert_eq!(forward, backward);
        assert!((forward.duration_hours - 3.5).abs() < 1e-10);
        assert_eq!(forward.max_trips_per_day, 4);
    }

    #[test]
    fn test_default_fallback() {
        let index = RouteConfigIndex::new();
        let config = index.lookup("Madurai", "Trichy");
        assert!((config.duration_hours - 5.0).abs() < 1e-10);
        assert!((config.break_hours - 3.0).abs() < 1e-10);
        assert_eq!(config.max_trips_per_day, 3);
    }

    #[test]
    fn test_custom_default() {
        let index = RouteConfigIndex::new().with_default(RouteConfig::new(1.0, 0.5, 8));
        assert_eq!(index.lookup("A", "B").max_trips_per_day, 8);
        assert_eq!(index.default_config().max_trips_per_day, 8);
    }

    #[test]
    fn test_malformed_labels_skipped() {
        let index = RouteConfigIndex::from_rows(vec![
            RouteConfigRow::new("Chennai", 1.0, 1.0, 1),
            RouteConfigRow::new("A-B-C", 1.0, 1.0, 1),
            RouteConfigRow::new("Chennai-Vellore", 2.0, 1.0, 2),
        ]);
        assert_eq!(index.len(), 1);
        assert!(index.contains(&RoutePair::new("Chennai", "Vellore")));
    }

    #[test]
    fn test_zero_cap_rows_skipped() {
        let index = RouteConfigIndex::from_rows(vec![
            RouteConfigRow::new("A-B", 1.0, 0.0, 0),
            RouteConfigRow::new("B-C", 1.0, 0.0, 2),
        ]);
        assert_eq!(index.len(), 1);
        assert!(!index.contains(&RoutePair::new("A", "B")));
        assert_eq!(*index.lookup("B", "A"), RouteConfig::DEFAULT);
    }

    #[test]
    fn test_later_row_wins() {
        let index = RouteConfigIndex::from_rows(vec![
            RouteConfigRow::new("A-B", 1.0, 1.0, 1),
            RouteConfigRow::new("B-A", 2.0, 2.0, 2),
        ]);
        assert_eq!(index.len(), 1);
        assert_eq!(index.lookup("A", "B").max_trips_per_day, 2);
    }

    #[test]
    fn test_turnaround_fractional_hours() {
        let config = RouteConfig::new(3.5, 0.25, 2);
        assert_eq!(config.turnaround(), Some(TimeDelta::minutes(225)));
        assert_eq!(RouteConfig::DEFAULT.turnaround(), Some(TimeDelta::hours(8)));
    }

    #[test]
    fn test_turnaround_rejects_invalid() {
        assert!(RouteConfig::new(-1.0, 0.0, 1).turnaround().is_none());
        assert!(RouteConfig::new(f64::NAN, 1.0, 1).turnaround().is_none());
        assert!(RouteConfig::new(f64::INFINITY, 1.0, 1).turnaround().is_none());
    }

    #[test]
    fn test_entries_sorted() {
        let index = RouteConfigIndex::from_rows(vec![
            RouteConfigRow::new("Vellore-Chennai", 1.0, 1.0, 1),
            RouteConfigRow::new("Bangalore-Chennai", 1.0, 1.0, 1),
        ]);
        let labels: Vec<String> = index.entries().map(|(p, _)| p.to_string()).collect();
        assert_eq!(labels, vec!["Bangalore-Chennai", "Chennai-Vellore"]);
    }
}
