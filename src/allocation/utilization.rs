//! Vehicle utilization metrics.
//!
//! Compares each vehicle's trip count with the mean trip count of its
//! category.
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Trip count | Trips served by one vehicle |
//! | Category mean | Mean trip count over the category's vehicles |
//! | Utilization diff | Trip count minus category mean (signed) |

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Allocation, Category};

/// Utilization of one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleUtilization {
    /// Vehicle category.
    pub category: Category,
    /// Vehicle ID within the category.
    pub vehicle_id: u32,
    /// Trips served.
    pub trip_count: usize,
    /// `trip_count` minus the category mean.
    pub utilization_diff: f64,
}

/// Over- and under-utilized vehicles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UtilizationReport {
    /// Vehicles above their category mean, most over-utilized first.
    pub over_utilized: Vec<VehicleUtilization>,
    /// Vehicles below their category mean, most under-utilized first.
    pub under_utilized: Vec<VehicleUtilization>,
}

impl UtilizationReport {
    /// The `n` most over-utilized vehicles.
    pub fn top_over(&self, n: usize) -> &[VehicleUtilization] {
        &self.over_utilized[..n.min(self.over_utilized.len())]
    }

    /// The `n` most under-utilized vehicles.
    pub fn top_under(&self, n: usize) -> &[VehicleUtilization] {
        &self.under_utilized[..n.min(self.under_utilized.len())]
    }
}

/// Post-hoc utilization analysis of an allocation.
pub struct UtilizationAnalyzer;

impl UtilizationAnalyzer {
    /// Trip counts per category and vehicle, in natural order.
    pub fn trip_counts(allocation: &Allocation) -> BTreeMap<Category, BTreeMap<u32, usize>> {
        let mut counts: BTreeMap<Category, BTreeMap<u32, usize>> = BTreeMap::new();
        for allocated in &allocation.trips {
            *counts
                .entry(allocated.trip.category)
                .or_default()
                .entry(allocated.vehicle_id)
                .or_insert(0) += 1;
        }
        counts
    }

    /// Per-vehicle utilization in natural `(category, vehicle_id)` order.
    pub fn utilizations(allocation: &Allocation) -> Vec<VehicleUtilization> {
        let mut result = Vec::new();
        for (category, vehicles) in Self::trip_counts(allocation) {
            let total: usize = vehicles.values().sum();
            let mean = total as f64 / vehicles.len() as f64;
            result.extend(vehicles.into_iter().map(|(vehicle_id, trip_count)| {
                VehicleUtilization {
                    category,
                    vehicle_id,
                    trip_count,
                    utilization_diff: trip_count as f64 - mean,
                }
            }));
        }
        result
    }

    /// Splits vehicles into over- and under-utilized views.
    ///
    /// Vehicles exactly at their category mean appear in neither view. Ties
    /// keep natural `(category, vehicle_id)` order.
    pub fn analyze(allocation: &Allocation) -> UtilizationReport {
        let (mut over_utilized, rest): (Vec<_>, Vec<_>) = Self::utilizations(allocation)
            .into_iter()
            .partition(|u| u.utilization_diff > 0.0);
        let mut under_utilized: Vec<_> = rest
            .into_iter()
            .filter(|u| u.utilization_diff < 0.0)
            .collect();

        over_utilized.sort_by(|a, b| b.utilization_diff.total_cmp(&a.utilization_diff));
        under_utilized.sort_by(|a, b| a.utilization_diff.total_cmp(&b.utilization_diff));

        UtilizationReport {
            over_utilized,
            under_utilized,
        }
    }
}
