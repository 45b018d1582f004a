//! Fleet configuration.
//!
//! Controls how raw trip records are normalized before allocation (car-type
//! mapping, category merges, route aliases) and how the engine runs
//! (fallback route parameters, selection policy). Every field has a default,
//! so an empty TOML document is a valid configuration.
//!
//! ```toml
//! sedan_only = false
//! policy = "first-fit"
//!
//! [default_route]
//! duration_hours = 5.0
//! break_hours = 3.0
//! max_trips_per_day = 3
//!
//! [car_types]
//! "AC Mid-Size Plus(Toyota Etios or Equivalent)" = "sedan"
//!
//! [[category_merges]]
//! from = "hatchback"
//! into = "sedan"
//!
//! [route_aliases]
//! "Katpadi-Chennai" = "Vellore-Chennai"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::allocation::SelectionPolicy;
use crate::error::ConfigError;
use crate::models::{Category, RouteConfig};

/// Replaces one category with another after car-type mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMerge {
    /// Category to replace.
    pub from: Category,
    /// Replacement.
    pub into: Category,
}

/// Normalization and engine settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    /// Parameters for route pairs without a configuration row.
    pub default_route: RouteConfig,
    /// Raw car-type string → category. Unlisted types map to `unknown`.
    pub car_types: BTreeMap<String, Category>,
    /// Merges applied in order after mapping.
    pub category_merges: Vec<CategoryMerge>,
    /// Normalized route string → replacement route string.
    pub route_aliases: BTreeMap<String, String>,
    /// Serve every known class from the sedan pool.
    pub sedan_only: bool,
    /// Vehicle selection policy.
    pub policy: SelectionPolicy,
}

impl Default for FleetConfig {
    fn default() -> Self {
        let car_types = [
            ("AC Mid-Size Plus(Toyota Etios or Equivalent)", Category::Sedan),
            ("AC Economy(Wagon R or Equivalent)", Category::Hatchback),
            ("Toyota Innova Crysta(Toyota Innova Crysta)", Category::Suv),
            ("AC SUV Large(Ertiga or Equivalent)", Category::Suv),
            ("AC Minivan(Toyota Innova)", Category::Suv),
        ]
        .into_iter()
        .map(|(raw, category)| (raw.to_string(), category))
        .collect();

        Self {
            default_route: RouteConfig::DEFAULT,
            car_types,
            category_merges: vec![CategoryMerge {
                from: Category::Hatchback,
                into: Category::Sedan,
            }],
            route_aliases: BTreeMap::from([(
                "Katpadi-Chennai".to_string(),
                "Vellore-Chennai".to_string(),
            )]),
            sedan_only: false,
            policy: SelectionPolicy::FirstFit,
        }
    }
}

impl FleetConfig {
    /// Loads a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.display().to_string(),
            error,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded fleet config from {}", path.display());
        Ok(config)
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Sets single-pool mode.
    pub fn with_sedan_only(mut self, sedan_only: bool) -> Self {
        self.sedan_only = sedan_only;
        self
    }

    /// Sets the selection policy.
    pub fn with_policy(mut self, policy: SelectionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Category for a raw car-type string.
    pub fn categorize(&self, car_type: &str) -> Category {
        let mut category = match self.car_types.get(car_type.trim()) {
            Some(category) => *category,
            None => {
                log::debug!("unmapped car type '{}', using unknown", car_type.trim());
                Category::Unknown
            }
        };
        for merge in &self.category_merges {
            if category == merge.from {
                category = merge.into;
            }
        }
        if self.sedan_only && matches!(category, Category::Suv | Category::Hatchback) {
            category = Category::Sedan;
        }
        category
    }

    /// Applies the alias table to a normalized route string.
    pub fn resolve_route_alias(&self, route: &str) -> String {
        self.route_aliases
            .get(route)
            .cloned()
            .unwrap_or_else(|| route.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_categorize() {
        let config = FleetConfig::default();
        assert_eq!(
            config.categorize("AC Mid-Size Plus(Toyota Etios or Equivalent)"),
            Category::Sedan
        );
        // hatchback is merged into sedan
        assert_eq!(config.categorize("AC Economy(Wagon R or Equivalent)"), Category::Sedan);
        assert_eq!(config.categorize(" AC Minivan(Toyota Innova) "), Category::Suv);
        assert_eq!(config.categorize("Tempo Traveller"), Category::Unknown);
        assert_eq!(config.categorize(""), Category::Unknown);
    }

    #[test]
    fn test_sedan_only() {
        let config = FleetConfig::default().with_sedan_only(true);
        assert_eq!(config.categorize("AC SUV Large(Ertiga or Equivalent)"), Category::Sedan);
        assert_eq!(config.categorize("Tempo Traveller"), Category::Unknown);
    }

    #[test]
    fn test_route_alias() {
        let config = FleetConfig::default();
        assert_eq!(config.resolve_route_alias("Katpadi-Chennai"), "Vellore-Chennai");
        assert_eq!(config.resolve_route_alias("Chennai-Katpadi"), "Chennai-Katpadi");
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = FleetConfig::from_toml_str("").unwrap();
        assert_eq!(config, FleetConfig::default());
    }

    #[test]
    fn test_parse_toml() {
        let text = r#"
            sedan_only = true
            policy = "earliest-available"

            [default_route]
            duration_hours = 4.5
            break_hours = 1.0
            max_trips_per_day = 2

            [car_types]
            "Tempo Traveller" = "SUV"

            [[category_merges]]
            from = "SUV"
            into = "unknown"

            [route_aliases]
            "Katpadi-Bangalore" = "Vellore-Bangalore"
        "#;
        let config = FleetConfig::from_toml_str(text).unwrap();
        assert!(config.sedan_only);
        assert_eq!(config.policy, SelectionPolicy::EarliestAvailable);
        assert_eq!(config.default_route.max_trips_per_day, 2);
        assert!((config.default_route.duration_hours - 4.5).abs() < 1e-10);
        assert_eq!(config.car_types.len(), 1);
        assert_eq!(config.categorize("Tempo Traveller"), Category::Unknown);
        assert_eq!(
            config.resolve_route_alias("Katpadi-Bangalore"),
            "Vellore-Bangalore"
        );
    }

    #[test]
    fn test_invalid_toml() {
        let err = FleetConfig::from_toml_str("policy = \"best-fit\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = FleetConfig::from_file("/nonexistent/u-fleet.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
