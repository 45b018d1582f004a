//! Vehicle category model.
//!
//! A category is a vehicle class with its own, independent allocation pool.
//! Raw car-type strings are mapped onto this small set by ingestion; anything
//! unmapped lands in [`Category::Unknown`], which is allocated like any other
//! category.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Vehicle class.
///
/// Variants are declared in label order so the derived `Ord` agrees with
/// sorting by [`Category::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Large vehicles (Innova, Ertiga and equivalents).
    #[serde(rename = "SUV")]
    Suv,
    /// Economy vehicles. Merged into sedan by default configuration.
    #[serde(rename = "hatchback")]
    Hatchback,
    /// Mid-size vehicles.
    #[serde(rename = "sedan")]
    Sedan,
    /// Fallback for unmapped car types.
    #[serde(rename = "unknown")]
    Unknown,
}

impl Category {
    /// All categories in label order.
    pub const ALL: [Category; 4] = [
        Category::Suv,
        Category::Hatchback,
        Category::Sedan,
        Category::Unknown,
    ];

    /// Display label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Suv => "SUV",
            Category::Hatchback => "hatchback",
            Category::Sedan => "sedan",
            Category::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a label names no category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown vehicle category label: '{0}'")]
pub struct ParseCategoryError(pub String);

impl FromStr for Category {
    type Err = ParseCategoryError;

    /// Parses a label case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| ParseCategoryError(label.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ord_matches_label_order() {
        let mut labels: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        labels.sort();
        let ordered: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        assert_eq!(labels, ordered);
        assert!(Category::Suv < Category::Sedan);
        assert!(Category::Sedan < Category::Unknown);
    }

    #[test]
    fn test_parse_labels() {
        assert_eq!("sedan".parse::<Category>().unwrap(), Category::Sedan);
        assert_eq!("suv".parse::<Category>().unwrap(), Category::Suv);
        assert_eq!(" Unknown ".parse::<Category>().unwrap(), Category::Unknown);
        assert!("minibus".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_labels() {
        let json = serde_json::to_string(&Category::Suv).unwrap();
        assert_eq!(json, "\"SUV\"");
        let back: Category = serde_json::from_str("\"hatchback\"").unwrap();
        assert_eq!(back, Category::Hatchback);
    }
}
