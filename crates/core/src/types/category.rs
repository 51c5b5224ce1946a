//! Product categories recognised by the store.
//!
//! The catalog may report any category string. Only the four listed here
//! exist as far as the storefront is concerned; anything else fails to parse
//! and is treated as not found.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a string is not an allow-listed category.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// An allow-listed product category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "electronics")]
    Electronics,
    #[serde(rename = "jewelery")]
    Jewelery,
    #[serde(rename = "men's clothing")]
    MensClothing,
    #[serde(rename = "women's clothing")]
    WomensClothing,
}

impl Category {
    /// Every allow-listed category, in navigation order.
    pub const ALL: [Self; 4] = [
        Self::Electronics,
        Self::Jewelery,
        Self::MensClothing,
        Self::WomensClothing,
    ];

    /// The catalog's name for this category.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Electronics => "electronics",
            Self::Jewelery => "jewelery",
            Self::MensClothing => "men's clothing",
            Self::WomensClothing => "women's clothing",
        }
    }

    /// Human-readable label (dashes shown as spaces).
    #[must_use]
    pub fn label(&self) -> String {
        self.as_str().replace('-', " ")
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_listed() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>().unwrap(), category);
        }
    }

    #[test]
    fn test_parse_rejects_unlisted() {
        assert!("toys".parse::<Category>().is_err());
        // Matching is exact, not case-insensitive
        assert!("Electronics".parse::<Category>().is_err());
    }

    #[test]
    fn test_serde_uses_catalog_names() {
        let json = serde_json::to_string(&Category::MensClothing).unwrap();
        assert_eq!(json, "\"men's clothing\"");
    }
}
