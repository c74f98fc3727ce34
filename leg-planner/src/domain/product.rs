//! Transit product (mode) classification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// The kind of vehicle serving a line.
///
/// This is a closed set: the oracle's wire names map one-to-one onto the
/// variants, and anything else is rejected rather than carried as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Product {
    Suburban,
    Subway,
    Tram,
    Bus,
    Ferry,
    Express,
    Regional,
}

impl Product {
    /// All products, in the order the oracle documents them.
    pub const ALL: [Product; 7] = [
        Product::Suburban,
        Product::Subway,
        Product::Tram,
        Product::Bus,
        Product::Ferry,
        Product::Express,
        Product::Regional,
    ];

    /// The oracle's wire name for this product.
    pub fn as_str(&self) -> &'static str {
        match self {
            Product::Suburban => "suburban",
            Product::Subway => "subway",
            Product::Tram => "tram",
            Product::Bus => "bus",
            Product::Ferry => "ferry",
            Product::Express => "express",
            Product::Regional => "regional",
        }
    }
}

impl FromStr for Product {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Product::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| DomainError::UnknownProduct(s.to_string()))
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
