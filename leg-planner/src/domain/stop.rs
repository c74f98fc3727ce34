//! Stop identifiers and stop values.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::DomainError;

/// A stable stop identifier issued by the journey oracle.
///
/// Identifiers are opaque strings (BVG uses digit strings such as
/// `900100003`), but never empty and never padded with whitespace.
///
/// # Examples
///
/// ```
/// use leg_planner::domain::StopId;
///
/// let id = StopId::parse(" 900100003 ").unwrap();
/// assert_eq!(id.as_str(), "900100003");
///
/// assert!(StopId::parse("").is_err());
/// assert!(StopId::parse("   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopId(String);

impl StopId {
    /// Parse a stop identifier, trimming surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self, DomainError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyStopId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StopId> for String {
    fn from(id: StopId) -> Self {
        id.0
    }
}

impl fmt::Debug for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StopId({})", self.0)
    }
}

impl fmt::Display for StopId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A stop or station, referenced by value everywhere.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stop {
    pub id: StopId,
    pub name: String,
}

impl Stop {
    pub fn new(id: StopId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// A stop known only by its identifier. The name falls back to the id.
    pub fn unnamed(id: StopId) -> Self {
        let name = id.as_str().to_string();
        Self { id, name }
    }

    /// Returns true if both values refer to the same stop.
    ///
    /// Names are display data and may differ between oracle responses.
    pub fn same_stop(&self, other: &Stop) -> bool {
        self.id == other.id
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
