//! Legs the traveler has committed to.

use serde::{Deserialize, Serialize};

use super::time::{Timestamp, minutes_between};
use super::{Product, Stop, TimeSlot, TransportOption};

/// A leg chosen by the traveler: one line from one stop to another.
///
/// Immutable once created. A plan only ever appends these or truncates the
/// list, and the list is what gets persisted when a journey is saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedLeg {
    pub from: Stop,
    pub to: Stop,
    pub line: String,
    pub product: Product,
    pub direction: Option<String>,
    pub departure: Timestamp,
    pub arrival: Timestamp,
    /// Index `i` of the route segment `route[i] -> route[i + 1]` this leg
    /// belongs to.
    pub route_segment: usize,
}

impl CommittedLeg {
    /// Build a leg from the option and time the traveler picked.
    pub fn from_selection(
        from: Stop,
        to: Stop,
        option: &TransportOption,
        slot: &TimeSlot,
        route_segment: usize,
    ) -> Self {
        Self {
            from,
            to,
            line: option.line.clone(),
            product: option.product,
            direction: option.direction.clone(),
            departure: slot.departure,
            arrival: slot.arrival,
            route_segment,
        }
    }

    pub fn duration_minutes(&self) -> i64 {
        minutes_between(&self.departure, &self.arrival)
    }
}
