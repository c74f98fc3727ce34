//! Transport options: one line, one direction, a list of boardable times.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::time::{Timestamp, format_hhmm, minutes_between};
use super::{Product, Stop};

/// One boardable departure of a line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub duration_minutes: i64,
    pub platform: Option<String>,
    /// Oracle token for refreshing this itinerary later.
    pub refresh_token: Option<String>,
}

impl TimeSlot {
    pub fn new(departure: Timestamp, arrival: Timestamp) -> Self {
        Self {
            departure,
            arrival,
            duration_minutes: minutes_between(&departure, &arrival),
            platform: None,
            refresh_token: None,
        }
    }

    pub fn with_platform(mut self, platform: Option<String>) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_refresh_token(mut self, token: Option<String>) -> Self {
        self.refresh_token = token;
        self
    }

    /// `HH:MM` departure, also the deduplication key.
    pub fn departure_formatted(&self) -> String {
        format_hhmm(&self.departure)
    }

    pub fn arrival_formatted(&self) -> String {
        format_hhmm(&self.arrival)
    }
}

/// A line the traveler can take for the current leg.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOption {
    pub line: String,
    pub product: Product,
    pub direction: Option<String>,
    pub origin: Stop,
    pub destination: Stop,
    pub times: Vec<TimeSlot>,
}

impl TransportOption {
    /// Grouping key: `product-line`, e.g. `suburban-S5`.
    pub fn key(&self) -> String {
        group_key(self.product, &self.line)
    }

    /// Returns true if `slot` is one of this option's times.
    pub fn contains_slot(&self, slot: &TimeSlot) -> bool {
        self.times
            .iter()
            .any(|t| t.departure == slot.departure && t.arrival == slot.arrival)
    }

    /// Sort times by departure and drop repeated `HH:MM` departures.
    ///
    /// The first occurrence after a stable sort wins.
    pub fn sort_and_dedup_times(&mut self) {
        self.times.sort_by_key(|t| t.departure);
        let mut seen = HashSet::new();
        self.times.retain(|t| seen.insert(t.departure_formatted()));
    }
}

/// Build the grouping key for a product and line name.
pub fn group_key(product: Product, line: &str) -> String {
    format!("{}-{}", product.as_str(), line)
}
