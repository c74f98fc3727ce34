//! Journey oracle client.
//!
//! This module provides an HTTP client for a `transport.rest` journey API
//! (HAFAS behind a JSON facade), which ranks itineraries between two stops.
//!
//! Key characteristics of the oracle:
//! - Results are ranked best-first; we never re-rank them
//! - Itineraries may start with a walk before the first vehicle
//! - Stop-time records may be pass-throughs or cancelled halts
//! - Times carry the local UTC offset of the stop

mod client;
mod convert;
mod error;
mod types;

use std::future::Future;

use crate::domain::{StopId, Timestamp};

pub use client::{DEFAULT_BASE_URL, DEFAULT_RESULTS, HttpOracle, OracleConfig};
pub use convert::{Itinerary, ItineraryLeg, Line, StopEvent, StopKind, StopMatch};
pub use error::OracleError;
pub use types::{JourneysResponse, RawJourney, RawLeg, RawLine, RawStop, RawStopover};

/// Source of ranked itineraries for a single leg.
///
/// This abstraction lets the resolver run against the HTTP client, the
/// cache, or a scripted stub in tests.
pub trait JourneyOracle: Send + Sync {
    /// Search itineraries from `from` to `to`.
    ///
    /// `earliest_departure` is a lower bound on departure time; `None` means
    /// "now". An empty result is not an error.
    fn search_leg(
        &self,
        from: &StopId,
        to: &StopId,
        earliest_departure: Option<Timestamp>,
    ) -> impl Future<Output = Result<Vec<Itinerary>, OracleError>> + Send;
}
