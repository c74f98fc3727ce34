//! Oracle API response DTOs.
//!
//! These types map directly onto the `transport.rest` JSON responses. They
//! use `Option` liberally because the oracle omits fields rather than
//! sending null values in many cases, and sends null for cancelled times.

use serde::Deserialize;

/// Response from `GET /journeys`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneysResponse {
    /// Ranked itineraries, best first. Missing when nothing was found.
    #[serde(default)]
    pub journeys: Option<Vec<RawJourney>>,
}

/// One itinerary from origin to destination.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawJourney {
    #[serde(default)]
    pub legs: Vec<RawLeg>,

    /// Token for refreshing this itinerary.
    pub refresh_token: Option<String>,
}

/// One leg of an itinerary: a transit ride or a walk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLeg {
    /// Absent for walking legs.
    pub line: Option<RawLine>,

    /// Headsign of the vehicle.
    pub direction: Option<String>,

    pub origin: Option<RawStop>,
    pub destination: Option<RawStop>,

    /// ISO 8601 timestamps; null when cancelled.
    pub departure: Option<String>,
    pub arrival: Option<String>,

    pub departure_platform: Option<String>,

    /// Set on walking legs.
    #[serde(default)]
    pub walking: bool,

    /// Intermediate stop-time records, present with `stopovers=true`.
    pub stopovers: Option<Vec<RawStopover>>,
}

/// Line serving a transit leg.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLine {
    /// Product wire name, e.g. `suburban`.
    pub product: Option<String>,

    /// Line name, e.g. `S5`.
    pub name: Option<String>,
}

/// A stop or station as the oracle describes it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStop {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// A stop-time record inside a transit leg.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStopover {
    pub stop: Option<RawStopRef>,

    /// Vehicle passes through without halting.
    #[serde(default)]
    pub pass_by: bool,

    #[serde(default)]
    pub cancelled: bool,
}

/// The `stop` field of a stopover. Usually an object, occasionally `false`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawStopRef {
    Stop(RawStop),
    Flag(bool),
}

/// One entry from `GET /locations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub id: Option<String>,
    pub name: Option<String>,
    pub location: Option<RawCoordinates>,
    /// Product wire name → served at this stop.
    pub products: Option<std::collections::BTreeMap<String, bool>>,
}

/// Geographic position of a location.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}
