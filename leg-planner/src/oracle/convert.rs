//! Conversion from oracle DTOs to normalized itineraries.
//!
//! The oracle is lenient about what it sends; conversion keeps whatever is
//! usable and drops the rest, logging at `debug`. Deciding whether a leg is
//! good enough to show the traveler is the resolver's job, not ours.

use serde::Serialize;
use tracing::debug;

use crate::domain::{Product, Stop, StopId, Timestamp, parse_timestamp};

use super::types::{
    JourneysResponse, RawJourney, RawLeg, RawLocation, RawStop, RawStopRef, RawStopover,
};

/// A ranked itinerary with its legs in travel order.
#[derive(Debug, Clone, PartialEq)]
pub struct Itinerary {
    pub legs: Vec<ItineraryLeg>,
    pub refresh_token: Option<String>,
}

/// The line serving a transit leg, with a recognized product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub product: Product,
    pub name: String,
}

/// One leg of an itinerary.
#[derive(Debug, Clone, PartialEq)]
pub struct ItineraryLeg {
    /// The product wire name as sent, even if it is not a known `Product`.
    pub product_name: Option<String>,
    /// Present when both the product and the line name are usable.
    pub line: Option<Line>,
    pub direction: Option<String>,
    pub origin: Option<Stop>,
    pub destination: Option<Stop>,
    pub departure: Option<Timestamp>,
    pub arrival: Option<Timestamp>,
    pub departure_platform: Option<String>,
    pub stopovers: Vec<StopEvent>,
}

impl ItineraryLeg {
    /// Returns true if this leg rides a vehicle (as opposed to walking).
    pub fn is_transit(&self) -> bool {
        self.product_name.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// A stop-time record within a transit leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopEvent {
    pub stop: Option<Stop>,
    pub pass_by: bool,
    pub cancelled: bool,
}

impl StopEvent {
    /// Returns true if the vehicle actually halts here.
    pub fn is_halt(&self) -> bool {
        self.stop.is_some() && !self.pass_by && !self.cancelled
    }
}

/// Whether a search hit is a single stop or a station grouping stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StopKind {
    Stop,
    Station,
}

/// A stop found by name search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StopMatch {
    #[serde(flatten)]
    pub stop: Stop,
    #[serde(rename = "type")]
    pub kind: StopKind,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Products served here.
    pub products: Vec<Product>,
}

/// Convert a `/journeys` response. Itineraries without legs are dropped.
pub fn convert_journeys(response: JourneysResponse) -> Vec<Itinerary> {
    response
        .journeys
        .unwrap_or_default()
        .into_iter()
        .filter(|j| !j.legs.is_empty())
        .map(convert_journey)
        .collect()
}

fn convert_journey(journey: RawJourney) -> Itinerary {
    Itinerary {
        legs: journey.legs.into_iter().map(convert_leg).collect(),
        refresh_token: journey.refresh_token,
    }
}

fn convert_leg(leg: RawLeg) -> ItineraryLeg {
    let (product_name, line_name) = match leg.line {
        Some(line) if !leg.walking => (line.product, line.name),
        _ => (None, None),
    };

    let line = match (product_name.as_deref(), line_name) {
        (Some(product), Some(name)) if !name.is_empty() => match product.parse::<Product>() {
            Ok(product) => Some(Line { product, name }),
            Err(e) => {
                debug!("dropping line {name}: {e}");
                None
            }
        },
        _ => None,
    };

    ItineraryLeg {
        product_name,
        line,
        direction: leg.direction,
        origin: leg.origin.and_then(convert_stop),
        destination: leg.destination.and_then(convert_stop),
        departure: leg.departure.as_deref().and_then(convert_time),
        arrival: leg.arrival.as_deref().and_then(convert_time),
        departure_platform: leg.departure_platform,
        stopovers: leg
            .stopovers
            .unwrap_or_default()
            .into_iter()
            .map(convert_stopover)
            .collect(),
    }
}

fn convert_stopover(stopover: RawStopover) -> StopEvent {
    let stop = match stopover.stop {
        Some(RawStopRef::Stop(stop)) => convert_stop(stop),
        Some(RawStopRef::Flag(_)) | None => None,
    };
    StopEvent {
        stop,
        pass_by: stopover.pass_by,
        cancelled: stopover.cancelled,
    }
}

/// A stop needs an id; the name falls back to the id.
fn convert_stop(stop: RawStop) -> Option<Stop> {
    let id = StopId::parse(stop.id.as_deref()?).ok()?;
    Some(match stop.name {
        Some(name) if !name.is_empty() => Stop::new(id, name),
        _ => Stop::unnamed(id),
    })
}

fn convert_time(s: &str) -> Option<Timestamp> {
    parse_timestamp(s)
        .inspect_err(|e| debug!("ignoring {e}"))
        .ok()
}

/// Convert `/locations` results, keeping only stops and stations.
pub fn convert_locations(locations: Vec<RawLocation>) -> Vec<StopMatch> {
    locations.into_iter().filter_map(convert_location).collect()
}

fn convert_location(location: RawLocation) -> Option<StopMatch> {
    let kind = match location.kind.as_deref()? {
        "stop" => StopKind::Stop,
        "station" => StopKind::Station,
        _ => return None,
    };
    let stop = convert_stop(RawStop {
        id: location.id,
        name: location.name,
    })?;

    let products = location
        .products
        .unwrap_or_default()
        .into_iter()
        .filter(|(_, served)| *served)
        .filter_map(|(name, _)| name.parse::<Product>().ok())
        .collect();

    let (latitude, longitude) = location
        .location
        .map(|c| (c.latitude, c.longitude))
        .unwrap_or((None, None));

    Some(StopMatch {
        stop,
        kind,
        latitude,
        longitude,
        products,
    })
}
