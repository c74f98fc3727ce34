//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CommittedLeg, DomainError, Product, RoutePoint, Stop, StopId, TimeSlot, Timestamp,
    TransportOption,
};
use crate::oracle::StopMatch;
use crate::plan::{PlanState, PlanStatus};
use crate::resolver::LegResult;

/// Query for stop search.
#[derive(Debug, Deserialize)]
pub struct StopSearchRequest {
    pub query: String,
}

/// Response for stop search.
#[derive(Debug, Serialize)]
pub struct StopSearchResponse {
    pub stops: Vec<StopMatch>,
}

/// Query for resolving a leg.
///
/// Fields are optional here so that a missing one is reported with the
/// usual JSON error body.
#[derive(Debug, Default, Deserialize)]
pub struct LegQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// RFC 3339 departure bound, passed to the oracle as is
    pub departure: Option<String>,
}

/// Query for resolving the leg after an arrival.
#[derive(Debug, Default, Deserialize)]
pub struct NextLegQuery {
    pub from: Option<String>,
    pub to: Option<String>,
    /// RFC 3339 arrival time at `from`
    pub arrival: Option<String>,
}

/// A stop in a request: either a bare id or an id with a display name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StopInput {
    Id(String),
    Named { id: String, name: Option<String> },
}

impl StopInput {
    pub fn into_stop(self) -> Result<Stop, DomainError> {
        match self {
            StopInput::Id(id) => Ok(Stop::unnamed(StopId::parse(&id)?)),
            StopInput::Named { id, name: None } => Ok(Stop::unnamed(StopId::parse(&id)?)),
            StopInput::Named {
                id,
                name: Some(name),
            } => Ok(Stop::new(StopId::parse(&id)?, name)),
        }
    }
}

/// A stopover in a new plan.
#[derive(Debug, Clone, Deserialize)]
pub struct StopoverRequest {
    pub stop: StopInput,
    /// Dwell in minutes
    #[serde(default)]
    pub duration: u32,
}

/// Request to start a plan.
#[derive(Debug, Deserialize)]
pub struct CreatePlanRequest {
    pub origin: StopInput,
    pub destination: StopInput,
    #[serde(default)]
    pub stopovers: Vec<StopoverRequest>,
}

impl CreatePlanRequest {
    pub fn into_parts(self) -> Result<(Stop, Vec<RoutePoint>, Stop), DomainError> {
        let origin = self.origin.into_stop()?;
        let destination = self.destination.into_stop()?;
        let stopovers = self
            .stopovers
            .into_iter()
            .map(|s| Ok(RoutePoint::new(s.stop.into_stop()?, s.duration)))
            .collect::<Result<Vec<_>, DomainError>>()?;
        Ok((origin, stopovers, destination))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectTimeRequest {
    pub option_index: usize,
    pub time_index: usize,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditLegRequest {
    pub leg_index: usize,
}

/// A departure time of an option.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotResult {
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub departure_formatted: String,
    pub arrival_formatted: String,
    pub duration_minutes: i64,
    pub platform: Option<String>,
    pub refresh_token: Option<String>,
}

/// A line on offer, with its times.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportOptionResult {
    pub key: String,
    pub line: String,
    pub product: Product,
    /// Display label, e.g. "S-Bahn"
    pub product_name: &'static str,
    pub direction: Option<String>,
    pub origin: Stop,
    pub destination: Stop,
    pub times: Vec<TimeSlotResult>,
}

/// Response for leg resolution.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegResponse {
    pub direct_options: Vec<TransportOptionResult>,
    pub has_direct_connection: bool,
    pub intermediate_stop: Option<Stop>,
    pub intermediate_options: Vec<TransportOptionResult>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommittedLegResult {
    pub from: Stop,
    pub to: Stop,
    pub line: String,
    pub product: Product,
    pub product_name: &'static str,
    pub direction: Option<String>,
    pub departure: Timestamp,
    pub arrival: Timestamp,
    pub departure_formatted: String,
    pub arrival_formatted: String,
    pub duration_minutes: i64,
    pub route_segment: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePointResult {
    pub stop: Stop,
    pub dwell_minutes: u32,
}

/// The current view of a plan session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanResponse {
    pub id: u64,
    pub status: &'static str,
    /// Error message when the last resolution failed
    pub message: Option<String>,
    pub route: Vec<RoutePointResult>,
    pub committed_legs: Vec<CommittedLegResult>,
    pub intermediate_stops: Vec<Stop>,
    pub cursor_index: usize,
    pub current_from: Stop,
    pub current_to: Option<Stop>,
    pub last_arrival: Option<Timestamp>,
    pub options: Vec<TransportOptionResult>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

/// Display label for a product.
pub fn product_label(product: Product) -> &'static str {
    match product {
        Product::Suburban => "S-Bahn",
        Product::Subway => "U-Bahn",
        Product::Tram => "Tram",
        Product::Bus => "Bus",
        Product::Ferry => "Ferry",
        Product::Express => "Express",
        Product::Regional => "Regional",
    }
}

impl TimeSlotResult {
    pub fn from_slot(slot: &TimeSlot) -> Self {
        Self {
            departure: slot.departure,
            arrival: slot.arrival,
            departure_formatted: slot.departure_formatted(),
            arrival_formatted: slot.arrival_formatted(),
            duration_minutes: slot.duration_minutes,
            platform: slot.platform.clone(),
            refresh_token: slot.refresh_token.clone(),
        }
    }
}

impl TransportOptionResult {
    pub fn from_option(option: &TransportOption) -> Self {
        Self {
            key: option.key(),
            line: option.line.clone(),
            product: option.product,
            product_name: product_label(option.product),
            direction: option.direction.clone(),
            origin: option.origin.clone(),
            destination: option.destination.clone(),
            times: option.times.iter().map(TimeSlotResult::from_slot).collect(),
        }
    }
}

fn options(options: &[TransportOption]) -> Vec<TransportOptionResult> {
    options.iter().map(TransportOptionResult::from_option).collect()
}

impl LegResponse {
    pub fn from_result(result: &LegResult) -> Self {
        Self {
            direct_options: options(&result.direct_options),
            has_direct_connection: result.has_direct_connection,
            intermediate_stop: result.intermediate_stop.clone(),
            intermediate_options: options(&result.intermediate_options),
        }
    }
}

impl CommittedLegResult {
    pub fn from_leg(leg: &CommittedLeg) -> Self {
        Self {
            from: leg.from.clone(),
            to: leg.to.clone(),
            line: leg.line.clone(),
            product: leg.product,
            product_name: product_label(leg.product),
            direction: leg.direction.clone(),
            departure: leg.departure,
            arrival: leg.arrival,
            departure_formatted: crate::domain::format_hhmm(&leg.departure),
            arrival_formatted: crate::domain::format_hhmm(&leg.arrival),
            duration_minutes: leg.duration_minutes(),
            route_segment: leg.route_segment,
        }
    }
}

impl PlanResponse {
    pub fn from_state(id: u64, state: &PlanState) -> Self {
        let message = match state.status() {
            PlanStatus::RetryableError(message) => Some(message.clone()),
            _ => None,
        };

        Self {
            id,
            status: state.status().name(),
            message,
            route: state
                .route()
                .points()
                .iter()
                .map(|p| RoutePointResult {
                    stop: p.stop.clone(),
                    dwell_minutes: p.dwell_minutes,
                })
                .collect(),
            committed_legs: state
                .committed_legs()
                .iter()
                .map(CommittedLegResult::from_leg)
                .collect(),
            intermediate_stops: state.intermediate_stops().to_vec(),
            cursor_index: state.cursor_index(),
            current_from: state.current_from().clone(),
            current_to: state.current_to().cloned(),
            last_arrival: state.last_arrival(),
            options: options(state.options()),
        }
    }
}
