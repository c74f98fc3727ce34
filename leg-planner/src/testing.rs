//! Shared fixtures for unit tests: a scripted oracle and itinerary builders.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::{Product, Stop, StopId, Timestamp, parse_timestamp};
use crate::oracle::{Itinerary, ItineraryLeg, JourneyOracle, Line, OracleError, StopEvent};

/// A recorded oracle call.
#[derive(Debug, Clone, PartialEq)]
pub struct OracleCall {
    pub from: StopId,
    pub to: StopId,
    pub earliest_departure: Option<Timestamp>,
}

/// Oracle answering from a table keyed by `(from, to)`.
///
/// Unscripted pairs answer with no itineraries.
#[derive(Default)]
pub struct ScriptedOracle {
    answers: Mutex<HashMap<(StopId, StopId), Result<Vec<Itinerary>, u16>>>,
    calls: Mutex<Vec<OracleCall>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(&self, from: &str, to: &str, itineraries: Vec<Itinerary>) {
        self.answers
            .lock()
            .unwrap()
            .insert((id(from), id(to)), Ok(itineraries));
    }

    pub fn fail(&self, from: &str, to: &str, status: u16) {
        self.answers
            .lock()
            .unwrap()
            .insert((id(from), id(to)), Err(status));
    }

    pub fn calls(&self) -> Vec<OracleCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl JourneyOracle for ScriptedOracle {
    async fn search_leg(
        &self,
        from: &StopId,
        to: &StopId,
        earliest_departure: Option<Timestamp>,
    ) -> Result<Vec<Itinerary>, OracleError> {
        self.calls.lock().unwrap().push(OracleCall {
            from: from.clone(),
            to: to.clone(),
            earliest_departure,
        });

        let answer = self
            .answers
            .lock()
            .unwrap()
            .get(&(from.clone(), to.clone()))
            .cloned();

        match answer {
            Some(Ok(itineraries)) => Ok(itineraries),
            Some(Err(status)) => Err(OracleError::Status {
                status,
                message: "scripted failure".into(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

pub fn id(s: &str) -> StopId {
    StopId::parse(s).unwrap()
}

pub fn stop(s: &str) -> Stop {
    Stop::new(id(s), format!("Stop {s}"))
}

/// A timestamp on 2024-03-15 in UTC+1.
pub fn at(hhmm: &str) -> Timestamp {
    parse_timestamp(&format!("2024-03-15T{hhmm}:00+01:00")).unwrap()
}

/// A transit leg halting only at its endpoints.
pub fn ride(product: Product, line: &str, from: &str, to: &str, dep: &str, arr: &str) -> ItineraryLeg {
    ItineraryLeg {
        product_name: Some(product.as_str().into()),
        line: Some(Line {
            product,
            name: line.into(),
        }),
        direction: Some(format!("Stop {to}")),
        origin: Some(stop(from)),
        destination: Some(stop(to)),
        departure: Some(at(dep)),
        arrival: Some(at(arr)),
        departure_platform: None,
        stopovers: vec![
            StopEvent {
                stop: Some(stop(from)),
                pass_by: false,
                cancelled: false,
            },
            StopEvent {
                stop: Some(stop(to)),
                pass_by: false,
                cancelled: false,
            },
        ],
    }
}

pub fn walk(from: &str, to: &str) -> ItineraryLeg {
    ItineraryLeg {
        product_name: None,
        line: None,
        direction: None,
        origin: Some(stop(from)),
        destination: Some(stop(to)),
        departure: None,
        arrival: None,
        departure_platform: None,
        stopovers: Vec::new(),
    }
}

pub fn itinerary(legs: Vec<ItineraryLeg>) -> Itinerary {
    Itinerary {
        legs,
        refresh_token: None,
    }
}
