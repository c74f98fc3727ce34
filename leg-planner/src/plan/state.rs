//! The plan state machine.
//!
//! A `PlanState` is an owned value. Transitions that need the oracle do not
//! call it themselves: they mark the state `Resolving` and hand back a
//! `LegRequest`. Whoever runs the request folds the outcome back in with
//! [`PlanState::apply`], which drops outcomes for requests that a later
//! transition has superseded.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    CommittedLeg, Route, RoutePoint, Stop, TimeSlot, Timestamp, TransportOption, add_minutes,
};
use crate::oracle::OracleError;
use crate::resolver::LegResult;

/// Error from an invalid plan transition. The state is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    /// A time was selected while there was nothing to choose from.
    #[error("cannot select a time while {status}")]
    NotChoosing { status: &'static str },

    #[error("no option at index {index}")]
    UnknownOption { index: usize },

    #[error("no departure time at index {index}")]
    UnknownTime { index: usize },

    /// The option key does not match any option currently on offer.
    #[error("option {key} is not on offer")]
    OptionNotOffered { key: String },

    #[error("option {key} has no departure at {departure}")]
    UnknownSlot { key: String, departure: String },

    #[error("no committed leg at index {index} (plan has {len})")]
    LegIndexOutOfRange { index: usize, len: usize },

    #[error("nothing to retry while {status}")]
    NotRetryable { status: &'static str },

    /// The cursor points past the route. Means a bug in this module.
    #[error("route segment {segment} does not exist (route has {segments})")]
    SegmentOutOfRange { segment: usize, segments: usize },
}

/// Where a plan is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanStatus {
    /// Waiting for the outcome of a `LegRequest`.
    Resolving,
    /// Options are on offer for the current leg.
    Choosing,
    /// The oracle failed. `retry` re-issues the same request.
    RetryableError(String),
    /// Nothing goes from the current stop towards the target. `retry` asks
    /// again with the same request; `edit_leg` and `restart` go back.
    NoRoute,
    /// The last committed leg reaches the final destination.
    Complete,
}

impl PlanStatus {
    pub fn name(&self) -> &'static str {
        match self {
            PlanStatus::Resolving => "resolving",
            PlanStatus::Choosing => "choosing",
            PlanStatus::RetryableError(_) => "retryableError",
            PlanStatus::NoRoute => "noRoute",
            PlanStatus::Complete => "complete",
        }
    }
}

impl fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A leg to resolve on behalf of a plan.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegRequest {
    /// The plan epoch this request was issued under.
    pub epoch: u64,
    pub from: Stop,
    pub to: Stop,
    /// Arrival plus dwell at `from`, before the transfer buffer.
    pub earliest_departure: Option<Timestamp>,
}

/// A traveler's plan for one route, built leg by leg.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanState {
    route: Route,
    committed_legs: Vec<CommittedLeg>,
    intermediate_stops: Vec<Stop>,
    /// Index `i` of the route segment `route[i] -> route[i + 1]` being planned.
    cursor_index: usize,
    current_from: Stop,
    /// Where the options on offer go. `None` until a request resolves.
    current_to: Option<Stop>,
    last_arrival: Option<Timestamp>,
    options: Vec<TransportOption>,
    status: PlanStatus,
    epoch: u64,
    last_request: Option<LegRequest>,
}

impl PlanState {
    /// Start planning a route from its origin.
    pub fn start(route: Route) -> (Self, LegRequest) {
        let current_from = route.origin().clone();
        let mut state = Self {
            route,
            committed_legs: Vec::new(),
            intermediate_stops: Vec::new(),
            cursor_index: 0,
            current_from,
            current_to: None,
            last_arrival: None,
            options: Vec::new(),
            status: PlanStatus::Resolving,
            epoch: 0,
            last_request: None,
        };
        let request = state.request_for_cursor_unchecked();
        (state, request)
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn committed_legs(&self) -> &[CommittedLeg] {
        &self.committed_legs
    }

    /// Split stops the traveler was routed through, in travel order.
    pub fn intermediate_stops(&self) -> &[Stop] {
        &self.intermediate_stops
    }

    pub fn cursor_index(&self) -> usize {
        self.cursor_index
    }

    pub fn current_from(&self) -> &Stop {
        &self.current_from
    }

    pub fn current_to(&self) -> Option<&Stop> {
        self.current_to.as_ref()
    }

    pub fn last_arrival(&self) -> Option<Timestamp> {
        self.last_arrival
    }

    pub fn options(&self) -> &[TransportOption] {
        &self.options
    }

    pub fn status(&self) -> &PlanStatus {
        &self.status
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// The most recently issued request, resolved or not.
    pub fn last_request(&self) -> Option<&LegRequest> {
        self.last_request.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.status == PlanStatus::Complete
    }

    /// The route point the current segment ends at.
    pub fn target(&self) -> Result<&RoutePoint, PlanError> {
        self.route
            .segment_end(self.cursor_index)
            .ok_or(PlanError::SegmentOutOfRange {
                segment: self.cursor_index,
                segments: self.route.segment_count(),
            })
    }

    /// Commit the option at `option_index`, departing at `time_index`.
    pub fn select_by_index(
        &mut self,
        option_index: usize,
        time_index: usize,
    ) -> Result<Option<LegRequest>, PlanError> {
        self.ensure_choosing()?;
        let option = self
            .options
            .get(option_index)
            .ok_or(PlanError::UnknownOption {
                index: option_index,
            })?;
        let slot = option
            .times
            .get(time_index)
            .ok_or(PlanError::UnknownTime { index: time_index })?;
        let (option, slot) = (option.clone(), slot.clone());
        self.select_time(&option, &slot)
    }

    /// Commit to riding `option` at `slot`.
    ///
    /// Returns the request for the next leg, or `None` once the final
    /// destination is reached.
    pub fn select_time(
        &mut self,
        option: &TransportOption,
        slot: &TimeSlot,
    ) -> Result<Option<LegRequest>, PlanError> {
        self.ensure_choosing()?;

        let key = option.key();
        let offered = self
            .options
            .iter()
            .find(|o| o.key() == key)
            .ok_or_else(|| PlanError::OptionNotOffered { key: key.clone() })?;
        if !offered.contains_slot(slot) {
            return Err(PlanError::UnknownSlot {
                key,
                departure: slot.departure_formatted(),
            });
        }

        let target = self.target()?.clone();
        let Some(current_to) = self.current_to.clone() else {
            return Err(PlanError::NotChoosing {
                status: self.status.name(),
            });
        };

        let leg = CommittedLeg::from_selection(
            self.current_from.clone(),
            current_to.clone(),
            offered,
            slot,
            self.cursor_index,
        );
        debug!(from = %leg.from, to = %leg.to, line = %leg.line, "committed leg");
        self.committed_legs.push(leg);

        let reached_target = current_to.same_stop(&target.stop);
        if reached_target && self.route.is_last_segment(self.cursor_index) {
            self.status = PlanStatus::Complete;
            self.options.clear();
            self.last_arrival = Some(slot.arrival);
            self.current_from = current_to;
            self.current_to = None;
            return Ok(None);
        }

        let dwell = if reached_target { target.dwell_minutes } else { 0 };
        self.last_arrival = Some(add_minutes(&slot.arrival, dwell));
        if reached_target {
            self.cursor_index += 1;
        }
        self.current_from = current_to;

        self.request_for_cursor().map(Some)
    }

    /// Go back to just before committed leg `index` and plan from there.
    ///
    /// `edit_leg(0)` is the same as `restart()`.
    pub fn edit_leg(&mut self, index: usize) -> Result<LegRequest, PlanError> {
        let len = self.committed_legs.len();
        if index >= len {
            return Err(PlanError::LegIndexOutOfRange { index, len });
        }
        if index == 0 {
            return Ok(self.restart());
        }

        let kept = &self.committed_legs[index - 1];
        let segments = self.route.segment_count();
        let end = self
            .route
            .segment_end(kept.route_segment)
            .ok_or(PlanError::SegmentOutOfRange {
                segment: kept.route_segment,
                segments,
            })?;
        let reached_end = kept.to.same_stop(&end.stop);
        let cursor_index = kept.route_segment + usize::from(reached_end);
        if cursor_index >= segments {
            return Err(PlanError::SegmentOutOfRange {
                segment: cursor_index,
                segments,
            });
        }
        let dwell = if reached_end { end.dwell_minutes } else { 0 };
        let last_arrival = add_minutes(&kept.arrival, dwell);
        let current_from = kept.to.clone();

        debug!(index, cursor_index, "editing from leg");
        self.committed_legs.truncate(index);
        self.rebuild_intermediate_stops();
        self.cursor_index = cursor_index;
        self.current_from = current_from;
        self.last_arrival = Some(last_arrival);

        self.request_for_cursor()
    }

    /// Drop every committed leg and plan again from the origin.
    pub fn restart(&mut self) -> LegRequest {
        debug!("restarting plan");
        self.committed_legs.clear();
        self.intermediate_stops.clear();
        self.cursor_index = 0;
        self.current_from = self.route.origin().clone();
        self.last_arrival = None;
        self.request_for_cursor_unchecked()
    }

    /// Re-issue the request that failed or found no route, under a fresh
    /// epoch.
    pub fn retry(&mut self) -> Result<LegRequest, PlanError> {
        let not_retryable = PlanError::NotRetryable {
            status: self.status.name(),
        };
        if !matches!(
            self.status,
            PlanStatus::RetryableError(_) | PlanStatus::NoRoute
        ) {
            return Err(not_retryable);
        }
        let Some(previous) = self.last_request.clone() else {
            return Err(not_retryable);
        };

        debug!(from = %previous.from, to = %previous.to, "retrying leg");
        Ok(self.issue(previous.from, previous.to, previous.earliest_departure))
    }

    /// Fold in the outcome of `request`.
    ///
    /// Returns false, leaving the state untouched, if the request was
    /// superseded by a later transition or already applied.
    pub fn apply(&mut self, request: &LegRequest, outcome: Result<LegResult, OracleError>) -> bool {
        if request.epoch != self.epoch || self.status != PlanStatus::Resolving {
            debug!(
                request_epoch = request.epoch,
                epoch = self.epoch,
                "ignoring stale leg outcome"
            );
            return false;
        }

        match outcome {
            Err(e) => {
                debug!(error = %e, "leg resolution failed");
                self.status = PlanStatus::RetryableError(e.to_string());
            }
            Ok(result) if result.has_direct_connection && !result.direct_options.is_empty() => {
                self.current_to = Some(request.to.clone());
                self.offer(result.direct_options);
            }
            Ok(LegResult {
                intermediate_stop: Some(stop),
                intermediate_options,
                ..
            }) if !intermediate_options.is_empty() => {
                self.intermediate_stops.push(stop.clone());
                self.current_to = Some(stop);
                self.offer(intermediate_options);
            }
            // A split stop with no rides towards it is not recorded.
            Ok(_) => {
                debug!(from = %request.from, to = %request.to, "no route");
                self.status = PlanStatus::NoRoute;
            }
        }
        true
    }

    fn offer(&mut self, options: Vec<TransportOption>) {
        self.status = PlanStatus::Choosing;
        self.options = options;
    }

    fn ensure_choosing(&self) -> Result<(), PlanError> {
        if self.status == PlanStatus::Choosing {
            Ok(())
        } else {
            Err(PlanError::NotChoosing {
                status: self.status.name(),
            })
        }
    }

    fn request_for_cursor(&mut self) -> Result<LegRequest, PlanError> {
        let to = self.target()?.stop.clone();
        Ok(self.issue(self.current_from.clone(), to, self.last_arrival))
    }

    /// Request for the first segment, which every route has.
    fn request_for_cursor_unchecked(&mut self) -> LegRequest {
        let to = self.route.destination().clone();
        let to = self
            .route
            .segment_end(self.cursor_index)
            .map_or(to, |p| p.stop.clone());
        self.issue(self.current_from.clone(), to, self.last_arrival)
    }

    fn issue(&mut self, from: Stop, to: Stop, earliest_departure: Option<Timestamp>) -> LegRequest {
        self.epoch += 1;
        let request = LegRequest {
            epoch: self.epoch,
            from,
            to,
            earliest_departure,
        };
        self.status = PlanStatus::Resolving;
        self.options.clear();
        self.current_to = None;
        self.last_request = Some(request.clone());
        request
    }

    /// Split stops are the ends of kept legs that stop short of their
    /// route segment's end.
    fn rebuild_intermediate_stops(&mut self) {
        self.intermediate_stops = self
            .committed_legs
            .iter()
            .filter(|leg| {
                self.route
                    .segment_end(leg.route_segment)
                    .is_some_and(|end| !leg.to.same_stop(&end.stop))
            })
            .map(|leg| leg.to.clone())
            .collect();
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod tests;
