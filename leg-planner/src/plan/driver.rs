//! Running plan transitions against a resolver.

use tracing::debug;

use crate::domain::Route;
use crate::oracle::JourneyOracle;
use crate::resolver::{LegResolver, ResolverConfig};

use super::state::{LegRequest, PlanError, PlanState};

/// Drives a `PlanState` through transitions, resolving each issued request.
///
/// Every method takes the state by value and returns the successor. A
/// rejected transition hands back no state; the caller still owns whatever
/// copy it started from.
pub struct Planner<'a, O> {
    resolver: LegResolver<'a, O>,
}

impl<'a, O: JourneyOracle> Planner<'a, O> {
    pub fn new(oracle: &'a O, config: &'a ResolverConfig) -> Self {
        Self {
            resolver: LegResolver::new(oracle, config),
        }
    }

    /// Start a plan and resolve its first leg.
    pub async fn start(&self, route: Route) -> PlanState {
        let (state, request) = PlanState::start(route);
        self.resolve(state, request).await
    }

    pub async fn select(
        &self,
        mut state: PlanState,
        option_index: usize,
        time_index: usize,
    ) -> Result<PlanState, PlanError> {
        match state.select_by_index(option_index, time_index)? {
            Some(request) => Ok(self.resolve(state, request).await),
            None => Ok(state),
        }
    }

    pub async fn edit_leg(&self, mut state: PlanState, index: usize) -> Result<PlanState, PlanError> {
        let request = state.edit_leg(index)?;
        Ok(self.resolve(state, request).await)
    }

    pub async fn restart(&self, mut state: PlanState) -> PlanState {
        let request = state.restart();
        self.resolve(state, request).await
    }

    pub async fn retry(&self, mut state: PlanState) -> Result<PlanState, PlanError> {
        let request = state.retry()?;
        Ok(self.resolve(state, request).await)
    }

    /// Resolve `request` and fold the outcome into `state`.
    pub async fn resolve(&self, mut state: PlanState, request: LegRequest) -> PlanState {
        let outcome = self
            .resolver
            .resolve_leg(&request.from, &request.to, request.earliest_departure)
            .await;
        if !state.apply(&request, outcome) {
            debug!(epoch = request.epoch, "outcome discarded");
        }
        state
    }
}
