//! Resolving one leg: direct options, or a split at an intermediate stop.

use serde::Serialize;
use tracing::{debug, info};

use crate::domain::{Stop, Timestamp, TransportOption};
use crate::oracle::{JourneyOracle, OracleError};

use super::aggregate::group;
use super::config::ResolverConfig;
use super::segment::{CleanedSegment, head_segments};

/// What the traveler can take next from a stop.
///
/// Either the oracle found vehicles reaching the target directly, or it
/// found none and we offer the first hop towards the best-ranked
/// itinerary's first change instead. Never both.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegResult {
    pub direct_options: Vec<TransportOption>,
    pub has_direct_connection: bool,
    pub intermediate_stop: Option<Stop>,
    pub intermediate_options: Vec<TransportOption>,
}

impl LegResult {
    /// A result with nothing to offer.
    pub fn no_connection() -> Self {
        Self {
            direct_options: Vec::new(),
            has_direct_connection: false,
            intermediate_stop: None,
            intermediate_options: Vec::new(),
        }
    }

    /// Returns true if this result splits the leg at an intermediate stop.
    pub fn is_split(&self) -> bool {
        self.intermediate_stop.is_some()
    }

    /// The options the traveler chooses from: direct ones when there is a
    /// direct connection, otherwise those towards the intermediate stop.
    pub fn options(&self) -> &[TransportOption] {
        if self.has_direct_connection {
            &self.direct_options
        } else {
            &self.intermediate_options
        }
    }
}

/// Resolves legs against a journey oracle.
pub struct LegResolver<'a, O> {
    oracle: &'a O,
    config: &'a ResolverConfig,
}

impl<'a, O: JourneyOracle> LegResolver<'a, O> {
    pub fn new(oracle: &'a O, config: &'a ResolverConfig) -> Self {
        Self { oracle, config }
    }

    /// Resolve the leg `from -> to`.
    ///
    /// When `earliest_departure` is given, the transfer buffer is added
    /// before the oracle is asked. Issues at most two oracle calls; errors
    /// from either are returned unchanged.
    pub async fn resolve_leg(
        &self,
        from: &Stop,
        to: &Stop,
        earliest_departure: Option<Timestamp>,
    ) -> Result<LegResult, OracleError> {
        let bound = earliest_departure.map(|t| t + self.config.transfer_buffer());
        self.resolve_leg_departing(from, to, bound).await
    }

    /// Resolve the leg `from -> to` departing no earlier than `departure`.
    ///
    /// The time goes to the oracle as given, without a transfer buffer.
    pub async fn resolve_leg_departing(
        &self,
        from: &Stop,
        to: &Stop,
        departure: Option<Timestamp>,
    ) -> Result<LegResult, OracleError> {
        debug!(%from, %to, ?departure, "resolving leg");

        let itineraries = self.oracle.search_leg(&from.id, &to.id, departure).await?;
        let heads = head_segments(&itineraries);

        if heads.iter().any(|s| s.reaches(&to.id)) {
            let direct_options = group(heads.iter().filter(|s| s.reaches(&to.id)));
            debug!(options = direct_options.len(), "direct connection");
            return Ok(LegResult {
                direct_options,
                has_direct_connection: true,
                intermediate_stop: None,
                intermediate_options: Vec::new(),
            });
        }

        let Some(intermediate) = first_change(&heads, from) else {
            info!(%from, %to, "no connection");
            return Ok(LegResult::no_connection());
        };

        debug!(%intermediate, "no direct connection, splitting");
        let itineraries = self
            .oracle
            .search_leg(&from.id, &intermediate.id, departure)
            .await?;
        let heads = head_segments(&itineraries);
        let intermediate_options = group(heads.iter().filter(|s| s.reaches(&intermediate.id)));

        Ok(LegResult {
            direct_options: Vec::new(),
            has_direct_connection: false,
            intermediate_stop: Some(intermediate),
            intermediate_options,
        })
    }
}

/// The destination of the best-ranked head segment that leaves `from`.
fn first_change(heads: &[CleanedSegment], from: &Stop) -> Option<Stop> {
    heads
        .iter()
        .filter_map(|s| s.leg.destination.as_ref())
        .find(|d| !d.same_stop(from))
        .cloned()
}
