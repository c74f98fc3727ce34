//! Caching layer for oracle responses.
//!
//! Planning sessions re-issue identical searches often: a retry after a
//! transient failure elsewhere, an edit that replays an earlier leg, or two
//! travelers planning the same trip. A short TTL keeps answers fresh enough
//! for live departures while absorbing those repeats.
//!
//! Earliest-departure times are bucketed to the minute, which is the
//! resolution the oracle works in anyway.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::trace;

use crate::domain::{StopId, Timestamp};
use crate::oracle::{Itinerary, JourneyOracle, OracleError};

/// Cache key for leg searches: (from, to, earliest departure minute).
/// `None` means "departing now".
type LegKey = (StopId, StopId, Option<i64>);

/// Cached search result.
type LegEntry = Arc<Vec<Itinerary>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            max_capacity: 1000,
        }
    }
}

/// Build the cache key for a search.
fn leg_key(from: &StopId, to: &StopId, earliest_departure: Option<Timestamp>) -> LegKey {
    let minute = earliest_departure.map(|t| t.timestamp().div_euclid(60));
    (from.clone(), to.clone(), minute)
}

/// Oracle with caching.
///
/// Wraps any `JourneyOracle` and caches successful search responses.
/// Failures are never cached.
pub struct CachedOracle<O> {
    inner: O,
    legs: MokaCache<LegKey, LegEntry>,
}

impl<O: JourneyOracle> CachedOracle<O> {
    /// Create a new cached oracle.
    pub fn new(inner: O, config: &CacheConfig) -> Self {
        let legs = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, legs }
    }

    /// Access the underlying oracle for operations that bypass the cache.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

impl<O: JourneyOracle> JourneyOracle for CachedOracle<O> {
    async fn search_leg(
        &self,
        from: &StopId,
        to: &StopId,
        earliest_departure: Option<Timestamp>,
    ) -> Result<Vec<Itinerary>, OracleError> {
        let key = leg_key(from, to, earliest_departure);

        if let Some(cached) = self.legs.get(&key).await {
            trace!(%from, %to, "leg search cache hit");
            return Ok(cached.as_ref().clone());
        }

        let itineraries = self.inner.search_leg(from, to, earliest_departure).await?;
        self.legs.insert(key, Arc::new(itineraries.clone())).await;

        Ok(itineraries)
    }
}
