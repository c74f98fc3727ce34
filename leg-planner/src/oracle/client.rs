//! HTTP client for a `transport.rest` journey API.
//!
//! Provides async methods for single-leg journey search and stop search.
//! Handles request shaping, concurrency limiting, and conversion into
//! normalized itineraries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{StopId, Timestamp};

use super::JourneyOracle;
use super::convert::{Itinerary, StopMatch, convert_journeys, convert_locations};
use super::error::OracleError;
use super::types::{JourneysResponse, RawLocation};

/// Default base URL (BVG instance of `transport.rest`).
pub const DEFAULT_BASE_URL: &str = "https://v6.bvg.transport.rest";

/// Default number of itineraries requested per search.
pub const DEFAULT_RESULTS: u8 = 8;

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Number of stop search results requested.
const STOP_SEARCH_RESULTS: u8 = 10;

/// Queries shorter than this are not sent to the oracle.
const MIN_QUERY_LEN: usize = 2;

/// Configuration for the oracle client.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    /// Base URL of the API
    pub base_url: String,
    /// Itineraries requested per journey search
    pub results: u8,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OracleConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            results: DEFAULT_RESULTS,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set the number of itineraries per search.
    pub fn with_results(mut self, n: u8) -> Self {
        self.results = n;
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// Journey oracle HTTP client.
///
/// Uses a semaphore to limit concurrent requests so a burst of planning
/// sessions doesn't trip the public instance's rate limit.
#[derive(Debug, Clone)]
pub struct HttpOracle {
    http: reqwest::Client,
    base_url: String,
    results: u8,
    semaphore: Arc<Semaphore>,
}

impl HttpOracle {
    /// Create a new client with the given configuration.
    pub fn new(config: OracleConfig) -> Result<Self, OracleError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            results: config.results,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Search itineraries for one leg.
    ///
    /// Returns an empty list when the oracle finds nothing.
    pub async fn search_journeys(
        &self,
        from: &StopId,
        to: &StopId,
        earliest_departure: Option<Timestamp>,
    ) -> Result<Vec<Itinerary>, OracleError> {
        let url = format!("{}/journeys", self.base_url);
        let query = journey_query(from, to, self.results, earliest_departure);

        let response: JourneysResponse = self.get_json(&url, &query).await?;
        let itineraries = convert_journeys(response);

        debug!(
            %from, %to, found = itineraries.len(),
            "journey search"
        );
        Ok(itineraries)
    }

    /// Search stops and stations by name.
    pub async fn search_stops(&self, query: &str) -> Result<Vec<StopMatch>, OracleError> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Ok(Vec::new());
        }

        let url = format!("{}/locations", self.base_url);
        let params = vec![
            ("query", query.to_string()),
            ("results", STOP_SEARCH_RESULTS.to_string()),
            ("stops", "true".to_string()),
            ("addresses", "false".to_string()),
            ("poi", "false".to_string()),
        ];

        let locations: Vec<RawLocation> = self.get_json(&url, &params).await?;
        Ok(convert_locations(locations))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, OracleError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OracleError::Setup("semaphore closed".to_string()))?;

        let response = self.http.get(url).query(query).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::Status {
                status: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| OracleError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}

impl JourneyOracle for HttpOracle {
    async fn search_leg(
        &self,
        from: &StopId,
        to: &StopId,
        earliest_departure: Option<Timestamp>,
    ) -> Result<Vec<Itinerary>, OracleError> {
        self.search_journeys(from, to, earliest_departure).await
    }
}

/// Query parameters for `GET /journeys`.
fn journey_query(
    from: &StopId,
    to: &StopId,
    results: u8,
    earliest_departure: Option<Timestamp>,
) -> Vec<(&'static str, String)> {
    let mut query = vec![
        ("from", from.as_str().to_string()),
        ("to", to.as_str().to_string()),
        ("results", results.to_string()),
        ("stopovers", "true".to_string()),
        ("remarks", "false".to_string()),
    ];
    if let Some(departure) = earliest_departure {
        query.push(("departure", departure.to_rfc3339()));
    }
    query
}
