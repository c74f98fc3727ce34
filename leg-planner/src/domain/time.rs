//! Timestamp handling for oracle data.
//!
//! The oracle sends ISO 8601 timestamps with the local UTC offset of the
//! stop (`2024-03-15T10:00:00+01:00`). We keep that offset so that
//! formatted times read the way they do on the platform display.

use chrono::{DateTime, Duration, FixedOffset};

/// A point in time with the offset the oracle reported it in.
pub type Timestamp = DateTime<FixedOffset>;

/// Error returned when parsing an invalid timestamp string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid timestamp {input:?}: {reason}")]
pub struct TimeError {
    input: String,
    reason: String,
}

/// Parse an RFC 3339 timestamp.
///
/// # Examples
///
/// ```
/// use leg_planner::domain::{format_hhmm, parse_timestamp};
///
/// let ts = parse_timestamp("2024-03-15T10:07:00+01:00").unwrap();
/// assert_eq!(format_hhmm(&ts), "10:07");
///
/// assert!(parse_timestamp("10:07").is_err());
/// ```
pub fn parse_timestamp(s: &str) -> Result<Timestamp, TimeError> {
    DateTime::parse_from_rfc3339(s).map_err(|e| TimeError {
        input: s.to_string(),
        reason: e.to_string(),
    })
}

/// Render the wall-clock time as `HH:MM` in the timestamp's own offset.
///
/// This rendering is also the deduplication key for departures, so two
/// departures that differ only in seconds collapse into one.
pub fn format_hhmm(ts: &Timestamp) -> String {
    ts.format("%H:%M").to_string()
}

/// Whole minutes from `departure` to `arrival`, rounded half up.
pub fn minutes_between(departure: &Timestamp, arrival: &Timestamp) -> i64 {
    let millis = arrival.signed_duration_since(*departure).num_milliseconds();
    (millis + 30_000).div_euclid(60_000)
}

/// Shift a timestamp forward by a number of minutes.
pub fn add_minutes(ts: &Timestamp, minutes: u32) -> Timestamp {
    *ts + Duration::minutes(i64::from(minutes))
}
