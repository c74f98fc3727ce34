//! Leg-by-leg transit journey planner.
//!
//! A traveler builds a journey one ride at a time: for each leg the server
//! asks a journey oracle for ranked itineraries, keeps only the first
//! vehicle ride of each, and offers those rides grouped by line. Legs that
//! need a change are split at the best-ranked itinerary's first transfer.

pub mod cache;
pub mod config;
pub mod domain;
pub mod oracle;
pub mod plan;
pub mod resolver;
pub mod web;

#[cfg(test)]
mod testing;
