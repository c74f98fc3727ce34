//! Head segments: the first vehicle ride of each itinerary.

use crate::domain::StopId;
use crate::oracle::{Itinerary, ItineraryLeg};

/// The first transit leg of an itinerary, with only genuine halts kept.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSegment {
    pub leg: ItineraryLeg,
    /// Refresh token of the itinerary this segment was taken from.
    pub refresh_token: Option<String>,
}

impl CleanedSegment {
    /// Take the head segment of an itinerary, skipping leading walks.
    ///
    /// Returns `None` for itineraries that never board a vehicle.
    pub fn head_of(itinerary: &Itinerary) -> Option<Self> {
        let mut leg = itinerary.legs.iter().find(|l| l.is_transit())?.clone();
        leg.stopovers.retain(|s| s.is_halt());
        Some(Self {
            leg,
            refresh_token: itinerary.refresh_token.clone(),
        })
    }

    /// Returns true if this segment ends at the given stop.
    pub fn reaches(&self, stop: &StopId) -> bool {
        self.leg.destination.as_ref().is_some_and(|d| &d.id == stop)
    }
}

/// Head segments of all itineraries, in oracle rank order.
pub fn head_segments(itineraries: &[Itinerary]) -> Vec<CleanedSegment> {
    itineraries.iter().filter_map(CleanedSegment::head_of).collect()
}
