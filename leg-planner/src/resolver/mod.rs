//! Leg resolution.
//!
//! Given a `(from, to)` pair and an optional earliest departure, the
//! resolver asks the oracle for ranked itineraries and reduces them to the
//! single next hop the traveler should choose:
//!
//! 1. Take the head segment (first vehicle ride) of every itinerary
//! 2. If any head segment reaches `to`, offer those as direct options
//! 3. Otherwise split at the best-ranked itinerary's first change and ask
//!    the oracle once more for rides to that stop
//!
//! Options are grouped per line, with times sorted and deduplicated.

mod aggregate;
mod config;
mod resolve;
mod segment;

pub use aggregate::group;
pub use config::{DEFAULT_TRANSFER_BUFFER_MINS, ResolverConfig};
pub use resolve::{LegResolver, LegResult};
pub use segment::{CleanedSegment, head_segments};
