//! Domain types for the leg-by-leg journey planner.
//!
//! All types enforce their invariants at construction time, so code that
//! receives them can trust their validity.

mod error;
mod leg;
mod option;
mod product;
mod route;
mod stop;
mod time;

pub use error::DomainError;
pub use leg::CommittedLeg;
pub use option::{TimeSlot, TransportOption, group_key};
pub use product::Product;
pub use route::{Route, RoutePoint};
pub use stop::{Stop, StopId};
pub use time::{TimeError, Timestamp, add_minutes, format_hhmm, minutes_between, parse_timestamp};
