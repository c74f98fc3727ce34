//! Leg-by-leg journey planning.
//!
//! A plan walks a traveler's route one leg at a time. For each leg the
//! traveler picks a line and a departure; the arrival (plus any dwell at a
//! stopover) becomes the earliest departure for the next leg. Committed
//! legs can be edited, which discards everything after them.

mod driver;
mod state;

pub use driver::Planner;
pub use state::{LegRequest, PlanError, PlanState, PlanStatus};
