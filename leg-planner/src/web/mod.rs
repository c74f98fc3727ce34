//! Web layer for the leg-by-leg journey planner.
//!
//! Provides JSON endpoints for stop search, single-leg resolution and
//! server-side plan sessions.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, SESSION_IDLE, Session, Sessions};
