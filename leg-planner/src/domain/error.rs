//! Domain error types.
//!
//! These errors represent validation failures in the domain layer. They are
//! distinct from oracle/IO errors.

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A stop identifier was empty or whitespace
    #[error("stop id must not be empty")]
    EmptyStopId,

    /// A route needs an origin and a destination
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),

    /// The oracle reported a product outside the known set
    #[error("unknown transit product: {0}")]
    UnknownProduct(String),
}
