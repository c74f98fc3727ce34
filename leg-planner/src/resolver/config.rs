//! Resolver configuration.

use chrono::Duration;

/// Default minimum time between arriving somewhere and boarding again.
pub const DEFAULT_TRANSFER_BUFFER_MINS: u32 = 5;

/// Configuration parameters for leg resolution.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minutes added to a given earliest departure before asking the oracle,
    /// so the traveler has time to change vehicles.
    pub transfer_buffer_mins: u32,
}

impl ResolverConfig {
    pub fn new(transfer_buffer_mins: u32) -> Self {
        Self {
            transfer_buffer_mins,
        }
    }

    /// Returns the transfer buffer as a Duration.
    pub fn transfer_buffer(&self) -> Duration {
        Duration::minutes(i64::from(self.transfer_buffer_mins))
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TRANSFER_BUFFER_MINS)
    }
}
