//! Application state for the web layer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::sync::Mutex;

use crate::cache::CachedOracle;
use crate::oracle::HttpOracle;
use crate::plan::PlanState;
use crate::resolver::ResolverConfig;

/// How long an untouched plan session survives.
pub const SESSION_IDLE: Duration = Duration::from_secs(60 * 60);

const MAX_SESSIONS: u64 = 10_000;

/// A plan session. The lock is held across a whole transition, so requests
/// against one session run one at a time.
pub type Session = Arc<Mutex<PlanState>>;

/// Plan sessions keyed by numeric id.
#[derive(Clone)]
pub struct Sessions {
    plans: MokaCache<u64, Session>,
    next_id: Arc<AtomicU64>,
}

impl Sessions {
    pub fn new(idle: Duration) -> Self {
        Self {
            plans: MokaCache::builder()
                .max_capacity(MAX_SESSIONS)
                .time_to_idle(idle)
                .build(),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Store a new plan and return its id.
    pub async fn insert(&self, state: PlanState) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.plans.insert(id, Arc::new(Mutex::new(state))).await;
        id
    }

    pub async fn get(&self, id: u64) -> Option<Session> {
        self.plans.get(&id).await
    }
}

impl Default for Sessions {
    fn default() -> Self {
        Self::new(SESSION_IDLE)
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Cached journey oracle client
    pub oracle: Arc<CachedOracle<HttpOracle>>,

    /// Leg resolution configuration
    pub resolver: Arc<ResolverConfig>,

    /// Open plan sessions
    pub sessions: Sessions,
}

impl AppState {
    /// Create a new app state.
    pub fn new(oracle: CachedOracle<HttpOracle>, resolver: ResolverConfig) -> Self {
        Self {
            oracle: Arc::new(oracle),
            resolver: Arc::new(resolver),
            sessions: Sessions::default(),
        }
    }
}
