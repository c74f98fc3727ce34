use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use leg_planner::cache::{CacheConfig, CachedOracle};
use leg_planner::config::ServerConfig;
use leg_planner::oracle::HttpOracle;
use leg_planner::web::{AppState, create_router};

const DEFAULT_LOG_FILTER: &str = "leg_planner=info,tower_http=info";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let oracle = match HttpOracle::new(config.oracle()) {
        Ok(oracle) => oracle,
        Err(e) => {
            error!("failed to create oracle client: {e}");
            return ExitCode::FAILURE;
        }
    };
    let cached = CachedOracle::new(oracle, &CacheConfig::default());

    let state = AppState::new(cached, config.resolver());
    let app = create_router(state);

    let addr = config.addr();
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("failed to bind {addr}: {e}");
            return ExitCode::FAILURE;
        }
    };

    info!(oracle = %config.oracle_base_url, "leg planner listening on http://{addr}");
    info!("  GET  /api/health             - Health check");
    info!("  GET  /api/stops/search       - Search stops by name");
    info!("  GET  /api/journeys/leg       - Options for one leg");
    info!("  GET  /api/journeys/next-leg  - Options after an arrival");
    info!("  POST /api/plans              - Start a plan");

    if let Err(e) = axum::serve(listener, app).await {
        error!("server error: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
