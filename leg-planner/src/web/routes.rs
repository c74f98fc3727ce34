//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::domain::{DomainError, Route, Stop, StopId, TimeError, Timestamp, parse_timestamp};
use crate::oracle::{JourneyOracle, OracleError};
use crate::plan::{PlanError, PlanState, Planner};
use crate::resolver::{LegResolver, ResolverConfig};

use super::dto::*;
use super::state::{AppState, Session};

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/stops/search", get(search_stops))
        .route("/api/journeys/leg", get(resolve_leg))
        .route("/api/journeys/next-leg", get(resolve_next_leg))
        .route("/api/plans", post(create_plan))
        .route("/api/plans/:id", get(get_plan))
        .route("/api/plans/:id/select", post(select_time))
        .route("/api/plans/:id/edit", post(edit_leg))
        .route("/api/plans/:id/restart", post(restart_plan))
        .route("/api/plans/:id/retry", post(retry_plan))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK" })
}

/// Search stops by name.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<StopSearchResponse>, AppError> {
    let stops = state.oracle.inner().search_stops(&req.query).await?;
    Ok(Json(StopSearchResponse { stops }))
}

/// Resolve a leg departing now, or after `departure` when given.
async fn resolve_leg(
    State(state): State<AppState>,
    Query(req): Query<LegQuery>,
) -> Result<Json<LegResponse>, AppError> {
    let response = leg_response(state.oracle.as_ref(), state.resolver.as_ref(), req).await?;
    Ok(Json(response))
}

/// Resolve the leg after arriving at `from`.
async fn resolve_next_leg(
    State(state): State<AppState>,
    Query(req): Query<NextLegQuery>,
) -> Result<Json<LegResponse>, AppError> {
    let response = next_leg_response(state.oracle.as_ref(), state.resolver.as_ref(), req).await?;
    Ok(Json(response))
}

async fn leg_response<O: JourneyOracle>(
    oracle: &O,
    config: &ResolverConfig,
    req: LegQuery,
) -> Result<LegResponse, AppError> {
    let from = query_stop(required("from", req.from)?.as_str())?;
    let to = query_stop(required("to", req.to)?.as_str())?;
    let departure = req.departure.as_deref().map(query_time).transpose()?;

    let resolver = LegResolver::new(oracle, config);
    let result = resolver.resolve_leg_departing(&from, &to, departure).await?;
    Ok(LegResponse::from_result(&result))
}

async fn next_leg_response<O: JourneyOracle>(
    oracle: &O,
    config: &ResolverConfig,
    req: NextLegQuery,
) -> Result<LegResponse, AppError> {
    let from = query_stop(required("from", req.from)?.as_str())?;
    let to = query_stop(required("to", req.to)?.as_str())?;
    let arrival = query_time(required("arrival", req.arrival)?.as_str())?;

    let resolver = LegResolver::new(oracle, config);
    let result = resolver.resolve_leg(&from, &to, Some(arrival)).await?;
    Ok(LegResponse::from_result(&result))
}

/// Start a plan and resolve its first leg.
async fn create_plan(
    State(state): State<AppState>,
    Json(req): Json<CreatePlanRequest>,
) -> Result<(StatusCode, Json<PlanResponse>), AppError> {
    let (origin, stopovers, destination) = req.into_parts()?;
    let route = Route::new(origin, stopovers, destination);

    let planner = Planner::new(state.oracle.as_ref(), state.resolver.as_ref());
    let plan = planner.start(route).await;
    let id = state.sessions.insert(plan.clone()).await;
    info!(id, status = %plan.status(), "plan created");

    Ok((StatusCode::CREATED, Json(PlanResponse::from_state(id, &plan))))
}

async fn get_plan(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let plan = session.lock().await;
    Ok(Json(PlanResponse::from_state(id, &plan)))
}

async fn select_time(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<SelectTimeRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut plan = session.lock().await;

    let planner = Planner::new(state.oracle.as_ref(), state.resolver.as_ref());
    let next = planner
        .select(plan.clone(), req.option_index, req.time_index)
        .await?;
    Ok(Json(store(id, &mut plan, next)))
}

async fn edit_leg(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(req): Json<EditLegRequest>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut plan = session.lock().await;

    let planner = Planner::new(state.oracle.as_ref(), state.resolver.as_ref());
    let next = planner.edit_leg(plan.clone(), req.leg_index).await?;
    Ok(Json(store(id, &mut plan, next)))
}

async fn restart_plan(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut plan = session.lock().await;

    let planner = Planner::new(state.oracle.as_ref(), state.resolver.as_ref());
    let next = planner.restart(plan.clone()).await;
    Ok(Json(store(id, &mut plan, next)))
}

async fn retry_plan(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<PlanResponse>, AppError> {
    let session = find_session(&state, id).await?;
    let mut plan = session.lock().await;

    let planner = Planner::new(state.oracle.as_ref(), state.resolver.as_ref());
    let next = planner.retry(plan.clone()).await?;
    Ok(Json(store(id, &mut plan, next)))
}

fn required(name: &str, value: Option<String>) -> Result<String, AppError> {
    value.ok_or_else(|| AppError::BadRequest {
        message: format!("missing query parameter {name}"),
    })
}

fn query_stop(id: &str) -> Result<Stop, AppError> {
    Ok(Stop::unnamed(StopId::parse(id)?))
}

fn query_time(s: &str) -> Result<Timestamp, AppError> {
    // An unencoded `+` offset arrives as a space.
    Ok(parse_timestamp(&s.replace(' ', "+"))?)
}

async fn find_session(state: &AppState, id: u64) -> Result<Session, AppError> {
    state.sessions.get(id).await.ok_or_else(|| AppError::NotFound {
        message: format!("no plan with id {id}"),
    })
}

fn store(id: u64, slot: &mut PlanState, next: PlanState) -> PlanResponse {
    *slot = next;
    PlanResponse::from_state(id, slot)
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    /// The request is well-formed but the plan is in the wrong state for it.
    Conflict { message: String },
    BadGateway { message: String },
    Internal { message: String },
}

impl From<OracleError> for AppError {
    fn from(e: OracleError) -> Self {
        AppError::BadGateway {
            message: e.to_string(),
        }
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<TimeError> for AppError {
    fn from(e: TimeError) -> Self {
        AppError::BadRequest {
            message: e.to_string(),
        }
    }
}

impl From<PlanError> for AppError {
    fn from(e: PlanError) -> Self {
        let message = e.to_string();
        match e {
            PlanError::NotChoosing { .. } | PlanError::NotRetryable { .. } => {
                AppError::Conflict { message }
            }
            PlanError::SegmentOutOfRange { .. } => AppError::Internal { message },
            PlanError::UnknownOption { .. }
            | PlanError::UnknownTime { .. }
            | PlanError::OptionNotOffered { .. }
            | PlanError::UnknownSlot { .. }
            | PlanError::LegIndexOutOfRange { .. } => AppError::BadRequest { message },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Conflict { message } => (StatusCode::CONFLICT, message),
            AppError::BadGateway { message } => (StatusCode::BAD_GATEWAY, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        if status.is_server_error() {
            error!(%status, "{message}");
        } else {
            warn!(%status, "{message}");
        }

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
