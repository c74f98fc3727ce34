//! Unit tests for the plan state machine.

use super::*;
use crate::domain::{Product, RoutePoint, TimeSlot};
use crate::plan::Planner;
use crate::resolver::ResolverConfig;
use crate::testing::{ScriptedOracle, at, itinerary, ride, stop};

/// Answer `from -> to` with one direct line at the given times.
fn direct(oracle: &ScriptedOracle, from: &str, to: &str, line: &str, times: &[(&str, &str)]) {
    let itineraries = times
        .iter()
        .map(|(dep, arr)| itinerary(vec![ride(Product::Suburban, line, from, to, dep, arr)]))
        .collect();
    oracle.answer(from, to, itineraries);
}

/// A -> M (15 min dwell) -> D
fn stopover_route() -> Route {
    Route::new(stop("A"), vec![RoutePoint::new(stop("M"), 15)], stop("D"))
}

/// A -> M (10 min) -> N (20 min) -> D
fn long_route() -> Route {
    Route::new(
        stop("A"),
        vec![RoutePoint::new(stop("M"), 10), RoutePoint::new(stop("N"), 20)],
        stop("D"),
    )
}

fn long_route_oracle() -> ScriptedOracle {
    let oracle = ScriptedOracle::new();
    direct(&oracle, "A", "M", "S1", &[("09:00", "09:20"), ("09:30", "09:50")]);
    direct(&oracle, "M", "N", "S2", &[("09:40", "10:00"), ("10:10", "10:30")]);
    direct(&oracle, "N", "D", "S3", &[("10:30", "10:50"), ("11:00", "11:20")]);
    oracle
}

async fn three_legs(planner: &Planner<'_, ScriptedOracle>) -> PlanState {
    let state = planner.start(long_route()).await;
    let state = planner.select(state, 0, 0).await.unwrap();
    let state = planner.select(state, 0, 0).await.unwrap();
    planner.select(state, 0, 0).await.unwrap()
}

#[test]
fn start_issues_one_request_from_origin() {
    let (state, request) = PlanState::start(stopover_route());

    assert_eq!(request.from, stop("A"));
    assert_eq!(request.to, stop("M"));
    assert_eq!(request.earliest_departure, None);
    assert_eq!(request.epoch, state.epoch());
    assert_eq!(state.status(), &PlanStatus::Resolving);
    assert_eq!(state.cursor_index(), 0);
    assert!(state.committed_legs().is_empty());
    assert_eq!(state.last_request(), Some(&request));
}

#[tokio::test]
async fn start_resolves_first_leg() {
    let oracle = ScriptedOracle::new();
    direct(&oracle, "A", "M", "S5", &[("10:00", "10:07")]);
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(stopover_route()).await;

    assert_eq!(oracle.call_count(), 1);
    assert_eq!(state.status(), &PlanStatus::Choosing);
    assert_eq!(state.current_to(), Some(&stop("M")));
    assert_eq!(state.options().len(), 1);
    assert_eq!(state.options()[0].times[0].duration_minutes, 7);
}

#[tokio::test]
async fn dwell_at_stopover_delays_next_leg() {
    let oracle = ScriptedOracle::new();
    direct(&oracle, "A", "M", "S5", &[("10:00", "10:07")]);
    let config = ResolverConfig::new(5);
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(stopover_route()).await;
    let state = planner.select(state, 0, 0).await.unwrap();

    let request = state.last_request().unwrap();
    assert_eq!(request.from, stop("M"));
    assert_eq!(request.to, stop("D"));
    assert_eq!(request.earliest_departure, Some(at("10:22")));
    assert_eq!(state.last_arrival(), Some(at("10:22")));
    assert_eq!(state.cursor_index(), 1);

    // The oracle sees the transfer buffer on top.
    assert_eq!(oracle.calls()[1].earliest_departure, Some(at("10:27")));
}

#[tokio::test]
async fn reaching_destination_completes() {
    let oracle = ScriptedOracle::new();
    direct(&oracle, "A", "M", "S5", &[("10:00", "10:07")]);
    direct(&oracle, "M", "D", "U2", &[("10:30", "10:45")]);
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(stopover_route()).await;
    let state = planner.select(state, 0, 0).await.unwrap();
    let state = planner.select(state, 0, 0).await.unwrap();

    assert!(state.is_complete());
    assert_eq!(state.committed_legs().len(), 2);
    assert_eq!(state.last_arrival(), Some(at("10:45")));
    assert!(state.options().is_empty());
    assert_eq!(oracle.call_count(), 2);

    let legs = state.committed_legs();
    assert_eq!((&legs[0].from, &legs[0].to), (&stop("A"), &stop("M")));
    assert_eq!((&legs[1].from, &legs[1].to), (&stop("M"), &stop("D")));
    assert_eq!(legs[1].route_segment, 1);

    let err = planner.select(state, 0, 0).await.unwrap_err();
    assert_eq!(err, PlanError::NotChoosing { status: "complete" });
}

#[tokio::test]
async fn split_leg_continues_from_intermediate_stop() {
    let oracle = ScriptedOracle::new();
    oracle.answer(
        "A",
        "D",
        vec![itinerary(vec![
            ride(Product::Bus, "100", "A", "X", "10:00", "10:10"),
            ride(Product::Tram, "M4", "X", "D", "10:15", "10:30"),
        ])],
    );
    direct(&oracle, "A", "X", "100", &[("10:00", "10:10")]);
    direct(&oracle, "X", "D", "M4", &[("10:15", "10:30")]);
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let route = Route::new(stop("A"), Vec::new(), stop("D"));
    let state = planner.start(route).await;
    assert_eq!(state.current_to(), Some(&stop("X")));
    assert_eq!(state.intermediate_stops(), &[stop("X")]);

    let state = planner.select(state, 0, 0).await.unwrap();
    assert_eq!(state.cursor_index(), 0);
    assert_eq!(state.current_from(), &stop("X"));
    // No dwell at a split stop.
    assert_eq!(state.last_request().unwrap().earliest_departure, Some(at("10:10")));
    assert_eq!(state.current_to(), Some(&stop("D")));

    let state = planner.select(state, 0, 0).await.unwrap();
    assert!(state.is_complete());
    assert_eq!(state.committed_legs().len(), 2);
    assert!(state.committed_legs().iter().all(|l| l.route_segment == 0));
}

#[tokio::test]
async fn edit_first_leg_is_restart() {
    let oracle = long_route_oracle();
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = three_legs(&planner).await;
    assert!(state.is_complete());
    assert_eq!(state.committed_legs().len(), 3);

    let mut edited = state.clone();
    let mut restarted = state.clone();
    let edit_request = edited.edit_leg(0).unwrap();
    let restart_request = restarted.restart();

    assert_eq!(edited, restarted);
    assert_eq!(edit_request, restart_request);
    assert!(edited.committed_legs().is_empty());
    assert_eq!(edited.cursor_index(), 0);
    assert_eq!(edited.current_from(), &stop("A"));
    assert_eq!(edit_request.earliest_departure, None);
    assert_eq!(edited.last_arrival(), None);
}

#[tokio::test]
async fn edit_middle_leg_replans_from_its_start() {
    let oracle = long_route_oracle();
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = three_legs(&planner).await;
    let mut state = state;
    let request = state.edit_leg(1).unwrap();

    assert_eq!(state.committed_legs().len(), 1);
    assert_eq!(state.cursor_index(), 1);
    assert_eq!(request.from, stop("M"));
    assert_eq!(request.to, stop("N"));
    // 09:20 arrival at M plus 10 minutes dwell.
    assert_eq!(request.earliest_departure, Some(at("09:30")));
    assert_eq!(state.status(), &PlanStatus::Resolving);
}

#[tokio::test]
async fn replaying_after_edit_is_deterministic() {
    let oracle = long_route_oracle();
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let original = three_legs(&planner).await;

    let edited = planner.edit_leg(original.clone(), 1).await.unwrap();
    assert_eq!(edited.committed_legs(), &original.committed_legs()[..1]);

    let replayed = planner.select(edited, 0, 0).await.unwrap();
    let replayed = planner.select(replayed, 0, 0).await.unwrap();

    assert!(replayed.is_complete());
    assert_eq!(replayed.committed_legs(), original.committed_legs());
}

#[tokio::test]
async fn edit_back_to_split_stop() {
    let oracle = ScriptedOracle::new();
    oracle.answer(
        "A",
        "D",
        vec![itinerary(vec![
            ride(Product::Bus, "100", "A", "X", "10:00", "10:10"),
            ride(Product::Tram, "M4", "X", "D", "10:15", "10:30"),
        ])],
    );
    direct(&oracle, "A", "X", "100", &[("10:00", "10:10")]);
    direct(&oracle, "X", "D", "M4", &[("10:15", "10:30")]);
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(Route::new(stop("A"), Vec::new(), stop("D"))).await;
    let state = planner.select(state, 0, 0).await.unwrap();
    let mut state = planner.select(state, 0, 0).await.unwrap();

    let request = state.edit_leg(1).unwrap();
    assert_eq!(request.from, stop("X"));
    assert_eq!(request.to, stop("D"));
    assert_eq!(request.earliest_departure, Some(at("10:10")));
    assert_eq!(state.cursor_index(), 0);
    assert_eq!(state.intermediate_stops(), &[stop("X")]);
}

#[tokio::test]
async fn edit_out_of_range_leaves_state_unchanged() {
    let oracle = long_route_oracle();
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(long_route()).await;
    let mut state = planner.select(state, 0, 1).await.unwrap();
    let before = state.clone();

    assert_eq!(
        state.edit_leg(1),
        Err(PlanError::LegIndexOutOfRange { index: 1, len: 1 })
    );
    assert_eq!(state, before);
}

#[tokio::test]
async fn retry_never_touches_committed_legs() {
    let oracle = long_route_oracle();
    oracle.fail("M", "N", 503);
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(long_route()).await;
    let mut state = planner.select(state, 0, 0).await.unwrap();
    assert!(matches!(state.status(), PlanStatus::RetryableError(_)));

    let legs = state.committed_legs().to_vec();
    let cursor = state.cursor_index();
    let failed = state.last_request().cloned().unwrap();

    for _ in 0..3 {
        state = planner.retry(state).await.unwrap();
        assert!(matches!(state.status(), PlanStatus::RetryableError(_)));
        assert_eq!(state.committed_legs(), legs.as_slice());
        assert_eq!(state.cursor_index(), cursor);

        let reissued = state.last_request().unwrap();
        assert_eq!(reissued.from, failed.from);
        assert_eq!(reissued.to, failed.to);
        assert_eq!(reissued.earliest_departure, failed.earliest_departure);
        assert!(reissued.epoch > failed.epoch);
    }

    direct(&oracle, "M", "N", "S2", &[("09:40", "10:00")]);
    let state = planner.retry(state).await.unwrap();
    assert_eq!(state.status(), &PlanStatus::Choosing);
    assert_eq!(state.committed_legs(), legs.as_slice());
}

#[tokio::test]
async fn retry_requires_failure() {
    let oracle = long_route_oracle();
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let mut state = planner.start(long_route()).await;
    assert_eq!(
        state.retry(),
        Err(PlanError::NotRetryable { status: "choosing" })
    );

    let (mut resolving, _) = PlanState::start(long_route());
    assert_eq!(
        resolving.retry(),
        Err(PlanError::NotRetryable { status: "resolving" })
    );
}

#[tokio::test]
async fn no_itineraries_is_no_route() {
    let oracle = ScriptedOracle::new();
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(stopover_route()).await;
    assert_eq!(state.status(), &PlanStatus::NoRoute);
    assert!(state.intermediate_stops().is_empty());
    assert!(state.current_to().is_none());

    let mut stuck = state.clone();
    assert_eq!(
        stuck.select_by_index(0, 0),
        Err(PlanError::NotChoosing { status: "noRoute" })
    );
    assert_eq!(stuck, state);

    let restarted = planner.restart(state).await;
    assert_eq!(restarted.status(), &PlanStatus::NoRoute);
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn retry_after_no_route_asks_again() {
    let oracle = long_route_oracle();
    oracle.answer("M", "N", Vec::new());
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(long_route()).await;
    let state = planner.select(state, 0, 0).await.unwrap();
    assert_eq!(state.status(), &PlanStatus::NoRoute);

    let legs = state.committed_legs().to_vec();
    let cursor = state.cursor_index();
    let failed = state.last_request().cloned().unwrap();

    let state = planner.retry(state).await.unwrap();
    assert_eq!(state.status(), &PlanStatus::NoRoute);
    assert_eq!(state.committed_legs(), legs.as_slice());
    assert_eq!(state.cursor_index(), cursor);

    direct(&oracle, "M", "N", "S2", &[("09:40", "10:00")]);
    let state = planner.retry(state).await.unwrap();

    assert_eq!(state.status(), &PlanStatus::Choosing);
    assert_eq!(state.committed_legs(), legs.as_slice());
    assert_eq!(state.cursor_index(), cursor);
    assert_eq!(state.current_to(), Some(&stop("N")));

    let calls = oracle.calls();
    let last = calls.last().unwrap();
    assert_eq!((&last.from, &last.to), (&failed.from.id, &failed.to.id));
    assert_eq!(calls.len(), 4);
}

#[tokio::test]
async fn split_without_rides_records_no_stop() {
    let oracle = ScriptedOracle::new();
    oracle.answer(
        "A",
        "M",
        vec![itinerary(vec![
            ride(Product::Bus, "100", "A", "X", "10:00", "10:10"),
            ride(Product::Tram, "M4", "X", "M", "10:15", "10:30"),
        ])],
    );
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let state = planner.start(stopover_route()).await;

    assert_eq!(state.status(), &PlanStatus::NoRoute);
    assert!(state.intermediate_stops().is_empty());
    assert!(state.current_to().is_none());
    assert!(state.options().is_empty());
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn stale_outcomes_are_ignored() {
    let (mut state, first) = PlanState::start(stopover_route());
    let second = state.restart();

    assert!(!state.apply(&first, Ok(LegResult::no_connection())));
    assert_eq!(state.status(), &PlanStatus::Resolving);

    assert!(state.apply(&second, Ok(LegResult::no_connection())));
    assert_eq!(state.status(), &PlanStatus::NoRoute);

    // Applying the same request twice does nothing.
    assert!(!state.apply(&second, Ok(LegResult::no_connection())));
}

#[tokio::test]
async fn oracle_error_becomes_retryable() {
    let (mut state, request) = PlanState::start(stopover_route());
    let error = crate::oracle::OracleError::Status {
        status: 502,
        message: "bad gateway".into(),
    };

    assert!(state.apply(&request, Err(error)));
    assert!(matches!(state.status(), PlanStatus::RetryableError(m) if m.contains("502")));
    assert!(state.committed_legs().is_empty());
}

#[tokio::test]
async fn select_rejects_unknown_choices() {
    let oracle = ScriptedOracle::new();
    direct(&oracle, "A", "M", "S5", &[("10:00", "10:07")]);
    let config = ResolverConfig::default();
    let planner = Planner::new(&oracle, &config);

    let mut state = planner.start(stopover_route()).await;
    let before = state.clone();

    assert_eq!(
        state.select_by_index(3, 0),
        Err(PlanError::UnknownOption { index: 3 })
    );
    assert_eq!(
        state.select_by_index(0, 5),
        Err(PlanError::UnknownTime { index: 5 })
    );

    let option = state.options()[0].clone();
    let foreign = TimeSlot::new(at("11:00"), at("11:07"));
    assert!(matches!(
        state.select_time(&option, &foreign),
        Err(PlanError::UnknownSlot { .. })
    ));

    let mut other = option.clone();
    other.line = "S9".into();
    assert!(matches!(
        state.select_time(&other, &option.times[0]),
        Err(PlanError::OptionNotOffered { .. })
    ));

    assert_eq!(state, before);
}

#[test]
fn select_while_resolving_is_rejected() {
    let (mut state, _) = PlanState::start(stopover_route());
    assert_eq!(
        state.select_by_index(0, 0),
        Err(PlanError::NotChoosing { status: "resolving" })
    );
}
