//! Planned routes: origin, traveler-chosen stopovers, destination.

use serde::{Deserialize, Serialize};

use super::{DomainError, Stop};

/// A point the traveler wants to pass through, with time spent there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutePoint {
    pub stop: Stop,
    /// Minutes the traveler stays before continuing.
    #[serde(default)]
    pub dwell_minutes: u32,
}

impl RoutePoint {
    pub fn new(stop: Stop, dwell_minutes: u32) -> Self {
        Self {
            stop,
            dwell_minutes,
        }
    }

    /// A point with no dwell (origin or destination).
    pub fn endpoint(stop: Stop) -> Self {
        Self::new(stop, 0)
    }
}

/// An ordered route of at least two points.
///
/// The first and last points never carry dwell time; this is enforced at
/// construction, so code holding a `Route` can index `0` and `len() - 1`
/// without checking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<RoutePoint>", into = "Vec<RoutePoint>")]
pub struct Route {
    points: Vec<RoutePoint>,
}

impl Route {
    /// Build a route from its endpoints and the stopovers in between.
    pub fn new(origin: Stop, stopovers: Vec<RoutePoint>, destination: Stop) -> Self {
        let mut points = Vec::with_capacity(stopovers.len() + 2);
        points.push(RoutePoint::endpoint(origin));
        points.extend(stopovers);
        points.push(RoutePoint::endpoint(destination));
        Self { points }
    }

    /// Build a route from a full point list.
    ///
    /// Dwell on the first and last point is reset to zero.
    pub fn from_points(mut points: Vec<RoutePoint>) -> Result<Self, DomainError> {
        if points.len() < 2 {
            return Err(DomainError::InvalidRoute(
                "needs at least an origin and a destination",
            ));
        }
        if let Some(first) = points.first_mut() {
            first.dwell_minutes = 0;
        }
        if let Some(last) = points.last_mut() {
            last.dwell_minutes = 0;
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    /// Number of points, always at least 2.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn origin(&self) -> &Stop {
        &self.points[0].stop
    }

    pub fn destination(&self) -> &Stop {
        &self.points[self.points.len() - 1].stop
    }

    /// Number of segments `route[i] -> route[i + 1]`.
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// The point a segment ends at, if the segment exists.
    pub fn segment_end(&self, segment: usize) -> Option<&RoutePoint> {
        if segment < self.segment_count() {
            self.points.get(segment + 1)
        } else {
            None
        }
    }

    /// Returns true if the given segment ends at the final destination.
    pub fn is_last_segment(&self, segment: usize) -> bool {
        segment + 1 == self.segment_count()
    }
}

impl TryFrom<Vec<RoutePoint>> for Route {
    type Error = DomainError;

    fn try_from(points: Vec<RoutePoint>) -> Result<Self, Self::Error> {
        Self::from_points(points)
    }
}

impl From<Route> for Vec<RoutePoint> {
    fn from(route: Route) -> Self {
        route.points
    }
}
