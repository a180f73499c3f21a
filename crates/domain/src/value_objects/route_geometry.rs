//! Route polyline value object

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Ordered polyline from origin to destination
///
/// Empty until a route has been computed. Always replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometry {
    points: Vec<Coordinate>,
    /// Route length in meters, when the planner reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    distance_m: Option<f64>,
    /// Expected travel time in seconds, when the planner reports it
    #[serde(default, skip_serializing_if = "Option::is_none")]
    duration_s: Option<f64>,
}

impl RouteGeometry {
    /// An empty route
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            points: Vec::new(),
            distance_m: None,
            duration_s: None,
        }
    }

    /// Create a route from latitude-first points
    #[must_use]
    pub const fn new(points: Vec<Coordinate>) -> Self {
        Self {
            points,
            distance_m: None,
            duration_s: None,
        }
    }

    /// Attach distance and duration reported by the route planner
    #[must_use]
    pub const fn with_summary(mut self, distance_m: f64, duration_s: f64) -> Self {
        self.distance_m = Some(distance_m);
        self.duration_s = Some(duration_s);
        self
    }

    /// Points of the polyline in travel order
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the route has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Route length in meters
    #[must_use]
    pub const fn distance_m(&self) -> Option<f64> {
        self.distance_m
    }

    /// Expected travel time in seconds
    #[must_use]
    pub const fn duration_s(&self) -> Option<f64> {
        self.duration_s
    }
}
