//! Straight-line route adapter
//!
//! Answers every route request with the two-point line from origin to
//! destination. Needs no network.

use application::RoutePort;
use async_trait::async_trait;
use domain::{Coordinate, NavigationError, RouteGeometry};

/// Route planner that draws a straight line
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectRouteAdapter;

impl DirectRouteAdapter {
    /// Create a new direct route adapter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoutePort for DirectRouteAdapter {
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteGeometry, NavigationError> {
        Ok(RouteGeometry::new(vec![origin, destination]))
    }
}
