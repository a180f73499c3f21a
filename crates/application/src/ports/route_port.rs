//! Route planner port

use async_trait::async_trait;
use domain::{Coordinate, NavigationError, RouteGeometry};
#[cfg(test)]
use mockall::automock;

/// Port for route computation
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutePort: Send + Sync {
    /// Primary route from `origin` to `destination`, latitude-first
    ///
    /// Fails with `NoRouteFound` when the planner has no route and `Network`
    /// on transport failure.
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteGeometry, NavigationError>;
}
