//! Route adapter - Implements RoutePort using the OSRM client

use application::RoutePort;
use async_trait::async_trait;
use domain::{Coordinate, NavigationError, RouteGeometry};
use integration_osm::{OsrmConfig, OsrmRoutingClient, Route, RoutingClient, RoutingError};
use tracing::{debug, instrument};

/// Adapter for road routing via OSRM
#[derive(Debug)]
pub struct OsrmRouteAdapter {
    client: OsrmRoutingClient,
}

impl OsrmRouteAdapter {
    /// Create a new route adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        Ok(Self::from_client(OsrmRoutingClient::new(config)?))
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn from_client(client: OsrmRoutingClient) -> Self {
        Self { client }
    }

    /// Convert the longitude-first GeoJSON line into a latitude-first polyline
    fn to_geometry(route: &Route) -> Result<RouteGeometry, NavigationError> {
        let points = route
            .geometry
            .coordinates
            .iter()
            .map(|[lon, lat]| Coordinate::from_lon_lat(*lon, *lat))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| NavigationError::network(format!("Route geometry rejected: {e}")))?;
        let geometry = RouteGeometry::new(points);
        Ok(match (route.distance, route.duration) {
            (Some(distance), Some(duration)) => geometry.with_summary(distance, duration),
            _ => geometry,
        })
    }
}

fn map_error(err: RoutingError, origin: Coordinate, destination: Coordinate) -> NavigationError {
    match err {
        RoutingError::NoRoutesFound { .. } => NavigationError::no_route(origin, destination),
        other => NavigationError::network(other.to_string()),
    }
}

#[async_trait]
impl RoutePort for OsrmRouteAdapter {
    #[instrument(skip(self), fields(from = %origin, to = %destination))]
    async fn compute_route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<RouteGeometry, NavigationError> {
        let route = self
            .client
            .route(
                origin.latitude(),
                origin.longitude(),
                destination.latitude(),
                destination.longitude(),
            )
            .await
            .map_err(|e| map_error(e, origin, destination))?;

        let geometry = Self::to_geometry(&route)?;
        if geometry.is_empty() {
            return Err(NavigationError::no_route(origin, destination));
        }
        debug!(points = geometry.len(), "Route converted");
        Ok(geometry)
    }
}

#[cfg(test)]
mod tests {
    use integration_osm::RouteGeometryJson;

    use super::*;

    fn route(coordinates: Vec<[f64; 2]>) -> Route {
        Route {
            distance: Some(1830.5),
            duration: Some(240.0),
            geometry: RouteGeometryJson { coordinates },
        }
    }

    #[test]
    fn geometry_is_latitude_first() {
        let geometry =
            OsrmRouteAdapter::to_geometry(&route(vec![[37.62, 55.75], [37.60, 55.76]])).unwrap();
        assert_eq!(
            geometry.points(),
            &[
                Coordinate::new_unchecked(55.75, 37.62),
                Coordinate::new_unchecked(55.76, 37.60),
            ]
        );
        assert_eq!(geometry.distance_m(), Some(1830.5));
        assert_eq!(geometry.duration_s(), Some(240.0));
    }

    #[test]
    fn summary_needs_distance_and_duration() {
        let mut partial = route(vec![[37.62, 55.75], [37.60, 55.76]]);
        partial.duration = None;
        let geometry = OsrmRouteAdapter::to_geometry(&partial).unwrap();
        assert_eq!(geometry.len(), 2);
        assert!(geometry.distance_m().is_none());
        assert!(geometry.duration_s().is_none());
    }

    #[test]
    fn out_of_range_geometry_is_rejected() {
        let err = OsrmRouteAdapter::to_geometry(&route(vec![[37.62, 95.0]])).unwrap_err();
        assert!(matches!(err, NavigationError::Network(_)));
    }

    #[test]
    fn no_routes_maps_to_no_route_found() {
        let origin = Coordinate::new_unchecked(55.75, 37.61);
        let destination = Coordinate::new_unchecked(40.7, -74.0);
        let err = map_error(
            RoutingError::NoRoutesFound {
                from: "a".to_string(),
                to: "b".to_string(),
            },
            origin,
            destination,
        );
        assert_eq!(err, NavigationError::no_route(origin, destination));
    }

    #[test]
    fn other_failures_map_to_network() {
        let origin = Coordinate::new_unchecked(55.75, 37.61);
        let err = map_error(RoutingError::Timeout { timeout_secs: 10 }, origin, origin);
        assert!(matches!(err, NavigationError::Network(_)));
    }
}
