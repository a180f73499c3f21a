//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod direct_route_adapter;
mod geocode_adapter;
mod replay_sensor;
mod route_adapter;

use std::sync::Arc;

use application::RoutePort;
use integration_osm::RoutingError;

pub use direct_route_adapter::DirectRouteAdapter;
pub use geocode_adapter::NominatimGeocodeAdapter;
pub use replay_sensor::{ReplayError, ReplaySensor, TrackPoint};
pub use route_adapter::OsrmRouteAdapter;

use crate::config::{RoutingAppConfig, RoutingProvider};

/// Build the route port selected by configuration
///
/// # Errors
///
/// Returns an error if the OSRM client cannot be initialized.
pub fn route_port_for(config: &RoutingAppConfig) -> Result<Arc<dyn RoutePort>, RoutingError> {
    Ok(match config.provider {
        RoutingProvider::Osrm => Arc::new(OsrmRouteAdapter::new(&config.osrm)?),
        RoutingProvider::Direct => Arc::new(DirectRouteAdapter::new()),
    })
}
