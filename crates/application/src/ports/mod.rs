//! Ports - Interfaces to external collaborators
//!
//! Adapters in the infrastructure layer implement these traits.

mod geocode_port;
mod route_port;
mod sensor_port;

#[cfg(test)]
pub use geocode_port::MockGeocodePort;
pub use geocode_port::GeocodePort;
#[cfg(test)]
pub use route_port::MockRoutePort;
pub use route_port::RoutePort;
#[cfg(test)]
pub use sensor_port::MockSensorPort;
pub use sensor_port::{FixStream, PermissionStatus, SensorAccuracy, SensorError, SensorPort, WatchOptions};
