//! OpenStreetMap service clients for Wayfarer
//!
//! Provides forward and reverse geocoding via
//! [Nominatim](https://nominatim.openstreetmap.org) and road routing via the
//! [OSRM](https://project-osrm.org) HTTP API.
//!
//! # Architecture
//!
//! Both clients are stateless request/response wrappers: every call is
//! independent, nothing is cached, deduplicated, or cancelled here. Callers
//! that need staleness handling do it themselves.
//!
//! [`GeocodingClient`] is implemented by [`NominatimGeocodingClient`];
//! [`RoutingClient`] by [`OsrmRoutingClient`].
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_osm::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let route = client.route(55.75, 37.61, 55.76, 37.60).await?;
//! println!("{} points, {:.0} m", route.geometry.coordinates.len(), route.distance.unwrap_or_default());
//! ```

mod config;
mod error;
mod geocoding;
mod models;
mod routing;

pub use config::OsrmConfig;
pub use error::RoutingError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient};
pub use models::{Place, Route, RouteGeometryJson};
pub use routing::{OsrmRoutingClient, RoutingClient};
