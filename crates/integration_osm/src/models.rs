//! OSM service data models

use serde::{Deserialize, Serialize};

/// A forward-geocoding candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Provider place identifier
    pub id: String,
    /// Full display label
    pub label: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// One OSRM route alternative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Length in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Expected travel time in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    /// GeoJSON line geometry
    pub geometry: RouteGeometryJson,
}

/// GeoJSON `LineString` as returned with `geometries=geojson`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteGeometryJson {
    /// `[longitude, latitude]` pairs, longitude first
    pub coordinates: Vec<[f64; 2]>,
}

impl Route {
    /// Polyline points as `(latitude, longitude)` pairs
    #[must_use]
    pub fn lat_lon_points(&self) -> Vec<(f64, f64)> {
        self.geometry
            .coordinates
            .iter()
            .map(|[lon, lat]| (*lat, *lon))
            .collect()
    }
}

/// Raw OSRM `/route` response
#[derive(Debug, Deserialize)]
pub(crate) struct RouteResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<Route>,
}
