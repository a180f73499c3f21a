//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean earth radius used for great-circle distances
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 point, latitude first
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

/// Error type for out-of-range coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidCoordinates;

impl fmt::Display for InvalidCoordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid coordinates: latitude must be -90 to 90, longitude must be -180 to 180"
        )
    }
}

impl std::error::Error for InvalidCoordinates {}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if latitude is not in [-90, 90],
    /// longitude is not in [-180, 180], or either value is NaN.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, InvalidCoordinates> {
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(InvalidCoordinates);
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate from a longitude-first pair, as used by GeoJSON
    ///
    /// # Errors
    ///
    /// Returns `InvalidCoordinates` if the swapped values are out of range.
    pub fn from_lon_lat(longitude: f64, latitude: f64) -> Result<Self, InvalidCoordinates> {
        Self::new(latitude, longitude)
    }

    /// Create a coordinate without validation (for trusted constants)
    ///
    /// Caller must ensure latitude is in [-90, 90] and longitude in [-180, 180]
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another coordinate in meters (Haversine)
    #[must_use]
    pub fn distance_m(&self, other: &Self) -> f64 {
        let lat1_rad = self.latitude.to_radians();
        let lat2_rad = other.latitude.to_radians();
        let delta_lat = (other.latitude - self.latitude).to_radians();
        let delta_lon = (other.longitude - self.longitude).to_radians();

        let a = (lat1_rad.cos() * lat2_rad.cos()).mul_add(
            (delta_lon / 2.0).sin().powi(2),
            (delta_lat / 2.0).sin().powi(2),
        );
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_M * c
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinates() {
        let c = Coordinate::new(55.75, 37.61).expect("valid coordinates");
        assert!((c.latitude() - 55.75).abs() < f64::EPSILON);
        assert!((c.longitude() - 37.61).abs() < f64::EPSILON);
    }

    #[test]
    fn test_boundary_coordinates() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
        assert!(Coordinate::new(0.0, 0.0).is_ok());
    }

    #[test]
    fn test_invalid_latitude() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(-91.0, 0.0).is_err());
    }

    #[test]
    fn test_invalid_longitude() {
        assert!(Coordinate::new(0.0, 181.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
    }

    #[test]
    fn test_from_lon_lat_swaps_axes() {
        let c = Coordinate::from_lon_lat(37.62, 55.75).expect("valid");
        assert!((c.latitude() - 55.75).abs() < f64::EPSILON);
        assert!((c.longitude() - 37.62).abs() < f64::EPSILON);
    }

    #[test]
    fn test_from_lon_lat_rejects_latitude_out_of_range() {
        // 120 is a fine longitude but not a latitude
        assert!(Coordinate::from_lon_lat(10.0, 120.0).is_err());
    }

    #[test]
    fn test_display() {
        let c = Coordinate::new(55.75, 37.61).expect("valid");
        let display = format!("{c}");
        assert!(display.contains("55.75"));
        assert!(display.contains("37.61"));
    }

    #[test]
    fn test_distance_same_point() {
        let c = Coordinate::new_unchecked(55.75, 37.61);
        assert!(c.distance_m(&c).abs() < 0.001);
    }

    #[test]
    fn test_distance_short_hop() {
        // 0.001 degrees of latitude is roughly 111 meters
        let a = Coordinate::new_unchecked(55.750, 37.61);
        let b = Coordinate::new_unchecked(55.751, 37.61);
        let d = a.distance_m(&b);
        assert!((d - 111.0).abs() < 2.0, "distance was {d}");
    }

    #[test]
    fn test_serialization() {
        let c = Coordinate::new(55.75, 37.61).expect("valid");
        let json = serde_json::to_string(&c).expect("serialize");
        assert!(json.contains("\"latitude\":55.75"));

        let deserialized: Coordinate = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(c, deserialized);
    }
}
