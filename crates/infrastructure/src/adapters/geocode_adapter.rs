//! Geocode adapter - Implements GeocodePort using the Nominatim client

use application::GeocodePort;
use async_trait::async_trait;
use domain::{Coordinate, NavigationError, Suggestion};
use integration_osm::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient, Place,
};
use tracing::{debug, instrument, warn};

/// Adapter for reverse and forward geocoding via Nominatim
#[derive(Debug)]
pub struct NominatimGeocodeAdapter {
    client: NominatimGeocodingClient,
}

impl NominatimGeocodeAdapter {
    /// Create a new geocode adapter
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        Ok(Self::from_client(NominatimGeocodingClient::new(config)?))
    }

    /// Wrap an existing client
    #[must_use]
    pub const fn from_client(client: NominatimGeocodingClient) -> Self {
        Self { client }
    }

    fn to_suggestion(place: Place) -> Option<Suggestion> {
        match Coordinate::new(place.latitude, place.longitude) {
            Ok(coordinate) => Some(Suggestion::new(place.id, place.label, coordinate)),
            Err(e) => {
                warn!(id = %place.id, error = %e, "Skipping place with invalid coordinates");
                None
            },
        }
    }
}

/// Map a client failure onto the navigation taxonomy
fn map_error(err: GeocodingError, at: Option<Coordinate>) -> NavigationError {
    match err {
        GeocodingError::AddressNotFound(detail) => NavigationError::NotFound(
            at.map_or(detail, |c| c.to_string()),
        ),
        other => NavigationError::network(other.to_string()),
    }
}

#[async_trait]
impl GeocodePort for NominatimGeocodeAdapter {
    #[instrument(skip(self), fields(at = %at))]
    async fn reverse_geocode(&self, at: Coordinate) -> Result<String, NavigationError> {
        let label = self
            .client
            .reverse_geocode(at.latitude(), at.longitude())
            .await
            .map_err(|e| map_error(e, Some(at)))?;
        debug!(%label, "Address resolved");
        Ok(label)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Suggestion>, NavigationError> {
        let places = self
            .client
            .search(query, limit)
            .await
            .map_err(|e| map_error(e, None))?;

        let suggestions: Vec<Suggestion> = places
            .into_iter()
            .filter_map(Self::to_suggestion)
            .collect();
        debug!(count = suggestions.len(), "Suggestions found");
        Ok(suggestions)
    }
}
