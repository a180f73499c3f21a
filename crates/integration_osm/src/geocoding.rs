//! Nominatim geocoding client
//!
//! Converts coordinates to human-readable addresses and free-text queries to
//! candidate places using the [Nominatim](https://nominatim.openstreetmap.org)
//! API (OpenStreetMap).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use crate::models::Place;

/// Configuration for the Nominatim geocoding service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NominatimConfig {
    /// Base URL for the Nominatim API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_geocoding_timeout_secs")]
    pub timeout_secs: u64,

    /// User agent sent with every request (required by the Nominatim usage policy)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Preferred result language (`accept-language` parameter)
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Country code filter for searches (e.g., "ru"); empty for worldwide
    #[serde(default)]
    pub country_filter: String,
}

fn default_geocoding_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

const fn default_geocoding_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    concat!("Wayfarer/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_accept_language() -> String {
    "en".to_string()
}

impl Default for NominatimConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            timeout_secs: default_geocoding_timeout_secs(),
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            country_filter: String::new(),
        }
    }
}

impl NominatimConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.base_url.is_empty() {
            return Err("geocoding base_url must not be empty".to_string());
        }
        if self.timeout_secs == 0 {
            return Err("geocoding timeout_secs must be greater than 0".to_string());
        }
        if self.user_agent.trim().is_empty() {
            return Err("geocoding user_agent must not be empty".to_string());
        }
        Ok(())
    }
}

/// Errors that can occur during geocoding
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Connection to geocoding service failed
    #[error("Geocoding connection failed: {0}")]
    ConnectionFailed(String),

    /// Request to geocoding service failed
    #[error("Geocoding request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse geocoding response
    #[error("Geocoding parse error: {0}")]
    ParseError(String),

    /// The point could not be resolved to an address
    #[error("Address not found: {0}")]
    AddressNotFound(String),

    /// Rate limit exceeded (Nominatim allows 1 req/sec)
    #[error("Geocoding rate limit exceeded")]
    RateLimitExceeded,

    /// Request timeout
    #[error("Geocoding request timed out")]
    Timeout,
}

impl GeocodingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::RateLimitExceeded
                | Self::Timeout
        )
    }
}

/// Trait for geocoding clients
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Convert coordinates to a human-readable address
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, GeocodingError>;

    /// Find up to `limit` places matching a free-text query, best match first
    ///
    /// An empty result is not an error.
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Place>, GeocodingError>;
}

/// Nominatim-based geocoding client
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    client: Client,
    config: NominatimConfig,
}

impl NominatimGeocodingClient {
    /// Create a new Nominatim geocoding client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn get(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<String, GeocodingError> {
        let url = format!("{}/{endpoint}", self.config.base_url);

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeocodingError::Timeout
                } else {
                    GeocodingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodingError::RateLimitExceeded);
        }
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        response.text().await.map_err(|e| {
            if e.is_timeout() {
                GeocodingError::Timeout
            } else {
                GeocodingError::ParseError(e.to_string())
            }
        })
    }

    /// Parse a reverse geocoding body into its label
    fn parse_reverse_response(
        body: &str,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, GeocodingError> {
        let result: ReverseResult =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        if let Some(error) = result.error {
            debug!(%error, "Nominatim reported no match");
        }

        result
            .display_name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| GeocodingError::AddressNotFound(format!("{latitude},{longitude}")))
    }

    /// Parse a search body into places, preserving provider order
    fn parse_search_response(body: &str) -> Result<Vec<Place>, GeocodingError> {
        let results: Vec<SearchResult> =
            serde_json::from_str(body).map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        results
            .into_iter()
            .map(|r| {
                let latitude: f64 = r
                    .lat
                    .parse()
                    .map_err(|_| GeocodingError::ParseError(format!("Invalid latitude: {}", r.lat)))?;
                let longitude: f64 = r
                    .lon
                    .parse()
                    .map_err(|_| GeocodingError::ParseError(format!("Invalid longitude: {}", r.lon)))?;
                Ok(Place {
                    id: r.place_id.into_string(),
                    label: r.display_name,
                    latitude,
                    longitude,
                })
            })
            .collect()
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn reverse_geocode(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, GeocodingError> {
        let params = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "jsonv2".to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ];

        debug!(%latitude, %longitude, "Reverse geocoding");
        let body = self.get("reverse", &params).await?;
        Self::parse_reverse_response(&body, latitude, longitude)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Place>, GeocodingError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut params = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", limit.to_string()),
            ("accept-language", self.config.accept_language.clone()),
        ];
        if !self.config.country_filter.is_empty() {
            params.push(("countrycodes", self.config.country_filter.clone()));
        }

        debug!(%query, limit, "Searching places");
        let body = self.get("search", &params).await?;
        let places = Self::parse_search_response(&body)?;
        debug!(%query, count = places.len(), "Places found");
        Ok(places)
    }
}

/// Raw Nominatim reverse response
#[derive(Debug, Deserialize)]
struct ReverseResult {
    display_name: Option<String>,
    error: Option<String>,
}

/// Raw Nominatim search entry
#[derive(Debug, Deserialize)]
struct SearchResult {
    place_id: PlaceId,
    display_name: String,
    lat: String,
    lon: String,
}

/// Nominatim emits numeric place IDs; some mirrors emit strings
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PlaceId {
    Number(u64),
    Text(String),
}

impl PlaceId {
    fn into_string(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }
}
