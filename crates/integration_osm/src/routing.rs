//! OSRM routing client
//!
//! Computes road routes between two points using the OSRM HTTP API
//! (`/route/v1/{profile}/{lon},{lat};{lon},{lat}`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::RoutingError;
use crate::models::{Route, RouteResponse};

/// OSRM response codes that mean "the request was fine, there is just no route"
const NO_ROUTE_CODES: &[&str] = &["NoRoute", "NoSegment"];

/// Trait for route planner clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Compute the primary route between two coordinate pairs
    ///
    /// When the planner offers alternatives, the first one is returned.
    async fn route(
        &self,
        from_lat: f64,
        from_lon: f64,
        to_lat: f64,
        to_lon: f64,
    ) -> Result<Route, RoutingError>;
}

/// OSRM-based routing client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, RoutingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Wayfarer/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// Build the route URL; OSRM wants longitude first
    fn route_url(&self, from_lat: f64, from_lon: f64, to_lat: f64, to_lon: f64) -> String {
        format!(
            "{}/route/v1/{}/{from_lon},{from_lat};{to_lon},{to_lat}",
            self.config.base_url, self.config.profile
        )
    }

    /// Pick the primary route out of a raw response body
    fn parse_route_response(body: &str, from: &str, to: &str) -> Result<Route, RoutingError> {
        let raw: RouteResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        if NO_ROUTE_CODES.contains(&raw.code.as_str()) {
            return Err(RoutingError::NoRoutesFound {
                from: from.to_string(),
                to: to.to_string(),
            });
        }

        if raw.code != "Ok" {
            return Err(RoutingError::RequestFailed(format!(
                "OSRM {}: {}",
                raw.code,
                raw.message.unwrap_or_default()
            )));
        }

        raw.routes
            .into_iter()
            .next()
            .ok_or_else(|| RoutingError::NoRoutesFound {
                from: from.to_string(),
                to: to.to_string(),
            })
    }
}

fn validate_point(latitude: f64, longitude: f64) -> Result<(), RoutingError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(RoutingError::InvalidLocation(format!(
            "{latitude},{longitude}"
        )));
    }
    Ok(())
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self), fields(from = %format!("{from_lat},{from_lon}"), to = %format!("{to_lat},{to_lon}")))]
    async fn route(
        &self,
        from_lat: f64,
        from_lon: f64,
        to_lat: f64,
        to_lon: f64,
    ) -> Result<Route, RoutingError> {
        validate_point(from_lat, from_lon)?;
        validate_point(to_lat, to_lon)?;

        let url = self.route_url(from_lat, from_lon, to_lat, to_lon);
        let params = [
            ("overview", "full"),
            ("geometries", "geojson"),
            ("alternatives", "false"),
        ];

        debug!(?url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RoutingError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    RoutingError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(RoutingError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let from = format!("{from_lat},{from_lon}");
        let to = format!("{to_lat},{to_lon}");

        // OSRM answers NoRoute with HTTP 400 and a JSON body
        if !status.is_success() {
            return match Self::parse_route_response(&body, &from, &to) {
                Err(err @ RoutingError::NoRoutesFound { .. }) => {
                    warn!("No route found");
                    Err(err)
                },
                _ => Err(RoutingError::RequestFailed(format!("HTTP {status}"))),
            };
        }

        let route = Self::parse_route_response(&body, &from, &to)?;
        debug!(
            points = route.geometry.coordinates.len(),
            distance_m = ?route.distance,
            "Route found"
        );
        Ok(route)
    }
}
