//! Geocoding service port
//!
//! Reverse lookup of a point's address and free-text place search. Every
//! call is independent; implementations hold no per-session state.

use async_trait::async_trait;
use domain::{Coordinate, NavigationError, Suggestion};
#[cfg(test)]
use mockall::automock;

/// Port for geocoding operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodePort: Send + Sync {
    /// Human-readable address for a point
    ///
    /// Fails with `NotFound` when the service has no label for the point and
    /// `Network` on transport failure.
    async fn reverse_geocode(&self, at: Coordinate) -> Result<String, NavigationError>;

    /// Up to `limit` candidate places for a query, best match first
    ///
    /// An empty list is a valid answer.
    async fn search(&self, query: &str, limit: u8) -> Result<Vec<Suggestion>, NavigationError>;
}
