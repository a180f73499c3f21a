//! Navigation error taxonomy

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures recorded on a navigation session
///
/// None of these are fatal to the process. The most recent one is kept on the
/// aggregate until a fresh attempt succeeds or the UI acknowledges it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum NavigationError {
    /// Location permission was refused; terminal for the session
    #[error("Location permission denied")]
    PermissionDenied,

    /// Transport failure, timeout, or unusable response from a remote service
    #[error("Network error: {0}")]
    Network(String),

    /// Reverse geocoding produced no label for the point
    #[error("No address found for {0}")]
    NotFound(String),

    /// The location sensor failed to produce a fix
    #[error("Position unavailable: {0}")]
    PositionUnavailable(String),

    /// The route planner returned zero routes
    #[error("No route found from {from} to {to}")]
    NoRouteFound {
        /// Origin description
        from: String,
        /// Destination description
        to: String,
    },
}

impl NavigationError {
    /// Create a network error
    pub fn network(detail: impl Into<String>) -> Self {
        Self::Network(detail.into())
    }

    /// Create a no-route error
    pub fn no_route(from: impl ToString, to: impl ToString) -> Self {
        Self::NoRouteFound {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Returns true if the session can never recover from this error
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::PermissionDenied)
    }

    /// Returns true if repeating the user action may succeed
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_) | Self::PositionUnavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permission_denied_is_terminal() {
        assert!(NavigationError::PermissionDenied.is_terminal());
        assert!(!NavigationError::PermissionDenied.is_retryable());
    }

    #[test]
    fn network_is_retryable() {
        let err = NavigationError::network("connection reset");
        assert!(err.is_retryable());
        assert!(!err.is_terminal());
    }

    #[test]
    fn position_unavailable_is_retryable() {
        let err = NavigationError::PositionUnavailable("gps off".to_string());
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), "Position unavailable: gps off");
    }

    #[test]
    fn not_found_and_no_route_are_neither() {
        let nf = NavigationError::NotFound("55.75,37.61".to_string());
        assert!(!nf.is_retryable());
        assert!(!nf.is_terminal());

        let nr = NavigationError::no_route("A", "B");
        assert!(!nr.is_retryable());
        assert!(!nr.is_terminal());
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            NavigationError::PermissionDenied.to_string(),
            "Location permission denied"
        );
        assert_eq!(
            NavigationError::network("timed out").to_string(),
            "Network error: timed out"
        );
        let err = NavigationError::no_route("55.75, 37.61", "55.76, 37.60");
        assert!(err.to_string().contains("55.75, 37.61"));
        assert!(err.to_string().contains("55.76, 37.60"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_string(&NavigationError::PermissionDenied).unwrap();
        assert_eq!(json, r#"{"kind":"permission_denied"}"#);

        let json = serde_json::to_string(&NavigationError::network("boom")).unwrap();
        assert_eq!(json, r#"{"kind":"network","detail":"boom"}"#);
    }
}
