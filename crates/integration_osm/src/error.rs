//! Routing error types

use thiserror::Error;

/// Errors that can occur during route planning
#[derive(Debug, Error)]
pub enum RoutingError {
    /// Connection to the routing service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request to routing service failed
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse response from routing service
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// No routes found between origin and destination
    #[error("No routes found from {from} to {to}")]
    NoRoutesFound {
        /// Origin description
        from: String,
        /// Destination description
        to: String,
    },

    /// Invalid location provided
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl RoutingError {
    /// Returns true if this error is retryable
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(RoutingError::ConnectionFailed("test".to_string()).is_retryable());
        assert!(RoutingError::RequestFailed("test".to_string()).is_retryable());
        assert!(RoutingError::Timeout { timeout_secs: 10 }.is_retryable());
        assert!(
            RoutingError::RateLimitExceeded {
                retry_after_secs: Some(60)
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_non_retryable_errors() {
        assert!(!RoutingError::InvalidLocation("test".to_string()).is_retryable());
        assert!(!RoutingError::ParseError("test".to_string()).is_retryable());
        assert!(
            !RoutingError::NoRoutesFound {
                from: "A".to_string(),
                to: "B".to_string(),
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_error_display() {
        let err = RoutingError::NoRoutesFound {
            from: "55.75,37.61".to_string(),
            to: "59.93,30.33".to_string(),
        };
        assert!(err.to_string().contains("55.75,37.61"));
        assert!(err.to_string().contains("59.93,30.33"));

        let err = RoutingError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));
    }
}
