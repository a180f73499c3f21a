//! Application-level errors

use domain::NavigationError;
use thiserror::Error;

/// Errors that can occur in the application layer
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// Navigation-level failure
    #[error(transparent)]
    Navigation(#[from] NavigationError),

    /// The navigation session has been torn down
    #[error("Navigation session is closed")]
    SessionClosed,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Navigation(err) => err.is_retryable(),
            Self::SessionClosed | Self::Configuration(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_errors_convert_transparently() {
        let err: ApplicationError = NavigationError::network("reset").into();
        assert_eq!(err.to_string(), "Network error: reset");
        assert!(err.is_retryable());
    }

    #[test]
    fn session_closed_is_not_retryable() {
        assert!(!ApplicationError::SessionClosed.is_retryable());
        assert!(!ApplicationError::Configuration("x".to_string()).is_retryable());
    }
}
