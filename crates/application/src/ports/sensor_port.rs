//! Location sensor port
//!
//! Models a platform location service: a permission prompt, a one-shot
//! current fix, and a continuous watch. Dropping the returned stream ends the
//! watch.

use std::pin::Pin;

use async_trait::async_trait;
use domain::Fix;
use futures::Stream;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Answer to the permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    /// Fixes may be requested
    Granted,
    /// The user refused
    Denied,
}

/// Requested sensor accuracy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorAccuracy {
    /// Coarse, battery friendly
    Low,
    /// Default platform accuracy
    #[default]
    Balanced,
    /// Best available
    High,
}

/// Parameters of a continuous watch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchOptions {
    /// Requested accuracy
    pub accuracy: SensorAccuracy,
    /// Minimum time between fixes in milliseconds
    pub min_interval_ms: u64,
    /// Minimum distance between fixes in meters
    pub min_distance_m: f64,
}

impl Default for WatchOptions {
    fn default() -> Self {
        Self {
            accuracy: SensorAccuracy::Balanced,
            min_interval_ms: 10_000,
            min_distance_m: 50.0,
        }
    }
}

/// Sensor failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// Permission missing or revoked
    #[error("Location permission denied")]
    PermissionDenied,

    /// The sensor could not produce a fix
    #[error("Location unavailable: {0}")]
    Unavailable(String),
}

/// Continuous stream of fixes
pub type FixStream = Pin<Box<dyn Stream<Item = Result<Fix, SensorError>> + Send>>;

/// Port for the device location service
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SensorPort: Send + Sync {
    /// Ask the user for foreground location permission
    async fn request_permission(&self) -> PermissionStatus;

    /// One fix, as soon as the sensor can produce it
    async fn current_fix(&self) -> Result<Fix, SensorError>;

    /// Subscribe to continuous fixes
    async fn watch(&self, options: WatchOptions) -> Result<FixStream, SensorError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_watch_options() {
        let options = WatchOptions::default();
        assert_eq!(options.accuracy, SensorAccuracy::Balanced);
        assert_eq!(options.min_interval_ms, 10_000);
        assert!((options.min_distance_m - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sensor_error_messages() {
        assert_eq!(
            SensorError::Unavailable("no satellites".to_string()).to_string(),
            "Location unavailable: no satellites"
        );
    }
}
