//! Navigation session and location sensor settings

use std::time::Duration;

use application::{NavigationConfig, SensorAccuracy, WatchOptions};
use domain::{Coordinate, Destination};
use serde::{Deserialize, Serialize};

/// Navigation session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationAppConfig {
    /// Shortest query, in characters, that is searched (default: 3)
    #[serde(default = "default_min_query_chars")]
    pub min_query_chars: usize,

    /// Maximum number of suggestions per search (default: 5)
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: u8,

    /// Debounce delay for search input in milliseconds, 0 disables (default: 300)
    #[serde(default = "default_search_debounce_ms")]
    pub search_debounce_ms: u64,

    /// Timeout for each geocoder and route planner call in seconds (default: 10)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Destination set when a session starts (optional)
    #[serde(default)]
    pub default_destination: Option<DestinationConfig>,
}

/// A configured destination point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
    /// Display label
    #[serde(default)]
    pub label: Option<String>,
}

impl DestinationConfig {
    /// Convert to a domain `Destination`
    ///
    /// Returns `None` if the coordinates are out of range.
    #[must_use]
    pub fn to_destination(&self) -> Option<Destination> {
        let coordinate = Coordinate::new(self.latitude, self.longitude).ok()?;
        let destination = Destination::new(coordinate);
        Some(match &self.label {
            Some(label) => destination.with_label(label.clone()),
            None => destination,
        })
    }
}

const fn default_min_query_chars() -> usize {
    domain::entities::DEFAULT_MIN_QUERY_CHARS
}

const fn default_suggestion_limit() -> u8 {
    5
}

const fn default_search_debounce_ms() -> u64 {
    300
}

const fn default_request_timeout_secs() -> u64 {
    10
}

impl Default for NavigationAppConfig {
    fn default() -> Self {
        Self {
            min_query_chars: default_min_query_chars(),
            suggestion_limit: default_suggestion_limit(),
            search_debounce_ms: default_search_debounce_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            default_destination: None,
        }
    }
}

impl NavigationAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_query_chars == 0 {
            return Err("navigation.min_query_chars must be greater than 0".to_string());
        }
        if !(1..=40).contains(&self.suggestion_limit) {
            return Err(format!(
                "navigation.suggestion_limit must be between 1 and 40, got {}",
                self.suggestion_limit
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err("navigation.request_timeout_secs must be greater than 0".to_string());
        }
        if let Some(destination) = &self.default_destination {
            if destination.to_destination().is_none() {
                return Err(format!(
                    "navigation.default_destination ({}, {}) is out of range",
                    destination.latitude, destination.longitude
                ));
            }
        }
        Ok(())
    }

    /// Convert to the application-layer `NavigationConfig`
    #[must_use]
    pub fn to_navigation_config(&self) -> NavigationConfig {
        NavigationConfig {
            min_query_chars: self.min_query_chars,
            suggestion_limit: self.suggestion_limit,
            search_debounce: Duration::from_millis(self.search_debounce_ms),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
            default_destination: self
                .default_destination
                .as_ref()
                .and_then(DestinationConfig::to_destination),
        }
    }
}

/// Location sensor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorAppConfig {
    /// Minimum movement between fixes in meters (default: 50)
    #[serde(default = "default_min_distance_m")]
    pub min_distance_m: f64,

    /// Minimum time between fixes in milliseconds (default: 10000)
    #[serde(default = "default_min_interval_ms")]
    pub min_interval_ms: u64,

    /// Requested accuracy (default: balanced)
    #[serde(default)]
    pub accuracy: SensorAccuracy,

    /// Delay between replayed track points in milliseconds (default: 1000)
    #[serde(default = "default_replay_interval_ms")]
    pub replay_interval_ms: u64,
}

const fn default_min_distance_m() -> f64 {
    50.0
}

const fn default_min_interval_ms() -> u64 {
    10_000
}

const fn default_replay_interval_ms() -> u64 {
    1_000
}

impl Default for SensorAppConfig {
    fn default() -> Self {
        Self {
            min_distance_m: default_min_distance_m(),
            min_interval_ms: default_min_interval_ms(),
            accuracy: SensorAccuracy::default(),
            replay_interval_ms: default_replay_interval_ms(),
        }
    }
}

impl SensorAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if !self.min_distance_m.is_finite() || self.min_distance_m < 0.0 {
            return Err(format!(
                "sensor.min_distance_m must be a non-negative number, got {}",
                self.min_distance_m
            ));
        }
        Ok(())
    }

    /// Watch parameters for the sensor port
    #[must_use]
    pub const fn to_watch_options(&self) -> WatchOptions {
        WatchOptions {
            accuracy: self.accuracy,
            min_interval_ms: self.min_interval_ms,
            min_distance_m: self.min_distance_m,
        }
    }

    /// Delay between replayed track points
    #[must_use]
    pub const fn replay_interval(&self) -> Duration {
        Duration::from_millis(self.replay_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_defaults() {
        let config = NavigationAppConfig::default();
        assert_eq!(config.min_query_chars, 3);
        assert_eq!(config.suggestion_limit, 5);
        assert!(config.validate().is_ok());

        let nav = config.to_navigation_config();
        assert_eq!(nav.search_debounce, Duration::from_millis(300));
        assert_eq!(nav.request_timeout, Duration::from_secs(10));
        assert!(nav.default_destination.is_none());
    }

    #[test]
    fn default_destination_converts() {
        let config = NavigationAppConfig {
            default_destination: Some(DestinationConfig {
                latitude: 55.76,
                longitude: 37.60,
                label: Some("Kremlin".to_string()),
            }),
            ..NavigationAppConfig::default()
        };
        assert!(config.validate().is_ok());

        let destination = config.to_navigation_config().default_destination.unwrap();
        assert_eq!(destination.coordinate, Coordinate::new_unchecked(55.76, 37.60));
        assert_eq!(destination.label.as_deref(), Some("Kremlin"));
    }

    #[test]
    fn rejects_out_of_range_destination() {
        let config = NavigationAppConfig {
            default_destination: Some(DestinationConfig {
                latitude: 95.0,
                longitude: 37.60,
                label: None,
            }),
            ..NavigationAppConfig::default()
        };
        assert!(config.validate().unwrap_err().contains("out of range"));
    }

    #[test]
    fn rejects_zero_timeout_and_limits() {
        let zero_timeout = NavigationAppConfig {
            request_timeout_secs: 0,
            ..NavigationAppConfig::default()
        };
        assert!(zero_timeout.validate().is_err());

        let zero_limit = NavigationAppConfig {
            suggestion_limit: 0,
            ..NavigationAppConfig::default()
        };
        assert!(zero_limit.validate().is_err());

        let zero_chars = NavigationAppConfig {
            min_query_chars: 0,
            ..NavigationAppConfig::default()
        };
        assert!(zero_chars.validate().is_err());
    }

    #[test]
    fn sensor_watch_options() {
        let config = SensorAppConfig {
            min_distance_m: 25.0,
            accuracy: SensorAccuracy::High,
            ..SensorAppConfig::default()
        };
        let options = config.to_watch_options();
        assert_eq!(options.accuracy, SensorAccuracy::High);
        assert_eq!(options.min_interval_ms, 10_000);
        assert!((options.min_distance_m - 25.0).abs() < f64::EPSILON);
    }

    #[test]
    fn sensor_rejects_negative_distance() {
        let config = SensorAppConfig {
            min_distance_m: -1.0,
            ..SensorAppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
