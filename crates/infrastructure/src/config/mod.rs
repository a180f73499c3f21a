//! Application configuration
//!
//! Split into focused sub-modules:
//! - `navigation`: session tuning and location sensor settings
//! - `integrations`: geocoder and route planner settings
//!
//! Sources are layered: built-in defaults, then an optional `wayfarer.toml`
//! (or an explicit file), then `WAYFARER__SECTION__KEY` environment variables.

mod integrations;
mod navigation;

use std::path::Path;

use integration_osm::NominatimConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use integrations::{RoutingAppConfig, RoutingProvider};
pub use navigation::{DestinationConfig, NavigationAppConfig, SensorAppConfig};

use crate::telemetry::LoggingConfig;

/// Default configuration file name, without extension
pub const DEFAULT_CONFIG_FILE: &str = "wayfarer";

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "WAYFARER";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value is out of range or inconsistent
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Navigation session settings
    #[serde(default)]
    pub navigation: NavigationAppConfig,

    /// Nominatim geocoder settings
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Route planner settings
    #[serde(default)]
    pub routing: RoutingAppConfig,

    /// Location sensor settings
    #[serde(default)]
    pub sensor: SensorAppConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `wayfarer.toml` (if present) and environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from an explicit file, or the default one
    ///
    /// An explicit file must exist; the default file is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let builder = config::Config::builder()
            .set_default("routing.provider", "osrm")?
            .set_default("logging.format", "text")?
            .add_source(file)
            // e.g. WAYFARER__ROUTING__PROVIDER=direct
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(
            routing = %config.routing.provider,
            geocoder = %config.geocoding.base_url,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.navigation.validate().map_err(ConfigError::Invalid)?;
        self.geocoding.validate().map_err(ConfigError::Invalid)?;
        self.routing.validate().map_err(ConfigError::Invalid)?;
        self.sensor.validate().map_err(ConfigError::Invalid)?;
        self.logging
            .validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.routing.provider, RoutingProvider::Osrm);
        assert_eq!(config.navigation.request_timeout_secs, 10);
        assert!((config.sensor.min_distance_m - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn loads_sections_from_file() {
        let file = write_config(
            r#"
            [navigation]
            suggestion_limit = 8
            search_debounce_ms = 0

            [navigation.default_destination]
            latitude = 55.76
            longitude = 37.60
            label = "Kremlin"

            [geocoding]
            base_url = "http://localhost:8088"
            country_filter = "ru"

            [routing]
            provider = "direct"

            [sensor]
            min_distance_m = 10.0

            [logging]
            format = "json"
            "#,
        );

        let config = AppConfig::load_from(Some(file.path())).unwrap();
        assert_eq!(config.navigation.suggestion_limit, 8);
        assert_eq!(config.navigation.search_debounce_ms, 0);
        assert_eq!(config.navigation.min_query_chars, 3);
        let destination = config.navigation.default_destination.unwrap();
        assert_eq!(destination.label.as_deref(), Some("Kremlin"));
        assert_eq!(config.geocoding.base_url, "http://localhost:8088");
        assert_eq!(config.geocoding.country_filter, "ru");
        assert_eq!(config.routing.provider, RoutingProvider::Direct);
        assert!((config.sensor.min_distance_m - 10.0).abs() < f64::EPSILON);
        assert_eq!(config.logging.format, crate::telemetry::LogFormat::Json);
    }

    #[test]
    fn invalid_values_are_rejected_on_load() {
        let file = write_config(
            r"
            [navigation]
            request_timeout_secs = 0
            ",
        );
        let err = AppConfig::load_from(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("request_timeout_secs"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load_from(Some(Path::new("/nonexistent/wayfarer.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn unknown_provider_is_an_error() {
        let file = write_config(
            r#"
            [routing]
            provider = "teleport"
            "#,
        );
        assert!(AppConfig::load_from(Some(file.path())).is_err());
    }
}
