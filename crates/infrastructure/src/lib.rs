//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of the OpenStreetMap clients and
//! a replayed location track, and provides configuration loading and logging
//! setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, ConfigError, DestinationConfig, NavigationAppConfig, RoutingAppConfig,
    RoutingProvider, SensorAppConfig,
};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
