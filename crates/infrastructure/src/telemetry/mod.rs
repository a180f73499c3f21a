//! Logging infrastructure
//!
//! Installs a `tracing` subscriber with an env filter and a text or JSON
//! formatter.

mod logging;

pub use logging::{LogFormat, LoggingConfig, TelemetryError, init_logging};
