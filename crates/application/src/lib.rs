//! Application layer - Use cases and orchestration
//!
//! Defines the ports the navigation core talks through (location sensor,
//! geocoder, route planner) and the services that orchestrate them: the
//! [`PositionSource`] sensor adapter and the [`NavigationService`] session loop.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
