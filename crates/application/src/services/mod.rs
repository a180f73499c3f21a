//! Application services - Use case implementations

mod navigation_service;
mod position_source;

pub use navigation_service::{NavigationConfig, NavigationHandle, NavigationService};
pub use position_source::{PositionSource, PositionSubscription, SensorEvent};
