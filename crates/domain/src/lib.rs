//! Domain layer for Wayfarer
//!
//! Contains the navigation session aggregate, its value objects, and the
//! error taxonomy surfaced to the presentation layer. This layer performs no
//! I/O; every asynchronous outcome is fed back in as plain data.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::NavigationError;
pub use value_objects::*;
