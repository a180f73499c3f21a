//! Value Objects - Immutable, identity-less domain primitives

mod coordinate;
mod destination;
mod position;
mod route_geometry;
mod session_id;
mod suggestion;

pub use coordinate::{Coordinate, InvalidCoordinates};
pub use destination::Destination;
pub use position::{Fix, Position};
pub use route_geometry::RouteGeometry;
pub use session_id::SessionId;
pub use suggestion::Suggestion;
