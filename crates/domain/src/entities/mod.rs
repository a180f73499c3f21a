//! Entities - Objects with identity and a lifecycle

mod navigation_state;

pub use navigation_state::{
    AddressTicket, DEFAULT_MIN_QUERY_CHARS, FixOutcome, NavigationSnapshot, NavigationState, RouteTicket, SearchTicket,
    SessionPhase,
};
