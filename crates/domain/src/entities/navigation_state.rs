//! Navigation session aggregate
//!
//! Holds everything a navigation screen renders: where the user is, where
//! they are going, the address label for their position, the current route,
//! and the live search suggestions.
//!
//! Every asynchronous outcome (reverse geocode, search, route) re-enters the
//! aggregate through an `apply_*` method together with the tag it was issued
//! with. The tag is compared against the aggregate's current tag at write
//! time; a mismatch means the request was superseded and the outcome is
//! dropped. Each method mutates the aggregate as one unit or not at all.

use serde::{Deserialize, Serialize};

use crate::errors::NavigationError;
use crate::value_objects::{Coordinate, Destination, Fix, Position, RouteGeometry, Suggestion};

/// Shortest query, in characters, that is sent to the geocoder
pub const DEFAULT_MIN_QUERY_CHARS: usize = 3;

/// Session lifecycle
///
/// `Denied` is terminal. `Tracking` has no sub-states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Nothing requested yet
    #[default]
    Uninitialized,
    /// Waiting for the user to answer the permission prompt
    PermissionPending,
    /// Permission refused
    Denied,
    /// Receiving fixes
    Tracking,
}

/// Reverse geocode request issued for one fix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AddressTicket {
    /// Arrival sequence number of the fix
    pub sequence: u64,
    /// Point to look up
    pub coordinate: Coordinate,
}

/// Forward search request issued for one query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    /// Search generation at issue time
    pub tag: u64,
    /// Query text to search for
    pub query: String,
}

/// Route request issued for one origin/destination pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteTicket {
    /// Route generation at issue time
    pub tag: u64,
    /// Route start
    pub origin: Coordinate,
    /// Route end
    pub destination: Coordinate,
}

/// Requests to issue after a fix was recorded
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixOutcome {
    /// Always issued
    pub address: AddressTicket,
    /// Issued when a destination is set
    pub route: Option<RouteTicket>,
}

/// Read-only copy of the aggregate for rendering
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationSnapshot {
    /// Lifecycle phase
    pub phase: SessionPhase,
    /// Latest position
    pub current_position: Option<Position>,
    /// Selected destination
    pub destination: Option<Destination>,
    /// Address label for the latest position
    pub address: Option<String>,
    /// Current route polyline
    pub route: RouteGeometry,
    /// Suggestions for the current query
    pub suggestions: Vec<Suggestion>,
    /// Raw query text, exactly as last typed
    pub query: String,
    /// Most recent unacknowledged failure
    pub last_error: Option<NavigationError>,
    /// Incremented every time a failure is recorded
    pub error_serial: u64,
}

/// The navigation session aggregate
///
/// Exactly one instance exists per session, owned by a single writer.
#[derive(Debug, Clone)]
pub struct NavigationState {
    phase: SessionPhase,
    current_position: Option<Position>,
    destination: Option<Destination>,
    address: Option<String>,
    route: RouteGeometry,
    suggestions: Vec<Suggestion>,
    query: String,
    last_sequence: u64,
    pending_route_request_id: u64,
    pending_search_request_id: u64,
    last_error: Option<NavigationError>,
    error_serial: u64,
    min_query_chars: usize,
    invalidated: bool,
}

impl Default for NavigationState {
    fn default() -> Self {
        Self::new()
    }
}

impl NavigationState {
    /// Create an empty session
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: SessionPhase::Uninitialized,
            current_position: None,
            destination: None,
            address: None,
            route: RouteGeometry::empty(),
            suggestions: Vec::new(),
            query: String::new(),
            last_sequence: 0,
            pending_route_request_id: 0,
            pending_search_request_id: 0,
            last_error: None,
            error_serial: 0,
            min_query_chars: DEFAULT_MIN_QUERY_CHARS,
            invalidated: false,
        }
    }

    /// Override the minimum query length that triggers a search
    #[must_use]
    pub const fn with_min_query_chars(mut self, min_query_chars: usize) -> Self {
        self.min_query_chars = min_query_chars;
        self
    }

    // ------------------------------------------------------------------
    // Permission lifecycle
    // ------------------------------------------------------------------

    /// The permission prompt has been shown
    pub fn permission_requested(&mut self) {
        if self.invalidated {
            return;
        }
        if self.phase == SessionPhase::Uninitialized {
            self.phase = SessionPhase::PermissionPending;
        }
    }

    /// Permission was granted; fixes will follow
    pub fn permission_granted(&mut self) {
        if self.invalidated || self.phase == SessionPhase::Denied {
            return;
        }
        self.phase = SessionPhase::Tracking;
    }

    /// Permission was refused; the position stays absent for the session
    pub fn permission_denied(&mut self) {
        if self.invalidated || self.phase == SessionPhase::Denied {
            return;
        }
        self.phase = SessionPhase::Denied;
        self.current_position = None;
        self.address = None;
        self.route = RouteGeometry::empty();
        self.pending_route_request_id += 1;
        self.record_error(NavigationError::PermissionDenied);
    }

    /// The sensor reported a failure other than a permission refusal
    pub fn position_unavailable(&mut self, detail: impl Into<String>) {
        if self.invalidated || self.phase == SessionPhase::Denied {
            return;
        }
        self.record_error(NavigationError::PositionUnavailable(detail.into()));
    }

    // ------------------------------------------------------------------
    // Position tracking
    // ------------------------------------------------------------------

    /// Record a fix in arrival order
    ///
    /// The fix always replaces the current position (latest arrival wins).
    /// Returns the requests the caller must issue, or `None` if the session
    /// no longer accepts fixes.
    pub fn record_fix(&mut self, fix: &Fix) -> Option<FixOutcome> {
        if self.invalidated || self.phase == SessionPhase::Denied {
            return None;
        }
        self.phase = SessionPhase::Tracking;
        self.last_sequence += 1;
        let position = Position::new(fix.coordinate, self.last_sequence);
        self.current_position = Some(position);

        let address = AddressTicket {
            sequence: position.sequence,
            coordinate: position.coordinate,
        };
        let route = if self.destination.is_some() {
            self.begin_route()
        } else {
            None
        };
        Some(FixOutcome { address, route })
    }

    /// Apply a reverse geocode outcome for the fix with `sequence`
    ///
    /// Returns true if the aggregate changed.
    pub fn apply_address(
        &mut self,
        sequence: u64,
        outcome: Result<String, NavigationError>,
    ) -> bool {
        if self.invalidated {
            return false;
        }
        let current = self.current_position.map(|p| p.sequence);
        if current != Some(sequence) {
            return false;
        }
        match outcome {
            Ok(label) => {
                self.address = Some(label);
                self.clear_recoverable_error();
            },
            Err(err @ NavigationError::NotFound(_)) => {
                self.address = None;
                self.record_error(err);
            },
            Err(err) => self.record_error(err),
        }
        true
    }

    // ------------------------------------------------------------------
    // Destination search
    // ------------------------------------------------------------------

    /// Record the latest query text
    ///
    /// Always advances the search generation so older in-flight searches
    /// are dropped. Returns a ticket when the text is long enough to search.
    pub fn set_query(&mut self, text: &str) -> Option<SearchTicket> {
        if self.invalidated {
            return None;
        }
        text.clone_into(&mut self.query);
        self.pending_search_request_id += 1;

        if text.chars().count() < self.min_query_chars {
            self.suggestions.clear();
            return None;
        }
        Some(SearchTicket {
            tag: self.pending_search_request_id,
            query: text.to_owned(),
        })
    }

    /// Whether a search issued with `tag` is still the newest one
    #[must_use]
    pub const fn is_search_current(&self, tag: u64) -> bool {
        !self.invalidated && tag == self.pending_search_request_id
    }

    /// Apply a search outcome issued with `tag`
    ///
    /// Returns true if the aggregate changed.
    pub fn apply_suggestions(
        &mut self,
        tag: u64,
        outcome: Result<Vec<Suggestion>, NavigationError>,
    ) -> bool {
        if !self.is_search_current(tag) {
            return false;
        }
        match outcome {
            Ok(suggestions) => {
                self.suggestions = suggestions;
                self.clear_recoverable_error();
            },
            Err(err) => self.record_error(err),
        }
        true
    }

    /// The user picked a suggestion
    ///
    /// Replaces the destination, clears suggestions, and starts a route
    /// recomputation.
    pub fn select_suggestion(&mut self, suggestion: &Suggestion) -> Option<RouteTicket> {
        if self.invalidated {
            return None;
        }
        self.pending_search_request_id += 1;
        self.suggestions.clear();
        self.replace_destination(Destination::from(suggestion));
        self.begin_route()
    }

    /// Replace the destination directly (default destination, deep links)
    pub fn set_destination(&mut self, destination: Destination) -> Option<RouteTicket> {
        if self.invalidated {
            return None;
        }
        self.replace_destination(destination);
        self.begin_route()
    }

    /// A route to a replaced destination is dropped; a relabel keeps it
    fn replace_destination(&mut self, destination: Destination) {
        let moved = self
            .destination
            .as_ref()
            .is_none_or(|current| current.coordinate != destination.coordinate);
        if moved {
            self.route = RouteGeometry::empty();
        }
        self.destination = Some(destination);
    }

    // ------------------------------------------------------------------
    // Routing
    // ------------------------------------------------------------------

    /// Start a route recomputation
    ///
    /// Always advances the route generation. Returns a ticket only when both
    /// endpoints are known.
    pub fn begin_route(&mut self) -> Option<RouteTicket> {
        if self.invalidated {
            return None;
        }
        self.pending_route_request_id += 1;
        let origin = self.current_position?.coordinate;
        let destination = self.destination.as_ref()?.coordinate;
        Some(RouteTicket {
            tag: self.pending_route_request_id,
            origin,
            destination,
        })
    }

    /// Apply a route outcome issued with `tag`
    ///
    /// Failures keep the previous route, which only survives origin drift. Returns true if the aggregate changed.
    pub fn apply_route(
        &mut self,
        tag: u64,
        outcome: Result<RouteGeometry, NavigationError>,
    ) -> bool {
        if self.invalidated || tag != self.pending_route_request_id {
            return false;
        }
        match outcome {
            Ok(route) => {
                self.route = route;
                self.clear_recoverable_error();
            },
            Err(err) => self.record_error(err),
        }
        true
    }

    // ------------------------------------------------------------------
    // Errors and teardown
    // ------------------------------------------------------------------

    /// The UI has shown the last error
    pub fn acknowledge_error(&mut self) -> bool {
        if self.invalidated {
            return false;
        }
        self.last_error.take().is_some()
    }

    /// Tear the session down; no further writes are accepted
    pub fn invalidate(&mut self) {
        self.invalidated = true;
    }

    /// Whether the session was torn down
    #[must_use]
    pub const fn is_invalidated(&self) -> bool {
        self.invalidated
    }

    fn record_error(&mut self, err: NavigationError) {
        self.last_error = Some(err);
        self.error_serial += 1;
    }

    fn clear_recoverable_error(&mut self) {
        if self
            .last_error
            .as_ref()
            .is_some_and(|e| !e.is_terminal())
        {
            self.last_error = None;
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Lifecycle phase
    #[must_use]
    pub const fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Latest position
    #[must_use]
    pub const fn current_position(&self) -> Option<Position> {
        self.current_position
    }

    /// Selected destination
    #[must_use]
    pub const fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    /// Address label for the latest position
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    /// Current route
    #[must_use]
    pub const fn route(&self) -> &RouteGeometry {
        &self.route
    }

    /// Current suggestions
    #[must_use]
    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    /// Raw query text
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Most recent unacknowledged failure
    #[must_use]
    pub const fn last_error(&self) -> Option<&NavigationError> {
        self.last_error.as_ref()
    }

    /// Current route generation
    #[must_use]
    pub const fn pending_route_request_id(&self) -> u64 {
        self.pending_route_request_id
    }

    /// Current search generation
    #[must_use]
    pub const fn pending_search_request_id(&self) -> u64 {
        self.pending_search_request_id
    }

    /// Copy the renderable fields
    #[must_use]
    pub fn snapshot(&self) -> NavigationSnapshot {
        NavigationSnapshot {
            phase: self.phase,
            current_position: self.current_position,
            destination: self.destination.clone(),
            address: self.address.clone(),
            route: self.route.clone(),
            suggestions: self.suggestions.clone(),
            query: self.query.clone(),
            last_error: self.last_error.clone(),
            error_serial: self.error_serial,
        }
    }
}
