//! Navigation service - drives one navigation session
//!
//! A session is a single task that owns the [`NavigationState`] aggregate.
//! Sensor events, user input and port completions all arrive on one channel
//! and are applied in arrival order, so the aggregate has exactly one writer.
//! Port calls run in their own tasks and report back with the tag they were
//! issued under; the aggregate decides at write time whether the result is
//! still current.

use std::sync::Arc;
use std::time::Duration;

use domain::{
    AddressTicket, Destination, NavigationError, NavigationSnapshot, NavigationState,
    RouteGeometry, RouteTicket, SearchTicket, SessionId, Suggestion,
};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::error::ApplicationError;
use crate::ports::{GeocodePort, RoutePort};
use crate::services::position_source::{PositionSource, SensorEvent};

/// Session tuning
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    /// Shortest query, in characters, that is searched
    pub min_query_chars: usize,
    /// Maximum number of suggestions requested per search
    pub suggestion_limit: u8,
    /// Quiet period after the last keystroke before a search is issued
    pub search_debounce: Duration,
    /// Upper bound for every geocoder and route planner call
    pub request_timeout: Duration,
    /// Destination set when the session starts
    pub default_destination: Option<Destination>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            min_query_chars: domain::entities::DEFAULT_MIN_QUERY_CHARS,
            suggestion_limit: 5,
            search_debounce: Duration::from_millis(300),
            request_timeout: Duration::from_secs(10),
            default_destination: None,
        }
    }
}

impl NavigationConfig {
    /// Configuration without debounce, for tests
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            search_debounce: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Everything the session loop reacts to
#[derive(Debug)]
enum NavigationEvent {
    Sensor(SensorEvent),
    QueryChanged(String),
    SuggestionSelected(Suggestion),
    DestinationSet(Destination),
    AcknowledgeError,
    SearchDue(SearchTicket),
    AddressResolved {
        sequence: u64,
        outcome: Result<String, NavigationError>,
    },
    SuggestionsResolved {
        tag: u64,
        outcome: Result<Vec<Suggestion>, NavigationError>,
    },
    RouteResolved {
        tag: u64,
        outcome: Result<RouteGeometry, NavigationError>,
    },
    Shutdown,
}

/// Navigation service
///
/// Holds the collaborators shared by every session it starts.
pub struct NavigationService {
    geocoder: Arc<dyn GeocodePort>,
    router: Arc<dyn RoutePort>,
    position_source: PositionSource,
    config: NavigationConfig,
}

impl std::fmt::Debug for NavigationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationService")
            .field("position_source", &self.position_source)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl NavigationService {
    /// Create a new navigation service
    #[must_use]
    pub fn new(
        geocoder: Arc<dyn GeocodePort>,
        router: Arc<dyn RoutePort>,
        position_source: PositionSource,
        config: NavigationConfig,
    ) -> Self {
        Self {
            geocoder,
            router,
            position_source,
            config,
        }
    }

    /// Service configuration
    #[must_use]
    pub const fn config(&self) -> &NavigationConfig {
        &self.config
    }

    /// Start a new session
    ///
    /// Requests location permission, applies the default destination if one
    /// is configured, and begins tracking. Must be called from within a
    /// tokio runtime.
    #[must_use]
    pub fn start(&self) -> NavigationHandle {
        let session_id = SessionId::new();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let mut state =
            NavigationState::new().with_min_query_chars(self.config.min_query_chars);
        state.permission_requested();
        let (snapshots_tx, snapshots_rx) = watch::channel(state.snapshot());

        let session = Session {
            state,
            geocoder: Arc::clone(&self.geocoder),
            router: Arc::clone(&self.router),
            config: self.config.clone(),
            events: events_tx.downgrade(),
            snapshots: snapshots_tx,
        };

        let span = info_span!("navigation_session", session = %session_id);
        let task = tokio::spawn(
            session
                .run(events_rx, self.position_source.clone())
                .instrument(span),
        );

        NavigationHandle {
            session_id,
            events: events_tx,
            snapshots: snapshots_rx,
            task,
        }
    }
}

/// Presentation-side handle to a running session
///
/// Dropping the handle tears the session down like [`Self::shutdown`],
/// without waiting for it.
#[derive(Debug)]
pub struct NavigationHandle {
    session_id: SessionId,
    events: mpsc::UnboundedSender<NavigationEvent>,
    snapshots: watch::Receiver<NavigationSnapshot>,
    task: JoinHandle<()>,
}

impl NavigationHandle {
    /// Session identifier
    #[must_use]
    pub const fn session_id(&self) -> SessionId {
        self.session_id
    }

    /// The destination search box changed
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has been torn down.
    pub fn destination_text_changed(&self, text: impl Into<String>) -> Result<(), ApplicationError> {
        self.send(NavigationEvent::QueryChanged(text.into()))
    }

    /// The user picked one of the current suggestions
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has been torn down.
    pub fn suggestion_selected(&self, suggestion: Suggestion) -> Result<(), ApplicationError> {
        self.send(NavigationEvent::SuggestionSelected(suggestion))
    }

    /// Replace the destination directly
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has been torn down.
    pub fn set_destination(&self, destination: Destination) -> Result<(), ApplicationError> {
        self.send(NavigationEvent::DestinationSet(destination))
    }

    /// The last error has been shown to the user
    ///
    /// # Errors
    ///
    /// Returns `SessionClosed` if the session has been torn down.
    pub fn acknowledge_error(&self) -> Result<(), ApplicationError> {
        self.send(NavigationEvent::AcknowledgeError)
    }

    /// Latest published snapshot
    #[must_use]
    pub fn snapshot(&self) -> NavigationSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified after every change
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NavigationSnapshot> {
        self.snapshots.clone()
    }

    /// Tear the session down and wait for it to finish
    ///
    /// Stops tracking. Requests still in flight complete but are discarded.
    pub async fn shutdown(self) {
        let _ = self.events.send(NavigationEvent::Shutdown);
        if let Err(e) = self.task.await {
            warn!(session = %self.session_id, error = %e, "Navigation session ended abnormally");
        }
    }

    fn send(&self, event: NavigationEvent) -> Result<(), ApplicationError> {
        self.events
            .send(event)
            .map_err(|_| ApplicationError::SessionClosed)
    }
}

/// The single writer of one session's aggregate
struct Session {
    state: NavigationState,
    geocoder: Arc<dyn GeocodePort>,
    router: Arc<dyn RoutePort>,
    config: NavigationConfig,
    events: mpsc::WeakUnboundedSender<NavigationEvent>,
    snapshots: watch::Sender<NavigationSnapshot>,
}

impl Session {
    async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<NavigationEvent>,
        position_source: PositionSource,
    ) {
        info!("Navigation session started");

        if let Some(destination) = self.config.default_destination.clone() {
            self.handle(NavigationEvent::DestinationSet(destination));
            self.publish();
        }

        let sensor_events = self.events.clone();
        let mut subscription = position_source.start(move |event| {
            if let Some(tx) = sensor_events.upgrade() {
                let _ = tx.send(NavigationEvent::Sensor(event));
            }
        });

        while let Some(event) = events.recv().await {
            if matches!(event, NavigationEvent::Shutdown) {
                break;
            }
            self.handle(event);
            self.publish();
        }

        subscription.stop();
        self.state.invalidate();
        info!("Navigation session closed");
    }

    fn handle(&mut self, event: NavigationEvent) {
        match event {
            NavigationEvent::Sensor(SensorEvent::PermissionGranted) => {
                self.state.permission_granted();
            },
            NavigationEvent::Sensor(SensorEvent::PermissionDenied) => {
                self.state.permission_denied();
            },
            NavigationEvent::Sensor(SensorEvent::Unavailable(detail)) => {
                warn!(%detail, "Position unavailable");
                self.state.position_unavailable(detail);
            },
            NavigationEvent::Sensor(SensorEvent::Fix(fix)) => {
                if let Some(outcome) = self.state.record_fix(&fix) {
                    self.reverse_geocode(outcome.address);
                    if let Some(route) = outcome.route {
                        self.compute_route(route);
                    }
                }
            },
            NavigationEvent::QueryChanged(text) => {
                if let Some(ticket) = self.state.set_query(&text) {
                    if self.config.search_debounce.is_zero() {
                        self.search(ticket);
                    } else {
                        self.schedule_search(ticket);
                    }
                }
            },
            NavigationEvent::SearchDue(ticket) => {
                if self.state.is_search_current(ticket.tag) {
                    self.search(ticket);
                }
            },
            NavigationEvent::SuggestionSelected(suggestion) => {
                info!(label = %suggestion.label, "Suggestion selected");
                if let Some(route) = self.state.select_suggestion(&suggestion) {
                    self.compute_route(route);
                }
            },
            NavigationEvent::DestinationSet(destination) => {
                info!(at = %destination.coordinate, "Destination set");
                if let Some(route) = self.state.set_destination(destination) {
                    self.compute_route(route);
                }
            },
            NavigationEvent::AcknowledgeError => {
                self.state.acknowledge_error();
            },
            NavigationEvent::AddressResolved { sequence, outcome } => {
                if !self.state.apply_address(sequence, outcome) {
                    debug!(sequence, "Discarding stale address");
                }
            },
            NavigationEvent::SuggestionsResolved { tag, outcome } => {
                if !self.state.apply_suggestions(tag, outcome) {
                    debug!(tag, "Discarding stale suggestions");
                }
            },
            NavigationEvent::RouteResolved { tag, outcome } => {
                if let Err(e) = &outcome {
                    warn!(tag, error = %e, "Route computation failed");
                }
                if !self.state.apply_route(tag, outcome) {
                    debug!(tag, "Discarding stale route");
                }
            },
            NavigationEvent::Shutdown => {},
        }
    }

    fn publish(&self) {
        let next = self.state.snapshot();
        self.snapshots.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }

    fn reverse_geocode(&self, ticket: AddressTicket) {
        let AddressTicket {
            sequence,
            coordinate,
        } = ticket;
        debug!(sequence, at = %coordinate, "Requesting address");
        let geocoder = Arc::clone(&self.geocoder);
        self.spawn_call(
            async move { geocoder.reverse_geocode(coordinate).await },
            move |outcome| NavigationEvent::AddressResolved { sequence, outcome },
        );
    }

    fn search(&self, ticket: SearchTicket) {
        let SearchTicket { tag, query } = ticket;
        debug!(tag, %query, "Requesting suggestions");
        let geocoder = Arc::clone(&self.geocoder);
        let limit = self.config.suggestion_limit;
        self.spawn_call(
            async move { geocoder.search(&query, limit).await },
            move |outcome| NavigationEvent::SuggestionsResolved { tag, outcome },
        );
    }

    fn schedule_search(&self, ticket: SearchTicket) {
        let events = self.events.clone();
        let delay = self.config.search_debounce;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx.send(NavigationEvent::SearchDue(ticket));
            }
        });
    }

    fn compute_route(&self, ticket: RouteTicket) {
        let RouteTicket {
            tag,
            origin,
            destination,
        } = ticket;
        debug!(tag, from = %origin, to = %destination, "Requesting route");
        let router = Arc::clone(&self.router);
        self.spawn_call(
            async move { router.compute_route(origin, destination).await },
            move |outcome| NavigationEvent::RouteResolved { tag, outcome },
        );
    }

    /// Run a port call with the request timeout and feed its outcome back
    fn spawn_call<T, Fut, Done>(&self, call: Fut, done: Done)
    where
        T: Send + 'static,
        Fut: Future<Output = Result<T, NavigationError>> + Send + 'static,
        Done: FnOnce(Result<T, NavigationError>) -> NavigationEvent + Send + 'static,
    {
        let events = self.events.clone();
        let limit = self.config.request_timeout;
        tokio::spawn(
            async move {
                let outcome = tokio::time::timeout(limit, call)
                    .await
                    .unwrap_or_else(|_| {
                        Err(NavigationError::network(format!(
                            "request timed out after {limit:?}"
                        )))
                    });
                if let Some(tx) = events.upgrade() {
                    let _ = tx.send(done(outcome));
                }
            }
            .in_current_span(),
        );
    }
}
