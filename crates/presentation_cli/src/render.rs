//! Plain-text rendering of sessions and lookup results

use domain::{NavigationError, NavigationSnapshot, RouteGeometry, SessionPhase, Suggestion};

const fn phase_name(phase: SessionPhase) -> &'static str {
    match phase {
        SessionPhase::Uninitialized => "uninitialized",
        SessionPhase::PermissionPending => "permission-pending",
        SessionPhase::Denied => "denied",
        SessionPhase::Tracking => "tracking",
    }
}

/// One-line summary of a snapshot
pub fn snapshot_line(snapshot: &NavigationSnapshot) -> String {
    let mut line = format!("[{}]", phase_name(snapshot.phase));

    if let Some(position) = snapshot.current_position {
        line.push_str(&format!(" at {} (#{})", position.coordinate, position.sequence));
    }
    if let Some(address) = &snapshot.address {
        line.push_str(&format!(" \"{address}\""));
    }
    if let Some(destination) = &snapshot.destination {
        match &destination.label {
            Some(label) => line.push_str(&format!(" -> {label}")),
            None => line.push_str(&format!(" -> {}", destination.coordinate)),
        }
    }
    if !snapshot.route.is_empty() {
        line.push_str(&format!(" | {}", route_summary(&snapshot.route)));
    }
    if !snapshot.query.is_empty() {
        line.push_str(&format!(
            " | query \"{}\" ({} suggestions)",
            snapshot.query,
            snapshot.suggestions.len()
        ));
    }
    // a missing address is shown by its absence, not as an error
    if let Some(error) = &snapshot.last_error
        && !matches!(error, NavigationError::NotFound(_))
    {
        line.push_str(&format!(" | error: {error}"));
    }
    line
}

/// Route length and travel time, when known
pub fn route_summary(route: &RouteGeometry) -> String {
    let mut summary = format!("route {} points", route.len());
    if let Some(distance) = route.distance_m() {
        summary.push_str(&format!(", {:.1} km", distance / 1000.0));
    }
    if let Some(duration) = route.duration_s() {
        summary.push_str(&format!(", {:.0} min", (duration / 60.0).ceil()));
    }
    summary
}

/// Numbered suggestion list
pub fn suggestion_lines(suggestions: &[Suggestion]) -> Vec<String> {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| format!("{i:>2}. {} ({})", s.label, s.coordinate))
        .collect()
}
