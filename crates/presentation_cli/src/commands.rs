//! Subcommand implementations

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use application::{GeocodePort, NavigationService, PositionSource, RoutePort};
use domain::{Coordinate, Destination, NavigationSnapshot};
use infrastructure::{AppConfig, NominatimGeocodeAdapter, ReplaySensor, route_port_for};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::render;

/// Grace period after the last replayed fix for outstanding requests
const SETTLE_TIME: Duration = Duration::from_secs(5);

/// Arguments of the `navigate` command
#[derive(Debug)]
pub struct NavigateOptions {
    pub track: PathBuf,
    pub query: Option<String>,
    pub pick: usize,
    pub to: Option<Coordinate>,
    pub deny: bool,
    pub json: bool,
}

fn print_snapshot(snapshot: &NavigationSnapshot, json: bool) {
    if json {
        match serde_json::to_string(snapshot) {
            Ok(line) => println!("{line}"),
            Err(e) => debug!(error = %e, "Snapshot not serializable"),
        }
    } else {
        println!("{}", render::snapshot_line(snapshot));
    }
}

/// Run a full session over a recorded track
pub async fn navigate(config: &AppConfig, options: NavigateOptions) -> anyhow::Result<()> {
    let mut sensor = ReplaySensor::from_file(&options.track)?
        .with_interval(config.sensor.replay_interval());
    if options.deny {
        sensor = sensor.deny_permission();
    }
    let track_len = u32::try_from(sensor.len()).unwrap_or(u32::MAX);

    let geocoder = Arc::new(NominatimGeocodeAdapter::new(&config.geocoding)?);
    let router = route_port_for(&config.routing)?;
    let position_source = PositionSource::new(Arc::new(sensor), config.sensor.to_watch_options());
    let navigation_config = config.navigation.to_navigation_config();
    let request_timeout = navigation_config.request_timeout;

    let service = NavigationService::new(geocoder, router, position_source, navigation_config);
    let handle = service.start();
    info!(session = %handle.session_id(), track = %options.track.display(), "Session started");

    let mut updates = handle.subscribe();
    let json = options.json;
    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            print_snapshot(&snapshot, json);
        }
    });

    if let Some(query) = options.query {
        handle.destination_text_changed(query.clone())?;
        let mut rx = handle.subscribe();
        let limit = request_timeout + service.config().search_debounce;
        let suggestions = wait_for_snapshot(&mut rx, limit, |s| {
            s.query == query && (!s.suggestions.is_empty() || s.last_error.is_some())
        })
        .await
        .map(|snapshot| snapshot.suggestions)
        .unwrap_or_default();
        if suggestions.is_empty() {
            handle.shutdown().await;
            printer.abort();
            bail!("no places match \"{query}\"");
        }
        for line in render::suggestion_lines(&suggestions) {
            println!("{line}");
        }
        let Some(choice) = suggestions.get(options.pick).cloned() else {
            handle.shutdown().await;
            printer.abort();
            bail!(
                "suggestion {} out of range, {} available",
                options.pick,
                suggestions.len()
            );
        };
        handle.suggestion_selected(choice)?;
    } else if let Some(to) = options.to {
        handle.set_destination(Destination::new(to))?;
    }

    let replay = config.sensor.replay_interval() * track_len + SETTLE_TIME;
    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Interrupted"),
        () = tokio::time::sleep(replay) => debug!("Track replay finished"),
    }

    let final_snapshot = handle.snapshot();
    handle.shutdown().await;
    printer.abort();

    println!();
    println!("Final state:");
    print_snapshot(&final_snapshot, json);
    if !final_snapshot.route.is_empty() {
        println!("{}", render::route_summary(&final_snapshot.route));
    }
    Ok(())
}

/// Print the address of a point
pub async fn reverse(config: &AppConfig, at: Coordinate) -> anyhow::Result<()> {
    let geocoder = NominatimGeocodeAdapter::new(&config.geocoding)?;
    let label = geocoder
        .reverse_geocode(at)
        .await
        .with_context(|| format!("reverse geocoding {at} failed"))?;
    println!("{label}");
    Ok(())
}

/// Print places matching free text
pub async fn search(config: &AppConfig, text: &str, limit: u8) -> anyhow::Result<()> {
    let geocoder = NominatimGeocodeAdapter::new(&config.geocoding)?;
    let suggestions = geocoder
        .search(text, limit)
        .await
        .with_context(|| format!("search for \"{text}\" failed"))?;
    if suggestions.is_empty() {
        println!("No places found.");
        return Ok(());
    }
    for line in render::suggestion_lines(&suggestions) {
        println!("{line}");
    }
    Ok(())
}

/// Print a route between two points
pub async fn route(config: &AppConfig, from: Coordinate, to: Coordinate) -> anyhow::Result<()> {
    let router = route_port_for(&config.routing)?;
    let geometry = router
        .compute_route(from, to)
        .await
        .with_context(|| format!("routing {from} -> {to} failed"))?;
    println!("{}", render::route_summary(&geometry));
    for point in geometry.points() {
        println!("  {point}");
    }
    Ok(())
}

/// Wait for the first snapshot satisfying `condition`
async fn wait_for_snapshot(
    rx: &mut watch::Receiver<NavigationSnapshot>,
    limit: Duration,
    condition: impl FnMut(&NavigationSnapshot) -> bool,
) -> Option<NavigationSnapshot> {
    match tokio::time::timeout(limit, rx.wait_for(condition)).await {
        Ok(Ok(snapshot)) => Some(snapshot.clone()),
        _ => None,
    }
}
