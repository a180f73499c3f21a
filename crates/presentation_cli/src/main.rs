//! Wayfarer CLI
//!
//! Runs a navigation session against a replayed location track and offers
//! one-shot geocoding and routing lookups.

#![allow(clippy::print_stdout)]

mod commands;
mod render;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::Coordinate;
use infrastructure::{AppConfig, init_logging};

/// Wayfarer CLI
#[derive(Debug, Parser)]
#[command(name = "wayfarer")]
#[command(author, version, about = "Wayfarer navigation core CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: ./wayfarer.toml if present)
    #[arg(short, long, global = true, env = "WAYFARER_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run a navigation session over a recorded track
    ///
    /// Example: wayfarer navigate --track walk.json --query "Red Square" --pick 0
    Navigate {
        /// JSON track file: [{"latitude": .., "longitude": ..}, ..]
        #[arg(short, long)]
        track: PathBuf,

        /// Destination search text, typed once the session starts
        #[arg(short, long)]
        query: Option<String>,

        /// Index of the suggestion to select
        #[arg(short, long, default_value = "0", requires = "query")]
        pick: usize,

        /// Destination as "lat,lon" instead of searching
        #[arg(long, value_parser = parse_coordinate, conflicts_with = "query")]
        to: Option<Coordinate>,

        /// Simulate a refused location permission
        #[arg(long)]
        deny: bool,

        /// Print snapshots as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Look up the address of a point
    Reverse {
        /// Latitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,

        /// Longitude in degrees
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Search places by free text
    Search {
        /// Query text
        text: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u8>,
    },

    /// Compute a route between two points
    Route {
        /// Origin as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        from: Coordinate,

        /// Destination as "lat,lon"
        #[arg(long, value_parser = parse_coordinate, allow_hyphen_values = true)]
        to: Coordinate,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Parse a "lat,lon" pair
fn parse_coordinate(value: &str) -> Result<Coordinate, String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected \"lat,lon\", got \"{value}\""))?;
    let lat: f64 = lat
        .trim()
        .parse()
        .map_err(|_| format!("invalid latitude \"{}\"", lat.trim()))?;
    let lon: f64 = lon
        .trim()
        .parse()
        .map_err(|_| format!("invalid longitude \"{}\"", lon.trim()))?;
    Coordinate::new(lat, lon).map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_from(cli.config.as_deref())?;
    if cli.verbose > 0 || config.logging.filter.is_empty() {
        config.logging.filter = log_filter_from_verbosity(cli.verbose).to_string();
    }
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Navigate {
            track,
            query,
            pick,
            to,
            deny,
            json,
        } => {
            let options = commands::NavigateOptions {
                track,
                query,
                pick,
                to,
                deny,
                json,
            };
            commands::navigate(&config, options).await?;
        },
        Commands::Reverse { lat, lon } => {
            let at = Coordinate::new(lat, lon)?;
            commands::reverse(&config, at).await?;
        },
        Commands::Search { text, limit } => {
            let limit = limit.unwrap_or(config.navigation.suggestion_limit);
            commands::search(&config, &text, limit).await?;
        },
        Commands::Route { from, to } => {
            commands::route(&config, from, to).await?;
        },
    }

    Ok(())
}
