//! Replay sensor - Implements SensorPort by replaying a recorded track
//!
//! A track is a JSON array of points:
//!
//! ```json
//! [
//!   { "latitude": 55.7500, "longitude": 37.6100, "accuracy_m": 8.0 },
//!   { "latitude": 55.7512, "longitude": 37.6125 }
//! ]
//! ```
//!
//! The first point answers `current_fix`; the rest are emitted by `watch`,
//! one per replay interval, skipping points closer than the requested
//! minimum distance to the previously emitted one.

use std::path::Path;
use std::time::Duration;

use application::{FixStream, PermissionStatus, SensorError, SensorPort, WatchOptions};
use async_trait::async_trait;
use domain::{Coordinate, Fix};
use futures::StreamExt;
use futures::stream;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

/// One recorded point
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Horizontal accuracy in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
}

/// Errors raised while loading a track
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The track file could not be read
    #[error("Failed to read track {path}: {source}")]
    Io {
        /// File path
        path: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The track is not a JSON array of points
    #[error("Failed to parse track: {0}")]
    Parse(#[from] serde_json::Error),

    /// A point is outside the valid coordinate range
    #[error("Track point {index} is out of range")]
    InvalidPoint {
        /// Zero-based position in the track
        index: usize,
    },

    /// The track has no points
    #[error("Track is empty")]
    Empty,
}

#[derive(Debug, Clone, Copy)]
struct Sample {
    coordinate: Coordinate,
    accuracy_m: Option<f64>,
}

impl Sample {
    fn to_fix(self) -> Fix {
        let fix = Fix::now(self.coordinate);
        match self.accuracy_m {
            Some(accuracy) => fix.with_accuracy(accuracy),
            None => fix,
        }
    }
}

/// Sensor that replays a recorded track
#[derive(Debug, Clone)]
pub struct ReplaySensor {
    samples: Vec<Sample>,
    permission: PermissionStatus,
    interval: Duration,
}

impl ReplaySensor {
    /// Load a track from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, ReplayError> {
        let json = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let sensor = Self::from_json(&json)?;
        info!(path = %path.display(), points = sensor.len(), "Track loaded");
        Ok(sensor)
    }

    /// Parse a track from JSON text
    pub fn from_json(json: &str) -> Result<Self, ReplayError> {
        let points: Vec<TrackPoint> = serde_json::from_str(json)?;
        Self::from_points(&points)
    }

    /// Build a sensor from points
    pub fn from_points(points: &[TrackPoint]) -> Result<Self, ReplayError> {
        if points.is_empty() {
            return Err(ReplayError::Empty);
        }
        let samples = points
            .iter()
            .enumerate()
            .map(|(index, p)| {
                Coordinate::new(p.latitude, p.longitude)
                    .map(|coordinate| Sample {
                        coordinate,
                        accuracy_m: p.accuracy_m,
                    })
                    .map_err(|_| ReplayError::InvalidPoint { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            samples,
            permission: PermissionStatus::Granted,
            interval: Duration::from_secs(1),
        })
    }

    /// Delay before each watched point
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Answer the permission prompt with a refusal
    #[must_use]
    pub const fn deny_permission(mut self) -> Self {
        self.permission = PermissionStatus::Denied;
        self
    }

    /// Number of points in the track
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the track has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    fn ensure_granted(&self) -> Result<(), SensorError> {
        match self.permission {
            PermissionStatus::Granted => Ok(()),
            PermissionStatus::Denied => Err(SensorError::PermissionDenied),
        }
    }

    /// Points after the first that are far enough from their predecessor
    fn watched_samples(&self, min_distance_m: f64) -> Vec<Sample> {
        let mut kept = Vec::new();
        let Some(first) = self.samples.first() else {
            return kept;
        };
        let mut last = first.coordinate;
        for sample in self.samples.iter().skip(1) {
            if last.distance_m(&sample.coordinate) >= min_distance_m {
                last = sample.coordinate;
                kept.push(*sample);
            }
        }
        kept
    }
}

#[async_trait]
impl SensorPort for ReplaySensor {
    async fn request_permission(&self) -> PermissionStatus {
        self.permission
    }

    async fn current_fix(&self) -> Result<Fix, SensorError> {
        self.ensure_granted()?;
        self.samples
            .first()
            .map(|s| s.to_fix())
            .ok_or_else(|| SensorError::Unavailable("track is empty".to_string()))
    }

    async fn watch(&self, options: WatchOptions) -> Result<FixStream, SensorError> {
        self.ensure_granted()?;
        let samples = self.watched_samples(options.min_distance_m);
        debug!(
            total = self.samples.len(),
            replayed = samples.len(),
            min_distance_m = options.min_distance_m,
            "Replaying track"
        );

        let interval = self.interval;
        let fixes: FixStream = Box::pin(stream::iter(samples).then(move |sample| async move {
            tokio::time::sleep(interval).await;
            Ok::<_, SensorError>(sample.to_fix())
        }));
        Ok(fixes)
    }
}
