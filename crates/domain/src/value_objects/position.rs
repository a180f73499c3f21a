//! Sensor fixes and sequenced positions

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One sampled device position as delivered by the location sensor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fix {
    /// Sampled coordinate
    pub coordinate: Coordinate,
    /// Horizontal accuracy radius in meters, if the sensor reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy_m: Option<f64>,
    /// Sensor timestamp (informational only, never used for ordering)
    pub timestamp: DateTime<Utc>,
}

impl Fix {
    /// Create a fix stamped with the current time
    #[must_use]
    pub fn now(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            accuracy_m: None,
            timestamp: Utc::now(),
        }
    }

    /// Attach an accuracy radius
    #[must_use]
    pub const fn with_accuracy(mut self, accuracy_m: f64) -> Self {
        self.accuracy_m = Some(accuracy_m);
        self
    }
}

/// A coordinate tagged with its arrival sequence number
///
/// Sequence numbers are assigned by the session in arrival order and are the
/// only ordering the session trusts; sensor timestamps may jitter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Where the user is
    pub coordinate: Coordinate,
    /// Arrival sequence number, strictly increasing within a session
    pub sequence: u64,
}

impl Position {
    /// Create a new sequenced position
    #[must_use]
    pub const fn new(coordinate: Coordinate, sequence: u64) -> Self {
        Self {
            coordinate,
            sequence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fix_now_has_no_accuracy() {
        let fix = Fix::now(Coordinate::new_unchecked(55.75, 37.61));
        assert!(fix.accuracy_m.is_none());
    }

    #[test]
    fn fix_with_accuracy() {
        let fix = Fix::now(Coordinate::new_unchecked(55.75, 37.61)).with_accuracy(8.5);
        assert_eq!(fix.accuracy_m, Some(8.5));
    }

    #[test]
    fn fix_deserializes_without_accuracy() {
        let json = r#"{"coordinate":{"latitude":55.75,"longitude":37.61},"timestamp":"2026-10-19T10:00:00Z"}"#;
        let fix: Fix = serde_json::from_str(json).unwrap();
        assert!(fix.accuracy_m.is_none());
        assert!((fix.coordinate.latitude() - 55.75).abs() < f64::EPSILON);
    }
}
