//! Destination value object

use serde::{Deserialize, Serialize};

use super::{Coordinate, Suggestion};

/// Where the user wants to go
///
/// Replaced wholesale on every re-selection, never edited field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    /// Target coordinate
    pub coordinate: Coordinate,
    /// Human-readable label, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Destination {
    /// Create an unlabeled destination
    #[must_use]
    pub const fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate,
            label: None,
        }
    }

    /// Attach a label
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

impl From<&Suggestion> for Destination {
    fn from(suggestion: &Suggestion) -> Self {
        Self {
            coordinate: suggestion.coordinate,
            label: Some(suggestion.label.clone()),
        }
    }
}
