//! Search suggestion value object

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// One forward-geocoding candidate offered while the user types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Provider-assigned identifier
    pub id: String,
    /// Display label
    pub label: String,
    /// Location of the candidate
    pub coordinate: Coordinate,
}

impl Suggestion {
    /// Create a new suggestion
    #[must_use]
    pub fn new(id: impl Into<String>, label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            coordinate,
        }
    }
}
