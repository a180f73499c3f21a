//! OpenStreetMap service settings

use integration_osm::OsrmConfig;
use serde::{Deserialize, Serialize};

/// Which route planner answers route requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoutingProvider {
    /// OSRM road routing
    #[default]
    Osrm,
    /// Straight line between origin and destination, no network
    Direct,
}

impl std::fmt::Display for RoutingProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Osrm => write!(f, "osrm"),
            Self::Direct => write!(f, "direct"),
        }
    }
}

/// Route planner configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutingAppConfig {
    /// Active provider (default: osrm)
    #[serde(default)]
    pub provider: RoutingProvider,

    /// OSRM settings, used when `provider = "osrm"`
    #[serde(default)]
    pub osrm: OsrmConfig,
}

impl RoutingAppConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the active provider is misconfigured.
    pub fn validate(&self) -> Result<(), String> {
        match self.provider {
            RoutingProvider::Osrm => self.osrm.validate(),
            RoutingProvider::Direct => Ok(()),
        }
    }
}
