//! CLI configuration

use anyhow::Result;
use serde::Deserialize;

/// Service endpoints and timeouts, loaded from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct CliConfig {
    /// Routing service base URL
    #[serde(default = "default_osrm_url")]
    pub osrm_url: String,

    /// Geocoding service base URL
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// Routing request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_osrm_url() -> String {
    "https://router.project-osrm.org".to_string()
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

impl CliConfig {
    /// Load configuration from `CONVOY_*` environment variables, falling
    /// back to the public service defaults.
    pub fn load() -> Result<Self> {
        let config = config::Config::builder()
            .add_source(config::Environment::with_prefix("CONVOY"))
            .build()?;

        Ok(config.try_deserialize().unwrap_or_else(|_| CliConfig {
            osrm_url: default_osrm_url(),
            geocode_url: default_geocode_url(),
            request_timeout_secs: default_request_timeout(),
        }))
    }
}
