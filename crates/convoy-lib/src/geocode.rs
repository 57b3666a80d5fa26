//! Geocoding client
//!
//! Resolves place names to coordinates (and back) against a Nominatim-style
//! service. Callers of the coordination system typically resolve places
//! before handing convoy snapshots to the merge engine; the core itself
//! never depends on this module.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use crate::models::Coordinate;

/// Per-request timeout for geocoding queries
pub const DEFAULT_GEOCODE_TIMEOUT: Duration = Duration::from_secs(5);

/// Identifies this client to the geocoding service
const USER_AGENT: &str = "convoy-coordinator/0.1";

/// A geocoded place
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub coordinate: Coordinate,
    pub display_name: Option<String>,
}

/// A reverse-geocoded address
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Address {
    pub formatted: Option<String>,
    pub road: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
}

/// Failure modes of the geocoding service
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("invalid geocoding service URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("geocoding request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("geocoding service returned HTTP {0}")]
    Status(u16),

    #[error("geocoding service returned unparseable coordinates: {0}")]
    MalformedCoordinate(String),
}

/// Nominatim search result; lat/lon arrive as strings and are parsed once
/// at ingestion.
#[derive(Debug, Deserialize)]
struct SearchResult {
    lat: String,
    lon: String,
    display_name: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct ReverseResult {
    display_name: Option<String>,
    #[serde(default)]
    address: ReverseAddress,
}

#[derive(Debug, Deserialize, Default)]
struct ReverseAddress {
    road: Option<String>,
    city: Option<String>,
    state: Option<String>,
    country: Option<String>,
    postcode: Option<String>,
}

/// HTTP client for a Nominatim-compatible geocoding service
pub struct GeocodeClient {
    client: Client,
    base_url: Url,
}

impl GeocodeClient {
    /// Create a client with the default 5 s request timeout
    pub fn new(base_url: &str) -> Result<Self, GeocodeError> {
        Self::with_timeout(base_url, DEFAULT_GEOCODE_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.as_str().trim_end_matches('/'), path)
    }

    /// Resolve a place name to coordinates. `Ok(None)` means the service
    /// answered but found nothing.
    pub async fn geocode(&self, query: &str) -> Result<Option<Place>, GeocodeError> {
        if query.is_empty() {
            return Ok(None);
        }

        debug!(query, "Geocoding place");
        let response = self
            .client
            .get(self.endpoint("search"))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let results: Vec<SearchResult> = response.json().await?;
        let result = match results.into_iter().next() {
            Some(result) => result,
            None => return Ok(None),
        };

        let lat = parse_axis(&result.lat)?;
        let lon = parse_axis(&result.lon)?;
        Ok(Some(Place {
            coordinate: Coordinate::new(lat, lon),
            display_name: result.display_name,
        }))
    }

    /// Resolve coordinates to a human-readable address
    pub async fn reverse(&self, lat: f64, lon: f64) -> Result<Option<Address>, GeocodeError> {
        debug!(lat, lon, "Reverse geocoding");
        let response = self
            .client
            .get(self.endpoint("reverse"))
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("format", "json".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let result: ReverseResult = response.json().await?;
        if result.display_name.is_none() {
            return Ok(None);
        }

        Ok(Some(Address {
            formatted: result.display_name,
            road: result.address.road,
            city: result.address.city,
            state: result.address.state,
            country: result.address.country,
            postcode: result.address.postcode,
        }))
    }

    /// Geocode several places, best effort: a failed lookup yields None for
    /// that entry without failing the batch.
    pub async fn batch_geocode(&self, queries: &[String]) -> Vec<Option<Place>> {
        let mut results = Vec::with_capacity(queries.len());
        for query in queries {
            match self.geocode(query).await {
                Ok(place) => results.push(place),
                Err(err) => {
                    warn!(query = %query, error = %err, "Batch geocode entry failed");
                    results.push(None);
                }
            }
        }
        results
    }
}

fn parse_axis(raw: &str) -> Result<f64, GeocodeError> {
    raw.parse::<f64>()
        .map_err(|_| GeocodeError::MalformedCoordinate(raw.to_string()))
}
