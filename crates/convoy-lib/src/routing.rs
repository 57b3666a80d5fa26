//! Routing oracle client
//!
//! Issues travel-time/distance queries for an ordered waypoint sequence to an
//! external OSRM-style routing service. The oracle is an untrusted, fallible
//! dependency: every failure mode is reported as a `RoutingError` value and
//! the caller decides what "unknown" means. No retries; each call is a single
//! best-effort attempt bounded by the request timeout.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::models::Coordinate;

/// Per-request timeout for oracle queries
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(10);

/// Travel summary for one routed waypoint sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteSummary {
    pub duration_secs: f64,
    pub distance_meters: f64,
}

/// Failure modes of the routing oracle
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("a route query needs at least 2 waypoints, got {count}")]
    NotEnoughWaypoints { count: usize },

    #[error("invalid routing service URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("routing request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("routing service returned HTTP {0}")]
    Status(u16),

    #[error("routing service response contained no route")]
    NoRoute,
}

/// Travel-time source for the merge engine.
///
/// The trait seam keeps the engine testable without a network.
#[async_trait]
pub trait RouteOracle: Send + Sync {
    /// Query duration/distance for an ordered waypoint sequence (>= 2 points)
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteSummary, RoutingError>;
}

/// OSRM route response (only the fields the core reads)
#[derive(Debug, Deserialize)]
struct OsrmResponse {
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    duration: f64,
    distance: f64,
}

/// HTTP client for an OSRM-compatible routing service
pub struct OsrmClient {
    client: Client,
    base_url: Url,
}

impl OsrmClient {
    /// Create a client with the default 10 s request timeout
    pub fn new(base_url: &str) -> Result<Self, RoutingError> {
        Self::with_timeout(base_url, DEFAULT_ORACLE_TIMEOUT)
    }

    /// Create a client with a custom request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, RoutingError> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(base_url)?;
        Ok(Self { client, base_url })
    }

    /// Format waypoints in the service's expected `lon,lat;lon,lat` axis order
    fn waypoint_path(waypoints: &[Coordinate]) -> String {
        waypoints
            .iter()
            .map(|c| format!("{},{}", c.lon, c.lat))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[async_trait]
impl RouteOracle for OsrmClient {
    async fn route(&self, waypoints: &[Coordinate]) -> Result<RouteSummary, RoutingError> {
        if waypoints.len() < 2 {
            return Err(RoutingError::NotEnoughWaypoints {
                count: waypoints.len(),
            });
        }

        let url = format!(
            "{}/route/v1/driving/{}",
            self.base_url.as_str().trim_end_matches('/'),
            Self::waypoint_path(waypoints)
        );
        debug!(url = %url, "Querying routing oracle");

        let response = self
            .client
            .get(&url)
            .query(&[("overview", "false")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(RoutingError::Status(response.status().as_u16()));
        }

        let body: OsrmResponse = response.json().await?;
        let route = body.routes.first().ok_or(RoutingError::NoRoute)?;

        Ok(RouteSummary {
            duration_secs: route.duration,
            distance_meters: route.distance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn delhi() -> Coordinate {
        Coordinate::new(28.6139, 77.209)
    }

    fn mumbai() -> Coordinate {
        Coordinate::new(19.076, 72.8777)
    }

    #[tokio::test]
    async fn test_route_success_parses_duration_and_distance() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/route/v1/driving/77.209,28.6139;72.8777,19.076")
            .match_query(Matcher::UrlEncoded("overview".into(), "false".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"routes":[{"duration":3600.5,"distance":50000.0}]}"#)
            .create_async()
            .await;

        let client = OsrmClient::new(&server.url()).unwrap();
        let summary = client.route(&[delhi(), mumbai()]).await.unwrap();

        assert!((summary.duration_secs - 3600.5).abs() < f64::EPSILON);
        assert!((summary.distance_meters - 50000.0).abs() < f64::EPSILON);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_route_rejects_single_waypoint_without_request() {
        // Base URL is unroutable; the call must fail before any request
        let client = OsrmClient::new("http://127.0.0.1:1").unwrap();
        let err = client.route(&[delhi()]).await.unwrap_err();
        assert!(matches!(err, RoutingError::NotEnoughWaypoints { count: 1 }));
    }

    #[tokio::test]
    async fn test_route_missing_routes_is_no_route() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/route/v1/driving/.*".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":"NoRoute"}"#)
            .create_async()
            .await;

        let client = OsrmClient::new(&server.url()).unwrap();
        let err = client.route(&[delhi(), mumbai()]).await.unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute));
    }

    #[tokio::test]
    async fn test_route_empty_routes_is_no_route() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/route/v1/driving/.*".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"routes":[]}"#)
            .create_async()
            .await;

        let client = OsrmClient::new(&server.url()).unwrap();
        let err = client.route(&[delhi(), mumbai()]).await.unwrap_err();
        assert!(matches!(err, RoutingError::NoRoute));
    }

    #[tokio::test]
    async fn test_route_http_error_is_status() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", Matcher::Regex(r"^/route/v1/driving/.*".into()))
            .match_query(Matcher::Any)
            .with_status(500)
            .create_async()
            .await;

        let client = OsrmClient::new(&server.url()).unwrap();
        let err = client.route(&[delhi(), mumbai()]).await.unwrap_err();
        assert!(matches!(err, RoutingError::Status(500)));
    }

    #[tokio::test]
    async fn test_route_unreachable_service_is_request_error() {
        let client = OsrmClient::new("http://127.0.0.1:1").unwrap();
        let err = client.route(&[delhi(), mumbai()]).await.unwrap_err();
        assert!(matches!(err, RoutingError::Request(_)));
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        assert!(matches!(
            OsrmClient::new("not a url"),
            Err(RoutingError::InvalidBaseUrl(_))
        ));
    }
}
