//! OSRM HTTP route source.
//!
//! Queries the OSRM `route` service for a driving route between two
//! coordinates. OSRM does not geocode, so origins and destinations must be
//! given in `"lat,lng"` form; anything else is reported as unresolvable.

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{Coordinate, RouteSummary};

use super::error::RouteError;
use super::source::RouteSource;

/// Default base URL (the public OSRM demo server).
const DEFAULT_BASE_URL: &str = "https://router.project-osrm.org";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

const METERS_PER_MILE: f64 = 1609.344;

/// Configuration for the OSRM client.
#[derive(Debug, Clone)]
pub struct OsrmConfig {
    /// Base URL of the OSRM server
    pub base_url: String,
    /// Routing profile segment of the URL
    pub profile: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OsrmConfig {
    /// Create a config pointing at the given server.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Set the routing profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = profile.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            profile: "driving".to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }
}

/// OSRM route client.
///
/// Uses a semaphore to limit concurrent requests to the routing server.
#[derive(Debug, Clone)]
pub struct OsrmClient {
    http: reqwest::Client,
    base_url: String,
    profile: String,
    semaphore: Arc<Semaphore>,
}

impl OsrmClient {
    /// Create a new client with the given configuration.
    pub fn new(config: OsrmConfig) -> Result<Self, RouteError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Build the route request URL. OSRM expects `lng,lat` order.
    fn route_url(&self, from: &Coordinate, to: &Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{:.6},{:.6};{:.6},{:.6}",
            self.base_url,
            self.profile,
            from.longitude(),
            from.latitude(),
            to.longitude(),
            to.latitude(),
        )
    }
}

impl RouteSource for OsrmClient {
    async fn resolve(&self, origin: &str, destination: &str) -> Result<RouteSummary, RouteError> {
        let from = parse_location(origin)?;
        let to = parse_location(destination)?;

        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| RouteError::Api {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = self.route_url(&from, &to);
        debug!(%url, "requesting route");

        let response = self
            .http
            .get(&url)
            .query(&[("overview", "simplified"), ("geometries", "geojson")])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        // OSRM reports routing failures as 400 with a JSON code
        let parsed: Result<OsrmRouteResponse, _> = serde_json::from_str(&body);

        if !status.is_success() {
            let message = match parsed {
                Ok(OsrmRouteResponse {
                    code,
                    message: Some(message),
                    ..
                }) => format!("{code}: {message}"),
                _ => body.chars().take(500).collect(),
            };
            return Err(RouteError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed = parsed.map_err(|e| RouteError::Json {
            message: e.to_string(),
        })?;

        convert_response(parsed, origin, destination)
    }
}

fn parse_location(location: &str) -> Result<Coordinate, RouteError> {
    location
        .parse()
        .map_err(|_| RouteError::UnresolvableLocation(location.to_string()))
}

/// Top-level OSRM `route` response.
#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    /// Meters
    distance: f64,
    /// Seconds
    duration: f64,
    geometry: OsrmGeometry,
}

/// GeoJSON LineString; positions are `[lng, lat]`.
#[derive(Debug, Deserialize)]
struct OsrmGeometry {
    coordinates: Vec<[f64; 2]>,
}

fn convert_response(
    response: OsrmRouteResponse,
    origin: &str,
    destination: &str,
) -> Result<RouteSummary, RouteError> {
    match response.code.as_str() {
        "Ok" => {}
        "NoRoute" => {
            return Err(RouteError::NoRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            });
        }
        other => {
            return Err(RouteError::Api {
                status: 200,
                message: response
                    .message
                    .unwrap_or_else(|| format!("unexpected code {other}")),
            });
        }
    }

    let route = response
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| RouteError::NoRoute {
            origin: origin.to_string(),
            destination: destination.to_string(),
        })?;

    let polyline = route
        .geometry
        .coordinates
        .iter()
        .map(|[lng, lat]| Coordinate::new(*lat, *lng))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| RouteError::InvalidRoute("geometry contains an invalid coordinate"))?;

    Ok(RouteSummary {
        distance_miles: route.distance / METERS_PER_MILE,
        duration_hours: route.duration / 3600.0,
        polyline,
    })
}
