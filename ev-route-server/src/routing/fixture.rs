//! Fixture route source for development and testing.
//!
//! Serves routes loaded from a JSON file as if they came from a live
//! routing service. Lookups ignore case and surrounding whitespace, and a
//! route stored in one direction also answers the reverse trip.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::domain::{Coordinate, RouteSummary};

use super::error::RouteError;
use super::source::RouteSource;

/// One route in a fixture file.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FixtureRoute {
    origin: String,
    destination: String,
    distance_miles: f64,
    duration_hours: f64,
    polyline: Vec<Coordinate>,
}

type RouteKey = (String, String);

fn key(origin: &str, destination: &str) -> RouteKey {
    (
        origin.trim().to_lowercase(),
        destination.trim().to_lowercase(),
    )
}

/// Route source backed by a fixed set of routes.
#[derive(Debug, Clone, Default)]
pub struct FixtureRouteSource {
    routes: Arc<HashMap<RouteKey, RouteSummary>>,
}

impl FixtureRouteSource {
    /// Create an empty source. Every lookup fails until routes are added.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load routes from a JSON file containing an array of routes.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RouteError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| RouteError::Fixture(format!("failed to read {path:?}: {e}")))?;
        Self::from_json(&json)
            .map_err(|e| RouteError::Fixture(format!("failed to parse {path:?}: {e}")))
    }

    /// Parse routes from a JSON array.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let routes: Vec<FixtureRoute> = serde_json::from_str(json)?;

        let mut source = Self::new();
        for r in routes {
            source = source.with_route(
                &r.origin,
                &r.destination,
                RouteSummary {
                    distance_miles: r.distance_miles,
                    duration_hours: r.duration_hours,
                    polyline: r.polyline,
                },
            );
        }
        Ok(source)
    }

    /// Add a route, replacing any existing route for the same pair.
    pub fn with_route(mut self, origin: &str, destination: &str, route: RouteSummary) -> Self {
        Arc::make_mut(&mut self.routes).insert(key(origin, destination), route);
        self
    }

    /// Number of stored routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Whether no routes are stored.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn lookup(&self, origin: &str, destination: &str) -> Option<RouteSummary> {
        if let Some(route) = self.routes.get(&key(origin, destination)) {
            return Some(route.clone());
        }

        self.routes.get(&key(destination, origin)).map(|route| {
            let mut reversed = route.clone();
            reversed.polyline.reverse();
            reversed
        })
    }
}

impl RouteSource for FixtureRouteSource {
    async fn resolve(&self, origin: &str, destination: &str) -> Result<RouteSummary, RouteError> {
        self.lookup(origin, destination)
            .ok_or_else(|| RouteError::NoRoute {
                origin: origin.to_string(),
                destination: destination.to_string(),
            })
    }
}
