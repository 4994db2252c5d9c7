//! The route source capability.

use std::future::Future;
use std::sync::Arc;

use crate::domain::RouteSummary;

use super::client::OsrmClient;
use super::error::RouteError;
use super::fixture::FixtureRouteSource;

/// Anything that can turn an origin/destination pair into a route.
///
/// Origins and destinations are opaque strings; each source decides what it
/// can resolve. Implementations may be slow and network-bound, so callers
/// should not hold locks across `resolve`.
pub trait RouteSource: Send + Sync {
    fn resolve(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<RouteSummary, RouteError>> + Send;
}

impl<T: RouteSource> RouteSource for Arc<T> {
    fn resolve(
        &self,
        origin: &str,
        destination: &str,
    ) -> impl Future<Output = Result<RouteSummary, RouteError>> + Send {
        (**self).resolve(origin, destination)
    }
}

/// The route sources the server can be configured with.
#[derive(Debug, Clone)]
pub enum RouteBackend {
    /// Live OSRM routing service
    Osrm(OsrmClient),
    /// Routes loaded from a fixture file
    Fixture(FixtureRouteSource),
}

impl RouteSource for RouteBackend {
    async fn resolve(&self, origin: &str, destination: &str) -> Result<RouteSummary, RouteError> {
        match self {
            RouteBackend::Osrm(client) => client.resolve(origin, destination).await,
            RouteBackend::Fixture(fixtures) => fixtures.resolve(origin, destination).await,
        }
    }
}
