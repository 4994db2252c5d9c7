//! Route source error types.

use std::time::Duration;

/// Errors from resolving a route.
///
/// Any of these means the route is unavailable for this request. None are
/// retried automatically; the caller decides whether to try again.
#[derive(Debug, thiserror::Error)]
pub enum RouteError {
    /// HTTP request failed (network error, connect timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Routing backend returned an error status or error code
    #[error("routing API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Response body could not be parsed
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Location cannot be turned into coordinates by this source
    #[error("cannot resolve location {0:?}")]
    UnresolvableLocation(String),

    /// No drivable route between the two locations
    #[error("no route from {origin:?} to {destination:?}")]
    NoRoute { origin: String, destination: String },

    /// Route came back but is unusable for planning
    #[error("invalid route: {0}")]
    InvalidRoute(&'static str),

    /// Route source did not answer within the deadline
    #[error("route lookup timed out after {0:?}")]
    Timeout(Duration),

    /// Fixture data could not be loaded
    #[error("fixture error: {0}")]
    Fixture(String),
}
