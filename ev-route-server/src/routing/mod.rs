//! Route sources.
//!
//! The planner never computes paths itself. It asks a [`RouteSource`] for
//! the total distance, duration and an overview polyline of the drive.
//!
//! Two sources are provided:
//! - [`OsrmClient`] queries an OSRM server over HTTP. OSRM does not geocode,
//!   so locations must be `"lat,lng"` strings.
//! - [`FixtureRouteSource`] serves routes from a JSON file, for development
//!   without a routing server.

mod client;
mod error;
mod fixture;
mod source;

pub use client::{OsrmClient, OsrmConfig};
pub use error::RouteError;
pub use fixture::FixtureRouteSource;
pub use source::{RouteBackend, RouteSource};
