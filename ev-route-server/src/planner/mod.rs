//! Charging stop planning.
//!
//! Given a resolved route, a vehicle's range and its current charge, works
//! out how many charging stops are needed, which catalog stations lie close
//! enough to the route, and what charging at them would cost.

mod config;
mod cost;
mod error;
mod matcher;
mod plan;
mod service;
mod stops;


pub use config::PlannerConfig;
pub use cost::{DEFAULT_ENERGY_PER_MILE_KWH, TripTotals, aggregate, estimate, estimate_stop};
pub use error::{PlanError, PlannerError};
pub use matcher::{StationMatch, match_stations};
pub use plan::{StopPlan, TripPlan, TripRequest};
pub use service::{PlanKey, RoutePlanningService};
pub use stops::stops_needed;
