//! Planning error types.

use crate::domain::StationId;
use crate::routing::RouteError;

/// Errors from the planning calculations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlannerError {
    /// A calculation input is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A station's figures make it unusable for cost estimation
    #[error("station {station} has invalid data: {reason}")]
    InvalidStationData {
        station: StationId,
        reason: &'static str,
    },
}

/// Errors from planning a whole trip.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The trip request itself is malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The route could not be resolved
    #[error("route unavailable: {0}")]
    RouteUnavailable(#[from] RouteError),

    /// Planner misconfiguration
    #[error("internal error: {0}")]
    Internal(String),
}
