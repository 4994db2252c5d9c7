//! Resolved driving routes.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// Distance, duration and overview geometry of a driving route.
///
/// The polyline is a coarse overview of the path, used for proximity checks
/// rather than navigation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteSummary {
    pub distance_miles: f64,
    pub duration_hours: f64,
    pub polyline: Vec<Coordinate>,
}
