//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::{Coordinate, Station};
use crate::planner::{StopPlan, TripPlan, TripRequest};

/// Battery level assumed when a plan request omits it.
pub const DEFAULT_BATTERY_PERCENT: i32 = 80;

/// Search radius for station lookups without an explicit radius (miles).
pub const DEFAULT_NEARBY_RADIUS_MILES: f64 = 10.0;

fn default_battery_percent() -> i32 {
    DEFAULT_BATTERY_PERCENT
}

/// Request to plan a trip.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRouteRequest {
    pub origin: String,

    pub destination: String,

    /// Vehicle range on a full charge (miles)
    pub ev_range: f64,

    /// Current charge, 0 to 100
    #[serde(default = "default_battery_percent")]
    pub battery_percent: i32,
}

impl PlanRouteRequest {
    pub fn to_trip_request(&self) -> TripRequest {
        TripRequest::new(
            self.origin.clone(),
            self.destination.clone(),
            self.ev_range,
            self.battery_percent,
        )
    }
}

/// Route part of a plan response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResult {
    pub origin: String,
    pub destination: String,

    /// Road distance (miles)
    pub distance: f64,

    /// Driving time (hours)
    pub duration: f64,

    pub charging_stops: u32,

    /// Energy used by the whole drive (kWh)
    pub estimated_energy: f64,

    /// Energy charged at the required stops (kWh)
    pub total_energy: f64,

    pub total_cost: f64,

    /// Time spent charging at the required stops (hours)
    pub total_charging_time: f64,

    pub polyline: Vec<Coordinate>,
}

/// A candidate charging stop in a plan response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopResult {
    #[serde(flatten)]
    pub station: Station,

    pub distance_from_route: f64,

    pub estimated_energy: f64,

    /// Hours
    pub estimated_charging_time: f64,

    pub estimated_charging_cost: f64,
}

/// Response to a plan request.
#[derive(Debug, Serialize)]
pub struct PlanRouteResponse {
    pub route: RouteResult,
    pub stations: Vec<StopResult>,
}

impl PlanRouteResponse {
    pub fn from_plan(request: &TripRequest, plan: &TripPlan) -> Self {
        Self {
            route: RouteResult {
                origin: request.origin.clone(),
                destination: request.destination.clone(),
                distance: round2(plan.route.distance_miles),
                duration: round2(plan.route.duration_hours),
                charging_stops: plan.charging_stops_needed,
                estimated_energy: round2(plan.trip_energy_kwh),
                total_energy: round2(plan.total_estimated_energy_kwh),
                total_cost: round2(plan.total_estimated_cost),
                total_charging_time: round2(plan.total_charging_hours),
                polyline: plan.route.polyline.clone(),
            },
            stations: plan.stops.iter().map(StopResult::from_stop).collect(),
        }
    }
}

impl StopResult {
    pub fn from_stop(stop: &StopPlan) -> Self {
        Self {
            station: stop.station.clone(),
            distance_from_route: round2(stop.distance_from_route_miles),
            estimated_energy: round2(stop.estimated_energy_kwh),
            estimated_charging_time: round2(stop.estimated_charging_hours),
            estimated_charging_cost: round2(stop.estimated_charging_cost),
        }
    }
}

/// Query for listing stations, optionally around a point.
#[derive(Debug, Deserialize)]
pub struct StationQuery {
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    /// Miles
    pub radius: Option<f64>,
}

/// A station with its distance from the query point.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyStationResult {
    #[serde(flatten)]
    pub station: Station,

    /// Miles
    pub distance: f64,
}

/// Request to review a station.
#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub rating: i64,
    #[serde(default)]
    pub comment: String,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Round for presentation. Internal figures are never rounded.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
