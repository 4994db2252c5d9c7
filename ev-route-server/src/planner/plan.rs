//! Trip requests and results.

use crate::domain::{RouteSummary, Station};

use super::error::PlanError;

/// A request to plan one trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRequest {
    /// Opaque origin text, handed to the route source as given.
    pub origin: String,
    pub destination: String,
    /// Full-charge range of the vehicle (miles).
    pub vehicle_range_miles: f64,
    /// Current state of charge, `0..=100`.
    pub battery_percent: i32,
}

impl TripRequest {
    pub fn new(
        origin: impl Into<String>,
        destination: impl Into<String>,
        vehicle_range_miles: f64,
        battery_percent: i32,
    ) -> Self {
        Self {
            origin: origin.into(),
            destination: destination.into(),
            vehicle_range_miles,
            battery_percent,
        }
    }

    /// Check the request before any work is done on it.
    pub fn validate(&self) -> Result<(), PlanError> {
        if self.origin.trim().is_empty() {
            return Err(PlanError::InvalidRequest("origin is required".to_string()));
        }
        if self.destination.trim().is_empty() {
            return Err(PlanError::InvalidRequest(
                "destination is required".to_string(),
            ));
        }
        if !self.vehicle_range_miles.is_finite() || self.vehicle_range_miles <= 0.0 {
            return Err(PlanError::InvalidRequest(
                "vehicle range must be a positive number of miles".to_string(),
            ));
        }
        if !(0..=100).contains(&self.battery_percent) {
            return Err(PlanError::InvalidRequest(format!(
                "battery percent must be between 0 and 100, got {}",
                self.battery_percent
            )));
        }
        Ok(())
    }
}

/// One proposed charging stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopPlan {
    pub station: Station,
    pub distance_from_route_miles: f64,
    pub estimated_energy_kwh: f64,
    pub estimated_charging_hours: f64,
    pub estimated_charging_cost: f64,
}

/// A planned trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripPlan {
    pub route: RouteSummary,

    pub charging_stops_needed: u32,

    /// Candidate stops, nearest to the route first. May hold more entries
    /// than `charging_stops_needed` to give the driver options.
    pub stops: Vec<StopPlan>,

    /// Energy the whole drive consumes (kWh).
    pub trip_energy_kwh: f64,

    /// Totals over the first `charging_stops_needed` stops.
    pub total_estimated_energy_kwh: f64,
    pub total_estimated_cost: f64,
    pub total_charging_hours: f64,
}
