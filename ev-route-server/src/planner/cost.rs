//! Charging time and cost estimates.

use tracing::warn;

use super::error::PlannerError;
use super::matcher::StationMatch;
use super::plan::StopPlan;

/// Typical EV consumption (kWh per mile).
pub const DEFAULT_ENERGY_PER_MILE_KWH: f64 = 0.3;

/// Estimate one stop.
///
/// Each stop is assumed to add `range × safety_buffer` miles of charge.
/// Stations whose power or price would make the figures meaningless are
/// rejected.
pub fn estimate_stop(
    candidate: &StationMatch<'_>,
    vehicle_range_miles: f64,
    safety_buffer: f64,
    energy_per_mile_kwh: f64,
) -> Result<StopPlan, PlannerError> {
    let station = candidate.station;

    if !station.power_kw.is_finite() || station.power_kw <= 0.0 {
        return Err(PlannerError::InvalidStationData {
            station: station.id.clone(),
            reason: "power must be a positive number of kW",
        });
    }
    if !station.cost_per_kwh.is_finite() || station.cost_per_kwh < 0.0 {
        return Err(PlannerError::InvalidStationData {
            station: station.id.clone(),
            reason: "cost per kWh must not be negative",
        });
    }

    let charge_miles = vehicle_range_miles * safety_buffer;
    let energy = charge_miles * energy_per_mile_kwh;

    Ok(StopPlan {
        station: station.clone(),
        distance_from_route_miles: candidate.distance_from_route_miles,
        estimated_energy_kwh: energy,
        estimated_charging_hours: energy / station.power_kw,
        estimated_charging_cost: energy * station.cost_per_kwh,
    })
}

/// Estimate every candidate, keeping input order.
///
/// Stations with invalid data are logged and left out; the rest of the batch
/// is unaffected.
pub fn estimate(
    candidates: &[StationMatch<'_>],
    vehicle_range_miles: f64,
    safety_buffer: f64,
    energy_per_mile_kwh: f64,
) -> Vec<StopPlan> {
    candidates
        .iter()
        .filter_map(|candidate| {
            match estimate_stop(
                candidate,
                vehicle_range_miles,
                safety_buffer,
                energy_per_mile_kwh,
            ) {
                Ok(stop) => Some(stop),
                Err(e) => {
                    warn!(error = %e, "skipping station");
                    None
                }
            }
        })
        .collect()
}

/// Summed figures for a set of stops.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TripTotals {
    pub energy_kwh: f64,
    pub cost: f64,
    pub charging_hours: f64,
}

/// Sum energy, cost and time over `stops`. No rounding is applied.
pub fn aggregate(stops: &[StopPlan]) -> TripTotals {
    stops.iter().fold(TripTotals::default(), |acc, stop| TripTotals {
        energy_kwh: acc.energy_kwh + stop.estimated_energy_kwh,
        cost: acc.cost + stop.estimated_charging_cost,
        charging_hours: acc.charging_hours + stop.estimated_charging_hours,
    })
}
