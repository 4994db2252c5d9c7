//! Charging stop count.

use super::error::PlannerError;

/// Number of charging stops a trip needs.
///
/// The vehicle starts with `range × battery / 100` miles available. Each stop
/// after that is assumed to add `range × safety_buffer` miles, so the buffer
/// keeps drivers from planning to arrive on an empty battery.
///
/// # Examples
///
/// ```
/// use ev_route_server::planner::stops_needed;
///
/// // 200 miles on the current charge, 200 usable miles per stop
/// assert_eq!(stops_needed(450.0, 250.0, 80, 0.8).unwrap(), 2);
/// assert_eq!(stops_needed(150.0, 250.0, 80, 0.8).unwrap(), 0);
/// ```
pub fn stops_needed(
    total_distance_miles: f64,
    vehicle_range_miles: f64,
    battery_percent: i32,
    safety_buffer: f64,
) -> Result<u32, PlannerError> {
    if !vehicle_range_miles.is_finite() || vehicle_range_miles <= 0.0 {
        return Err(PlannerError::InvalidParameter(format!(
            "vehicle range must be positive, got {vehicle_range_miles}"
        )));
    }
    if !safety_buffer.is_finite() || safety_buffer <= 0.0 {
        return Err(PlannerError::InvalidParameter(format!(
            "safety buffer must be positive, got {safety_buffer}"
        )));
    }
    if !(0..=100).contains(&battery_percent) {
        return Err(PlannerError::InvalidParameter(format!(
            "battery percent must be between 0 and 100, got {battery_percent}"
        )));
    }
    if !total_distance_miles.is_finite() || total_distance_miles < 0.0 {
        return Err(PlannerError::InvalidParameter(format!(
            "trip distance must not be negative, got {total_distance_miles}"
        )));
    }

    let available = vehicle_range_miles * f64::from(battery_percent) / 100.0;
    if total_distance_miles <= available {
        return Ok(0);
    }

    let remaining = total_distance_miles - available;
    let per_stop = vehicle_range_miles * safety_buffer;

    // Float to int `as` saturates
    Ok((remaining / per_stop).ceil() as u32)
}
