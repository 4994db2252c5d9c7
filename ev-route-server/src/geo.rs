//! Great-circle distance.
//!
//! Straight-line distances over the Earth's surface, used for station
//! proximity. Road distances come from the route source, never from here.

use crate::domain::{Coordinate, Station};

/// Mean Earth radius in statute miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Haversine distance between two coordinates, in miles.
pub fn distance_miles(a: &Coordinate, b: &Coordinate) -> f64 {
    let lat1 = a.latitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let delta_lat = (b.latitude() - a.latitude()).to_radians();
    let delta_lng = (b.longitude() - a.longitude()).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lng / 2.0).sin().powi(2);

    // h can exceed 1 by an ulp for antipodal points
    let c = 2.0 * h.sqrt().min(1.0).asin();

    EARTH_RADIUS_MILES * c
}

/// Stations within `radius_miles` of `center`, nearest first.
///
/// Ties are broken by station id so the order is deterministic.
pub fn within_radius<'a>(
    center: &Coordinate,
    stations: &'a [Station],
    radius_miles: f64,
) -> Vec<(&'a Station, f64)> {
    let mut nearby: Vec<(&Station, f64)> = stations
        .iter()
        .map(|s| (s, distance_miles(center, &s.location)))
        .filter(|(_, d)| *d <= radius_miles)
        .collect();

    nearby.sort_by(|(a, da), (b, db)| da.total_cmp(db).then_with(|| a.id.cmp(&b.id)));
    nearby
}
