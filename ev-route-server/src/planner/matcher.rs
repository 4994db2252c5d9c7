//! Stations near a route.

use rayon::prelude::*;

use crate::domain::{Coordinate, Station};
use crate::geo;

/// Catalogs at least this large are scanned on the rayon pool.
const PARALLEL_THRESHOLD: usize = 512;

/// A station together with its distance from the route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationMatch<'a> {
    pub station: &'a Station,

    /// Straight-line distance to the nearest polyline point (miles).
    pub distance_from_route_miles: f64,
}

/// Stations within `max_distance_miles` of any point on the polyline.
///
/// Results are nearest first, ties broken by station id. Distance is measured
/// to polyline vertices, not to the segments between them, so sparse
/// polylines under-match.
pub fn match_stations<'a>(
    stations: &'a [Station],
    polyline: &[Coordinate],
    max_distance_miles: f64,
) -> Vec<StationMatch<'a>> {
    if stations.is_empty() || polyline.is_empty() {
        return Vec::new();
    }

    let within = |station: &'a Station| {
        let distance = distance_to_polyline(&station.location, polyline);
        (distance <= max_distance_miles).then_some(StationMatch {
            station,
            distance_from_route_miles: distance,
        })
    };

    let mut matches: Vec<StationMatch<'a>> = if stations.len() >= PARALLEL_THRESHOLD {
        stations.par_iter().filter_map(within).collect()
    } else {
        stations.iter().filter_map(within).collect()
    };

    matches.sort_by(|a, b| {
        a.distance_from_route_miles
            .total_cmp(&b.distance_from_route_miles)
            .then_with(|| a.station.id.cmp(&b.station.id))
    });
    matches
}

fn distance_to_polyline(point: &Coordinate, polyline: &[Coordinate]) -> f64 {
    polyline
        .iter()
        .map(|p| geo::distance_miles(point, p))
        .fold(f64::INFINITY, f64::min)
}
