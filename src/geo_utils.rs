//! Geographic utility functions

use crate::route::TrackPoint;
use crate::GpsPoint;

/// Mean Earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Calculate the haversine distance between two GPS points in meters
pub fn haversine_distance(p1: &GpsPoint, p2: &GpsPoint) -> f64 {
    let lat1 = p1.latitude.to_radians();
    let lat2 = p2.latitude.to_radians();
    let dlat = (p2.latitude - p1.latitude).to_radians();
    let dlon = (p2.longitude - p1.longitude).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Total length of a trajectory in meters.
///
/// Sums the haversine distance over consecutive samples; returns 0.0 for
/// fewer than two points.
pub fn trajectory_distance(points: &[TrackPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    points
        .windows(2)
        .map(|pair| haversine_distance(&pair[0].position, &pair[1].position))
        .sum()
}
