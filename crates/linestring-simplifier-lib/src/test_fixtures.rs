//! Shared geometry fixtures for unit tests

use crate::{Geometry, Polyline};

/// Validated polyline from `[longitude, latitude]` pairs
pub fn polyline(coords: &[[f64; 2]]) -> Polyline {
    Polyline::from_geometry(&Geometry::line_string(coords)).unwrap()
}

/// Points on a circle of `radius` degrees around (0, 0), sweeping `sweep` degrees
pub fn arc(points: usize, radius: f64, sweep: f64) -> Vec<[f64; 2]> {
    (0..points)
        .map(|i| {
            let angle = (i as f64 / (points - 1) as f64 * sweep).to_radians();
            [radius * angle.cos(), radius * angle.sin()]
        })
        .collect()
}

/// Staircase walking north-east through San Francisco with right-angle turns
pub fn staircase() -> Vec<[f64; 2]> {
    vec![
        [-122.4194, 37.7749],
        [-122.4194, 37.7849],
        [-122.4094, 37.7849],
        [-122.4094, 37.7949],
        [-122.3994, 37.7949],
        [-122.3994, 37.8049],
        [-122.3894, 37.8049],
        [-122.3894, 37.8149],
    ]
}

/// A slowly wandering track with small lateral noise, `points` long
pub fn wiggly_track(points: usize) -> Vec<[f64; 2]> {
    (0..points)
        .map(|i| {
            let t = i as f64 / points as f64;
            [
                -0.1 + t * 0.1 + (t * 30.0).cos() * 0.001,
                51.5 + t * 0.1 + (t * 50.0).sin() * 0.001,
            ]
        })
        .collect()
}
