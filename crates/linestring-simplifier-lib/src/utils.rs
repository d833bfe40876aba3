//! Great-circle primitives for longitude/latitude coordinates
//!
//! Coordinates are `geo::Coord<f64>` with `x` = longitude and `y` = latitude, in degrees.
//! They are treated as points on a sphere solely for distance and bearing computation.

use crate::{Result, SimplifyError};
use geo::{Bearing, Coord, CrossTrackDistance, Distance, Haversine, Point};

/// Earth's mean radius in meters, as used by `geo`'s haversine measure
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Coordinates closer than this (meters) are the same position on the sphere
pub const COINCIDENT_TOLERANCE_M: f64 = 1e-6;

/// Great-circle (haversine) distance between two coordinates in meters
///
/// Symmetric, zero for identical coordinates, and satisfies the triangle
/// inequality up to floating point precision.
#[inline]
pub fn haversine_distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Haversine.distance(Point::from(a), Point::from(b))
}

/// Whether two coordinates name the same position on the sphere
///
/// Catches positions written two ways (`[180, 0]` / `[-180, 0]`, or any two longitudes
/// at a pole), whose computed distance is a rounding residue rather than exactly zero.
#[inline]
pub fn coincident(a: Coord<f64>, b: Coord<f64>) -> bool {
    a == b || haversine_distance(a, b) <= COINCIDENT_TOLERANCE_M
}

/// Initial bearing from `a` to `b`, in degrees clockwise from north
///
/// # Returns
/// A bearing in `[0, 360)`, or an `InvalidGeometry` error when `a` and `b` coincide
/// (the direction between identical points is undefined).
#[inline]
pub fn bearing(a: Coord<f64>, b: Coord<f64>) -> Result<f64> {
    if coincident(a, b) {
        return Err(SimplifyError::InvalidGeometry(format!(
            "bearing is undefined between coincident coordinates ({}, {}) and ({}, {})",
            a.x, a.y, b.x, b.y
        )));
    }
    Ok(bearing_unchecked(a, b))
}

/// Initial bearing without the coincidence check
#[inline]
pub(crate) fn bearing_unchecked(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let degrees = Haversine
        .bearing(Point::from(a), Point::from(b))
        .rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if degrees >= 360.0 { 0.0 } else { degrees }
}

/// Signed minimal rotation from `bearing1` to `bearing2`, in degrees
///
/// Positive values turn clockwise (right), negative values counter-clockwise (left).
/// The result lies in `(-180, 180]`.
#[inline]
pub fn angular_delta(bearing1: f64, bearing2: f64) -> f64 {
    let delta = (bearing2 - bearing1).rem_euclid(360.0);
    if delta > 180.0 { delta - 360.0 } else { delta }
}

/// Distance in meters from `point` to the great-circle segment `start`-`end`
///
/// Uses the cross-track distance when the point projects onto the segment, and the
/// distance to the nearer endpoint otherwise.
pub fn segment_distance(point: Coord<f64>, start: Coord<f64>, end: Coord<f64>) -> f64 {
    if start == end {
        return haversine_distance(point, start);
    }
    if point == start || point == end {
        return 0.0;
    }

    // Projection falls behind the segment start
    let relative = (bearing_unchecked(start, point) - bearing_unchecked(start, end)).to_radians();
    if relative.cos() < 0.0 {
        return haversine_distance(point, start);
    }

    let cross_track =
        Point::from(point).cross_track_distance(&Point::from(start), &Point::from(end));

    let angular_to_point = haversine_distance(start, point) / EARTH_RADIUS_M;
    let along_track = (angular_to_point.cos() / (cross_track / EARTH_RADIUS_M).cos())
        .clamp(-1.0, 1.0)
        .acos()
        * EARTH_RADIUS_M;
    if along_track > haversine_distance(start, end) {
        return haversine_distance(point, end);
    }

    cross_track.abs()
}

/// Total length in meters of the path through `coords` in order
pub fn path_length(coords: &[Coord<f64>]) -> f64 {
    coords
        .windows(2)
        .map(|pair| haversine_distance(pair[0], pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(x: f64, y: f64) -> Coord<f64> {
        Coord { x, y }
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        let d = haversine_distance(c(0.0, 0.0), c(0.0, 1.0));
        // One degree on a 6371 km sphere is ~111.19 km
        assert!((d - 111_195.08).abs() < 1.0, "got {}", d);
    }

    #[test]
    fn test_haversine_symmetric_and_zero() {
        let a = c(-122.4194, 37.7749);
        let b = c(-122.4094, 37.7849);
        assert!((haversine_distance(a, b) - haversine_distance(b, a)).abs() < 1e-9);
        assert_eq!(haversine_distance(a, a), 0.0);
    }

    #[test]
    fn test_haversine_triangle_inequality() {
        let a = c(0.0, 0.0);
        let b = c(1.0, 1.0);
        let m = c(0.3, 0.8);
        assert!(
            haversine_distance(a, b) <= haversine_distance(a, m) + haversine_distance(m, b) + 1e-6
        );
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = c(0.0, 0.0);
        assert!(bearing(origin, c(0.0, 1.0)).unwrap().abs() < 1e-9);
        assert!((bearing(origin, c(1.0, 0.0)).unwrap() - 90.0).abs() < 1e-9);
        assert!((bearing(origin, c(0.0, -1.0)).unwrap() - 180.0).abs() < 1e-9);
        assert!((bearing(origin, c(-1.0, 0.0)).unwrap() - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_identical_points_fails() {
        let a = c(10.0, 20.0);
        assert!(matches!(
            bearing(a, a),
            Err(SimplifyError::InvalidGeometry(_))
        ));
        assert!(bearing(c(180.0, 0.0), c(-180.0, 0.0)).is_err());
    }

    #[test]
    fn test_coincident_positions_written_two_ways() {
        assert!(coincident(c(1.0, 2.0), c(1.0, 2.0)));
        // Antimeridian: the computed distance is a rounding residue, not zero
        assert!(coincident(c(180.0, 0.0), c(-180.0, 0.0)));
        // Every longitude names the same pole
        assert!(coincident(c(0.0, 90.0), c(90.0, 90.0)));
        assert!(coincident(c(-45.0, -90.0), c(135.0, -90.0)));

        assert!(!coincident(c(0.0, 0.0), c(0.0, 0.00001)));
        assert!(!coincident(c(179.9, 0.0), c(-179.9, 0.0)));
    }

    #[test]
    fn test_angular_delta_range() {
        assert_eq!(angular_delta(10.0, 40.0), 30.0);
        assert_eq!(angular_delta(40.0, 10.0), -30.0);
        assert_eq!(angular_delta(350.0, 10.0), 20.0);
        assert_eq!(angular_delta(10.0, 350.0), -20.0);
        // Exactly opposite resolves to +180, never -180
        assert_eq!(angular_delta(0.0, 180.0), 180.0);
        assert_eq!(angular_delta(180.0, 0.0), 180.0);
    }

    #[test]
    fn test_segment_distance_on_meridian_is_zero() {
        let d = segment_distance(c(0.0, 1.0), c(0.0, 0.0), c(0.0, 2.0));
        assert!(d < 1e-6, "got {}", d);
    }

    #[test]
    fn test_segment_distance_perpendicular_offset() {
        // A point 0.01 degrees east of the equator-parallel segment midpoint
        let d = segment_distance(c(0.5, 0.01), c(0.0, 0.0), c(1.0, 0.0));
        let expected = haversine_distance(c(0.5, 0.0), c(0.5, 0.01));
        assert!((d - expected).abs() < 1.0, "got {} expected {}", d, expected);
    }

    #[test]
    fn test_segment_distance_beyond_endpoints() {
        let start = c(0.0, 0.0);
        let end = c(0.0, 1.0);
        let before = c(0.0, -0.5);
        let after = c(0.0, 1.5);
        assert!((segment_distance(before, start, end) - haversine_distance(before, start)).abs() < 1e-6);
        assert!((segment_distance(after, start, end) - haversine_distance(after, end)).abs() < 1e-6);
    }

    #[test]
    fn test_path_length() {
        let coords = vec![c(0.0, 0.0), c(0.0, 1.0), c(0.0, 2.0)];
        let expected = haversine_distance(c(0.0, 0.0), c(0.0, 2.0));
        assert!((path_length(&coords) - expected).abs() < 1e-6);
        assert_eq!(path_length(&coords[..1]), 0.0);
    }
}
