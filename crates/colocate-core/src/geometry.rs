//! Geodesic kernel: distances, projections and bounding boxes.
//!
//! All distances are measured on the WGS-84 ellipsoid via `geo`'s `Geodesic`
//! metric space and expressed in statute miles.

use geo::{Destination, Distance, Geodesic, Point};

use crate::types::{BoundingBox, Coordinate};

pub const METERS_PER_MILE: f64 = 1_609.344;

const BEARING_NORTH: f64 = 0.0;
const BEARING_EAST: f64 = 90.0;
const BEARING_SOUTH: f64 = 180.0;
const BEARING_WEST: f64 = 270.0;

fn to_point(c: Coordinate) -> Point<f64> {
    Point::new(c.lon, c.lat)
}

fn from_point(p: Point<f64>) -> Coordinate {
    Coordinate::new(p.y(), p.x())
}

/// Projects `origin` along `bearing_degrees` (0 = north, clockwise) for
/// `distance_miles`.
#[must_use]
pub fn destination_point(origin: Coordinate, bearing_degrees: f64, distance_miles: f64) -> Coordinate {
    from_point(Geodesic.destination(
        to_point(origin),
        bearing_degrees,
        distance_miles * METERS_PER_MILE,
    ))
}

/// Geodesic distance between two coordinates in miles.
#[must_use]
pub fn distance_miles(a: Coordinate, b: Coordinate) -> f64 {
    if a == b {
        return 0.0;
    }
    Geodesic.distance(to_point(a), to_point(b)) / METERS_PER_MILE
}

/// Box whose edges lie `radius_miles` due north, south, east and west of `center`.
#[must_use]
pub fn make_bounding_box(center: Coordinate, radius_miles: f64) -> BoundingBox {
    let north = destination_point(center, BEARING_NORTH, radius_miles).lat;
    let south = destination_point(center, BEARING_SOUTH, radius_miles).lat;
    let east = destination_point(center, BEARING_EAST, radius_miles).lon;
    let west = destination_point(center, BEARING_WEST, radius_miles).lon;
    BoundingBox::new(south, north, west, east)
}

/// Inclusive point-in-box test; see [`BoundingBox::contains`].
#[must_use]
pub fn contains(point: Coordinate, bbox: &BoundingBox) -> bool {
    bbox.contains(point)
}

/// Radius of a circle around `center` reaching the box's south-west and
/// north-east corners, whichever is farther.
///
/// Only those two corners are checked. For a box placed asymmetrically around
/// `center` the north-west or south-east corner can be farther still.
#[must_use]
pub fn enclosing_radius_miles(center: Coordinate, bbox: &BoundingBox) -> f64 {
    let sw = distance_miles(center, bbox.south_west());
    let ne = distance_miles(center, bbox.north_east());
    sw.max(ne)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::SQRT_2;

    use super::*;

    const TIMES_SQUARE: Coordinate = Coordinate::new(40.7580, -73.9855);

    fn sample_centers() -> Vec<Coordinate> {
        vec![
            TIMES_SQUARE,
            Coordinate::new(37.323, -122.032),
            Coordinate::new(-33.8688, 151.2093),
            Coordinate::new(0.0, 0.0),
            Coordinate::new(64.1466, -21.9426),
            Coordinate::new(-54.8019, -68.3030),
        ]
    }

    #[test]
    fn destination_north_increases_latitude_only() {
        let moved = destination_point(TIMES_SQUARE, 0.0, 10.0);
        assert!(moved.lat > TIMES_SQUARE.lat);
        assert!((moved.lon - TIMES_SQUARE.lon).abs() < 1e-9);
        assert!((distance_miles(TIMES_SQUARE, moved) - 10.0).abs() < 1e-6);
    }

    #[test]
    fn destination_cardinal_bearings_move_the_expected_way() {
        let east = destination_point(TIMES_SQUARE, 90.0, 1.0);
        let south = destination_point(TIMES_SQUARE, 180.0, 1.0);
        let west = destination_point(TIMES_SQUARE, 270.0, 1.0);
        assert!(east.lon > TIMES_SQUARE.lon);
        assert!(south.lat < TIMES_SQUARE.lat);
        assert!(west.lon < TIMES_SQUARE.lon);
    }

    #[test]
    fn box_around_point_contains_point() {
        for center in sample_centers() {
            for radius in [0.01, 0.5, 1.0, 5.0, 25.0, 100.0] {
                let bbox = make_bounding_box(center, radius);
                assert!(bbox.south <= bbox.north);
                assert!(
                    contains(center, &bbox),
                    "{center:?} not inside its own {radius}-mile box {bbox:?}"
                );
            }
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_identity() {
        let points = sample_centers();
        for a in &points {
            assert_eq!(distance_miles(*a, *a), 0.0);
            for b in &points {
                let ab = distance_miles(*a, *b);
                let ba = distance_miles(*b, *a);
                assert!((ab - ba).abs() < 1e-9, "{a:?} -> {b:?}: {ab} vs {ba}");
            }
        }
    }

    #[test]
    fn times_square_neighbor_is_about_six_hundredths_of_a_mile() {
        let d = distance_miles(TIMES_SQUARE, Coordinate::new(40.7589, -73.9851));
        assert!((d - 0.06).abs() <= 0.02, "distance was {d}");
    }

    #[test]
    fn enclosing_radius_of_synthesized_box_reaches_its_corners() {
        // The radius is measured to the box corners, so a box built with
        // radius r yields about r * sqrt(2), not r.
        for center in sample_centers() {
            for radius in [0.5, 1.0, 5.0, 10.0] {
                let bbox = make_bounding_box(center, radius);
                let recovered = enclosing_radius_miles(center, &bbox);
                assert!(recovered >= radius, "{recovered} < {radius} at {center:?}");
                assert!(
                    (recovered / radius - SQRT_2).abs() < 0.01,
                    "recovered {recovered} for radius {radius} at {center:?}"
                );
            }
        }
    }

    #[test]
    fn enclosing_radius_uses_only_diagonal_corners() {
        let center = Coordinate::new(0.0, 0.0);
        // North-west corner is far away; the two-corner rule ignores it.
        let bbox = BoundingBox::new(0.0, 1.0, -1.0, 0.0);
        let sw = distance_miles(center, bbox.south_west());
        let ne = distance_miles(center, bbox.north_east());
        let nw = distance_miles(center, Coordinate::new(1.0, -1.0));
        let r = enclosing_radius_miles(center, &bbox);
        assert_eq!(r, sw.max(ne));
        assert!(nw > r);
    }

    #[test]
    fn box_built_from_enclosing_radius_contains_native_box() {
        let center = Coordinate::new(37.323, -122.032);
        let native = BoundingBox::new(37.25, 37.34, -122.09, -121.99);
        let radius = enclosing_radius_miles(center, &native);
        let search = make_bounding_box(center, radius);
        assert!(search.contains(native.south_west()));
        assert!(search.contains(native.north_east()));
    }
}
