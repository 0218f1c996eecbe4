//! Screen space hit testing of drawn features.

use egui::{Pos2, Vec2};

use crate::data::Coordinate;

/// Extra pixels around thin symbols, so they are clickable on touch screens too.
pub const TOLERANCE: f32 = 3.0;

pub fn circle_contains(center: Pos2, radius: f32, pointer: Pos2) -> bool {
    center.distance(pointer) <= radius + TOLERANCE
}

/// Whether `pointer` is within `half_width` of a polyline.
pub fn polyline_contains(points: &[Pos2], half_width: f32, pointer: Pos2) -> bool {
    points
        .windows(2)
        .any(|segment| distance_to_segment(segment[0], segment[1], pointer) <= half_width + TOLERANCE)
}

fn distance_to_segment(a: Pos2, b: Pos2, p: Pos2) -> f32 {
    let ab: Vec2 = b - a;
    let length_sq = ab.length_sq();
    if length_sq == 0.0 {
        return a.distance(p);
    }
    let t = ((p - a).dot(ab) / length_sq).clamp(0.0, 1.0);
    (a + ab * t).distance(p)
}

/// Even-odd rule point in polygon test. The ring does not need to be closed.
pub fn ring_contains(ring: &[Pos2], pointer: Pos2) -> bool {
    let mut inside = false;
    let mut previous = match ring.last() {
        Some(last) => *last,
        None => return false,
    };

    for &current in ring {
        if (current.y > pointer.y) != (previous.y > pointer.y) {
            let x = previous.x
                + (pointer.y - previous.y) / (current.y - previous.y) * (current.x - previous.x);
            if pointer.x < x {
                inside = !inside;
            }
        }
        previous = current;
    }

    inside
}

/// Whether `pointer` is inside the outer ring and outside of all holes.
pub fn polygon_contains(rings: &[Vec<Pos2>], pointer: Pos2) -> bool {
    match rings.split_first() {
        Some((outer, holes)) => {
            ring_contains(outer, pointer) && !holes.iter().any(|h| ring_contains(h, pointer))
        }
        None => false,
    }
}

/// Longitude shifted by whole turns to be within 180° of `reference`.
pub fn nearest_longitude(lon: f64, reference: f64) -> f64 {
    let mut lon = lon;
    while lon - reference > 180.0 {
        lon -= 360.0;
    }
    while reference - lon > 180.0 {
        lon += 360.0;
    }
    lon
}

/// Shift longitudes so that the first coordinate is the copy nearest to `reference` and
/// consecutive coordinates are never more than 180° apart, making lines which cross the
/// antimeridian take the short way round.
pub fn unwrap_antimeridian(coordinates: &[Coordinate], reference: f64) -> Vec<Coordinate> {
    let mut previous = reference;

    coordinates
        .iter()
        .map(|&[lon, lat]| {
            let lon = nearest_longitude(lon, previous);
            previous = lon;
            [lon, lat]
        })
        .collect()
}
