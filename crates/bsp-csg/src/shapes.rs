//! Ready-made test solids.

use nalgebra::Point3;

use crate::{Polygon, Triangle};

/// An axis-aligned cube as 12 outward-facing triangles.
///
/// `half_extent` is half the edge length, so `cube(origin, 1.0)` spans
/// `[-1, 1]` on every axis. The standard solid for exercising boolean
/// operations.
pub fn cube(center: Point3<f32>, half_extent: f32) -> Vec<Polygon> {
    let corner = |x: f32, y: f32, z: f32| {
        Point3::new(
            center.x + x * half_extent,
            center.y + y * half_extent,
            center.z + z * half_extent,
        )
    };

    let corners = [
        corner(-1.0, -1.0, -1.0),
        corner(1.0, -1.0, -1.0),
        corner(1.0, 1.0, -1.0),
        corner(-1.0, 1.0, -1.0),
        corner(-1.0, -1.0, 1.0),
        corner(1.0, -1.0, 1.0),
        corner(1.0, 1.0, 1.0),
        corner(-1.0, 1.0, 1.0),
    ];

    // Two triangles per face, wound counter-clockwise seen from outside.
    const FACES: [[usize; 3]; 12] = [
        [0, 3, 2], [0, 2, 1], // bottom (-z)
        [4, 5, 6], [4, 6, 7], // top (+z)
        [0, 1, 5], [0, 5, 4], // front (-y)
        [2, 3, 7], [2, 7, 6], // back (+y)
        [0, 4, 7], [0, 7, 3], // left (-x)
        [1, 2, 6], [1, 6, 5], // right (+x)
    ];

    FACES
        .iter()
        .map(|&[a, b, c]| Polygon::from(Triangle::new(corners[a], corners[b], corners[c])))
        .collect()
}
