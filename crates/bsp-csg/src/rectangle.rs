//! Rectangle (quad) convenience primitive.

use nalgebra::{Point3, Vector3};

use crate::{Plane, PlaneSide, Polygon};

/// A rectangle (quad) in 3D space, defined by a corner and two edge vectors.
///
/// The four vertices, in winding order: `origin`, `origin + u`,
/// `origin + u + v`, `origin + v`. The normal follows `u × v`. Convert into a
/// [`Polygon`] to use it as a CSG tree element.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    origin: Point3<f32>,
    u: Vector3<f32>,
    v: Vector3<f32>,
}

impl Rectangle {
    /// Creates a rectangle from an origin corner and two edge vectors.
    pub fn new(origin: Point3<f32>, u: Vector3<f32>, v: Vector3<f32>) -> Self {
        Self { origin, u, v }
    }

    /// Creates a rectangle from four corners wound `a -> b -> c -> d`.
    ///
    /// # Panics (debug builds only)
    /// Panics if the corners are not coplanar.
    pub fn from_corners(
        a: Point3<f32>,
        b: Point3<f32>,
        c: Point3<f32>,
        d: Point3<f32>,
    ) -> Self {
        debug_assert!(
            Plane::from_points(a, b, d).classify_point(c) == PlaneSide::OnPlane,
            "rectangle corners must be coplanar"
        );
        Self {
            origin: a,
            u: b - a,
            v: d - a,
        }
    }

    /// The origin corner.
    #[inline]
    pub fn origin(&self) -> Point3<f32> {
        self.origin
    }

    /// The four vertices in winding order.
    pub fn vertices(&self) -> [Point3<f32>; 4] {
        [
            self.origin,
            self.origin + self.u,
            self.origin + self.u + self.v,
            self.origin + self.v,
        ]
    }

    /// The (unnormalized) normal, `u × v`.
    pub fn normal(&self) -> Vector3<f32> {
        self.u.cross(&self.v)
    }
}

impl From<Rectangle> for Polygon {
    fn from(rectangle: Rectangle) -> Self {
        Polygon::new(rectangle.vertices().to_vec())
    }
}

impl From<&Rectangle> for Polygon {
    fn from(rectangle: &Rectangle) -> Self {
        Polygon::new(rectangle.vertices().to_vec())
    }
}
