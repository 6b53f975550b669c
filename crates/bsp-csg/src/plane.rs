//! Oriented plane primitive used as the half-space boundary of BSP nodes.

use nalgebra::{Point3, Vector3};

/// Default epsilon for plane classification.
/// Points within this distance of a plane count as lying on it.
pub const PLANE_EPSILON: f32 = 1e-5;

/// Which side of a plane a point lies on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneSide {
    /// Positive side of the normal.
    Front,
    /// Negative side of the normal.
    Back,
    /// Within epsilon of the plane.
    OnPlane,
}

/// An oriented plane in 3D space: `{ x : normal · x = offset }`.
///
/// The normal is kept unit length, so `offset` is the signed distance from
/// the origin to the plane along the normal. The normal direction decides
/// which half-space is "front"; [`Plane::flip`] swaps that meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct Plane {
    normal: Vector3<f32>,
    offset: f32,
}

impl Plane {
    /// Creates a plane from a normal vector and offset.
    /// The normal (and offset with it) is normalized automatically.
    ///
    /// # Panics
    /// Panics if the normal has zero length.
    pub fn new(normal: Vector3<f32>, offset: f32) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "plane normal cannot be zero");
        Self {
            normal: normal / norm,
            offset: offset / norm,
        }
    }

    /// Creates the plane through `point` with the given normal.
    ///
    /// # Panics
    /// Panics if the normal has zero length.
    pub fn from_point_and_normal(point: Point3<f32>, normal: Vector3<f32>) -> Self {
        let norm = normal.norm();
        assert!(norm > f32::EPSILON, "plane normal cannot be zero");
        let normal = normal / norm;
        Self {
            offset: normal.dot(&point.coords),
            normal,
        }
    }

    /// Creates the plane through three non-collinear points, with the normal
    /// following the right-hand rule: `(b - a) × (c - a)`.
    ///
    /// # Panics
    /// Panics if the points are collinear (or nearly so).
    pub fn from_points(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self::from_point_and_normal(a, (b - a).cross(&(c - a)))
    }

    /// The unit normal.
    #[inline]
    pub fn normal(&self) -> Vector3<f32> {
        self.normal
    }

    /// Signed distance from the origin along the normal.
    #[inline]
    pub fn offset(&self) -> f32 {
        self.offset
    }

    /// Signed distance from `point` to the plane: positive in front,
    /// negative behind, zero on the plane.
    #[inline]
    pub fn signed_distance(&self, point: Point3<f32>) -> f32 {
        self.normal.dot(&point.coords) - self.offset
    }

    /// Classifies `point` against the plane using [`PLANE_EPSILON`].
    #[inline]
    pub fn classify_point(&self, point: Point3<f32>) -> PlaneSide {
        self.classify_point_with_epsilon(point, PLANE_EPSILON)
    }

    /// Classifies `point` against the plane with a caller-chosen epsilon.
    pub fn classify_point_with_epsilon(&self, point: Point3<f32>, epsilon: f32) -> PlaneSide {
        let dist = self.signed_distance(point);
        if dist > epsilon {
            PlaneSide::Front
        } else if dist < -epsilon {
            PlaneSide::Back
        } else {
            PlaneSide::OnPlane
        }
    }

    /// Flips the plane in place, swapping which side is front.
    #[inline]
    pub fn flip(&mut self) {
        self.normal = -self.normal;
        self.offset = -self.offset;
    }

    /// Returns the flipped plane, leaving `self` untouched.
    #[inline]
    pub fn flipped(&self) -> Self {
        Self {
            normal: -self.normal,
            offset: -self.offset,
        }
    }

    /// Intersects the segment `start..end` with the plane.
    ///
    /// Returns `Some((t, point))` with `t` in `[0, 1]` (0 = start, 1 = end),
    /// or `None` if the segment is parallel to the plane or misses it.
    pub fn intersect_segment(
        &self,
        start: Point3<f32>,
        end: Point3<f32>,
    ) -> Option<(f32, Point3<f32>)> {
        let direction = end - start;
        let denom = self.normal.dot(&direction);
        if denom.abs() < f32::EPSILON {
            return None;
        }

        let t = (self.offset - self.normal.dot(&start.coords)) / denom;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }

        Some((t, start + direction * t))
    }
}
