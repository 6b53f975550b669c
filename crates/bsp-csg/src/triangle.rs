//! Triangle convenience primitive.

use nalgebra::{Point3, Vector3};

use crate::{Plane, Polygon};

/// A triangle in 3D space.
///
/// The winding order determines the normal direction via the right-hand rule:
/// `normal = (b - a) × (c - a)`. Convert into a [`Polygon`] to use it as a
/// CSG tree element.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    vertices: [Point3<f32>; 3],
}

impl Triangle {
    /// Creates a triangle from three points.
    pub fn new(a: Point3<f32>, b: Point3<f32>, c: Point3<f32>) -> Self {
        Self {
            vertices: [a, b, c],
        }
    }

    /// The three vertices.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>; 3] {
        &self.vertices
    }

    /// The (unnormalized) normal by the right-hand rule.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = &self.vertices;
        (b - a).cross(&(c - a))
    }

    /// The unit normal, or `None` for a degenerate (zero-area) triangle.
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.normal();
        let len = n.norm();
        (len > f32::EPSILON).then(|| n / len)
    }

    /// The plane this triangle lies on.
    ///
    /// # Panics
    /// Panics if the triangle is degenerate.
    pub fn plane(&self) -> Plane {
        let [a, b, c] = self.vertices;
        Plane::from_points(a, b, c)
    }
}

impl From<Triangle> for Polygon {
    fn from(triangle: Triangle) -> Self {
        Polygon::new(triangle.vertices.to_vec())
    }
}

impl From<&Triangle> for Polygon {
    fn from(triangle: &Triangle) -> Self {
        Polygon::new(triangle.vertices.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_from_winding() {
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        assert_relative_eq!(triangle.unit_normal().unwrap(), Vector3::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn converts_to_polygon() {
        let triangle = Triangle::new(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        );
        let polygon = Polygon::from(&triangle);
        assert_eq!(polygon.len(), 3);
        assert_relative_eq!(polygon.area(), 0.5);
    }
}
