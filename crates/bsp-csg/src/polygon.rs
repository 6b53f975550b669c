//! Convex polygon, the bundled element type for CSG trees.

use nalgebra::{Point3, Vector3};

use crate::{Plane, PlaneSide};

/// Classification of a polygon relative to a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// All vertices in front of the plane.
    Front,
    /// All vertices behind the plane.
    Back,
    /// All vertices on the plane.
    Coplanar,
    /// Vertices on both sides.
    Spanning,
}

/// A convex polygon in 3D space, defined by an ordered list of vertices.
///
/// Vertices must be coplanar and wound counter-clockwise when viewed from the
/// front (the side the normal points towards). The winding *is* the polygon's
/// orientation: reversing it flips which side counts as outside, which is what
/// CSG inversion relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Point3<f32>>,
}

impl Polygon {
    /// Creates a polygon from a list of vertices.
    ///
    /// # Panics (debug builds only)
    /// - Panics if fewer than 3 vertices are provided.
    /// - Panics if the vertices are not coplanar.
    pub fn new(vertices: Vec<Point3<f32>>) -> Self {
        debug_assert!(vertices.len() >= 3, "polygon must have at least 3 vertices");
        debug_assert!(
            Self::are_coplanar(&vertices),
            "polygon vertices must be coplanar"
        );
        Self { vertices }
    }

    fn are_coplanar(vertices: &[Point3<f32>]) -> bool {
        if vertices.len() <= 3 {
            return true;
        }
        let plane = Plane::from_points(vertices[0], vertices[1], vertices[2]);
        vertices[3..]
            .iter()
            .all(|v| plane.classify_point(*v) == PlaneSide::OnPlane)
    }

    /// The vertices, in winding order.
    #[inline]
    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    /// Number of vertices.
    #[inline]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    /// Always `false` for a validly constructed polygon.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// The (unnormalized) normal, from the first three vertices by the
    /// right-hand rule.
    pub fn normal(&self) -> Vector3<f32> {
        let [a, b, c] = [self.vertices[0], self.vertices[1], self.vertices[2]];
        (b - a).cross(&(c - a))
    }

    /// The unit normal, or `None` if the first three vertices are collinear.
    pub fn unit_normal(&self) -> Option<Vector3<f32>> {
        let n = self.normal();
        let len = n.norm();
        (len > f32::EPSILON).then(|| n / len)
    }

    /// The plane this polygon lies on.
    ///
    /// # Panics
    /// Panics if the first three vertices are collinear.
    pub fn plane(&self) -> Plane {
        Plane::from_points(self.vertices[0], self.vertices[1], self.vertices[2])
    }

    /// The centroid (vertex average).
    pub fn centroid(&self) -> Point3<f32> {
        let sum: Vector3<f32> = self.vertices.iter().map(|p| p.coords).sum();
        Point3::from(sum / self.vertices.len() as f32)
    }

    /// The area, computed by fanning triangles from the first vertex.
    /// Exact for convex polygons.
    pub fn area(&self) -> f32 {
        let origin = self.vertices[0];
        let cross_sum: Vector3<f32> = self.vertices[1..]
            .windows(2)
            .map(|pair| (pair[0] - origin).cross(&(pair[1] - origin)))
            .sum();
        cross_sum.norm() / 2.0
    }

    /// Reverses the winding order in place, flipping the polygon's normal.
    pub fn reverse_winding(&mut self) {
        self.vertices.reverse();
    }

    /// Classifies this polygon relative to `plane` by classifying every vertex.
    pub fn classify(&self, plane: &Plane) -> Classification {
        let mut front = 0;
        let mut back = 0;
        for vertex in &self.vertices {
            match plane.classify_point(*vertex) {
                PlaneSide::Front => front += 1,
                PlaneSide::Back => back += 1,
                PlaneSide::OnPlane => {}
            }
        }

        match (front, back) {
            (0, 0) => Classification::Coplanar,
            (_, 0) => Classification::Front,
            (0, _) => Classification::Back,
            _ => Classification::Spanning,
        }
    }
}

impl From<Polygon> for Plane {
    fn from(polygon: Polygon) -> Self {
        polygon.plane()
    }
}

impl From<&Polygon> for Plane {
    fn from(polygon: &Polygon) -> Self {
        polygon.plane()
    }
}
