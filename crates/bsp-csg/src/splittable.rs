//! The capability contract an element type must satisfy to live in a CSG tree.

use nalgebra::Vector3;

use crate::{Classification, CsgError, Plane, PlaneSide, Polygon};

/// Spatially-splittable element: the four operations the tree engine needs
/// from a concrete geometry type (triangle, polygon, or any user-defined
/// primitive).
///
/// Implementations may depend on an opaque [`Context`](Splittable::Context)
/// value (e.g. the owning mesh) that callers thread through every tree
/// operation. The tree never looks inside it. An implementation that needs
/// the context but receives `None` must fail with
/// [`CsgError::MissingContext`].
///
/// # The clipping contract
///
/// [`split`](Splittable::split) is the robustness-critical operation of the
/// whole system: when an element straddles the splitter it must produce
/// fragments that each lie entirely on one side, within the implementation's
/// own tolerance. A fragment left crossing the plane is not detectable by the
/// tree and silently produces cracked or leaking geometry.
pub trait Splittable: Sized + Clone {
    /// Opaque caller-supplied value passed unchanged through every recursive
    /// call.
    type Context;

    /// A plane this element can be considered to lie on.
    ///
    /// Used only as the heuristic seed for a node's splitting plane; the
    /// first element a node receives wins.
    fn split_plane(&self, context: Option<&Self::Context>) -> Result<Plane, CsgError>;

    /// The element's own facing vector. Provided for callers; the tree engine
    /// itself does not use it.
    fn orientation(&self, context: Option<&Self::Context>) -> Result<Vector3<f32>, CsgError>;

    /// Cuts this element against `splitter`, appending the outcome to the
    /// appropriate list:
    ///
    /// - fully coplanar within tolerance: `coplanar_front` when the element's
    ///   orientation matches the splitter's normal, `coplanar_back` when it
    ///   is antiparallel (the two are tracked separately so
    ///   orientation-sensitive CSG semantics survive);
    /// - strictly in front: `front`, unchanged;
    /// - strictly behind: `back`, unchanged;
    /// - straddling: new fragments on each side, appended to `front`/`back`,
    ///   none crossing the plane.
    fn split(
        self,
        splitter: &Plane,
        coplanar_front: &mut Vec<Self>,
        coplanar_back: &mut Vec<Self>,
        front: &mut Vec<Self>,
        back: &mut Vec<Self>,
        context: Option<&Self::Context>,
    ) -> Result<(), CsgError>;

    /// Flips the element's own front/back sense in place (for a polygon:
    /// reverse the winding, negating its normal).
    fn invert(&mut self);
}

impl Splittable for Polygon {
    type Context = ();

    fn split_plane(&self, _context: Option<&()>) -> Result<Plane, CsgError> {
        let normal = self.unit_normal().ok_or(CsgError::DegenerateElement {
            reason: "polygon with collinear leading vertices cannot seed a plane",
        })?;
        Ok(Plane::from_point_and_normal(self.vertices()[0], normal))
    }

    fn orientation(&self, _context: Option<&()>) -> Result<Vector3<f32>, CsgError> {
        self.unit_normal().ok_or(CsgError::DegenerateElement {
            reason: "polygon with collinear leading vertices has no orientation",
        })
    }

    fn split(
        self,
        splitter: &Plane,
        coplanar_front: &mut Vec<Self>,
        coplanar_back: &mut Vec<Self>,
        front: &mut Vec<Self>,
        back: &mut Vec<Self>,
        _context: Option<&()>,
    ) -> Result<(), CsgError> {
        match self.classify(splitter) {
            Classification::Coplanar => {
                let normal = self.unit_normal().ok_or(CsgError::DegenerateElement {
                    reason: "coplanar polygon with no orientation cannot be routed",
                })?;
                if normal.dot(&splitter.normal()) > 0.0 {
                    coplanar_front.push(self);
                } else {
                    coplanar_back.push(self);
                }
            }
            Classification::Front => front.push(self),
            Classification::Back => back.push(self),
            Classification::Spanning => split_spanning(&self, splitter, front, back),
        }
        Ok(())
    }

    fn invert(&mut self) {
        self.reverse_winding();
    }
}

/// Splits a spanning polygon into front and back parts.
///
/// A variant of the Sutherland-Hodgman walk: visit the edges in winding
/// order, building one vertex list per side and inserting the intersection
/// point wherever an edge crosses the plane. On-plane vertices belong to
/// both sides. A side with fewer than 3 vertices produced no real fragment.
fn split_spanning(
    polygon: &Polygon,
    splitter: &Plane,
    front: &mut Vec<Polygon>,
    back: &mut Vec<Polygon>,
) {
    let vertices = polygon.vertices();
    let n = vertices.len();

    let sides: Vec<PlaneSide> = vertices
        .iter()
        .map(|v| splitter.classify_point(*v))
        .collect();

    let mut front_verts = Vec::with_capacity(n + 1);
    let mut back_verts = Vec::with_capacity(n + 1);

    for i in 0..n {
        let j = (i + 1) % n;

        match sides[i] {
            PlaneSide::Front => front_verts.push(vertices[i]),
            PlaneSide::Back => back_verts.push(vertices[i]),
            PlaneSide::OnPlane => {
                front_verts.push(vertices[i]);
                back_verts.push(vertices[i]);
            }
        }

        let crosses = matches!(
            (sides[i], sides[j]),
            (PlaneSide::Front, PlaneSide::Back) | (PlaneSide::Back, PlaneSide::Front)
        );
        if crosses {
            if let Some((_, point)) = splitter.intersect_segment(vertices[i], vertices[j]) {
                front_verts.push(point);
                back_verts.push(point);
            }
        }
    }

    if front_verts.len() >= 3 {
        front.push(Polygon::new(front_verts));
    }
    if back_verts.len() >= 3 {
        back.push(Polygon::new(back_verts));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PLANE_EPSILON;
    use approx::assert_relative_eq;
    use nalgebra::Point3;

    fn unit_square() -> Polygon {
        Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ])
    }

    fn split_into_lists(
        polygon: Polygon,
        splitter: &Plane,
    ) -> (Vec<Polygon>, Vec<Polygon>, Vec<Polygon>, Vec<Polygon>) {
        let (mut cf, mut cb, mut front, mut back) = (vec![], vec![], vec![], vec![]);
        polygon
            .split(splitter, &mut cf, &mut cb, &mut front, &mut back, None)
            .unwrap();
        (cf, cb, front, back)
    }

    #[test]
    fn wholly_front_passes_unchanged() {
        let square = unit_square();
        let below = Plane::new(Vector3::new(0.0, 0.0, 1.0), -1.0);

        let (cf, cb, front, back) = split_into_lists(square.clone(), &below);
        assert!(cf.is_empty() && cb.is_empty() && back.is_empty());
        assert_eq!(front, vec![square]);
    }

    #[test]
    fn wholly_back_passes_unchanged() {
        let square = unit_square();
        let above = Plane::new(Vector3::new(0.0, 0.0, 1.0), 1.0);

        let (cf, cb, front, back) = split_into_lists(square.clone(), &above);
        assert!(cf.is_empty() && cb.is_empty() && front.is_empty());
        assert_eq!(back, vec![square]);
    }

    #[test]
    fn coplanar_routed_by_orientation() {
        let square = unit_square();
        let plane = Plane::new(Vector3::new(0.0, 0.0, 1.0), 0.0);

        // Same facing as the plane normal.
        let (cf, cb, _, _) = split_into_lists(square.clone(), &plane);
        assert_eq!(cf.len(), 1);
        assert!(cb.is_empty());

        // Antiparallel facing.
        let mut reversed = square;
        reversed.reverse_winding();
        let (cf, cb, _, _) = split_into_lists(reversed, &plane);
        assert!(cf.is_empty());
        assert_eq!(cb.len(), 1);
    }

    #[test]
    fn spanning_square_splits_into_two_halves() {
        let square = unit_square();
        let splitter = Plane::new(Vector3::new(1.0, 0.0, 0.0), 0.5);

        let (cf, cb, front, back) = split_into_lists(square, &splitter);
        assert!(cf.is_empty() && cb.is_empty());
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);

        assert_relative_eq!(front[0].area(), 0.5, epsilon = 1e-6);
        assert_relative_eq!(back[0].area(), 0.5, epsilon = 1e-6);

        // The clipping contract: no fragment may cross the plane.
        for vertex in front[0].vertices() {
            assert!(splitter.signed_distance(*vertex) >= -PLANE_EPSILON);
        }
        for vertex in back[0].vertices() {
            assert!(splitter.signed_distance(*vertex) <= PLANE_EPSILON);
        }
    }

    #[test]
    fn spanning_triangle_with_on_plane_vertex() {
        // Apex exactly on the splitter; the base straddles it.
        let triangle = Polygon::new(vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(-1.0, -1.0, 0.0),
            Point3::new(1.0, -1.0, 0.0),
        ]);
        let splitter = Plane::new(Vector3::new(1.0, 0.0, 0.0), 0.0);

        let (_, _, front, back) = split_into_lists(triangle.clone(), &splitter);
        assert_eq!(front.len(), 1);
        assert_eq!(back.len(), 1);
        assert_relative_eq!(
            front[0].area() + back[0].area(),
            triangle.area(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn invert_reverses_winding() {
        let mut square = unit_square();
        let normal = square.orientation(None).unwrap();

        Splittable::invert(&mut square);
        assert_relative_eq!(square.orientation(None).unwrap(), -normal);
    }

    #[test]
    fn degenerate_polygon_reports_error() {
        let collinear = Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ]);

        assert!(matches!(
            collinear.split_plane(None),
            Err(CsgError::DegenerateElement { .. })
        ));
    }
}
