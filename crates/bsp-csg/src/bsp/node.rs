//! BSP tree node and the CSG boolean operations built on it.

use log::debug;
use nalgebra::Point3;

use crate::{CsgError, Plane, PlaneSide, Splittable};

use super::visitor::{BspVisitor, CollectingVisitor};

/// Where a point sits relative to the solid a tree represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Exterior of the solid.
    Outside,
    /// Interior of the solid.
    Inside,
    /// On the solid's boundary (within plane tolerance).
    Border,
}

/// A node of a CSG BSP tree, generic over any [`Splittable`] element type.
///
/// Each node owns a splitting plane, the elements lying exactly on that plane
/// (the coplanar set), and up to two child subtrees: `front` for geometry
/// strictly on the positive side, `back` for the negative side. Ownership is
/// a pure rooted tree, with no cycles and no parent back-references.
///
/// A node starts *empty* (no plane, no elements, no children) and becomes
/// *populated* the first time it receives elements, adopting the first
/// element's plane as its own. The plane is then never replaced, only negated
/// by [`invert`](BspNode::invert). The half-space convention that makes the
/// tree a solid: where no back child exists, the negative half-space
/// continues unbounded as interior; where no front child exists, the positive
/// half-space is exterior.
///
/// Mutating operations (`add_elements`, `invert`, `cut_out`, `unite`, ...)
/// must not run concurrently on the same tree. Read-only queries
/// ([`position`](BspNode::position), [`filter_list`](BspNode::filter_list),
/// the traversals) never mutate and are safe to run concurrently with each
/// other. Recursion is naive and data-dependent: adversarially ordered input
/// can degrade the tree to a deep chain, since plane selection is not
/// cost-based (first element wins, deliberately).
#[derive(Debug, Clone)]
pub struct BspNode<T: Splittable> {
    plane: Option<Plane>,
    elements: Vec<T>,
    front: Option<Box<BspNode<T>>>,
    back: Option<Box<BspNode<T>>>,
}

impl<T: Splittable> Default for BspNode<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Splittable> BspNode<T> {
    /// Creates an empty node.
    pub fn new() -> Self {
        Self {
            plane: None,
            elements: Vec::new(),
            front: None,
            back: None,
        }
    }

    /// Builds a tree from an initial collection of elements.
    pub fn from_elements(elements: Vec<T>, context: Option<&T::Context>) -> Result<Self, CsgError> {
        let mut node = Self::new();
        node.add_elements(elements, context)?;
        Ok(node)
    }

    /// The splitting plane, once adopted.
    #[inline]
    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    /// The elements lying on this node's plane.
    #[inline]
    pub fn elements(&self) -> &[T] {
        &self.elements
    }

    /// The front child subtree.
    #[inline]
    pub fn front(&self) -> Option<&BspNode<T>> {
        self.front.as_deref()
    }

    /// The back child subtree.
    #[inline]
    pub fn back(&self) -> Option<&BspNode<T>> {
        self.back.as_deref()
    }

    /// `true` until the node receives its first elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plane.is_none()
    }

    /// Total number of elements in this subtree.
    pub fn element_count(&self) -> usize {
        let mut count = self.elements.len();
        if let Some(front) = &self.front {
            count += front.element_count();
        }
        if let Some(back) = &self.back {
            count += back.element_count();
        }
        count
    }

    /// Depth of this subtree: 0 for an empty node, 1 for a populated leaf.
    pub fn depth(&self) -> usize {
        if self.plane.is_none() {
            return 0;
        }
        let front = self.front.as_ref().map_or(0, |n| n.depth());
        let back = self.back.as_ref().map_or(0, |n| n.depth());
        1 + front.max(back)
    }

    /// Inserts elements into the tree, splitting them against this node's
    /// plane and pushing the pieces down into lazily created children.
    ///
    /// An empty node adopts the first element's
    /// [`split_plane`](Splittable::split_plane) as its own. Both coplanar
    /// outcomes stay in this node's coplanar set. Safe to call repeatedly;
    /// inserting an empty collection is a no-op.
    pub fn add_elements(
        &mut self,
        elements: Vec<T>,
        context: Option<&T::Context>,
    ) -> Result<(), CsgError> {
        if elements.is_empty() {
            return Ok(());
        }

        let plane = match &self.plane {
            Some(plane) => plane.clone(),
            None => {
                let plane = elements[0].split_plane(context)?;
                self.plane = Some(plane.clone());
                plane
            }
        };

        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for element in elements {
            element.split(
                &plane,
                &mut self.elements,
                &mut coplanar_back,
                &mut front,
                &mut back,
                context,
            )?;
            self.elements.append(&mut coplanar_back);
        }

        if !front.is_empty() {
            self.front
                .get_or_insert_with(|| Box::new(BspNode::new()))
                .add_elements(front, context)?;
        }
        if !back.is_empty() {
            self.back
                .get_or_insert_with(|| Box::new(BspNode::new()))
                .add_elements(back, context)?;
        }
        Ok(())
    }

    /// Converts the tree into its complement, in place: the plane is flipped,
    /// every element inverted, children inverted and then swapped, depth
    /// first. Applying it twice restores the original classification
    /// behavior exactly.
    pub fn invert(&mut self) {
        if let Some(plane) = &mut self.plane {
            plane.flip();
        }
        for element in &mut self.elements {
            element.invert();
        }
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Classifies a point against the solid this tree represents.
    ///
    /// Strictly in front of the node plane, with no front child: the exterior
    /// is open there, so `Outside`. Strictly behind, with no back child: the
    /// negative half-space continues as solid, so `Inside`. On the plane:
    /// `Border`, unless both children exist and both call the point strictly
    /// `Outside`. An empty tree classifies everything `Border`.
    pub fn position(&self, point: Point3<f32>) -> Position {
        let Some(plane) = &self.plane else {
            return Position::Border;
        };

        let distance = plane.signed_distance(point);
        if distance > crate::PLANE_EPSILON {
            match &self.front {
                Some(front) => front.position(point),
                None => Position::Outside,
            }
        } else if distance < -crate::PLANE_EPSILON {
            match &self.back {
                Some(back) => back.position(point),
                None => Position::Inside,
            }
        } else {
            match (&self.front, &self.back) {
                (Some(front), Some(back))
                    if front.position(point) == Position::Outside
                        && back.position(point) == Position::Outside =>
                {
                    Position::Outside
                }
                _ => Position::Border,
            }
        }
    }

    /// Clips an external collection against the solid this tree represents,
    /// discarding every portion that falls in the interior. A pure query:
    /// the tree is never mutated.
    ///
    /// An empty node passes the input through unchanged. Otherwise each
    /// element is split against the node plane; same-oriented coplanar pieces
    /// travel with the frontal batch (touching the surface counts as
    /// exterior), antiparallel coplanar pieces with the rear batch. The
    /// frontal batch passes through unchanged where no front child exists;
    /// the rear batch is discarded entirely where no back child exists, since
    /// that space is solid interior.
    pub fn filter_list(
        &self,
        elements: Vec<T>,
        context: Option<&T::Context>,
    ) -> Result<Vec<T>, CsgError> {
        let Some(plane) = &self.plane else {
            return Ok(elements);
        };

        let mut coplanar_front = Vec::new();
        let mut coplanar_back = Vec::new();
        let mut front = Vec::new();
        let mut back = Vec::new();
        for element in elements {
            element.split(
                plane,
                &mut coplanar_front,
                &mut coplanar_back,
                &mut front,
                &mut back,
                context,
            )?;
            front.append(&mut coplanar_front);
            back.append(&mut coplanar_back);
        }

        let mut surviving = match &self.front {
            Some(node) => node.filter_list(front, context)?,
            None => front,
        };
        if let Some(node) = &self.back {
            surviving.extend(node.filter_list(back, context)?);
        }
        Ok(surviving)
    }

    /// Removes from `self` everything enclosed by the solid `other`
    /// represents: every node's coplanar set is re-filtered through the full
    /// `other` tree, root to leaves.
    pub fn cut_out(
        &mut self,
        other: &BspNode<T>,
        context: Option<&T::Context>,
    ) -> Result<(), CsgError> {
        let own = std::mem::take(&mut self.elements);
        self.elements = other.filter_list(own, context)?;

        if let Some(front) = &mut self.front {
            front.cut_out(other, context)?;
        }
        if let Some(back) = &mut self.back {
            back.cut_out(other, context)?;
        }
        Ok(())
    }

    /// Computes the CSG union, mutating `self` into the result.
    ///
    /// The sequence is order-sensitive: cut each tree against the other, then
    /// cut the inverted `other` a second time to drop coincident coplanar
    /// faces that would duplicate `self`'s boundary, restore `other`'s
    /// polarity, and merge what remains of it into `self`.
    ///
    /// `other` is left mutated and should be treated as consumed.
    pub fn unite(
        &mut self,
        other: &mut BspNode<T>,
        context: Option<&T::Context>,
    ) -> Result<(), CsgError> {
        debug!(
            "unite: {} elements with {} elements",
            self.element_count(),
            other.element_count()
        );

        self.cut_out(other, context)?;
        other.cut_out(self, context)?;
        other.invert();
        other.cut_out(self, context)?;
        other.invert();
        self.add_elements(other.all_elements(), context)?;

        debug!("unite: result holds {} elements", self.element_count());
        Ok(())
    }

    /// Computes the CSG difference `self − other` via the identity
    /// `A − B = ¬(¬A ∪ B)`. `other` is consumed like in
    /// [`unite`](BspNode::unite).
    pub fn subtract(
        &mut self,
        other: &mut BspNode<T>,
        context: Option<&T::Context>,
    ) -> Result<(), CsgError> {
        debug!(
            "subtract: {} elements minus {} elements",
            self.element_count(),
            other.element_count()
        );

        self.invert();
        self.unite(other, context)?;
        self.invert();
        Ok(())
    }

    /// Computes the CSG intersection via the identity `A ∩ B = ¬(¬A ∪ ¬B)`.
    /// `other` is consumed like in [`unite`](BspNode::unite).
    pub fn intersect(
        &mut self,
        other: &mut BspNode<T>,
        context: Option<&T::Context>,
    ) -> Result<(), CsgError> {
        debug!(
            "intersect: {} elements with {} elements",
            self.element_count(),
            other.element_count()
        );

        self.invert();
        other.invert();
        self.unite(other, context)?;
        self.invert();
        Ok(())
    }

    /// Flattens the whole tree back into a single collection, in pre-order:
    /// this node's coplanar set, then the front subtree, then the back. This
    /// is the boundary representation handed to downstream consumers.
    pub fn all_elements(&self) -> Vec<T> {
        let mut visitor = CollectingVisitor::new();
        self.traverse(&mut visitor);
        visitor.into_elements()
    }

    /// Pre-order traversal: visits this node's element group, then the front
    /// subtree, then the back.
    pub fn traverse<V: BspVisitor<T>>(&self, visitor: &mut V) {
        if !self.elements.is_empty() {
            visitor.visit(&self.elements);
        }
        if let Some(front) = &self.front {
            front.traverse(visitor);
        }
        if let Some(back) = &self.back {
            back.traverse(visitor);
        }
    }

    /// Visits element groups ordered near-to-far relative to `eye`, for
    /// painter's-algorithm style consumers.
    pub fn traverse_front_to_back<V: BspVisitor<T>>(&self, eye: Point3<f32>, visitor: &mut V) {
        let Some(plane) = &self.plane else {
            return;
        };

        match plane.classify_point(eye) {
            PlaneSide::Front | PlaneSide::OnPlane => {
                if let Some(front) = &self.front {
                    front.traverse_front_to_back(eye, visitor);
                }
                if !self.elements.is_empty() {
                    visitor.visit(&self.elements);
                }
                if let Some(back) = &self.back {
                    back.traverse_front_to_back(eye, visitor);
                }
            }
            PlaneSide::Back => {
                if let Some(back) = &self.back {
                    back.traverse_front_to_back(eye, visitor);
                }
                if !self.elements.is_empty() {
                    visitor.visit(&self.elements);
                }
                if let Some(front) = &self.front {
                    front.traverse_front_to_back(eye, visitor);
                }
            }
        }
    }

    /// Visits element groups ordered far-to-near relative to `eye`.
    pub fn traverse_back_to_front<V: BspVisitor<T>>(&self, eye: Point3<f32>, visitor: &mut V) {
        let Some(plane) = &self.plane else {
            return;
        };

        match plane.classify_point(eye) {
            PlaneSide::Front | PlaneSide::OnPlane => {
                if let Some(back) = &self.back {
                    back.traverse_back_to_front(eye, visitor);
                }
                if !self.elements.is_empty() {
                    visitor.visit(&self.elements);
                }
                if let Some(front) = &self.front {
                    front.traverse_back_to_front(eye, visitor);
                }
            }
            PlaneSide::Back => {
                if let Some(front) = &self.front {
                    front.traverse_back_to_front(eye, visitor);
                }
                if !self.elements.is_empty() {
                    visitor.visit(&self.elements);
                }
                if let Some(back) = &self.back {
                    back.traverse_back_to_front(eye, visitor);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Polygon, Triangle};
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn make_triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> Polygon {
        Polygon::from(Triangle::new(
            Point3::new(a[0], a[1], a[2]),
            Point3::new(b[0], b[1], b[2]),
            Point3::new(c[0], c[1], c[2]),
        ))
    }

    #[test]
    fn new_node_is_empty() {
        let node: BspNode<Polygon> = BspNode::new();
        assert!(node.is_empty());
        assert!(node.plane().is_none());
        assert_eq!(node.element_count(), 0);
        assert_eq!(node.depth(), 0);
    }

    #[test]
    fn first_element_seeds_the_plane() {
        let triangle = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let node = BspNode::from_elements(vec![triangle], None).unwrap();

        assert!(!node.is_empty());
        let plane = node.plane().unwrap();
        assert_relative_eq!(plane.normal(), Vector3::new(0.0, 0.0, 1.0));
        assert_eq!(node.elements().len(), 1);
        assert_eq!(node.depth(), 1);
    }

    #[test]
    fn adding_nothing_changes_nothing() {
        let triangle = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let mut node = BspNode::from_elements(vec![triangle], None).unwrap();

        let before = node.all_elements();
        node.add_elements(Vec::new(), None).unwrap();
        assert_eq!(node.all_elements(), before);
    }

    #[test]
    fn elements_route_into_lazy_children() {
        let base = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let above = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        let below = make_triangle([0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]);

        let node = BspNode::from_elements(vec![base, above, below], None).unwrap();

        assert_eq!(node.elements().len(), 1);
        assert_eq!(node.front().unwrap().elements().len(), 1);
        assert_eq!(node.back().unwrap().elements().len(), 1);
        assert_eq!(node.element_count(), 3);
        assert_eq!(node.depth(), 2);
    }

    #[test]
    fn incremental_insertion_matches_batch() {
        let base = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let above = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);

        let batch = BspNode::from_elements(vec![base.clone(), above.clone()], None).unwrap();

        let mut incremental = BspNode::new();
        incremental.add_elements(vec![base], None).unwrap();
        incremental.add_elements(vec![above], None).unwrap();

        assert_eq!(incremental.all_elements(), batch.all_elements());
    }

    #[test]
    fn spanning_element_is_fragmented() {
        let splitter = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        // Crosses z = 0.
        let spanning = make_triangle([0.0, 0.0, -1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);

        let node = BspNode::from_elements(vec![splitter, spanning], None).unwrap();

        // 1 coplanar + 2 fragments.
        assert_eq!(node.element_count(), 3);
        assert!(node.front().is_some());
        assert!(node.back().is_some());
    }

    #[test]
    fn invert_flips_plane_and_swaps_children() {
        let base = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let above = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        let mut node = BspNode::from_elements(vec![base, above], None).unwrap();

        let normal_before = node.plane().unwrap().normal();
        assert!(node.front().is_some());
        assert!(node.back().is_none());

        node.invert();
        assert_relative_eq!(node.plane().unwrap().normal(), -normal_before);
        assert!(node.front().is_none());
        assert!(node.back().is_some());
    }

    #[test]
    fn single_plane_position_convention() {
        // One polygon facing +z: above is open exterior, below is unbounded solid.
        let base = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let node = BspNode::from_elements(vec![base], None).unwrap();

        assert_eq!(node.position(Point3::new(0.0, 0.0, 1.0)), Position::Outside);
        assert_eq!(node.position(Point3::new(0.0, 0.0, -1.0)), Position::Inside);
        assert_eq!(node.position(Point3::new(5.0, 5.0, 0.0)), Position::Border);
    }

    #[test]
    fn empty_tree_classifies_border() {
        let node: BspNode<Polygon> = BspNode::new();
        assert_eq!(node.position(Point3::new(1.0, 2.0, 3.0)), Position::Border);
    }

    #[test]
    fn empty_tree_filters_nothing_out() {
        let node: BspNode<Polygon> = BspNode::new();
        let triangle = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);

        let survivors = node.filter_list(vec![triangle.clone()], None).unwrap();
        assert_eq!(survivors, vec![triangle]);
    }

    #[test]
    fn filter_discards_interior_geometry() {
        // Solid lower half-space z <= 0.
        let boundary = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let node = BspNode::from_elements(vec![boundary], None).unwrap();

        let buried = make_triangle([0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]);
        let floating = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);

        let survivors = node
            .filter_list(vec![buried, floating.clone()], None)
            .unwrap();
        assert_eq!(survivors, vec![floating]);
    }

    #[test]
    fn cut_out_against_empty_tree_is_identity() {
        let triangle = make_triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let mut node = BspNode::from_elements(vec![triangle], None).unwrap();
        let empty: BspNode<Polygon> = BspNode::new();

        let before = node.all_elements();
        node.cut_out(&empty, None).unwrap();
        assert_eq!(node.all_elements(), before);
    }

    #[test]
    fn traverse_front_to_back_ordering() {
        let near = make_triangle([0.0, 0.0, 1.0], [1.0, 0.0, 1.0], [0.0, 1.0, 1.0]);
        let far = make_triangle([0.0, 0.0, -1.0], [1.0, 0.0, -1.0], [0.0, 1.0, -1.0]);
        let node = BspNode::from_elements(vec![far, near], None).unwrap();

        let mut visitor = CollectingVisitor::new();
        node.traverse_front_to_back(Point3::new(0.5, 0.5, 10.0), &mut visitor);
        let seen = visitor.into_elements();
        assert_eq!(seen.len(), 2);
        assert!(seen[0].centroid().z > seen[1].centroid().z);

        let mut visitor = CollectingVisitor::new();
        node.traverse_back_to_front(Point3::new(0.5, 0.5, 10.0), &mut visitor);
        let seen = visitor.into_elements();
        assert!(seen[0].centroid().z < seen[1].centroid().z);
    }

    /// Wrapper element that refuses to work without its context, for
    /// exercising the context-omission error path.
    #[derive(Debug, Clone, PartialEq)]
    struct MeshBacked(Polygon);

    #[derive(Debug)]
    struct MeshHandle;

    impl Splittable for MeshBacked {
        type Context = MeshHandle;

        fn split_plane(&self, context: Option<&MeshHandle>) -> Result<Plane, CsgError> {
            context.ok_or(CsgError::MissingContext {
                type_name: "MeshBacked",
            })?;
            self.0.split_plane(None)
        }

        fn orientation(&self, context: Option<&MeshHandle>) -> Result<Vector3<f32>, CsgError> {
            context.ok_or(CsgError::MissingContext {
                type_name: "MeshBacked",
            })?;
            self.0.orientation(None)
        }

        fn split(
            self,
            splitter: &Plane,
            coplanar_front: &mut Vec<Self>,
            coplanar_back: &mut Vec<Self>,
            front: &mut Vec<Self>,
            back: &mut Vec<Self>,
            context: Option<&MeshHandle>,
        ) -> Result<(), CsgError> {
            context.ok_or(CsgError::MissingContext {
                type_name: "MeshBacked",
            })?;
            let (mut cf, mut cb, mut f, mut b) = (vec![], vec![], vec![], vec![]);
            self.0.split(splitter, &mut cf, &mut cb, &mut f, &mut b, None)?;
            coplanar_front.extend(cf.into_iter().map(MeshBacked));
            coplanar_back.extend(cb.into_iter().map(MeshBacked));
            front.extend(f.into_iter().map(MeshBacked));
            back.extend(b.into_iter().map(MeshBacked));
            Ok(())
        }

        fn invert(&mut self) {
            self.0.reverse_winding();
        }
    }

    #[test]
    fn missing_context_is_a_distinguishable_error() {
        let element = MeshBacked(make_triangle(
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
        ));

        let err = BspNode::from_elements(vec![element.clone()], None).unwrap_err();
        assert_eq!(
            err,
            CsgError::MissingContext {
                type_name: "MeshBacked"
            }
        );

        let node = BspNode::from_elements(vec![element], Some(&MeshHandle)).unwrap();
        assert_eq!(node.element_count(), 1);
    }
}
