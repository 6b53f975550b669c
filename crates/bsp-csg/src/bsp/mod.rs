//! Binary Space Partitioning tree performing CSG boolean operations.
//!
//! The tree recursively partitions space with planes seeded from the elements
//! it receives, and composes solids through clipping and inversion:
//!
//! - [`BspNode`]: the node type owning a plane, a coplanar element set, and
//!   front/back subtrees; carries construction ([`BspNode::add_elements`]),
//!   complement ([`BspNode::invert`]), point classification
//!   ([`BspNode::position`]), clipping ([`BspNode::filter_list`],
//!   [`BspNode::cut_out`]) and the boolean operations
//!   ([`BspNode::unite`], [`BspNode::subtract`], [`BspNode::intersect`]).
//! - [`Position`]: the three-valued result of point queries.
//! - [`BspVisitor`]: traversal hook backing export flattening and the
//!   eye-relative render orderings.
//!
//! # Example
//!
//! ```
//! use bsp_csg::{cube, BspNode, Position};
//! use nalgebra::Point3;
//!
//! let mut a = BspNode::from_elements(cube(Point3::origin(), 1.0), None).unwrap();
//! let mut b = BspNode::from_elements(cube(Point3::new(1.0, 0.0, 0.0), 1.0), None).unwrap();
//!
//! a.unite(&mut b, None).unwrap();
//! assert_eq!(a.position(Point3::new(1.5, 0.0, 0.0)), Position::Inside);
//!
//! // The union's boundary representation, for rendering or export.
//! let boundary = a.all_elements();
//! assert!(!boundary.is_empty());
//! ```

mod node;
mod visitor;

pub use node::{BspNode, Position};
pub use visitor::{BspVisitor, CollectingVisitor, FnVisitor};
