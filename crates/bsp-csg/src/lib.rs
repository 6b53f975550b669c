//! Constructive Solid Geometry over a generic BSP tree.
//!
//! A [`BspNode`] partitions space by planes and represents a solid by its
//! boundary elements; [`BspNode::unite`], [`BspNode::subtract`] and
//! [`BspNode::intersect`] compose solids while preserving exact
//! interior/exterior/boundary semantics. The tree is generic over any element
//! type implementing the [`Splittable`] capability contract; [`Polygon`] is
//! the bundled implementation, with [`Triangle`] and [`Rectangle`] as
//! convenience constructors.

mod error;
mod plane;
mod polygon;
mod rectangle;
mod shapes;
mod splittable;
mod triangle;

pub mod bsp;

pub use bsp::{BspNode, BspVisitor, CollectingVisitor, FnVisitor, Position};
pub use error::CsgError;
pub use plane::{Plane, PlaneSide, PLANE_EPSILON};
pub use polygon::{Classification, Polygon};
pub use rectangle::Rectangle;
pub use shapes::cube;
pub use splittable::Splittable;
pub use triangle::Triangle;
