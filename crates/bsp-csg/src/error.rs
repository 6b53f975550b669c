//! Error type for CSG operations.

use thiserror::Error;

/// Errors surfaced by the tree engine and by [`Splittable`](crate::Splittable)
/// implementations.
///
/// Degenerate *situations* (empty inputs, absent children, a node that has not
/// adopted a plane yet) are handled by explicit branching and are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CsgError {
    /// An element type needs its opaque context value, but the caller
    /// passed `None`.
    #[error("`{type_name}` requires a context value, but none was supplied")]
    MissingContext {
        /// Name of the element type that demanded the context.
        type_name: &'static str,
    },

    /// An element has no usable orientation (e.g. a zero-area polygon with
    /// collinear vertices) where a plane or normal was requested.
    #[error("degenerate element: {reason}")]
    DegenerateElement {
        /// What made the element unusable.
        reason: &'static str,
    },
}
