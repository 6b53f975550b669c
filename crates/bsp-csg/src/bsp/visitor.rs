//! Visitor pattern for BSP tree traversal.
//!
//! Visitors decouple traversal order from what happens to the elements:
//! the same walk serves export flattening, render ordering, or statistics.

/// Visitor invoked for each node's coplanar element group during traversal.
pub trait BspVisitor<T> {
    /// Called once per visited node holding elements. All elements in a call
    /// are coplanar with each other.
    fn visit(&mut self, elements: &[T]);
}

/// Collects every visited element, in visit order.
#[derive(Debug)]
pub struct CollectingVisitor<T> {
    collected: Vec<T>,
}

impl<T> CollectingVisitor<T> {
    /// Creates an empty collecting visitor.
    pub fn new() -> Self {
        Self {
            collected: Vec::new(),
        }
    }

    /// Consumes the visitor, returning the collected elements.
    pub fn into_elements(self) -> Vec<T> {
        self.collected
    }

    /// The elements collected so far.
    pub fn elements(&self) -> &[T] {
        &self.collected
    }
}

impl<T> Default for CollectingVisitor<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> BspVisitor<T> for CollectingVisitor<T> {
    fn visit(&mut self, elements: &[T]) {
        self.collected.extend(elements.iter().cloned());
    }
}

/// Calls a closure for each visited element group.
pub struct FnVisitor<F> {
    func: F,
}

impl<F> FnVisitor<F> {
    /// Creates a visitor from a closure.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<T, F> BspVisitor<T> for FnVisitor<F>
where
    F: FnMut(&[T]),
{
    fn visit(&mut self, elements: &[T]) {
        (self.func)(elements);
    }
}
