//! Traits shared by the tree implementations.

/// Receives the values of a tree, one call per visited node.
///
/// Implemented for every `FnMut(&T)` closure, so most callers never need a
/// dedicated type.
pub trait Visitor<T: ?Sized> {
    /// Called once for each visited value, in traversal order.
    fn visit(&mut self, value: &T);
}

impl<T: ?Sized, F: FnMut(&T)> Visitor<T> for F {
    fn visit(&mut self, value: &T) {
        self(value)
    }
}
