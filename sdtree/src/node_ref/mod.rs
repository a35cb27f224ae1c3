//! Handles for referencing tree nodes from outside the tree, and the
//! identity every tree stamps on the nodes it owns.

mod r#impl;

pub use crate::node_ref::r#impl::{NodeRef, TreeId};
