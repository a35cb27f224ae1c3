use std::fmt::{Display, Formatter};
use generational_arena::Index;
use uuid::Uuid;

/// The identity of a single [`Tree`](crate::Tree) instance.
///
/// Every node carries the id of the tree that allocated it, and every
/// [`NodeRef`] handed out carries it too, so a handle from one tree is
/// never mistaken for a node of another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeId(Uuid);

impl TreeId {
    /// Creates a fresh, globally unique tree id.
    pub fn new() -> Self {
        TreeId(Uuid::new_v4())
    }
}

impl Default for TreeId {
    fn default() -> Self {
        Self::new()
    }
}

impl Display for TreeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A handle to a node of a particular tree.
///
/// Handles are plain values: they do not keep the node alive and become
/// stale once garbage collection discards the node they point to. All
/// tree operations taking a handle reject stale and foreign handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef {
    pub(crate) tree: TreeId,
    pub(crate) index: Index,
}

impl NodeRef {
    pub(crate) fn new(tree: TreeId, index: Index) -> Self {
        NodeRef { tree, index }
    }

    /// The id of the tree this handle was issued by.
    pub fn tree(&self) -> TreeId {
        self.tree
    }
}
