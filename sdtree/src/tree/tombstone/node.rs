use generational_arena::{Arena, Index};
use crate::node_ref::TreeId;

/// A tree cell in first-child / next-sibling form.
///
/// `first_child` and `next_sibling` are the owning links of the tree.
/// `back_link` points at the previous sibling, or at the parent when this
/// node heads its parent's child list; only the position tells the two apart.
#[derive(Debug, Clone)]
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) first_child: Option<Index>,
    pub(crate) next_sibling: Option<Index>,
    pub(crate) back_link: Option<Index>,
    pub(crate) owner: TreeId,
    pub(crate) tombstone: bool,
}

impl<T> Node<T> {
    pub(crate) fn new(value: T, owner: TreeId, next_sibling: Option<Index>, back_link: Option<Index>) -> Self {
        Node {
            value,
            first_child: None,
            next_sibling,
            back_link,
            owner,
            tombstone: false,
        }
    }
}

/// Walks a sibling chain starting at a given node.
///
/// At level 0 the walk yields only the start node: the top of a walk has no
/// siblings of its own, whether it is the root or the head of a subtree.
pub(crate) struct Siblings<'a, T> {
    nodes: &'a Arena<Node<T>>,
    cursor: Option<Index>,
    follow: bool,
}

impl<'a, T> Siblings<'a, T> {
    pub(crate) fn new(nodes: &'a Arena<Node<T>>, start: Option<Index>, level: usize) -> Self {
        Siblings { nodes, cursor: start, follow: level > 0 }
    }
}

impl<'a, T> Iterator for Siblings<'a, T> {
    type Item = (Index, &'a Node<T>);

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.cursor?;
        let node = self.nodes.get(idx)?;
        self.cursor = if self.follow { node.next_sibling } else { None };
        Some((idx, node))
    }
}
