//! A multi-way tree with tombstone deletion.
//!
//! Nodes are kept in a generational arena and linked in first-child /
//! next-sibling form. [`Tree::remove`] only flags a node (and its subtree) as
//! deleted; the node stays linked until [`Tree::collect_garbage`] sweeps it.
//! Until then the tree reports two sizes, see [`Tree::size`] and
//! [`Tree::size_physical`].
//!
//! Every recursive walk shares one rule: the node a walk starts from is
//! treated as a top, so its own siblings are not visited. Walks started from
//! a subtree handle (`size_of`, `find_in`, ...) inherit the same rule.

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::node_ref::{NodeRef, TreeId};
use crate::tree::tombstone::node::{Node, Siblings};

mod node;
mod gc;
mod display;

pub use crate::tree::tombstone::display::DisplayOptions;

/// A generic, ordered multi-way tree with lazy deletion.
#[derive(Debug)]
pub struct Tree<T> {
    id: TreeId,
    nodes: Arena<Node<T>>,
    root: Option<Index>,
    physical_count: usize,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Creates an empty tree with a fresh identity.
    pub fn new() -> Self {
        Tree {
            id: TreeId::new(),
            nodes: Arena::new(),
            root: None,
            physical_count: 0,
        }
    }

    /// The identity stamped on every node of this tree.
    pub fn id(&self) -> TreeId {
        self.id
    }

    /// Drops every node, live or deleted.
    pub fn clear(&mut self) {
        self.release_all();
        self.root = None;
        self.physical_count = 0;
    }

    /// Returns true when no node is logically present.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// The handle of the current root, if there is one.
    pub fn root(&self) -> Option<NodeRef> {
        self.root.map(|idx| self.handle(idx))
    }

    /// The value of a node of this tree. Deleted nodes keep their value
    /// until they are collected.
    pub fn value(&self, node: &NodeRef) -> Option<&T> {
        self.resolve(node).map(|(_, n)| &n.value)
    }

    /// Whether a node of this tree has been removed. `None` for foreign or
    /// collected handles.
    pub fn is_removed(&self, node: &NodeRef) -> Option<bool> {
        self.resolve(node).map(|(_, n)| n.tombstone)
    }

    /// Adds `value` as the new first child of `parent`.
    ///
    /// On an empty tree `parent` must be `None` and the value becomes the
    /// root. On a non-empty tree `parent` must be a live node of this tree.
    /// Returns `None` when the insertion is rejected.
    #[instrument(level = "trace", skip_all)]
    pub fn insert_child(&mut self, parent: Option<&NodeRef>, value: T) -> Option<NodeRef> {
        if self.root.is_none() {
            if parent.is_some() {
                debug!("insert rejected: parent given for an empty tree");
                return None;
            }
            if !self.nodes.is_empty() {
                debug!(detached = self.nodes.len(), "releasing nodes of the removed root");
                self.release_all();
            }
            let idx = self.nodes.insert(Node::new(value, self.id, None, None));
            self.root = Some(idx);
            self.physical_count = 1;
            return Some(self.handle(idx));
        }

        let Some(parent) = parent else {
            debug!("insert rejected: no parent given for a non-empty tree");
            return None;
        };
        let parent_idx = self.resolve_live(parent)?;
        let displaced = self.nodes.get(parent_idx)?.first_child;
        let idx = self.nodes.insert(Node::new(value, self.id, displaced, Some(parent_idx)));

        if let Some(parent_node) = self.nodes.get_mut(parent_idx) {
            parent_node.first_child = Some(idx);
        }
        if let Some(next) = displaced.and_then(|next| self.nodes.get_mut(next)) {
            next.back_link = Some(idx);
        }
        self.physical_count += 1;
        Some(self.handle(idx))
    }

    /// The number of logically present nodes: live nodes without a deleted
    /// ancestor.
    #[instrument(level = "trace", skip_all)]
    pub fn size(&self) -> usize {
        self.count(self.root, 0, false)
    }

    /// The virtual size of the subtree rooted at `node`; 0 for foreign,
    /// collected or deleted nodes.
    pub fn size_of(&self, node: &NodeRef) -> usize {
        self.resolve(node).map_or(0, |(idx, _)| self.count(Some(idx), 0, false))
    }

    /// The number of nodes still linked below the root, deleted or not.
    #[instrument(level = "trace", skip_all)]
    pub fn size_physical(&self) -> usize {
        self.count(self.root, 0, true)
    }

    /// The physical size of the subtree rooted at `node`.
    pub fn size_physical_of(&self, node: &NodeRef) -> usize {
        self.resolve(node).map_or(0, |(idx, _)| self.count(Some(idx), 0, true))
    }

    fn count(&self, start: Option<Index>, level: usize, physical: bool) -> usize {
        Siblings::new(&self.nodes, start, level)
            .filter(|(_, node)| physical || !node.tombstone)
            .map(|(_, node)| 1 + self.count(node.first_child, level + 1, physical))
            .sum()
    }

    // Removing slot by slot bumps the arena generation, so handles issued
    // before the release never alias nodes inserted after it.
    fn release_all(&mut self) {
        let slots: Vec<Index> = self.nodes.iter().map(|(idx, _)| idx).collect();
        for idx in slots {
            self.nodes.remove(idx);
        }
    }

    fn handle(&self, idx: Index) -> NodeRef {
        NodeRef::new(self.id, idx)
    }

    fn resolve(&self, node: &NodeRef) -> Option<(Index, &Node<T>)> {
        if node.tree != self.id {
            debug!(tree = %self.id, foreign = %node.tree, "handle belongs to another tree");
            return None;
        }
        match self.nodes.get(node.index) {
            Some(n) if n.owner == self.id => Some((node.index, n)),
            Some(_) => {
                debug!(tree = %self.id, "node is owned by another tree");
                None
            }
            None => {
                debug!(tree = %self.id, "handle points to a collected node");
                None
            }
        }
    }

    fn resolve_live(&self, node: &NodeRef) -> Option<Index> {
        let (idx, n) = self.resolve(node)?;
        if n.tombstone {
            debug!(tree = %self.id, "node has been removed");
            return None;
        }
        Some(idx)
    }
}

impl<T: PartialEq> Tree<T> {
    /// Finds the first live node holding `value`.
    ///
    /// The search is depth first: a node is checked, then its later siblings
    /// together with their subtrees, then its own children. Deleted nodes are
    /// never returned, and a deleted match hides the rest of its sibling
    /// chain from the search.
    #[instrument(level = "trace", skip_all)]
    pub fn find(&self, value: &T) -> Option<NodeRef> {
        let found = self.find_from(self.root?, value, 0)?;
        Some(self.handle(found))
    }

    /// Like [`Tree::find`], restricted to the subtree rooted at `node`.
    pub fn find_in(&self, node: &NodeRef, value: &T) -> Option<NodeRef> {
        let (idx, _) = self.resolve(node)?;
        let found = self.find_from(idx, value, 0)?;
        Some(self.handle(found))
    }

    // A match on a removed node ends the walk of its sibling chain; the
    // chain's remaining siblings and the removed node's children are not
    // searched.
    fn find_from(&self, idx: Index, value: &T, level: usize) -> Option<Index> {
        let node = self.nodes.get(idx)?;
        if node.value == *value {
            return (!node.tombstone).then_some(idx);
        }
        if level > 0 {
            if let Some(found) = node.next_sibling.and_then(|next| self.find_from(next, value, level)) {
                return Some(found);
            }
        }
        node.first_child.and_then(|child| self.find_from(child, value, level + 1))
    }

    /// Logically deletes the first live node holding `value`, together with
    /// its whole subtree. Returns false when no live node holds `value`.
    #[instrument(level = "trace", skip_all)]
    pub fn remove(&mut self, value: &T) -> bool {
        let found = self.root.and_then(|root| self.find_from(root, value, 0));
        match found {
            Some(idx) => self.remove_node(idx),
            None => {
                debug!(tree = %self.id, "remove: value not present");
                false
            }
        }
    }

    /// Like [`Tree::remove`], restricted to the subtree rooted at `node`.
    pub fn remove_in(&mut self, node: &NodeRef, value: &T) -> bool {
        let found = self.resolve(node).and_then(|(idx, _)| self.find_from(idx, value, 0));
        match found {
            Some(idx) => self.remove_node(idx),
            None => false,
        }
    }
}

impl<T> Tree<T> {
    fn remove_node(&mut self, idx: Index) -> bool {
        let Some(node) = self.nodes.get(idx) else {
            return false;
        };
        if node.owner != self.id || node.tombstone {
            debug!(tree = %self.id, "remove rejected");
            return false;
        }
        let (back_link, next_sibling) = (node.back_link, node.next_sibling);

        self.tombstone_subtree(idx);

        if let Some(next) = next_sibling.and_then(|next| self.nodes.get_mut(next)) {
            next.back_link = back_link;
        }
        if back_link.is_none() && self.root == Some(idx) {
            debug!(tree = %self.id, "root removed");
            self.root = None;
        }
        true
    }

    fn tombstone_subtree(&mut self, idx: Index) {
        let Some(node) = self.nodes.get_mut(idx) else {
            return;
        };
        node.tombstone = true;

        let mut cursor = node.first_child;
        while let Some(child) = cursor {
            let Some(child_node) = self.nodes.get(child) else {
                break;
            };
            cursor = child_node.next_sibling;
            if !child_node.tombstone {
                self.tombstone_subtree(child);
            }
        }
    }
}
