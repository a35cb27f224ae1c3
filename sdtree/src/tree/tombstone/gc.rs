use generational_arena::Index;
use tracing::{debug, instrument, trace, warn};

use crate::node_ref::{NodeRef, TreeId};
use crate::tree::tombstone::Tree;

impl<T> Tree<T> {
    /// Physically discards every removed node, so that the physical size
    /// matches the virtual size again.
    ///
    /// Returns false without touching the tree when nothing is logically
    /// present; a fully removed tree is left as it is. Otherwise returns
    /// whether both sizes agree after the sweep.
    #[instrument(level = "trace", skip_all)]
    pub fn collect_garbage(&mut self) -> bool {
        let virtual_size = self.size();
        if virtual_size == 0 {
            debug!(tree = %self.id, "nothing to compact into");
            return false;
        }
        if self.physical_count > virtual_size {
            if let Some(root) = self.root {
                let discarded = self.sweep_children(root);
                debug!(tree = %self.id, discarded, "garbage collected");
            }
        }
        self.physical_count == virtual_size
    }

    /// Discards the removed descendants of a live node. Returns whether any
    /// node was discarded.
    pub fn collect_garbage_in(&mut self, node: &NodeRef) -> bool {
        match self.resolve_live(node) {
            Some(idx) => self.sweep_children(idx) > 0,
            None => false,
        }
    }

    fn sweep_children(&mut self, parent: Index) -> usize {
        let mut discarded = 0;
        let mut cursor = self.nodes.get(parent).and_then(|node| node.first_child);
        while let Some(idx) = cursor {
            let Some(node) = self.nodes.get(idx) else {
                break;
            };
            cursor = node.next_sibling;
            if node.tombstone {
                self.unlink(idx);
                discarded += self.discard(idx);
            } else {
                discarded += self.sweep_children(idx);
            }
        }
        discarded
    }

    // Splices a node out of its sibling list through its back link.
    fn unlink(&mut self, idx: Index) {
        let Some(node) = self.nodes.get(idx) else {
            return;
        };
        let (back_link, next_sibling) = (node.back_link, node.next_sibling);

        match back_link.and_then(|back| self.nodes.get_mut(back)) {
            Some(prev) if prev.first_child == Some(idx) => prev.first_child = next_sibling,
            Some(prev) if prev.next_sibling == Some(idx) => prev.next_sibling = next_sibling,
            _ => {
                warn!(tree = %self.id, "back link does not lead to the node");
                return;
            }
        }
        if let Some(next) = next_sibling.and_then(|next| self.nodes.get_mut(next)) {
            next.back_link = back_link;
        }
    }

    // Frees a detached node and everything below it.
    fn discard(&mut self, top: Index) -> usize {
        let mut pending = vec![top];
        let mut freed = 0;
        while let Some(idx) = pending.pop() {
            let Some(node) = self.nodes.remove(idx) else {
                continue;
            };
            freed += 1;
            pending.extend(node.first_child);
            if idx != top {
                pending.extend(node.next_sibling);
            }
        }
        trace!(tree = %self.id, freed, "subtree discarded");
        self.physical_count = self.physical_count.saturating_sub(freed);
        freed
    }
}

impl<T: Clone> Clone for Tree<T> {
    /// Deep-copies every node, removed ones included, into an independent
    /// tree with its own identity.
    fn clone(&self) -> Self {
        let mut copy = Tree {
            id: TreeId::new(),
            nodes: self.nodes.clone(),
            root: self.root,
            physical_count: self.physical_count,
        };
        copy.adopt_nodes();
        copy
    }
}

impl<T> Tree<T> {
    fn adopt_nodes(&mut self) {
        let id = self.id;
        for (_, node) in self.nodes.iter_mut() {
            node.owner = id;
        }
    }
}
