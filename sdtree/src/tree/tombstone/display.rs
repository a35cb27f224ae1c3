use std::fmt::Display;
use std::io::Write;

use anyhow::{anyhow, Result};
use generational_arena::Index;
use graphviz_rust::dot_structures::NodeId;
use tracing::instrument;

use crate::node_ref::NodeRef;
use crate::tree::tombstone::node::Siblings;
use crate::tree::tombstone::Tree;
use crate::tree::traits::Visitor;
use crate::visualization::TreeGraph;

/// Rendering options for the line-oriented display of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Number of levels that are printed. A branch reaching deeper is cut
    /// off with a single truncation line.
    pub max_depth: usize,
    /// Spaces of indentation per level.
    pub indent: usize,
}

impl DisplayOptions {
    /// The default number of printed levels.
    pub const MAX_DEPTH: usize = 36;

    fn truncation_line(&self) -> String {
        format!("{} ... ", " ".repeat(self.max_depth * self.indent))
    }
}

impl Default for DisplayOptions {
    fn default() -> Self {
        DisplayOptions { max_depth: Self::MAX_DEPTH, indent: 1 }
    }
}

impl<T: Display> Tree<T> {
    /// Prints the live nodes to standard output, one per line, indented by
    /// depth.
    pub fn display(&self) -> Result<()> {
        self.display_with(&mut std::io::stdout().lock(), &DisplayOptions::default())
    }

    /// Prints every linked node, removed ones included, to standard output.
    pub fn display_physical(&self) -> Result<()> {
        self.display_physical_with(&mut std::io::stdout().lock(), &DisplayOptions::default())
    }

    /// Writes the live nodes to `sink` in pre-order.
    #[instrument(level = "trace", skip_all)]
    pub fn display_with<W: Write>(&self, sink: &mut W, options: &DisplayOptions) -> Result<()> {
        self.write_lines(sink, self.root, 0, options, false)
    }

    /// Writes every linked node to `sink` in pre-order.
    #[instrument(level = "trace", skip_all)]
    pub fn display_physical_with<W: Write>(&self, sink: &mut W, options: &DisplayOptions) -> Result<()> {
        self.write_lines(sink, self.root, 0, options, true)
    }

    /// Writes the live part of the subtree rooted at `node`.
    pub fn display_subtree<W: Write>(&self, node: &NodeRef, sink: &mut W, options: &DisplayOptions) -> Result<()> {
        let (idx, _) = self.resolve(node).ok_or_else(|| anyhow!("node does not belong to tree {}", self.id))?;
        self.write_lines(sink, Some(idx), 0, options, false)
    }

    /// Writes the whole subtree rooted at `node`, removed nodes included.
    pub fn display_physical_subtree<W: Write>(&self, node: &NodeRef, sink: &mut W, options: &DisplayOptions) -> Result<()> {
        let (idx, _) = self.resolve(node).ok_or_else(|| anyhow!("node does not belong to tree {}", self.id))?;
        self.write_lines(sink, Some(idx), 0, options, true)
    }

    fn write_lines<W: Write>(&self, sink: &mut W, start: Option<Index>, level: usize, options: &DisplayOptions, physical: bool) -> Result<()> {
        if level >= options.max_depth {
            if Siblings::new(&self.nodes, start, level).any(|(_, node)| physical || !node.tombstone) {
                writeln!(sink, "{}", options.truncation_line())?;
            }
            return Ok(());
        }
        for (_, node) in Siblings::new(&self.nodes, start, level) {
            if node.tombstone && !physical {
                continue;
            }
            writeln!(sink, "{}{}", " ".repeat(level * options.indent), node.value)?;
            self.write_lines(sink, node.first_child, level + 1, options, physical)?;
        }
        Ok(())
    }

    /// Renders the linked nodes as a graphviz digraph. Removed nodes are
    /// drawn dashed.
    pub fn to_graphviz(&self, label: String) -> TreeGraph {
        let mut graph = TreeGraph::new(label);
        if let Some(root) = self.root {
            self.graph_nodes(&mut graph, root, 0);
        }
        graph
    }

    fn graph_nodes(&self, graph: &mut TreeGraph, start: Index, level: usize) -> Vec<NodeId> {
        let mut ids = vec![];
        for (_, node) in Siblings::new(&self.nodes, Some(start), level) {
            let id = graph.new_node(node.value.to_string(), node.tombstone);
            if let Some(child) = node.first_child {
                for child_id in self.graph_nodes(graph, child, level + 1) {
                    graph.draw_edge(&id, &child_id);
                }
            }
            ids.push(id);
        }
        ids
    }
}

impl<T> Tree<T> {
    /// Calls `visitor` on every live value, in the same pre-order as
    /// [`Tree::display`].
    #[instrument(level = "trace", skip_all)]
    pub fn traverse<V: Visitor<T>>(&self, visitor: &mut V) {
        self.visit(visitor, self.root, 0);
    }

    /// Like [`Tree::traverse`], restricted to the subtree rooted at `node`.
    /// Foreign or collected handles visit nothing.
    pub fn traverse_from<V: Visitor<T>>(&self, node: &NodeRef, visitor: &mut V) {
        if let Some((idx, _)) = self.resolve(node) {
            self.visit(visitor, Some(idx), 0);
        }
    }

    fn visit<V: Visitor<T>>(&self, visitor: &mut V, start: Option<Index>, level: usize) {
        for (_, node) in Siblings::new(&self.nodes, start, level) {
            if node.tombstone {
                continue;
            }
            visitor.visit(&node.value);
            self.visit(visitor, node.first_child, level + 1);
        }
    }
}
