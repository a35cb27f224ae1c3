//! Graphviz rendering of trees, for debugging.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use anyhow::Context;
use graphviz_rust::dot_structures;
use graphviz_rust::dot_structures::{Edge, GraphAttributes};

use graphviz_rust::printer::DotPrinter;
use uuid::Uuid;

/// A directed graph under construction, printable in dot format.
pub struct TreeGraph {
    /// The underlying dot graph.
    pub graph: dot_structures::Graph,
}

impl TreeGraph {
    /// Creates an empty graph carrying `label` as its caption.
    pub fn new(label: String) -> TreeGraph {
        let mut g = TreeGraph {
            graph: dot_structures::Graph::DiGraph {
                id: dot_structures::Id::Anonymous(String::from("tree")),
                strict: false,
                stmts: vec![],
            }
        };
        g.graph.add_stmt(dot_structures::Stmt::GAttribute(
            GraphAttributes::Graph(vec![
                attribute("ordering", dot_structures::Id::Plain(String::from("out"))),
                attribute("label", dot_structures::Id::Escaped(format!("{:?}", label))),
            ])
        ));
        g
    }

    /// Adds a node and returns its id. Removed nodes are drawn dashed.
    pub fn new_node(&mut self, label: String, removed: bool) -> dot_structures::NodeId {
        let id = dot_structures::NodeId(dot_structures::Id::Plain(format!("\"{}\"", Uuid::new_v4())), None);
        let mut attributes = vec![attribute("label", dot_structures::Id::Escaped(format!("{:?}", label)))];
        if removed {
            attributes.push(attribute("style", dot_structures::Id::Plain(String::from("dashed"))));
        }
        self.graph.add_stmt(dot_structures::Stmt::Node(
            dot_structures::Node::new(id.clone(), attributes),
        ));
        id
    }

    /// Adds an edge between two nodes.
    pub fn draw_edge(&mut self, from: &dot_structures::NodeId, to: &dot_structures::NodeId) {
        self.graph.add_stmt(dot_structures::Stmt::Edge(
            Edge {
                ty: dot_structures::EdgeTy::Pair(dot_structures::Vertex::N(from.clone()), dot_structures::Vertex::N(to.clone())),
                attributes: vec![],
            }
        ));
    }

    /// Prints the graph in dot format.
    pub fn to_dot(&self) -> String {
        let mut ctx = graphviz_rust::printer::PrinterContext::default();
        self.graph.print(&mut ctx)
    }

    /// Writes the dot output to `filename`, replacing any previous content.
    pub fn save_file(&self, filename: String) -> anyhow::Result<()> {
        let path = Path::new(&filename);
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)
            .with_context(|| format!("unable to open {}", filename))?;
        file.write_all(self.to_dot().as_bytes())
            .with_context(|| format!("unable to write {}", filename))?;
        Ok(())
    }
}

fn attribute(key: &str, value: dot_structures::Id) -> dot_structures::Attribute {
    dot_structures::Attribute(dot_structures::Id::Plain(String::from(key)), value)
}
