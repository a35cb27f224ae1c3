//! A multi-way tree with lazy (tombstone) deletion and explicit
//! garbage collection.
//!
//! Removing a value only marks its node, and with it the whole subtree, as
//! deleted. The tree therefore has two sizes: the *virtual* size counts the
//! nodes that are still logically present, the *physical* size counts every
//! node still linked into the structure. [`Tree::collect_garbage`] discards
//! the marked nodes and makes both sizes agree again.
//!
//! ```
//! use sdtree::Tree;
//!
//! let mut tree = Tree::new();
//! let root = tree.insert_child(None, "A").unwrap();
//! tree.insert_child(Some(&root), "B");
//! tree.insert_child(Some(&root), "C");
//!
//! assert!(tree.remove(&"B"));
//! assert_eq!((tree.size(), tree.size_physical()), (2, 3));
//! assert!(tree.collect_garbage());
//! assert_eq!(tree.size_physical(), 2);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod tree;
pub mod node_ref;
pub mod visualization;

pub use crate::node_ref::{NodeRef, TreeId};
pub use crate::tree::tombstone::{DisplayOptions, Tree};
pub use crate::tree::traits::Visitor;
