//! Property-based tests for the tombstone tree.
//!
//! Random operation sequences run against both the tree and a flat model that
//! records each node's parent and removal flag. The first group of
//! properties uses unique values, so every `remove` hits a known node. The
//! duplicate-value group checks the search order against a reference search
//! over an ordered child list.

use proptest::prelude::*;
use sdtree::{NodeRef, Tree};

// ============================================================================
//  Model
// ============================================================================

#[derive(Debug)]
struct ModelNode {
    value: u32,
    parent: Option<usize>,
    removed: bool,
    collected: bool,
    handle: NodeRef,
}

#[derive(Debug, Default)]
struct Model {
    nodes: Vec<ModelNode>,
    next_value: u32,
}

impl Model {
    fn present(&self, i: usize) -> bool {
        let node = &self.nodes[i];
        !node.removed && !node.collected && node.parent.map_or(true, |p| self.present(p))
    }

    fn virtual_size(&self) -> usize {
        (0..self.nodes.len()).filter(|&i| self.present(i)).count()
    }

    fn root_removed(&self) -> bool {
        self.nodes.first().map_or(true, |root| root.removed)
    }

    fn physical_size(&self) -> usize {
        if self.root_removed() {
            0
        } else {
            self.nodes.iter().filter(|n| !n.collected).count()
        }
    }
}

// ============================================================================
//  Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Insert(usize),
    Remove(usize),
    Collect,
}

fn operations(max_ops: usize) -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![
            6 => any::<usize>().prop_map(Op::Insert),
            3 => any::<usize>().prop_map(Op::Remove),
            1 => Just(Op::Collect),
        ],
        0..=max_ops,
    )
}

fn apply(tree: &mut Tree<u32>, model: &mut Model, op: &Op) {
    match op {
        Op::Insert(pick) => {
            let value = model.next_value;
            model.next_value += 1;
            if tree.root().is_none() {
                let handle = tree.insert_child(None, value).unwrap();
                model.nodes.clear();
                model.nodes.push(ModelNode { value, parent: None, removed: false, collected: false, handle });
                return;
            }
            let parent = pick % model.nodes.len();
            let expected = model.present(parent);
            let inserted = tree.insert_child(Some(&model.nodes[parent].handle), value);
            assert_eq!(inserted.is_some(), expected);
            if let Some(handle) = inserted {
                model.nodes.push(ModelNode { value, parent: Some(parent), removed: false, collected: false, handle });
            }
        }
        Op::Remove(pick) => {
            if model.nodes.is_empty() {
                assert!(!tree.remove(&u32::MAX));
                return;
            }
            let target = pick % model.nodes.len();
            let expected = model.present(target);
            assert_eq!(tree.remove(&model.nodes[target].value), expected);
            if expected {
                model.nodes[target].removed = true;
            }
        }
        Op::Collect => {
            let virtual_size = model.virtual_size();
            assert_eq!(tree.collect_garbage(), virtual_size > 0);
            if virtual_size > 0 {
                for i in 0..model.nodes.len() {
                    if !model.present(i) {
                        model.nodes[i].collected = true;
                    }
                }
            }
        }
    }
}

fn check(tree: &Tree<u32>, model: &Model) {
    assert_eq!(tree.size(), model.virtual_size());
    assert_eq!(tree.size_physical(), model.physical_size());
    assert!(tree.size_physical() >= tree.size());
    for (i, node) in model.nodes.iter().enumerate() {
        if model.present(i) {
            assert_eq!(tree.find(&node.value), Some(node.handle));
        } else {
            assert!(tree.find(&node.value).is_none());
        }
    }
}

// ============================================================================
//  Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_matches_model(ops in operations(60)) {
        let mut tree = Tree::new();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut tree, &mut model, op);
            check(&tree, &model);
        }
    }

    #[test]
    fn prop_collect_is_idempotent(ops in operations(60)) {
        let mut tree = Tree::new();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut tree, &mut model, op);
        }
        if tree.collect_garbage() {
            let physical = tree.size_physical();
            prop_assert_eq!(physical, tree.size());
            prop_assert!(tree.collect_garbage());
            prop_assert_eq!(tree.size_physical(), physical);
        } else {
            prop_assert_eq!(tree.size(), 0);
        }
    }

    #[test]
    fn prop_find_never_returns_removed(ops in operations(60)) {
        let mut tree = Tree::new();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut tree, &mut model, op);
        }
        for value in 0..model.next_value {
            if let Some(found) = tree.find(&value) {
                prop_assert_eq!(tree.is_removed(&found), Some(false));
            }
        }
    }

    #[test]
    fn prop_removing_root_empties(ops in operations(40)) {
        let mut tree = Tree::new();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut tree, &mut model, op);
        }
        if let Some(root) = tree.root() {
            let value = *tree.value(&root).unwrap();
            prop_assert!(tree.remove(&value));
            prop_assert_eq!(tree.size(), 0);
            prop_assert!(tree.is_empty());
        }
    }

    #[test]
    fn prop_clone_is_independent(ops in operations(40), more in operations(20)) {
        let mut tree = Tree::new();
        let mut model = Model::default();
        for op in &ops {
            apply(&mut tree, &mut model, op);
        }
        let copy = tree.clone();
        prop_assert_eq!(copy.size(), tree.size());
        prop_assert_eq!(copy.size_physical(), tree.size_physical());

        let (size, physical) = (copy.size(), copy.size_physical());
        for op in &more {
            apply(&mut tree, &mut model, op);
        }
        prop_assert_eq!(copy.size(), size);
        prop_assert_eq!(copy.size_physical(), physical);
    }
}

// ============================================================================
//  Duplicate values
// ============================================================================

/// Values are drawn from a tiny domain so that duplicates are common.
const DUP_VALUES: u8 = 4;

#[derive(Debug)]
struct DupNode {
    value: u8,
    children: Vec<usize>,
    tombstone: bool,
    handle: NodeRef,
}

#[derive(Debug, Clone)]
enum DupOp {
    Insert(usize, u8),
    Remove(u8),
    Collect,
}

fn dup_operations(max_ops: usize) -> impl Strategy<Value = Vec<DupOp>> {
    prop::collection::vec(
        prop_oneof![
            6 => (any::<usize>(), 0..DUP_VALUES).prop_map(|(p, v)| DupOp::Insert(p, v)),
            3 => (0..DUP_VALUES).prop_map(DupOp::Remove),
            1 => Just(DupOp::Collect),
        ],
        0..=max_ops,
    )
}

/// Checks a node, then its later siblings with their subtrees, then its
/// children. A removed match ends the walk of its chain.
fn reference_find(nodes: &[DupNode], chain: &[usize], pos: usize, value: u8, level: usize) -> Option<usize> {
    let idx = *chain.get(pos)?;
    let node = &nodes[idx];
    if node.value == value {
        return (!node.tombstone).then_some(idx);
    }
    if level > 0 {
        if let Some(found) = reference_find(nodes, chain, pos + 1, value, level) {
            return Some(found);
        }
    }
    reference_find(nodes, &node.children, 0, value, level + 1)
}

fn tombstone_below(nodes: &mut [DupNode], idx: usize) {
    nodes[idx].tombstone = true;
    for child in nodes[idx].children.clone() {
        tombstone_below(nodes, child);
    }
}

fn apply_dup(tree: &mut Tree<u8>, nodes: &mut Vec<DupNode>, op: &DupOp) {
    match op {
        DupOp::Insert(pick, value) => {
            if tree.root().is_none() {
                let handle = tree.insert_child(None, *value).unwrap();
                nodes.clear();
                nodes.push(DupNode { value: *value, children: vec![], tombstone: false, handle });
                return;
            }
            let parent = pick % nodes.len();
            let inserted = tree.insert_child(Some(&nodes[parent].handle), *value);
            assert_eq!(inserted.is_some(), !nodes[parent].tombstone);
            if let Some(handle) = inserted {
                nodes.push(DupNode { value: *value, children: vec![], tombstone: false, handle });
                let idx = nodes.len() - 1;
                nodes[parent].children.insert(0, idx);
            }
        }
        DupOp::Remove(value) => {
            let target = if nodes.is_empty() { None } else { reference_find(nodes, &[0], 0, *value, 0) };
            assert_eq!(tree.remove(value), target.is_some());
            if let Some(idx) = target {
                tombstone_below(nodes, idx);
            }
        }
        DupOp::Collect => {
            let live = nodes.iter().filter(|n| !n.tombstone).count();
            assert_eq!(tree.collect_garbage(), live > 0);
            if live > 0 {
                let dead: Vec<bool> = nodes.iter().map(|n| n.tombstone).collect();
                for node in nodes.iter_mut() {
                    node.children.retain(|&c| !dead[c]);
                }
            }
        }
    }
}

proptest! {
    #[test]
    fn prop_duplicates_follow_search_order(ops in dup_operations(60)) {
        let mut tree = Tree::new();
        let mut nodes = Vec::new();
        for op in &ops {
            apply_dup(&mut tree, &mut nodes, op);
            prop_assert_eq!(tree.size(), nodes.iter().filter(|n| !n.tombstone).count());
            for value in 0..DUP_VALUES {
                let expected = if nodes.is_empty() {
                    None
                } else {
                    reference_find(&nodes, &[0], 0, value, 0).map(|idx| nodes[idx].handle)
                };
                prop_assert_eq!(tree.find(&value), expected);
            }
        }
    }
}
