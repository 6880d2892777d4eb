//! The taxonomy as a parent/child adjacency structure.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use taxon_core::errors::{TaxonResult, TaxonomyError};
use taxon_core::Nid;

/// A directed acyclic (in well-formed data) taxonomy. Nodes may have many
/// parents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    nodes: BTreeSet<Nid>,
    children: BTreeMap<Nid, BTreeSet<Nid>>,
    parents: BTreeMap<Nid, BTreeSet<Nid>>,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a node set and `(parent, child)` edges. Edge endpoints are
    /// added to the node set.
    pub fn from_edges(
        nodes: impl IntoIterator<Item = Nid>,
        edges: impl IntoIterator<Item = (Nid, Nid)>,
    ) -> Self {
        let mut tree = Self::new();
        for node in nodes {
            tree.nodes.insert(node);
        }
        for (parent, child) in edges {
            tree.insert_edge(parent, child);
        }
        tree
    }

    fn insert_edge(&mut self, parent: Nid, child: Nid) {
        self.nodes.insert(parent);
        self.nodes.insert(child);
        self.children.entry(parent).or_default().insert(child);
        self.parents.entry(child).or_default().insert(parent);
    }

    pub fn contains(&self, node: Nid) -> bool {
        self.nodes.contains(&node)
    }

    pub(crate) fn require(&self, node: Nid) -> TaxonResult<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(TaxonomyError::UnknownNode(node).into())
        }
    }

    pub fn nodes(&self) -> impl Iterator<Item = Nid> + '_ {
        self.nodes.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.children.values().map(BTreeSet::len).sum()
    }

    pub fn has_edge(&self, parent: Nid, child: Nid) -> bool {
        self.children.get(&parent).is_some_and(|c| c.contains(&child))
    }

    /// Every `(parent, child)` edge in order.
    pub fn edges(&self) -> impl Iterator<Item = (Nid, Nid)> + '_ {
        self.children
            .iter()
            .flat_map(|(parent, children)| children.iter().map(move |child| (*parent, *child)))
    }

    pub fn children(&self, node: Nid) -> impl Iterator<Item = Nid> + '_ {
        self.children.get(&node).into_iter().flatten().copied()
    }

    pub fn parents(&self, node: Nid) -> impl Iterator<Item = Nid> + '_ {
        self.parents.get(&node).into_iter().flatten().copied()
    }

    /// Nodes without parents.
    pub fn roots(&self) -> BTreeSet<Nid> {
        self.nodes
            .iter()
            .filter(|n| !self.parents.contains_key(n))
            .copied()
            .collect()
    }

    /// Nodes without children.
    pub fn leaves(&self) -> BTreeSet<Nid> {
        self.nodes
            .iter()
            .filter(|n| !self.children.contains_key(n))
            .copied()
            .collect()
    }

    /// Transitive parents of `node`, excluding `node` itself.
    pub fn ancestors(&self, node: Nid) -> TaxonResult<BTreeSet<Nid>> {
        self.require(node)?;
        Ok(self.reach(node, |n| self.parents(n)))
    }

    /// Transitive children of `node`, excluding `node` itself.
    pub fn descendants(&self, node: Nid) -> TaxonResult<BTreeSet<Nid>> {
        self.require(node)?;
        Ok(self.reach(node, |n| self.children(n)))
    }

    fn reach<'a, I>(&'a self, start: Nid, next: impl Fn(Nid) -> I) -> BTreeSet<Nid>
    where
        I: Iterator<Item = Nid> + 'a,
    {
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([start]);
        while let Some(node) = queue.pop_front() {
            for neighbor in next(node) {
                if neighbor != start && seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        seen
    }

    /// True when `ancestor` is reachable from `child` through parent links.
    pub fn is_descendant_of(&self, child: Nid, ancestor: Nid) -> bool {
        if !self.contains(child) || child == ancestor {
            return false;
        }
        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([child]);
        while let Some(node) = queue.pop_front() {
            for parent in self.parents(node) {
                if parent == ancestor {
                    return true;
                }
                if seen.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }
        false
    }

    /// The ancestry of `child` as its own tree, with the relation inverted:
    /// `child` is the single root and each node's children are its parents
    /// in this tree.
    pub fn create_ancestor_tree(&self, child: Nid) -> TaxonResult<Tree> {
        self.require(child)?;
        let mut ancestry = Tree::new();
        ancestry.nodes.insert(child);
        let mut queue = VecDeque::from([child]);
        let mut seen = BTreeSet::from([child]);
        while let Some(node) = queue.pop_front() {
            for parent in self.parents(node) {
                ancestry.insert_edge(node, parent);
                if seen.insert(parent) {
                    queue.push_back(parent);
                }
            }
        }
        Ok(ancestry)
    }
}
