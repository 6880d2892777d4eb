//! Per-traversal bookkeeping.

use std::collections::{BTreeSet, HashMap};

use taxon_core::Nid;

/// Traversal state of a node. Moves forward only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum NodeStatus {
    #[default]
    Undiscovered,
    Processing,
    Finished,
}

/// Distances, discovery/finish times, predecessors and leaves gathered by
/// one traversal.
#[derive(Debug, Clone, Default)]
pub struct TreeNodeVisitData {
    status: HashMap<Nid, NodeStatus>,
    distance: HashMap<Nid, usize>,
    discovery_time: HashMap<Nid, u32>,
    finish_time: HashMap<Nid, u32>,
    predecessor: HashMap<Nid, Nid>,
    leaves: BTreeSet<Nid>,
    time: u32,
    max_depth: usize,
}

impl TreeNodeVisitData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, node: Nid) -> NodeStatus {
        self.status.get(&node).copied().unwrap_or_default()
    }

    /// # Panics
    /// Panics if `status` would move `node` backwards.
    pub fn set_status(&mut self, node: Nid, status: NodeStatus) {
        let current = self.status(node);
        assert!(
            status > current,
            "node {node} status cannot move from {current:?} to {status:?}"
        );
        self.status.insert(node, status);
    }

    /// Mark `node` discovered at `distance`, reached from `predecessor`.
    pub(crate) fn start_node(&mut self, node: Nid, distance: usize, predecessor: Option<Nid>) {
        self.set_status(node, NodeStatus::Processing);
        self.time += 1;
        self.discovery_time.insert(node, self.time);
        self.distance.insert(node, distance);
        self.max_depth = self.max_depth.max(distance);
        if let Some(predecessor) = predecessor {
            self.predecessor.insert(node, predecessor);
        }
    }

    pub(crate) fn end_node(&mut self, node: Nid, is_leaf: bool) {
        self.set_status(node, NodeStatus::Finished);
        self.time += 1;
        self.finish_time.insert(node, self.time);
        if is_leaf {
            self.leaves.insert(node);
        }
    }

    pub fn distance(&self, node: Nid) -> Option<usize> {
        self.distance.get(&node).copied()
    }

    pub fn discovery_time(&self, node: Nid) -> Option<u32> {
        self.discovery_time.get(&node).copied()
    }

    pub fn finish_time(&self, node: Nid) -> Option<u32> {
        self.finish_time.get(&node).copied()
    }

    pub fn predecessor(&self, node: Nid) -> Option<Nid> {
        self.predecessor.get(&node).copied()
    }

    /// Visited nodes without children.
    pub fn leaves(&self) -> &BTreeSet<Nid> {
        &self.leaves
    }

    pub fn visited_count(&self) -> usize {
        self.discovery_time.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Path from the traversal start to `node` following predecessors.
    pub fn path_to(&self, node: Nid) -> Vec<Nid> {
        if !self.discovery_time.contains_key(&node) {
            return Vec::new();
        }
        let mut path = vec![node];
        let mut current = node;
        while let Some(previous) = self.predecessor(current) {
            path.push(previous);
            current = previous;
        }
        path.reverse();
        path
    }
}
