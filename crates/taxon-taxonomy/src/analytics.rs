//! Graph analytics over a [`Tree`] via a petgraph projection.

use petgraph::algo::{tarjan_scc, toposort};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};

use taxon_core::Nid;

use crate::tree::Tree;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeStats {
    pub nodes: usize,
    pub edges: usize,
    pub roots: usize,
    pub leaves: usize,
    /// Nodes with more than one parent.
    pub multi_parent_nodes: usize,
    /// Longest root-to-node edge count. `None` when the tree has cycles.
    pub max_depth: Option<usize>,
    pub cycles: usize,
}

impl Tree {
    /// parent → child edges as a petgraph map.
    pub fn to_graph(&self) -> DiGraphMap<Nid, ()> {
        let mut graph = DiGraphMap::with_capacity(self.node_count(), self.edge_count());
        for node in self.nodes() {
            graph.add_node(node);
        }
        for (parent, child) in self.edges() {
            graph.add_edge(parent, child, ());
        }
        graph
    }

    /// Strongly connected components that form cycles, including self-loops.
    pub fn find_cycles(&self) -> Vec<Vec<Nid>> {
        let graph = self.to_graph();
        tarjan_scc(&graph)
            .into_iter()
            .filter(|scc| scc.len() > 1 || graph.contains_edge(scc[0], scc[0]))
            .collect()
    }

    /// Parents before children. `None` when the tree has a cycle.
    pub fn topological_order(&self) -> Option<Vec<Nid>> {
        toposort(&self.to_graph(), None).ok()
    }

    pub fn stats(&self) -> TreeStats {
        let cycles = self.find_cycles().len();
        let max_depth = self.topological_order().map(|order| {
            let mut depth: std::collections::HashMap<Nid, usize> = std::collections::HashMap::new();
            let mut max = 0;
            for node in order {
                let d = self
                    .parents(node)
                    .filter_map(|p| depth.get(&p).map(|d| d + 1))
                    .max()
                    .unwrap_or(0);
                max = max.max(d);
                depth.insert(node, d);
            }
            max
        });
        TreeStats {
            nodes: self.node_count(),
            edges: self.edge_count(),
            roots: self.roots().len(),
            leaves: self.leaves().len(),
            multi_parent_nodes: self.nodes().filter(|n| self.parents(*n).nth(1).is_some()).count(),
            max_depth,
            cycles,
        }
    }
}
