//! Breadth- and depth-first traversal over [`Tree`] children.

use std::collections::VecDeque;

use taxon_core::errors::TaxonResult;
use taxon_core::Nid;

use crate::tree::Tree;
use crate::visit_data::{NodeStatus, TreeNodeVisitData};

impl Tree {
    /// Visit every node reachable from `start`, nearest first. `visitor`
    /// runs once per node as it is discovered.
    pub fn breadth_first_process(
        &self,
        start: Nid,
        mut visitor: impl FnMut(Nid, &TreeNodeVisitData),
    ) -> TaxonResult<TreeNodeVisitData> {
        self.require(start)?;
        let mut data = TreeNodeVisitData::new();
        let mut queue = VecDeque::new();
        data.start_node(start, 0, None);
        visitor(start, &data);
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            let distance = data.distance(node).unwrap_or(0);
            let mut has_children = false;
            for child in self.children(node) {
                has_children = true;
                if data.status(child) == NodeStatus::Undiscovered {
                    data.start_node(child, distance + 1, Some(node));
                    visitor(child, &data);
                    queue.push_back(child);
                }
            }
            data.end_node(node, !has_children);
        }
        Ok(data)
    }

    /// Visit every node reachable from `start`, deepest first. Iterative so
    /// deep taxonomies cannot overflow the stack.
    pub fn depth_first_process(
        &self,
        start: Nid,
        mut visitor: impl FnMut(Nid, &TreeNodeVisitData),
    ) -> TaxonResult<TreeNodeVisitData> {
        self.require(start)?;
        let mut data = TreeNodeVisitData::new();
        data.start_node(start, 0, None);
        visitor(start, &data);
        // (node, its children, next child index)
        let mut stack: Vec<(Nid, Vec<Nid>, usize)> =
            vec![(start, self.children(start).collect(), 0)];

        while let Some((node, children, next)) = stack.last_mut() {
            if let Some(child) = children.get(*next).copied() {
                *next += 1;
                if data.status(child) == NodeStatus::Undiscovered {
                    let distance = data.distance(*node).unwrap_or(0) + 1;
                    data.start_node(child, distance, Some(*node));
                    visitor(child, &data);
                    let grandchildren = self.children(child).collect();
                    stack.push((child, grandchildren, 0));
                }
            } else {
                let is_leaf = children.is_empty();
                let node = *node;
                stack.pop();
                data.end_node(node, is_leaf);
            }
        }
        Ok(data)
    }
}
