use std::collections::BTreeMap;

use crate::ast::{Module, NodeId};
use crate::visit::{NodeRef, Visitor, walk_modules};

#[derive(Default)]
struct DepthGatherer {
    depth: BTreeMap<NodeId, usize>,
}

impl Visitor for DepthGatherer {
    fn enter(&mut self, node: NodeRef<'_>, parent: Option<NodeRef<'_>>) {
        let depth = parent
            .and_then(|p| self.depth.get(&p.id()).copied())
            .map_or(0, |d| d + 1);
        self.depth.insert(node.id(), depth);
    }
}

/// Depth of every node: roots are 0, children one below their parent.
pub fn gather_node_depth(modules: &[Module]) -> BTreeMap<NodeId, usize> {
    let mut gatherer = DepthGatherer::default();
    walk_modules(&mut gatherer, modules);
    gatherer.depth
}
