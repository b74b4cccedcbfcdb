use std::collections::BTreeMap;

use crate::ast::{Module, NodeId};
use crate::span::Range;
use crate::visit::{NodeRef, Visitor, walk_modules};

#[derive(Default)]
struct TableGatherer {
    table: BTreeMap<NodeId, Range>,
}

impl Visitor for TableGatherer {
    fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        self.table.insert(node.id(), node.loc());
    }
}

/// Source range of every node, keyed by id.
pub fn gather_node_table(modules: &[Module]) -> BTreeMap<NodeId, Range> {
    let mut gatherer = TableGatherer::default();
    walk_modules(&mut gatherer, modules);
    gatherer.table
}
