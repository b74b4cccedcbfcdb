use crate::ast::{Module, NodeId};
use crate::visit::{NodeRef, Visitor, walk_modules};

struct GraphGatherer {
    include_axiom_types: bool,
    edges: Vec<(NodeId, NodeId)>,
}

fn is_axiom_ty(node: NodeRef<'_>) -> bool {
    matches!(node, NodeRef::Ty(ty) if ty.axiom)
}

impl Visitor for GraphGatherer {
    fn enter(&mut self, node: NodeRef<'_>, parent: Option<NodeRef<'_>>) {
        let Some(parent) = parent else { return };
        if !self.include_axiom_types && (is_axiom_ty(node) || is_axiom_ty(parent)) {
            return;
        }
        self.edges.push((parent.id(), node.id()));
    }
}

/// Every traversed (parent, child) edge, in traversal order.
///
/// The variant with `include_axiom_types = false` drives solver attribution:
/// axiom-marked type nodes carry no attribution and are left out.
pub fn gather_node_graph(modules: &[Module], include_axiom_types: bool) -> Vec<(NodeId, NodeId)> {
    let mut gatherer = GraphGatherer {
        include_axiom_types,
        edges: Vec::new(),
    };
    walk_modules(&mut gatherer, modules);
    gatherer.edges
}
