use std::collections::{BTreeMap, BTreeSet, HashMap};

use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;

use crate::ast::{DeclKind, Module, TyKind};
use crate::error::FatalError;
use crate::visit::{NodeRef, Visitor, walk_modules};

/// Superclass closure: per class, the set of classes reachable through
/// `class (Super a) => Sub a` edges.
pub type SuperClasses = BTreeMap<String, BTreeSet<String>>;

#[derive(Default)]
struct ClassGatherer {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
}

impl ClassGatherer {
    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(ix) = self.index.get(name) {
            return *ix;
        }
        let ix = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), ix);
        ix
    }
}

impl Visitor for ClassGatherer {
    fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        let NodeRef::Decl(decl) = node else { return };
        let DeclKind::Class { context, head, .. } = &decl.kind else {
            return;
        };
        let Some(class_name) = head.canonical_name.clone() else {
            return;
        };
        let class_ix = self.node(&class_name);
        let Some(context) = context else { return };
        for assertion in &context.assertions {
            // Peel applications down to the superclass constructor.
            let mut ty = assertion;
            while let TyKind::App { fun, .. } = &ty.kind {
                ty = fun.as_ref();
            }
            if let TyKind::Con {
                canonical_name: Some(super_name),
                ..
            } = &ty.kind
            {
                let super_ix = self.node(super_name);
                self.graph.add_edge(class_ix, super_ix, ());
            }
        }
    }
}

/// Build the class hierarchy and close it transitively. The hierarchy must
/// be a DAG.
pub fn gather_classes(modules: &[Module]) -> Result<SuperClasses, FatalError> {
    let mut gatherer = ClassGatherer::default();
    walk_modules(&mut gatherer, modules);

    if is_cyclic_directed(&gatherer.graph) {
        return Err(FatalError::CyclicClassHierarchy);
    }

    let mut classes = SuperClasses::new();
    for (name, &ix) in &gatherer.index {
        let mut supers = BTreeSet::new();
        let mut dfs = Dfs::new(&gatherer.graph, ix);
        while let Some(reached) = dfs.next(&gatherer.graph) {
            if reached != ix {
                supers.insert(gatherer.graph[reached].clone());
            }
        }
        classes.insert(name.clone(), supers);
    }
    Ok(classes)
}
