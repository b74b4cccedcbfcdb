use std::collections::BTreeMap;

use crate::ast::{DeclKind, Module, PatKind};
use crate::visit::{NodeRef, Visitor, walk_modules};

/// Per declaration, the enclosing declarations from outermost to immediate
/// parent. The constraint generator uses this to decide when a reference
/// needs `Zeta` threading.
pub type Closures = BTreeMap<String, Vec<String>>;

#[derive(Default)]
struct ClosureGatherer {
    stack: Vec<String>,
    closures: Closures,
}

fn bound_name(node: NodeRef<'_>) -> Option<&str> {
    let NodeRef::Decl(decl) = node else {
        return None;
    };
    let DeclKind::PatBind { pat, .. } = &decl.kind else {
        return None;
    };
    match &pat.kind {
        PatKind::Var { canonical_name, .. } => canonical_name.as_deref(),
        _ => None,
    }
}

impl Visitor for ClosureGatherer {
    fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        if let Some(name) = bound_name(node) {
            self.closures.insert(name.to_string(), self.stack.clone());
            self.stack.push(name.to_string());
        }
    }

    fn leave(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        if bound_name(node).is_some() {
            self.stack.pop();
        }
    }
}

pub fn gather_closures(modules: &[Module]) -> Closures {
    let mut gatherer = ClosureGatherer::default();
    walk_modules(&mut gatherer, modules);
    gatherer.closures
}
