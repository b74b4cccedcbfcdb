use std::collections::BTreeMap;

use crate::ast::{DeclKind, ExpKind, Module, PatKind};
use crate::gather::Closures;
use crate::scope::canonical_names_from_pat;
use crate::visit::{NodeRef, Visitor, walk_modules};

/// Per declaration, the canonical names of its formally bound parameters,
/// including those inherited from every enclosing declaration.
pub type Arguments = BTreeMap<String, Vec<String>>;

#[derive(Default)]
struct ArgumentGatherer {
    stack: Vec<String>,
    args: BTreeMap<String, Vec<String>>,
}

impl ArgumentGatherer {
    fn add(&mut self, names: Vec<String>) {
        let Some(current) = self.stack.last() else {
            return;
        };
        let entry = self.args.entry(current.clone()).or_default();
        for name in names {
            if !entry.contains(&name) {
                entry.push(name);
            }
        }
    }
}

impl Visitor for ArgumentGatherer {
    fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        match node {
            NodeRef::Decl(decl) => {
                if let DeclKind::PatBind { pat, .. } = &decl.kind {
                    if let PatKind::Var {
                        canonical_name: Some(name),
                        ..
                    } = &pat.kind
                    {
                        self.stack.push(name.clone());
                    }
                }
            }
            NodeRef::Alt(alt) => self.add(canonical_names_from_pat(&alt.pat)),
            NodeRef::Exp(exp) => {
                if let ExpKind::Lambda { pats, .. } = &exp.kind {
                    for pat in pats {
                        self.add(canonical_names_from_pat(pat));
                    }
                }
            }
            _ => {}
        }
    }

    fn leave(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        if let NodeRef::Decl(decl) = node {
            if let DeclKind::PatBind { pat, .. } = &decl.kind {
                if matches!(
                    &pat.kind,
                    PatKind::Var {
                        canonical_name: Some(_),
                        ..
                    }
                ) {
                    self.stack.pop();
                }
            }
        }
    }
}

/// Argument sets per declaration, with ancestor arguments prepended in
/// closure order (outermost first).
pub fn gather_arguments(modules: &[Module], closures: &Closures) -> Arguments {
    let mut gatherer = ArgumentGatherer::default();
    walk_modules(&mut gatherer, modules);
    let own = gatherer.args;

    let mut arguments = Arguments::new();
    for (decl, parents) in closures {
        let mut inherited: Vec<String> = Vec::new();
        for source in parents.iter().map(String::as_str).chain([decl.as_str()]) {
            let Some(names) = own.get(source) else {
                continue;
            };
            for name in names {
                if !inherited.contains(name) {
                    inherited.push(name.clone());
                }
            }
        }
        arguments.insert(decl.clone(), inherited);
    }
    arguments
}
