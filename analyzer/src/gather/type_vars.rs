use std::collections::{BTreeMap, BTreeSet};

use crate::ast::{DeclKind, Module, TyKind};
use crate::gather::SuperClasses;
use crate::visit::{NodeRef, Visitor, walk_modules};

/// Per declaration, the classes asserted on each of its type variables:
/// from the enclosing class declaration, from `forall` contexts, and from
/// the superclass closure.
pub type TypeVars = BTreeMap<String, BTreeMap<String, BTreeSet<String>>>;

#[derive(Default)]
struct TypeVarGatherer {
    current_decls: Vec<String>,
    vars: TypeVars,
}

impl TypeVarGatherer {
    fn assert_class(&mut self, decl: &str, ty_var: &str, class_name: &str) {
        self.vars
            .entry(decl.to_string())
            .or_default()
            .entry(ty_var.to_string())
            .or_default()
            .insert(class_name.to_string());
    }
}

impl Visitor for TypeVarGatherer {
    fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        match node {
            NodeRef::Decl(decl) => match &decl.kind {
                DeclKind::Class { head, decls, .. } => {
                    let Some(class_name) = head.canonical_name.clone() else {
                        return;
                    };
                    let Some(ty_var) = head.ty_vars.first().and_then(|v| match &v.kind {
                        TyKind::Var { name, .. } => Some(name.clone()),
                        _ => None,
                    }) else {
                        return;
                    };
                    for decl in decls {
                        let DeclKind::Sig {
                            canonical_names, ..
                        } = &decl.kind
                        else {
                            continue;
                        };
                        for name in canonical_names.clone() {
                            self.assert_class(&name, &ty_var, &class_name);
                        }
                    }
                }
                DeclKind::Sig {
                    canonical_names, ..
                } => {
                    self.current_decls = canonical_names.clone();
                }
                _ => {}
            },
            NodeRef::Ty(ty) => match &ty.kind {
                TyKind::Forall {
                    context: Some(context),
                    ..
                } => {
                    for assertion in &context.assertions {
                        let TyKind::App { fun, arg } = &assertion.kind else {
                            continue;
                        };
                        let TyKind::Con {
                            canonical_name: Some(class_name),
                            ..
                        } = &fun.kind
                        else {
                            continue;
                        };
                        let TyKind::Var { name: ty_var, .. } = &arg.kind else {
                            continue;
                        };
                        let (class_name, ty_var) = (class_name.clone(), ty_var.clone());
                        for decl in self.current_decls.clone() {
                            self.assert_class(&decl, &ty_var, &class_name);
                        }
                    }
                }
                TyKind::Var { name, .. } => {
                    let name = name.clone();
                    for decl in self.current_decls.clone() {
                        self.vars
                            .entry(decl)
                            .or_default()
                            .entry(name.clone())
                            .or_default();
                    }
                }
                _ => {}
            },
            _ => {}
        }
    }
}

pub fn gather_type_vars(modules: &[Module], classes: &SuperClasses) -> TypeVars {
    let mut gatherer = TypeVarGatherer::default();
    walk_modules(&mut gatherer, modules);
    let mut vars = gatherer.vars;

    // Close each assertion set over the superclass hierarchy.
    for per_var in vars.values_mut() {
        for set in per_var.values_mut() {
            let mut inherited = BTreeSet::new();
            for class in set.iter() {
                if let Some(supers) = classes.get(class) {
                    inherited.extend(supers.iter().cloned());
                }
            }
            set.extend(inherited);
        }
    }
    vars
}
