//! Name resolution: binding sites (vendors), use sites (buyers), and the
//! allocation pass that pairs them.
//!
//! A vendor's visibility is its *effective range*: global (gated by module
//! imports), or a local range minus holes for sibling bindings declared
//! earlier in the same clause. The allocator picks, among the candidates that
//! admit a buyer, the most deeply nested one — the vendor whose range starts
//! latest; globals lose to any local.

use std::collections::HashMap;

use crate::ast::*;
use crate::encode::encode;
use crate::error::FatalError;
use crate::span::{Point, Range};
use crate::visit::{NodeRef, Visitor, walk_module};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    Term,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Global,
    Local { range: Range, excludes: Vec<Range> },
}

impl Scope {
    fn admits(&self, usage: Range) -> bool {
        match self {
            Scope::Global => true,
            Scope::Local { range, excludes } => {
                range.contains(usage) && !excludes.iter().any(|hole| hole.contains(usage))
            }
        }
    }

    fn start(&self) -> Option<Point> {
        match self {
            Scope::Global => None,
            Scope::Local { range, .. } => Some(range.start),
        }
    }
}

/// A binding site. Immutable once collected.
#[derive(Debug, Clone)]
pub struct Vendor {
    pub node_id: NodeId,
    pub name: String,
    pub namespace: Namespace,
    pub is_declaration: bool,
    pub module: String,
    pub canonical_name: String,
    pub scope: Scope,
}

/// A use site. The allocator fills `canonical_name` and `module`.
#[derive(Debug, Clone)]
pub struct Buyer {
    pub node_id: NodeId,
    pub name: String,
    pub namespace: Namespace,
    pub module: Option<String>,
    pub usage_module: String,
    pub usage_loc: Range,
    pub canonical_name: Option<String>,
}

pub(crate) fn names_from_pat(pat: &Pat) -> Vec<(&str, NodeId)> {
    match &pat.kind {
        PatKind::Var { name, .. } => vec![(name.as_str(), pat.id)],
        PatKind::App { pats, .. } | PatKind::List(pats) | PatKind::Tuple(pats) => {
            pats.iter().flat_map(names_from_pat).collect()
        }
        PatKind::Infix { left, right, .. } => {
            let mut names = names_from_pat(left);
            names.extend(names_from_pat(right));
            names
        }
        PatKind::Wildcard | PatKind::Lit(_) => Vec::new(),
    }
}

pub(crate) fn canonical_names_from_pat(pat: &Pat) -> Vec<String> {
    match &pat.kind {
        PatKind::Var { canonical_name, .. } => canonical_name.iter().cloned().collect(),
        PatKind::App { pats, .. } | PatKind::List(pats) | PatKind::Tuple(pats) => {
            pats.iter().flat_map(canonical_names_from_pat).collect()
        }
        PatKind::Infix { left, right, .. } => {
            let mut names = canonical_names_from_pat(left);
            names.extend(canonical_names_from_pat(right));
            names
        }
        PatKind::Wildcard | PatKind::Lit(_) => Vec::new(),
    }
}

/// Visibility of a binding determined by its parent construct: module, class,
/// and instance bodies bind globally; right-hand sides, case alternatives,
/// and `let` expressions bind over the parent's range minus the ranges of
/// sibling bindings declared before this one.
fn effective_scope(node_id: NodeId, parent: NodeRef<'_>) -> Option<Scope> {
    fn local(range: Range, siblings: &[Decl], node_id: NodeId) -> Scope {
        let mut excludes = Vec::new();
        for decl in siblings {
            if decl.id == node_id {
                break;
            }
            excludes.push(decl.loc);
        }
        Scope::Local { range, excludes }
    }

    match parent {
        NodeRef::Module(_) => Some(Scope::Global),
        NodeRef::Decl(decl) => match &decl.kind {
            DeclKind::Class { .. } | DeclKind::Instance { .. } => Some(Scope::Global),
            _ => None,
        },
        NodeRef::Rhs(rhs) => {
            let wheres = match &rhs.kind {
                RhsKind::Unguarded { wheres, .. } | RhsKind::Guarded { wheres, .. } => wheres,
            };
            Some(local(rhs.loc, wheres, node_id))
        }
        NodeRef::Alt(alt) => Some(local(alt.loc, &alt.binds, node_id)),
        NodeRef::Exp(exp) => match &exp.kind {
            ExpKind::Let { binds, .. } => Some(local(exp.loc, binds, node_id)),
            _ => None,
        },
        _ => None,
    }
}

struct VendorCollector<'a> {
    module: &'a str,
    tag: &'a str,
    vendors: Vec<Vendor>,
    error: Option<FatalError>,
}

impl VendorCollector<'_> {
    fn canonical(&self, name: &str, scope: &Scope) -> Result<String, FatalError> {
        let encoded = encode(name)?;
        Ok(match scope.start() {
            None => format!("{}_{}", self.tag, encoded),
            Some(start) => format!("{}_{}_{}_{}", self.tag, encoded, start.line, start.col),
        })
    }

    fn push(
        &mut self,
        node_id: NodeId,
        name: &str,
        namespace: Namespace,
        is_declaration: bool,
        scope: Scope,
    ) -> Result<(), FatalError> {
        let canonical_name = self.canonical(name, &scope)?;
        self.vendors.push(Vendor {
            node_id,
            name: name.to_string(),
            namespace,
            is_declaration,
            module: self.module.to_string(),
            canonical_name,
            scope,
        });
        Ok(())
    }

    fn enter_inner(
        &mut self,
        node: NodeRef<'_>,
        parent: Option<NodeRef<'_>>,
    ) -> Result<(), FatalError> {
        match node {
            NodeRef::Decl(decl) => match &decl.kind {
                DeclKind::Sig { names, .. } => {
                    let Some(parent) = parent else {
                        return Ok(());
                    };
                    let Some(scope) = effective_scope(decl.id, parent) else {
                        return Ok(());
                    };
                    for name in names {
                        self.push(decl.id, name, Namespace::Term, true, scope.clone())?;
                    }
                    Ok(())
                }
                DeclKind::PatBind { pat, .. } => {
                    // `do let` bindings are handled at the enclosing `do`.
                    if matches!(parent, Some(NodeRef::Stmt(_))) {
                        return Ok(());
                    }
                    let PatKind::Var { name, .. } = &pat.kind else {
                        return Ok(());
                    };
                    let Some(parent) = parent else {
                        return Ok(());
                    };
                    let Some(scope) = effective_scope(decl.id, parent) else {
                        return Ok(());
                    };
                    self.push(pat.id, name, Namespace::Term, true, scope)
                }
                DeclKind::Data { head, .. } | DeclKind::Class { head, .. } => {
                    self.push(head.id, &head.name, Namespace::Type, false, Scope::Global)
                }
                _ => Ok(()),
            },

            NodeRef::Con(con) => {
                self.push(con.id, &con.name, Namespace::Term, true, Scope::Global)
            }

            NodeRef::Exp(exp) => match &exp.kind {
                // A `do let` binding is in scope from the end of its own
                // binding to the end of the `do` block: monadic `let` only
                // scopes over subsequent statements.
                ExpKind::Do { stmts } => {
                    let end = exp.loc.end;
                    for stmt in stmts {
                        let StmtKind::Let { binds } = &stmt.kind else {
                            continue;
                        };
                        for bind in binds {
                            let DeclKind::PatBind { pat, .. } = &bind.kind else {
                                continue;
                            };
                            let scope = Scope::Local {
                                range: Range::new(bind.loc.end, end),
                                excludes: Vec::new(),
                            };
                            for (name, id) in names_from_pat(pat) {
                                self.push(id, name, Namespace::Term, true, scope.clone())?;
                            }
                        }
                    }
                    Ok(())
                }
                ExpKind::Lambda { pats, .. } => {
                    let scope = Scope::Local {
                        range: exp.loc,
                        excludes: Vec::new(),
                    };
                    for pat in pats {
                        for (name, id) in names_from_pat(pat) {
                            self.push(id, name, Namespace::Term, false, scope.clone())?;
                        }
                    }
                    Ok(())
                }
                ExpKind::Comprehension { quantifiers, .. } => {
                    let scope = Scope::Local {
                        range: exp.loc,
                        excludes: Vec::new(),
                    };
                    for stmt in quantifiers {
                        let StmtKind::Generator { pat, .. } = &stmt.kind else {
                            continue;
                        };
                        for (name, id) in names_from_pat(pat) {
                            self.push(id, name, Namespace::Term, false, scope.clone())?;
                        }
                    }
                    Ok(())
                }
                _ => Ok(()),
            },

            NodeRef::Alt(alt) => {
                let scope = Scope::Local {
                    range: alt.loc,
                    excludes: Vec::new(),
                };
                for (name, id) in names_from_pat(&alt.pat) {
                    self.push(id, name, Namespace::Term, false, scope.clone())?;
                }
                Ok(())
            }

            _ => Ok(()),
        }
    }
}

impl Visitor for VendorCollector<'_> {
    fn enter(&mut self, node: NodeRef<'_>, parent: Option<NodeRef<'_>>) {
        if self.error.is_some() {
            return;
        }
        if let Err(e) = self.enter_inner(node, parent) {
            self.error = Some(e);
        }
    }
}

pub fn collect_vendors(
    modules: &[Module],
    tags: &HashMap<String, String>,
) -> Result<Vec<Vendor>, FatalError> {
    let mut vendors = Vec::new();
    for module in modules {
        let Some(tag) = tags.get(&module.name) else {
            continue;
        };
        let mut collector = VendorCollector {
            module: &module.name,
            tag,
            vendors: Vec::new(),
            error: None,
        };
        walk_module(&mut collector, module);
        if let Some(e) = collector.error {
            return Err(e);
        }
        vendors.append(&mut collector.vendors);
    }
    Ok(vendors)
}

struct BuyerCollector<'a> {
    module: &'a str,
    buyers: Vec<Buyer>,
}

impl BuyerCollector<'_> {
    fn push(
        &mut self,
        node_id: NodeId,
        name: &str,
        namespace: Namespace,
        module: &Option<String>,
        usage_loc: Range,
    ) {
        self.buyers.push(Buyer {
            node_id,
            name: name.to_string(),
            namespace,
            module: module.clone(),
            usage_module: self.module.to_string(),
            usage_loc,
            canonical_name: None,
        });
    }
}

impl Visitor for BuyerCollector<'_> {
    fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
        match node {
            NodeRef::Exp(exp) => match &exp.kind {
                ExpKind::Var { name, module, .. } | ExpKind::Con { name, module, .. } => {
                    self.push(exp.id, name, Namespace::Term, module, exp.loc);
                }
                _ => {}
            },
            NodeRef::Pat(pat) => match &pat.kind {
                PatKind::App { name, module, .. } | PatKind::Infix { name, module, .. } => {
                    self.push(pat.id, name, Namespace::Term, module, pat.loc);
                }
                _ => {}
            },
            NodeRef::Ty(ty) => {
                if let TyKind::Con { name, module, .. } = &ty.kind {
                    self.push(ty.id, name, Namespace::Type, module, ty.loc);
                }
            }
            NodeRef::Decl(decl) => {
                if let DeclKind::Instance { name, module, .. } = &decl.kind {
                    self.push(decl.id, name, Namespace::Type, module, decl.loc);
                }
            }
            _ => {}
        }
    }
}

pub fn collect_buyers(modules: &[Module]) -> Vec<Buyer> {
    let mut buyers = Vec::new();
    for module in modules {
        let mut collector = BuyerCollector {
            module: &module.name,
            buyers: Vec::new(),
        };
        walk_module(&mut collector, module);
        buyers.append(&mut collector.buyers);
    }
    buyers
}

/// Names that resolve against a fixed builtin table when no vendor matches.
const BUILTIN_FALLBACK: [(&str, &str); 7] = [
    ("undefined", "builtin_bottom"),
    ("unit", "builtin_unit"),
    ("Top", "builtin_Top"),
    (":", "builtin_cons"),
    ("Int", "builtin_Int"),
    ("Char", "builtin_Char"),
    ("Float", "builtin_Float"),
];

fn in_scope(buyer: &Buyer, vendor: &Vendor, imports: &HashMap<String, Vec<String>>) -> bool {
    if vendor.name != buyer.name || vendor.namespace != buyer.namespace {
        return false;
    }
    if let Some(qualifier) = &buyer.module {
        if &vendor.module != qualifier {
            return false;
        }
    }
    match &vendor.scope {
        Scope::Global => {
            // Every module implicitly imports itself.
            vendor.module == buyer.usage_module
                || imports
                    .get(&buyer.usage_module)
                    .is_some_and(|imported| imported.contains(&vendor.module))
        }
        Scope::Local { .. } => {
            vendor.module == buyer.usage_module && vendor.scope.admits(buyer.usage_loc)
        }
    }
}

/// Pair every buyer with a vendor or a builtin. Unresolved buyers are
/// collected in full so the client can report every unknown name at once.
pub fn allocate(
    vendors: &[Vendor],
    buyers: Vec<Buyer>,
    imports: &HashMap<String, Vec<String>>,
) -> (Vec<Buyer>, Vec<Buyer>) {
    let mut resolved = Vec::new();
    let mut import_errors = Vec::new();

    for mut buyer in buyers {
        let candidates: Vec<&Vendor> = vendors
            .iter()
            .filter(|v| in_scope(&buyer, v, imports))
            .collect();

        let Some(first) = candidates.first() else {
            match BUILTIN_FALLBACK.iter().find(|(name, _)| *name == buyer.name) {
                Some((_, canonical)) => {
                    buyer.canonical_name = Some((*canonical).to_string());
                    buyer.module = Some("builtin".to_string());
                    resolved.push(buyer);
                }
                None => import_errors.push(buyer),
            }
            continue;
        };

        let mut best = *first;
        for v in &candidates[1..] {
            best = match (&best.scope, &v.scope) {
                (Scope::Global, _) => v,
                (Scope::Local { .. }, Scope::Global) => best,
                (Scope::Local { range: b, .. }, Scope::Local { range: c, .. }) => {
                    if c.start >= b.start { v } else { best }
                }
            };
        }
        buyer.canonical_name = Some(best.canonical_name.clone());
        buyer.module = Some(best.module.clone());
        resolved.push(buyer);
    }

    (resolved, import_errors)
}
