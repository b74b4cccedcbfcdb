//! Writes resolved canonical names back into the AST.
//!
//! Vendors rename binding nodes (pattern variables, constructors, declaration
//! heads, signatures); buyers rename reference nodes and fill in the resolved
//! module. Renaming an already-renamed tree is a no-op.

use std::collections::HashMap;

use crate::ast::*;
use crate::scope::{Buyer, Vendor};

struct Index<'a> {
    vendors: HashMap<NodeId, Vec<&'a Vendor>>,
    buyers: HashMap<NodeId, &'a Buyer>,
}

pub fn rename_modules(modules: &mut [Module], vendors: &[Vendor], buyers: &[Buyer]) {
    let mut vendor_index: HashMap<NodeId, Vec<&Vendor>> = HashMap::new();
    for vendor in vendors {
        vendor_index.entry(vendor.node_id).or_default().push(vendor);
    }
    let buyer_index: HashMap<NodeId, &Buyer> = buyers.iter().map(|b| (b.node_id, b)).collect();
    let index = Index {
        vendors: vendor_index,
        buyers: buyer_index,
    };
    for module in modules {
        for decl in &mut module.decls {
            rename_decl(decl, &index);
        }
    }
}

fn vendor_name(index: &Index<'_>, node_id: NodeId) -> Option<String> {
    index
        .vendors
        .get(&node_id)
        .and_then(|vs| vs.first())
        .map(|v| v.canonical_name.clone())
}

fn rename_decl(decl: &mut Decl, index: &Index<'_>) {
    match &mut decl.kind {
        DeclKind::Synonym { .. } => {}
        DeclKind::Sig {
            names,
            canonical_names,
            ty,
        } => {
            if let Some(vendors) = index.vendors.get(&decl.id) {
                let by_name: HashMap<&str, &str> = vendors
                    .iter()
                    .map(|v| (v.name.as_str(), v.canonical_name.as_str()))
                    .collect();
                *canonical_names = names
                    .iter()
                    .filter_map(|n| by_name.get(n.as_str()).map(|c| (*c).to_string()))
                    .collect();
            }
            rename_ty(ty, index);
        }
        DeclKind::PatBind { pat, rhs } => {
            rename_pat(pat, index);
            rename_rhs(rhs, index);
        }
        DeclKind::Data {
            head,
            constructors,
            deriving,
        } => {
            rename_head(head, index);
            for con in constructors {
                if let Some(canonical) = vendor_name(index, con.id) {
                    con.canonical_name = Some(canonical);
                }
                for ty in &mut con.tys {
                    rename_ty(ty, index);
                }
            }
            for ty in deriving {
                rename_ty(ty, index);
            }
        }
        DeclKind::Class {
            context,
            head,
            decls,
        } => {
            if let Some(context) = context {
                rename_context(context, index);
            }
            rename_head(head, index);
            for decl in decls {
                rename_decl(decl, index);
            }
        }
        DeclKind::Instance {
            context,
            module,
            canonical_name,
            tys,
            body,
            ..
        } => {
            if let Some(buyer) = index.buyers.get(&decl.id) {
                *canonical_name = buyer.canonical_name.clone();
                *module = buyer.module.clone();
            }
            if let Some(context) = context {
                rename_context(context, index);
            }
            for ty in tys {
                rename_ty(ty, index);
            }
            for decl in body {
                rename_decl(decl, index);
            }
        }
    }
}

fn rename_head(head: &mut DeclHead, index: &Index<'_>) {
    if let Some(canonical) = vendor_name(index, head.id) {
        head.canonical_name = Some(canonical);
    }
}

fn rename_context(context: &mut Context, index: &Index<'_>) {
    for assertion in &mut context.assertions {
        rename_ty(assertion, index);
    }
}

fn rename_pat(pat: &mut Pat, index: &Index<'_>) {
    match &mut pat.kind {
        PatKind::Var { canonical_name, .. } => {
            if let Some(canonical) = vendor_name(index, pat.id) {
                *canonical_name = Some(canonical);
            }
        }
        PatKind::Wildcard | PatKind::Lit(_) => {}
        PatKind::App {
            canonical_name,
            module,
            pats,
            ..
        } => {
            if let Some(buyer) = index.buyers.get(&pat.id) {
                *canonical_name = buyer.canonical_name.clone();
                *module = buyer.module.clone();
            }
            for pat in pats {
                rename_pat(pat, index);
            }
        }
        PatKind::Infix {
            left,
            canonical_name,
            module,
            right,
            ..
        } => {
            if let Some(buyer) = index.buyers.get(&pat.id) {
                *canonical_name = buyer.canonical_name.clone();
                *module = buyer.module.clone();
            }
            rename_pat(left, index);
            rename_pat(right, index);
        }
        PatKind::List(pats) | PatKind::Tuple(pats) => {
            for pat in pats {
                rename_pat(pat, index);
            }
        }
    }
}

fn rename_rhs(rhs: &mut Rhs, index: &Index<'_>) {
    match &mut rhs.kind {
        RhsKind::Unguarded { exp, wheres } => {
            rename_exp(exp, index);
            for decl in wheres {
                rename_decl(decl, index);
            }
        }
        RhsKind::Guarded { branches, wheres } => {
            for branch in branches {
                for guard in &mut branch.guards {
                    rename_exp(guard, index);
                }
                rename_exp(&mut branch.exp, index);
            }
            for decl in wheres {
                rename_decl(decl, index);
            }
        }
    }
}

fn rename_stmt(stmt: &mut Stmt, index: &Index<'_>) {
    match &mut stmt.kind {
        StmtKind::Generator { pat, exp } => {
            rename_pat(pat, index);
            rename_exp(exp, index);
        }
        StmtKind::Qualifier { exp } => rename_exp(exp, index),
        StmtKind::Let { binds } => {
            for decl in binds {
                rename_decl(decl, index);
            }
        }
    }
}

fn rename_exp(exp: &mut Exp, index: &Index<'_>) {
    match &mut exp.kind {
        ExpKind::Var {
            canonical_name,
            module,
            ..
        }
        | ExpKind::Con {
            canonical_name,
            module,
            ..
        } => {
            if let Some(buyer) = index.buyers.get(&exp.id) {
                *canonical_name = buyer.canonical_name.clone();
                *module = buyer.module.clone();
            }
        }
        ExpKind::Lit(_) => {}
        ExpKind::App { fun, arg } => {
            rename_exp(fun, index);
            rename_exp(arg, index);
        }
        ExpKind::InfixApp { left, op, right } => {
            rename_exp(left, index);
            rename_exp(op, index);
            rename_exp(right, index);
        }
        ExpKind::Lambda { pats, body } => {
            for pat in pats {
                rename_pat(pat, index);
            }
            rename_exp(body, index);
        }
        ExpKind::Let { binds, body } => {
            for decl in binds {
                rename_decl(decl, index);
            }
            rename_exp(body, index);
        }
        ExpKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            rename_exp(cond, index);
            rename_exp(then_branch, index);
            rename_exp(else_branch, index);
        }
        ExpKind::Case { scrutinee, alts } => {
            rename_exp(scrutinee, index);
            for alt in alts {
                rename_pat(&mut alt.pat, index);
                rename_exp(&mut alt.exp, index);
                for decl in &mut alt.binds {
                    rename_decl(decl, index);
                }
            }
        }
        ExpKind::Do { stmts } => {
            for stmt in stmts {
                rename_stmt(stmt, index);
            }
        }
        ExpKind::Tuple(exps) | ExpKind::List(exps) => {
            for exp in exps {
                rename_exp(exp, index);
            }
        }
        ExpKind::LeftSection { left, op } => {
            rename_exp(left, index);
            rename_exp(op, index);
        }
        ExpKind::RightSection { op, right } => {
            rename_exp(op, index);
            rename_exp(right, index);
        }
        ExpKind::EnumFrom { from } => rename_exp(from, index),
        ExpKind::EnumTo { to } => rename_exp(to, index),
        ExpKind::EnumFromTo { from, to } => {
            rename_exp(from, index);
            rename_exp(to, index);
        }
        ExpKind::Comprehension {
            body,
            quantifiers,
            guards,
        } => {
            for stmt in quantifiers {
                rename_stmt(stmt, index);
            }
            for guard in guards {
                rename_exp(guard, index);
            }
            rename_exp(body, index);
        }
    }
}

fn rename_ty(ty: &mut Ty, index: &Index<'_>) {
    match &mut ty.kind {
        TyKind::Con {
            canonical_name,
            module,
            ..
        } => {
            if let Some(buyer) = index.buyers.get(&ty.id) {
                *canonical_name = buyer.canonical_name.clone();
                *module = buyer.module.clone();
            }
        }
        TyKind::Var { .. }
        | TyKind::PrefixList
        | TyKind::PrefixTuple { .. }
        | TyKind::PrefixFun => {}
        TyKind::App { fun, arg } => {
            rename_ty(fun, index);
            rename_ty(arg, index);
        }
        TyKind::Fun { from, to } => {
            rename_ty(from, index);
            rename_ty(to, index);
        }
        TyKind::Tuple(tys) => {
            for ty in tys {
                rename_ty(ty, index);
            }
        }
        TyKind::List(inner) => rename_ty(inner, index),
        TyKind::Forall { context, ty } => {
            if let Some(context) = context {
                rename_context(context, index);
            }
            rename_ty(ty, index);
        }
    }
}
