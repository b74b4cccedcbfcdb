//! Read-only AST traversal.
//!
//! Each pass implements [`Visitor`] and owns its accumulator; the `walk_*`
//! functions drive the recursion and hand every node to `enter`/`leave`
//! together with its parent. Traversal order is source order and fully
//! deterministic, which the collectors rely on.

use crate::ast::*;
use crate::span::Range;

/// A borrowed reference to any AST node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Module(&'a Module),
    Decl(&'a Decl),
    Pat(&'a Pat),
    Exp(&'a Exp),
    Ty(&'a Ty),
    Stmt(&'a Stmt),
    Rhs(&'a Rhs),
    Branch(&'a GuardBranch),
    Alt(&'a Alt),
    Con(&'a DataCon),
    Head(&'a DeclHead),
    Context(&'a Context),
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        match self {
            NodeRef::Module(n) => n.id,
            NodeRef::Decl(n) => n.id,
            NodeRef::Pat(n) => n.id,
            NodeRef::Exp(n) => n.id,
            NodeRef::Ty(n) => n.id,
            NodeRef::Stmt(n) => n.id,
            NodeRef::Rhs(n) => n.id,
            NodeRef::Branch(n) => n.id,
            NodeRef::Alt(n) => n.id,
            NodeRef::Con(n) => n.id,
            NodeRef::Head(n) => n.id,
            NodeRef::Context(n) => n.id,
        }
    }

    pub fn loc(&self) -> Range {
        match self {
            NodeRef::Module(n) => n.loc,
            NodeRef::Decl(n) => n.loc,
            NodeRef::Pat(n) => n.loc,
            NodeRef::Exp(n) => n.loc,
            NodeRef::Ty(n) => n.loc,
            NodeRef::Stmt(n) => n.loc,
            NodeRef::Rhs(n) => n.loc,
            NodeRef::Branch(n) => n.loc,
            NodeRef::Alt(n) => n.loc,
            NodeRef::Con(n) => n.loc,
            NodeRef::Head(n) => n.loc,
            NodeRef::Context(n) => n.loc,
        }
    }
}

#[allow(unused_variables)]
pub trait Visitor {
    fn enter(&mut self, node: NodeRef<'_>, parent: Option<NodeRef<'_>>) {}
    fn leave(&mut self, node: NodeRef<'_>, parent: Option<NodeRef<'_>>) {}
}

pub fn walk_modules<V: Visitor>(v: &mut V, modules: &[Module]) {
    for module in modules {
        walk_module(v, module);
    }
}

pub fn walk_module<V: Visitor>(v: &mut V, module: &Module) {
    let node = NodeRef::Module(module);
    v.enter(node, None);
    for decl in &module.decls {
        walk_decl(v, decl, node);
    }
    v.leave(node, None);
}

pub fn walk_decl<'a, V: Visitor>(v: &mut V, decl: &'a Decl, parent: NodeRef<'a>) {
    let node = NodeRef::Decl(decl);
    v.enter(node, Some(parent));
    match &decl.kind {
        DeclKind::Synonym { head, ty } => {
            walk_decl_head(v, head, node);
            walk_ty(v, ty, node);
        }
        DeclKind::Data {
            head,
            constructors,
            deriving,
        } => {
            walk_decl_head(v, head, node);
            for con in constructors {
                walk_data_con(v, con, node);
            }
            for ty in deriving {
                walk_ty(v, ty, node);
            }
        }
        DeclKind::Class {
            context,
            head,
            decls,
        } => {
            if let Some(context) = context {
                walk_context(v, context, node);
            }
            walk_decl_head(v, head, node);
            for decl in decls {
                walk_decl(v, decl, node);
            }
        }
        DeclKind::Instance {
            context, tys, body, ..
        } => {
            if let Some(context) = context {
                walk_context(v, context, node);
            }
            for ty in tys {
                walk_ty(v, ty, node);
            }
            for decl in body {
                walk_decl(v, decl, node);
            }
        }
        DeclKind::Sig { ty, .. } => walk_ty(v, ty, node),
        DeclKind::PatBind { pat, rhs } => {
            walk_pat(v, pat, node);
            walk_rhs(v, rhs, node);
        }
    }
    v.leave(node, Some(parent));
}

pub fn walk_pat<'a, V: Visitor>(v: &mut V, pat: &'a Pat, parent: NodeRef<'a>) {
    let node = NodeRef::Pat(pat);
    v.enter(node, Some(parent));
    match &pat.kind {
        PatKind::Wildcard | PatKind::Var { .. } | PatKind::Lit(_) => {}
        PatKind::App { pats, .. } | PatKind::List(pats) | PatKind::Tuple(pats) => {
            for pat in pats {
                walk_pat(v, pat, node);
            }
        }
        PatKind::Infix { left, right, .. } => {
            walk_pat(v, left, node);
            walk_pat(v, right, node);
        }
    }
    v.leave(node, Some(parent));
}

pub fn walk_exp<'a, V: Visitor>(v: &mut V, exp: &'a Exp, parent: NodeRef<'a>) {
    let node = NodeRef::Exp(exp);
    v.enter(node, Some(parent));
    match &exp.kind {
        ExpKind::Var { .. } | ExpKind::Con { .. } | ExpKind::Lit(_) => {}
        ExpKind::App { fun, arg } => {
            walk_exp(v, fun, node);
            walk_exp(v, arg, node);
        }
        ExpKind::InfixApp { left, op, right } => {
            walk_exp(v, left, node);
            walk_exp(v, op, node);
            walk_exp(v, right, node);
        }
        ExpKind::Lambda { pats, body } => {
            for pat in pats {
                walk_pat(v, pat, node);
            }
            walk_exp(v, body, node);
        }
        ExpKind::Let { binds, body } => {
            for decl in binds {
                walk_decl(v, decl, node);
            }
            walk_exp(v, body, node);
        }
        ExpKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            walk_exp(v, cond, node);
            walk_exp(v, then_branch, node);
            walk_exp(v, else_branch, node);
        }
        ExpKind::Case { scrutinee, alts } => {
            walk_exp(v, scrutinee, node);
            for alt in alts {
                walk_alt(v, alt, node);
            }
        }
        ExpKind::Do { stmts } => {
            for stmt in stmts {
                walk_stmt(v, stmt, node);
            }
        }
        ExpKind::Tuple(exps) | ExpKind::List(exps) => {
            for exp in exps {
                walk_exp(v, exp, node);
            }
        }
        ExpKind::LeftSection { left, op } => {
            walk_exp(v, left, node);
            walk_exp(v, op, node);
        }
        ExpKind::RightSection { op, right } => {
            walk_exp(v, op, node);
            walk_exp(v, right, node);
        }
        ExpKind::EnumFrom { from } => walk_exp(v, from, node),
        ExpKind::EnumTo { to } => walk_exp(v, to, node),
        ExpKind::EnumFromTo { from, to } => {
            walk_exp(v, from, node);
            walk_exp(v, to, node);
        }
        ExpKind::Comprehension {
            body,
            quantifiers,
            guards,
        } => {
            for stmt in quantifiers {
                walk_stmt(v, stmt, node);
            }
            for guard in guards {
                walk_exp(v, guard, node);
            }
            walk_exp(v, body, node);
        }
    }
    v.leave(node, Some(parent));
}

pub fn walk_stmt<'a, V: Visitor>(v: &mut V, stmt: &'a Stmt, parent: NodeRef<'a>) {
    let node = NodeRef::Stmt(stmt);
    v.enter(node, Some(parent));
    match &stmt.kind {
        StmtKind::Generator { pat, exp } => {
            walk_pat(v, pat, node);
            walk_exp(v, exp, node);
        }
        StmtKind::Qualifier { exp } => walk_exp(v, exp, node),
        StmtKind::Let { binds } => {
            for decl in binds {
                walk_decl(v, decl, node);
            }
        }
    }
    v.leave(node, Some(parent));
}

pub fn walk_ty<'a, V: Visitor>(v: &mut V, ty: &'a Ty, parent: NodeRef<'a>) {
    let node = NodeRef::Ty(ty);
    v.enter(node, Some(parent));
    match &ty.kind {
        TyKind::Var { .. }
        | TyKind::Con { .. }
        | TyKind::PrefixList
        | TyKind::PrefixTuple { .. }
        | TyKind::PrefixFun => {}
        TyKind::App { fun, arg } => {
            walk_ty(v, fun, node);
            walk_ty(v, arg, node);
        }
        TyKind::Fun { from, to } => {
            walk_ty(v, from, node);
            walk_ty(v, to, node);
        }
        TyKind::Tuple(tys) => {
            for ty in tys {
                walk_ty(v, ty, node);
            }
        }
        TyKind::List(ty) => walk_ty(v, ty, node),
        TyKind::Forall { context, ty } => {
            if let Some(context) = context {
                walk_context(v, context, node);
            }
            walk_ty(v, ty, node);
        }
    }
    v.leave(node, Some(parent));
}

pub fn walk_rhs<'a, V: Visitor>(v: &mut V, rhs: &'a Rhs, parent: NodeRef<'a>) {
    let node = NodeRef::Rhs(rhs);
    v.enter(node, Some(parent));
    match &rhs.kind {
        RhsKind::Unguarded { exp, wheres } => {
            walk_exp(v, exp, node);
            for decl in wheres {
                walk_decl(v, decl, node);
            }
        }
        RhsKind::Guarded { branches, wheres } => {
            for branch in branches {
                walk_branch(v, branch, node);
            }
            for decl in wheres {
                walk_decl(v, decl, node);
            }
        }
    }
    v.leave(node, Some(parent));
}

pub fn walk_branch<'a, V: Visitor>(v: &mut V, branch: &'a GuardBranch, parent: NodeRef<'a>) {
    let node = NodeRef::Branch(branch);
    v.enter(node, Some(parent));
    for guard in &branch.guards {
        walk_exp(v, guard, node);
    }
    walk_exp(v, &branch.exp, node);
    v.leave(node, Some(parent));
}

pub fn walk_alt<'a, V: Visitor>(v: &mut V, alt: &'a Alt, parent: NodeRef<'a>) {
    let node = NodeRef::Alt(alt);
    v.enter(node, Some(parent));
    walk_pat(v, &alt.pat, node);
    walk_exp(v, &alt.exp, node);
    for decl in &alt.binds {
        walk_decl(v, decl, node);
    }
    v.leave(node, Some(parent));
}

pub fn walk_data_con<'a, V: Visitor>(v: &mut V, con: &'a DataCon, parent: NodeRef<'a>) {
    let node = NodeRef::Con(con);
    v.enter(node, Some(parent));
    for ty in &con.tys {
        walk_ty(v, ty, node);
    }
    v.leave(node, Some(parent));
}

pub fn walk_decl_head<'a, V: Visitor>(v: &mut V, head: &'a DeclHead, parent: NodeRef<'a>) {
    let node = NodeRef::Head(head);
    v.enter(node, Some(parent));
    for ty in &head.ty_vars {
        walk_ty(v, ty, node);
    }
    v.leave(node, Some(parent));
}

pub fn walk_context<'a, V: Visitor>(v: &mut V, context: &'a Context, parent: NodeRef<'a>) {
    let node = NodeRef::Context(context);
    v.enter(node, Some(parent));
    for assertion in &context.assertions {
        walk_ty(v, assertion, node);
    }
    v.leave(node, Some(parent));
}
