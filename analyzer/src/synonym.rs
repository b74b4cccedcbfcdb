//! Type-synonym expansion.
//!
//! Collects every `type T a = τ` into a table and rewrites all type
//! expressions to a fix-point, then removes the synonym declarations. The
//! outer loop is bounded: a module still rewriting after 50 rounds has a
//! cyclic definition.
//!
//! Substituted subtrees are deep copies: fresh ids, the use site's range,
//! `axiom = false` at the substitution's top level and `axiom = true` below,
//! so each interior position becomes an already-established fact.

use std::collections::HashMap;

use crate::ast::*;
use crate::error::FatalError;
use crate::span::Range;

type SynonymTable = HashMap<String, (Vec<String>, Ty)>;

fn gather(modules: &[Module]) -> SynonymTable {
    let mut table = SynonymTable::new();
    for module in modules {
        for decl in &module.decls {
            if let DeclKind::Synonym { head, ty } = &decl.kind {
                let params = head
                    .ty_vars
                    .iter()
                    .filter_map(|v| match &v.kind {
                        TyKind::Var { name, .. } => Some(name.clone()),
                        _ => None,
                    })
                    .collect();
                table.insert(head.name.clone(), (params, ty.clone()));
            }
        }
    }
    table
}

pub fn expand_synonyms(
    mut modules: Vec<Module>,
    ids: &mut NodeIdGen,
) -> Result<Vec<Module>, FatalError> {
    let table = gather(&modules);
    if table.is_empty() {
        return Ok(modules);
    }
    for module in &mut modules {
        let mut rounds = 0usize;
        while rewrite_module(module, &table, ids)? {
            rounds += 1;
            if rounds > 50 {
                return Err(FatalError::CyclicSynonym(module.name.clone()));
            }
        }
        tracing::trace!(module = %module.name, rounds, "synonym expansion converged");
        module
            .decls
            .retain(|d| !matches!(d.kind, DeclKind::Synonym { .. }));
    }
    Ok(modules)
}

fn rewrite_module(
    module: &mut Module,
    table: &SynonymTable,
    ids: &mut NodeIdGen,
) -> Result<bool, FatalError> {
    let mut changed = false;
    for decl in &mut module.decls {
        changed |= rewrite_decl(decl, table, ids)?;
    }
    Ok(changed)
}

fn rewrite_decl(
    decl: &mut Decl,
    table: &SynonymTable,
    ids: &mut NodeIdGen,
) -> Result<bool, FatalError> {
    let mut changed = false;
    match &mut decl.kind {
        // Synonym bodies are rewritten too; that is what makes chains
        // converge and cycles keep substituting until the bound trips.
        DeclKind::Synonym { ty, .. } => changed |= rewrite_ty(ty, table, ids)?,
        DeclKind::Data { constructors, .. } => {
            for con in constructors {
                for ty in &mut con.tys {
                    changed |= rewrite_ty(ty, table, ids)?;
                }
            }
        }
        DeclKind::Class {
            context, decls, ..
        } => {
            if let Some(context) = context {
                changed |= rewrite_context(context, table, ids)?;
            }
            for decl in decls {
                changed |= rewrite_decl(decl, table, ids)?;
            }
        }
        DeclKind::Instance {
            context, tys, body, ..
        } => {
            if let Some(context) = context {
                changed |= rewrite_context(context, table, ids)?;
            }
            for ty in tys {
                changed |= rewrite_ty(ty, table, ids)?;
            }
            for decl in body {
                changed |= rewrite_decl(decl, table, ids)?;
            }
        }
        DeclKind::Sig { ty, .. } => changed |= rewrite_ty(ty, table, ids)?,
        DeclKind::PatBind { rhs, .. } => changed |= rewrite_rhs(rhs, table, ids)?,
    }
    Ok(changed)
}

fn rewrite_context(
    context: &mut Context,
    table: &SynonymTable,
    ids: &mut NodeIdGen,
) -> Result<bool, FatalError> {
    let mut changed = false;
    for assertion in &mut context.assertions {
        changed |= rewrite_ty(assertion, table, ids)?;
    }
    Ok(changed)
}

fn rewrite_rhs(rhs: &mut Rhs, table: &SynonymTable, ids: &mut NodeIdGen) -> Result<bool, FatalError> {
    let mut changed = false;
    match &mut rhs.kind {
        RhsKind::Unguarded { exp, wheres } => {
            changed |= rewrite_exp(exp, table, ids)?;
            for decl in wheres {
                changed |= rewrite_decl(decl, table, ids)?;
            }
        }
        RhsKind::Guarded { branches, wheres } => {
            for branch in branches {
                for guard in &mut branch.guards {
                    changed |= rewrite_exp(guard, table, ids)?;
                }
                changed |= rewrite_exp(&mut branch.exp, table, ids)?;
            }
            for decl in wheres {
                changed |= rewrite_decl(decl, table, ids)?;
            }
        }
    }
    Ok(changed)
}

fn rewrite_stmt(
    stmt: &mut Stmt,
    table: &SynonymTable,
    ids: &mut NodeIdGen,
) -> Result<bool, FatalError> {
    match &mut stmt.kind {
        StmtKind::Generator { exp, .. } => rewrite_exp(exp, table, ids),
        StmtKind::Qualifier { exp } => rewrite_exp(exp, table, ids),
        StmtKind::Let { binds } => {
            let mut changed = false;
            for decl in binds {
                changed |= rewrite_decl(decl, table, ids)?;
            }
            Ok(changed)
        }
    }
}

fn rewrite_exp(exp: &mut Exp, table: &SynonymTable, ids: &mut NodeIdGen) -> Result<bool, FatalError> {
    let mut changed = false;
    match &mut exp.kind {
        ExpKind::Var { .. } | ExpKind::Con { .. } | ExpKind::Lit(_) => {}
        ExpKind::App { fun, arg } => {
            changed |= rewrite_exp(fun, table, ids)?;
            changed |= rewrite_exp(arg, table, ids)?;
        }
        ExpKind::InfixApp { left, op, right } => {
            changed |= rewrite_exp(left, table, ids)?;
            changed |= rewrite_exp(op, table, ids)?;
            changed |= rewrite_exp(right, table, ids)?;
        }
        ExpKind::Lambda { body, .. } => changed |= rewrite_exp(body, table, ids)?,
        ExpKind::Let { binds, body } => {
            for decl in binds {
                changed |= rewrite_decl(decl, table, ids)?;
            }
            changed |= rewrite_exp(body, table, ids)?;
        }
        ExpKind::If {
            cond,
            then_branch,
            else_branch,
        } => {
            changed |= rewrite_exp(cond, table, ids)?;
            changed |= rewrite_exp(then_branch, table, ids)?;
            changed |= rewrite_exp(else_branch, table, ids)?;
        }
        ExpKind::Case { scrutinee, alts } => {
            changed |= rewrite_exp(scrutinee, table, ids)?;
            for alt in alts {
                changed |= rewrite_exp(&mut alt.exp, table, ids)?;
                for decl in &mut alt.binds {
                    changed |= rewrite_decl(decl, table, ids)?;
                }
            }
        }
        ExpKind::Do { stmts } => {
            for stmt in stmts {
                changed |= rewrite_stmt(stmt, table, ids)?;
            }
        }
        ExpKind::Tuple(exps) | ExpKind::List(exps) => {
            for exp in exps {
                changed |= rewrite_exp(exp, table, ids)?;
            }
        }
        ExpKind::LeftSection { left, op } => {
            changed |= rewrite_exp(left, table, ids)?;
            changed |= rewrite_exp(op, table, ids)?;
        }
        ExpKind::RightSection { op, right } => {
            changed |= rewrite_exp(op, table, ids)?;
            changed |= rewrite_exp(right, table, ids)?;
        }
        ExpKind::EnumFrom { from } => changed |= rewrite_exp(from, table, ids)?,
        ExpKind::EnumTo { to } => changed |= rewrite_exp(to, table, ids)?,
        ExpKind::EnumFromTo { from, to } => {
            changed |= rewrite_exp(from, table, ids)?;
            changed |= rewrite_exp(to, table, ids)?;
        }
        ExpKind::Comprehension {
            body,
            quantifiers,
            guards,
        } => {
            changed |= rewrite_exp(body, table, ids)?;
            for stmt in quantifiers {
                changed |= rewrite_stmt(stmt, table, ids)?;
            }
            for guard in guards {
                changed |= rewrite_exp(guard, table, ids)?;
            }
        }
    }
    Ok(changed)
}

/// Leftmost head and argument list of an application spine.
fn spine(ty: &Ty) -> (Option<&str>, Vec<&Ty>) {
    let mut args = Vec::new();
    let mut current = ty;
    while let TyKind::App { fun, arg } = &current.kind {
        args.push(arg.as_ref());
        current = fun.as_ref();
    }
    args.reverse();
    match &current.kind {
        TyKind::Con { name, .. } => (Some(name), args),
        _ => (None, args),
    }
}

fn rewrite_ty(ty: &mut Ty, table: &SynonymTable, ids: &mut NodeIdGen) -> Result<bool, FatalError> {
    let replacement = match &ty.kind {
        TyKind::Con { name, .. } => match table.get(name) {
            Some((params, body)) => {
                if !params.is_empty() {
                    return Err(FatalError::SynonymArity { name: name.clone() });
                }
                Some(instantiate(body, &[], ids, ty.loc, true))
            }
            None => None,
        },
        TyKind::App { .. } => {
            let (head, args) = spine(ty);
            match head.and_then(|h| table.get(h).map(|entry| (h, entry))) {
                Some((head, (params, body))) => {
                    if params.len() != args.len() {
                        return Err(FatalError::SynonymArity {
                            name: head.to_string(),
                        });
                    }
                    let subst: Vec<(&str, &Ty)> = params
                        .iter()
                        .map(String::as_str)
                        .zip(args.iter().copied())
                        .collect();
                    Some(instantiate(body, &subst, ids, ty.loc, true))
                }
                None => None,
            }
        }
        _ => None,
    };
    if let Some(new_ty) = replacement {
        *ty = new_ty;
        return Ok(true);
    }

    match &mut ty.kind {
        TyKind::App { fun, arg } | TyKind::Fun { from: fun, to: arg } => {
            Ok(rewrite_ty(fun, table, ids)? | rewrite_ty(arg, table, ids)?)
        }
        TyKind::Tuple(tys) => {
            let mut changed = false;
            for ty in tys {
                changed |= rewrite_ty(ty, table, ids)?;
            }
            Ok(changed)
        }
        TyKind::List(inner) => rewrite_ty(inner, table, ids),
        TyKind::Forall { context, ty } => {
            let mut changed = false;
            if let Some(context) = context {
                changed |= rewrite_context(context, table, ids)?;
            }
            changed |= rewrite_ty(ty, table, ids)?;
            Ok(changed)
        }
        _ => Ok(false),
    }
}

/// Deep copy of a synonym body with the formals substituted. Every node takes
/// a fresh id and the use site's range.
fn instantiate(
    body: &Ty,
    subst: &[(&str, &Ty)],
    ids: &mut NodeIdGen,
    loc: Range,
    top_level: bool,
) -> Ty {
    let axiom = !top_level;
    let kind = match &body.kind {
        TyKind::Var {
            name,
            canonical_name,
        } => {
            if let Some((_, replacement)) = subst.iter().find(|(param, _)| *param == name) {
                return copy_fresh(replacement, ids, loc, axiom);
            }
            TyKind::Var {
                name: name.clone(),
                canonical_name: canonical_name.clone(),
            }
        }
        TyKind::Con {
            name,
            module,
            canonical_name,
        } => TyKind::Con {
            name: name.clone(),
            module: module.clone(),
            canonical_name: canonical_name.clone(),
        },
        TyKind::App { fun, arg } => TyKind::App {
            fun: Box::new(instantiate(fun, subst, ids, loc, false)),
            arg: Box::new(instantiate(arg, subst, ids, loc, false)),
        },
        TyKind::Fun { from, to } => TyKind::Fun {
            from: Box::new(instantiate(from, subst, ids, loc, false)),
            to: Box::new(instantiate(to, subst, ids, loc, false)),
        },
        TyKind::Tuple(tys) => TyKind::Tuple(
            tys.iter()
                .map(|t| instantiate(t, subst, ids, loc, false))
                .collect(),
        ),
        TyKind::List(inner) => TyKind::List(Box::new(instantiate(inner, subst, ids, loc, false))),
        TyKind::Forall { context, ty } => TyKind::Forall {
            context: context.as_ref().map(|ctx| Context {
                id: ids.next_id(),
                loc,
                assertions: ctx
                    .assertions
                    .iter()
                    .map(|a| instantiate(a, subst, ids, loc, false))
                    .collect(),
            }),
            ty: Box::new(instantiate(ty, subst, ids, loc, false)),
        },
        TyKind::PrefixList => TyKind::PrefixList,
        TyKind::PrefixTuple { arity } => TyKind::PrefixTuple { arity: *arity },
        TyKind::PrefixFun => TyKind::PrefixFun,
    };
    Ty {
        id: ids.next_id(),
        loc,
        axiom,
        kind,
    }
}

/// Deep copy with fresh ids; the top node takes `axiom`, everything below is
/// an established interior position.
fn copy_fresh(ty: &Ty, ids: &mut NodeIdGen, loc: Range, axiom: bool) -> Ty {
    let kind = match &ty.kind {
        TyKind::Var {
            name,
            canonical_name,
        } => TyKind::Var {
            name: name.clone(),
            canonical_name: canonical_name.clone(),
        },
        TyKind::Con {
            name,
            module,
            canonical_name,
        } => TyKind::Con {
            name: name.clone(),
            module: module.clone(),
            canonical_name: canonical_name.clone(),
        },
        TyKind::App { fun, arg } => TyKind::App {
            fun: Box::new(copy_fresh(fun, ids, loc, true)),
            arg: Box::new(copy_fresh(arg, ids, loc, true)),
        },
        TyKind::Fun { from, to } => TyKind::Fun {
            from: Box::new(copy_fresh(from, ids, loc, true)),
            to: Box::new(copy_fresh(to, ids, loc, true)),
        },
        TyKind::Tuple(tys) => {
            TyKind::Tuple(tys.iter().map(|t| copy_fresh(t, ids, loc, true)).collect())
        }
        TyKind::List(inner) => TyKind::List(Box::new(copy_fresh(inner, ids, loc, true))),
        TyKind::Forall { context, ty } => TyKind::Forall {
            context: context.as_ref().map(|ctx| Context {
                id: ids.next_id(),
                loc,
                assertions: ctx
                    .assertions
                    .iter()
                    .map(|a| copy_fresh(a, ids, loc, true))
                    .collect(),
            }),
            ty: Box::new(copy_fresh(ty, ids, loc, true)),
        },
        TyKind::PrefixList => TyKind::PrefixList,
        TyKind::PrefixTuple { arity } => TyKind::PrefixTuple { arity: *arity },
        TyKind::PrefixFun => TyKind::PrefixFun,
    };
    Ty {
        id: ids.next_id(),
        loc,
        axiom,
        kind,
    }
}
