//! Structure-directed constraint generation.
//!
//! Emissions accumulate under a *rule head*: a type rule per declared name,
//! or an instance rule per `(class, instance-id)` pair. Two modes:
//!
//! - **axiom** — an always-true fact contributing to the head, no source
//!   attribution;
//! - **rule** — defeasible, attributed to the AST node a failure should be
//!   reported against.
//!
//! References to known declarations go through [`Generator::type_of`], which
//! allocates a fresh collector variable per call and registers it under the
//! head so the solver can accumulate class obligations. When the current head
//! lexically encloses the referenced declaration, the call also threads the
//! captured-argument prefix through `append(Zeta, _, v)`.

use std::collections::{BTreeMap, HashSet};

use crate::ast::*;
use crate::error::FatalError;
use crate::gather::Closures;
use crate::logic::{self, LTerm};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadKind {
    Type,
    Instance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleHead {
    pub kind: HeadKind,
    pub name: String,
    pub module: String,
    /// 0 for type rules; the instance node's id for instance rules.
    pub id: NodeId,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub head: RuleHead,
    pub body: LTerm,
    pub axiom: bool,
    /// Links a non-axiom rule to the node a failure is attributed to.
    pub node_id: Option<NodeId>,
}

/// Per rule head, the collector variables allocated for its references.
pub type Collectors = BTreeMap<String, Vec<String>>;

fn node_var(id: NodeId) -> LTerm {
    LTerm::var(format!("_{id}"))
}

fn ty_var(head_name: &str, var_name: &str) -> LTerm {
    LTerm::var(format!("_{head_name}_{var_name}"))
}

fn canonical(name: &Option<String>, node_id: NodeId) -> Result<&str, FatalError> {
    name.as_deref().ok_or(FatalError::Unresolved { node_id })
}

pub fn generate_constraints(
    modules: &[Module],
    declarations: &HashSet<String>,
    closures: &Closures,
) -> Result<(Vec<Rule>, Collectors), FatalError> {
    let mut generator = Generator {
        module: String::new(),
        fresh_counter: 0,
        declarations,
        closures,
        rules: Vec::new(),
        collectors: Collectors::new(),
    };
    for module in modules {
        generator.module = module.name.clone();
        for decl in &module.decls {
            generator.decl(decl)?;
        }
    }
    tracing::debug!(rules = generator.rules.len(), "generated constraints");
    Ok((generator.rules, generator.collectors))
}

struct Generator<'a> {
    module: String,
    fresh_counter: u32,
    declarations: &'a HashSet<String>,
    closures: &'a Closures,
    rules: Vec<Rule>,
    collectors: Collectors,
}

impl Generator<'_> {
    fn rule(&mut self, body: LTerm, head: &RuleHead, node_id: NodeId) {
        self.rules.push(Rule {
            head: head.clone(),
            body,
            axiom: false,
            node_id: Some(node_id),
        });
    }

    fn axiom(&mut self, body: LTerm, head: &RuleHead) {
        self.rules.push(Rule {
            head: head.clone(),
            body,
            axiom: true,
            node_id: None,
        });
    }

    fn fresh_name(&mut self) -> String {
        self.fresh_counter += 1;
        format!("_f{}", self.fresh_counter)
    }

    fn fresh(&mut self) -> LTerm {
        LTerm::Var(self.fresh_name())
    }

    fn type_rule(&self, name: &str) -> RuleHead {
        RuleHead {
            kind: HeadKind::Type,
            name: name.to_string(),
            module: self.module.clone(),
            id: 0,
        }
    }

    fn instance_rule(&self, name: &str, instance_id: NodeId) -> RuleHead {
        RuleHead {
            kind: HeadKind::Instance,
            name: name.to_string(),
            module: self.module.clone(),
            id: instance_id,
        }
    }

    /// True when `head` is one of the declarations enclosing `name`.
    fn encloses(&self, head: &RuleHead, name: &str) -> bool {
        self.closures
            .get(name)
            .is_some_and(|parents| parents.iter().any(|p| *p == head.name))
    }

    /// Reference to a known declaration: a call with the callee's accumulated
    /// obligations flowing into a fresh collector. A reference to a lexically
    /// nested declaration additionally binds the `Zeta` prefix.
    fn type_of(&mut self, name: &str, var: LTerm, head: &RuleHead) -> Vec<LTerm> {
        let collector_name = self.fresh_name();
        self.collectors
            .entry(head.name.clone())
            .or_default()
            .push(collector_name.clone());
        let collector = LTerm::Var(collector_name);

        if self.encloses(head, name) {
            let v = self.fresh();
            let call = LTerm::app(
                name,
                vec![
                    var,
                    logic::calls_var(),
                    logic::wildcard(),
                    v.clone(),
                    logic::wildcard(),
                    collector,
                ],
            );
            let bind = logic::once(LTerm::app(
                "append",
                vec![logic::zeta_var(), logic::wildcard(), v],
            ));
            vec![call, bind]
        } else {
            vec![LTerm::app(
                name,
                vec![
                    var,
                    logic::calls_var(),
                    logic::wildcard(),
                    logic::wildcard(),
                    logic::wildcard(),
                    collector,
                ],
            )]
        }
    }

    fn decl(&mut self, decl: &Decl) -> Result<(), FatalError> {
        match &decl.kind {
            // Expanded away before generation runs.
            DeclKind::Synonym { .. } => Ok(()),

            DeclKind::Class { head, decls, .. } => {
                if head.ty_vars.len() != 1 {
                    return Err(FatalError::MultiParamClass {
                        name: head.name.clone(),
                    });
                }
                let class_name = canonical(&head.canonical_name, head.id)?.to_string();
                let TyKind::Var {
                    name: class_ty_var, ..
                } = &head.ty_vars[0].kind
                else {
                    return Ok(());
                };
                for member in decls {
                    let DeclKind::Sig {
                        canonical_names,
                        ty,
                        ..
                    } = &member.kind
                    else {
                        continue;
                    };
                    for name in canonical_names {
                        let rule_head = self.type_rule(name);
                        self.axiom(logic::unify(logic::head_var(), node_var(ty.id)), &rule_head);
                        self.axiom(
                            logic::has_class(ty_var(name, class_ty_var), &class_name),
                            &rule_head,
                        );
                        self.ty(ty, &rule_head)?;
                    }
                }
                Ok(())
            }

            DeclKind::Instance {
                context,
                canonical_name,
                tys,
                ..
            } => {
                let class_name = canonical(canonical_name, decl.id)?.to_string();
                let head = self.instance_rule(&class_name, decl.id);
                let Some(instance_ty) = tys.first() else {
                    return Ok(());
                };
                self.axiom(
                    logic::unify(logic::head_var(), node_var(instance_ty.id)),
                    &head,
                );
                self.ty(instance_ty, &head)?;
                if let Some(context) = context {
                    for assertion in &context.assertions {
                        let TyKind::App { fun, arg } = &assertion.kind else {
                            continue;
                        };
                        let TyKind::Con {
                            canonical_name: Some(context_class),
                            ..
                        } = &fun.kind
                        else {
                            continue;
                        };
                        let TyKind::Var { name, .. } = &arg.kind else {
                            continue;
                        };
                        self.axiom(
                            LTerm::app(context_class.as_str(), vec![ty_var(&head.name, name)]),
                            &head,
                        );
                    }
                }
                Ok(())
            }

            DeclKind::Data {
                head,
                constructors,
                deriving,
            } => {
                let type_name = canonical(&head.canonical_name, head.id)?.to_string();
                for constructor in constructors {
                    let con_name =
                        canonical(&constructor.canonical_name, constructor.id)?.to_string();
                    let con_head = self.type_rule(&con_name);
                    let data_ty = logic::pair(
                        LTerm::atom(type_name.clone()),
                        head_ty_vars(head).map(|v| ty_var(&con_head.name, v)),
                    );
                    let fields: Vec<LTerm> =
                        constructor.tys.iter().map(|t| node_var(t.id)).collect();
                    self.axiom(
                        logic::unify(logic::head_var(), logic::fun_of(fields, data_ty)),
                        &con_head,
                    );
                    for ty in &constructor.tys {
                        self.ty(ty, &con_head)?;
                    }
                }
                for derived in deriving {
                    let TyKind::Con {
                        canonical_name: Some(class_name),
                        ..
                    } = &derived.kind
                    else {
                        continue;
                    };
                    let instance_head = self.instance_rule(class_name, derived.id);
                    let data_ty = logic::pair(
                        LTerm::atom(type_name.clone()),
                        head_ty_vars(head).map(|v| LTerm::var(format!("_{v}"))),
                    );
                    self.axiom(logic::unify(logic::head_var(), data_ty), &instance_head);
                }
                Ok(())
            }

            DeclKind::Sig {
                canonical_names,
                ty,
                ..
            } => {
                for name in canonical_names {
                    let head = self.type_rule(name);
                    self.axiom(logic::unify(logic::head_var(), node_var(ty.id)), &head);
                    self.ty(ty, &head)?;
                }
                Ok(())
            }

            DeclKind::PatBind { pat, rhs } => {
                let PatKind::Var { canonical_name, .. } = &pat.kind else {
                    return Ok(());
                };
                let name = canonical(canonical_name, pat.id)?.to_string();
                let head = self.type_rule(&name);
                self.axiom(logic::unify(logic::head_var(), node_var(rhs.id)), &head);
                self.rhs(rhs, &head)
            }
        }
    }

    fn rhs(&mut self, rhs: &Rhs, head: &RuleHead) -> Result<(), FatalError> {
        match &rhs.kind {
            RhsKind::Unguarded { exp, wheres } => {
                self.rule(logic::unify(node_var(rhs.id), node_var(exp.id)), head, rhs.id);
                self.exp(exp, head)?;
                for decl in wheres {
                    self.decl(decl)?;
                }
                Ok(())
            }
            RhsKind::Guarded { branches, wheres } => {
                for branch in branches {
                    self.rule(
                        logic::unify(node_var(rhs.id), node_var(branch.id)),
                        head,
                        rhs.id,
                    );
                    self.branch(branch, head)?;
                }
                for decl in wheres {
                    self.decl(decl)?;
                }
                Ok(())
            }
        }
    }

    fn branch(&mut self, branch: &GuardBranch, head: &RuleHead) -> Result<(), FatalError> {
        for guard in &branch.guards {
            self.axiom(
                logic::unify(node_var(guard.id), LTerm::atom("p_Bool")),
                head,
            );
            self.exp(guard, head)?;
        }
        // Branches of one binding all share its type.
        self.axiom(
            logic::unify(node_var(branch.id), node_var(branch.exp.id)),
            head,
        );
        self.exp(&branch.exp, head)
    }

    fn pat(&mut self, pat: &Pat, head: &RuleHead) -> Result<(), FatalError> {
        match &pat.kind {
            PatKind::Var { canonical_name, .. } => {
                let name = canonical(canonical_name, pat.id)?;
                self.axiom(
                    logic::unify(node_var(pat.id), LTerm::var(format!("_{name}"))),
                    head,
                );
                Ok(())
            }
            PatKind::Wildcard => Ok(()),
            PatKind::Lit(kind) => {
                self.lit(*kind, pat.id, head);
                Ok(())
            }
            PatKind::List(pats) => {
                let elem = self.fresh();
                for pat in pats {
                    self.pat(pat, head)?;
                }
                self.rule(
                    logic::unify(node_var(pat.id), logic::list_of(elem.clone())),
                    head,
                    pat.id,
                );
                let mut terms: Vec<LTerm> = pats.iter().map(|p| node_var(p.id)).collect();
                terms.push(elem);
                self.rule(logic::unify_all(terms), head, pat.id);
                Ok(())
            }
            PatKind::Infix {
                left,
                canonical_name,
                right,
                ..
            } => {
                let name = canonical(canonical_name, pat.id)?.to_string();
                let fun_var = self.fresh();
                let fun = logic::fun_of(
                    vec![node_var(left.id), node_var(right.id)],
                    node_var(pat.id),
                );
                self.rule(logic::unify(fun, fun_var.clone()), head, pat.id);
                for term in self.type_of(&name, fun_var, head) {
                    self.rule(term, head, pat.id);
                }
                self.pat(left, head)?;
                self.pat(right, head)
            }
            PatKind::App {
                canonical_name,
                pats,
                ..
            } => {
                let name = canonical(canonical_name, pat.id)?.to_string();
                let fun = logic::fun_of(
                    pats.iter().map(|p| node_var(p.id)).collect(),
                    node_var(pat.id),
                );
                let v = self.fresh();
                self.axiom(logic::unify(fun, v.clone()), head);
                for pat in pats {
                    self.pat(pat, head)?;
                }
                for term in self.type_of(&name, v, head) {
                    self.rule(term, head, pat.id);
                }
                Ok(())
            }
            PatKind::Tuple(pats) => {
                let mut terms = pats.iter().map(|p| node_var(p.id));
                if let Some(first) = terms.next() {
                    let tuple = logic::tuple_of(first, terms);
                    self.axiom(logic::unify(node_var(pat.id), tuple), head);
                }
                for pat in pats {
                    self.pat(pat, head)?;
                }
                Ok(())
            }
        }
    }

    /// Emit for a type node: axiom positions become facts, everything else a
    /// rule attributed to the node.
    fn emit_ty(&mut self, body: LTerm, head: &RuleHead, ty: &Ty) {
        if ty.axiom {
            self.axiom(body, head);
        } else {
            self.rule(body, head, ty.id);
        }
    }

    fn ty(&mut self, ty: &Ty, head: &RuleHead) -> Result<(), FatalError> {
        match &ty.kind {
            TyKind::Var { name, .. } => {
                let body = logic::unify(node_var(ty.id), ty_var(&head.name, name));
                self.emit_ty(body, head, ty);
                Ok(())
            }
            TyKind::Con { canonical_name, .. } => {
                let name = canonical(canonical_name, ty.id)?;
                let body = logic::unify(node_var(ty.id), LTerm::atom(name));
                self.emit_ty(body, head, ty);
                Ok(())
            }
            TyKind::Forall { context, ty: inner } => {
                if let Some(context) = context {
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
                        let TyKind::Var { name, .. } = &arg.kind else {
                            continue;
                        };
                        self.rule(
                            logic::has_class(ty_var(&head.name, name), class_name),
                            head,
                            assertion.id,
                        );
                    }
                }
                self.emit_ty(
                    logic::unify(node_var(ty.id), node_var(inner.id)),
                    head,
                    ty,
                );
                self.ty(inner, head)
            }
            TyKind::App { fun, arg } => {
                self.ty(fun, head)?;
                self.ty(arg, head)?;
                let body = logic::unify(
                    node_var(ty.id),
                    logic::pair(node_var(fun.id), [node_var(arg.id)]),
                );
                self.emit_ty(body, head, ty);
                Ok(())
            }
            TyKind::Fun { from, to } => {
                self.ty(from, head)?;
                self.ty(to, head)?;
                let body = logic::unify(
                    node_var(ty.id),
                    logic::fun_of(vec![node_var(from.id)], node_var(to.id)),
                );
                self.emit_ty(body, head, ty);
                Ok(())
            }
            TyKind::List(inner) => {
                self.ty(inner, head)?;
                let body = logic::unify(node_var(ty.id), logic::list_of(node_var(inner.id)));
                self.emit_ty(body, head, ty);
                Ok(())
            }
            TyKind::Tuple(tys) => {
                let mut terms = tys.iter().map(|t| node_var(t.id));
                if let Some(first) = terms.next() {
                    let tuple = logic::tuple_of(first, terms);
                    self.emit_ty(logic::unify(node_var(ty.id), tuple), head, ty);
                }
                for ty in tys {
                    self.ty(ty, head)?;
                }
                Ok(())
            }
            TyKind::PrefixList => {
                self.rule(
                    logic::unify(node_var(ty.id), LTerm::atom("list")),
                    head,
                    ty.id,
                );
                Ok(())
            }
            TyKind::PrefixTuple { .. } => {
                self.rule(
                    logic::unify(node_var(ty.id), LTerm::atom("tuple")),
                    head,
                    ty.id,
                );
                Ok(())
            }
            TyKind::PrefixFun => {
                self.rule(
                    logic::unify(node_var(ty.id), LTerm::atom("function")),
                    head,
                    ty.id,
                );
                Ok(())
            }
        }
    }

    fn lit(&mut self, kind: LitKind, node_id: NodeId, head: &RuleHead) {
        let body = match kind {
            LitKind::Int => logic::unify(node_var(node_id), LTerm::atom("builtin_Int")),
            LitKind::Char => logic::unify(node_var(node_id), LTerm::atom("builtin_Char")),
            LitKind::Str => logic::unify(
                node_var(node_id),
                logic::list_of(LTerm::atom("builtin_Char")),
            ),
            LitKind::Frac => logic::unify(node_var(node_id), LTerm::atom("builtin_Float")),
        };
        self.rule(body, head, node_id);
    }

    fn stmt(&mut self, stmt: &Stmt, head: &RuleHead) -> Result<(), FatalError> {
        match &stmt.kind {
            StmtKind::Generator { pat, exp } => {
                let monadic = logic::pair(logic::wildcard(), [node_var(pat.id)]);
                self.rule(logic::unify(node_var(stmt.id), node_var(exp.id)), head, stmt.id);
                self.rule(logic::unify(monadic, node_var(exp.id)), head, stmt.id);
                self.exp(exp, head)?;
                self.pat(pat, head)
            }
            StmtKind::Qualifier { exp } => {
                self.rule(logic::unify(node_var(stmt.id), node_var(exp.id)), head, stmt.id);
                self.exp(exp, head)
            }
            StmtKind::Let { binds } => {
                for decl in binds {
                    self.decl(decl)?;
                }
                Ok(())
            }
        }
    }

    fn exp(&mut self, exp: &Exp, head: &RuleHead) -> Result<(), FatalError> {
        match &exp.kind {
            ExpKind::App { fun, arg } => {
                self.exp(fun, head)?;
                self.exp(arg, head)?;
                let shape = logic::fun_of(vec![node_var(arg.id)], node_var(exp.id));
                self.rule(logic::unify(shape, node_var(fun.id)), head, exp.id);
                Ok(())
            }

            ExpKind::LeftSection { left, op } => {
                let arg = self.fresh();
                let result = self.fresh();
                let shape = logic::fun_of(
                    vec![node_var(left.id), arg.clone()],
                    result.clone(),
                );
                self.axiom(logic::unify(shape, node_var(op.id)), head);
                self.rule(
                    logic::unify(node_var(exp.id), logic::fun_of(vec![arg], result)),
                    head,
                    exp.id,
                );
                self.exp(left, head)?;
                self.exp(op, head)
            }

            ExpKind::RightSection { op, right } => {
                let arg = self.fresh();
                let result = self.fresh();
                let shape = logic::fun_of(
                    vec![arg.clone(), node_var(right.id)],
                    result.clone(),
                );
                self.axiom(logic::unify(shape, node_var(op.id)), head);
                self.rule(
                    logic::unify(node_var(exp.id), logic::fun_of(vec![arg], result)),
                    head,
                    exp.id,
                );
                self.exp(right, head)?;
                self.exp(op, head)
            }

            ExpKind::InfixApp { left, op, right } => {
                let shape = logic::fun_of(
                    vec![node_var(left.id), node_var(right.id)],
                    node_var(exp.id),
                );
                self.rule(logic::unify(node_var(op.id), shape), head, exp.id);
                self.exp(op, head)?;
                self.exp(left, head)?;
                self.exp(right, head)
            }

            ExpKind::Let { binds, body } => {
                for decl in binds {
                    self.decl(decl)?;
                }
                self.exp(body, head)?;
                self.rule(logic::unify(node_var(exp.id), node_var(body.id)), head, exp.id);
                Ok(())
            }

            ExpKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                self.axiom(logic::unify(node_var(cond.id), LTerm::atom("p_Bool")), head);
                self.rule(
                    logic::unify_all(vec![
                        node_var(exp.id),
                        node_var(else_branch.id),
                        node_var(then_branch.id),
                    ]),
                    head,
                    exp.id,
                );
                self.exp(cond, head)?;
                self.exp(then_branch, head)?;
                self.exp(else_branch, head)
            }

            ExpKind::Case { scrutinee, alts } => {
                let mut alt_vars = Vec::new();
                for alt in alts {
                    self.axiom(
                        logic::unify(node_var(scrutinee.id), node_var(alt.pat.id)),
                        head,
                    );
                    alt_vars.push(node_var(alt.exp.id));
                    self.pat(&alt.pat, head)?;
                    self.exp(&alt.exp, head)?;
                    for decl in &alt.binds {
                        self.decl(decl)?;
                    }
                }
                let mut terms = vec![node_var(exp.id)];
                terms.append(&mut alt_vars);
                self.rule(logic::unify_all(terms), head, exp.id);
                self.exp(scrutinee, head)
            }

            ExpKind::Lambda { pats, body } => {
                for pat in pats {
                    self.pat(pat, head)?;
                }
                let shape = logic::fun_of(
                    pats.iter().map(|p| node_var(p.id)).collect(),
                    node_var(body.id),
                );
                self.rule(logic::unify(node_var(exp.id), shape), head, exp.id);
                self.exp(body, head)
            }

            ExpKind::Tuple(exps) => {
                let mut terms = exps.iter().map(|e| node_var(e.id));
                if let Some(first) = terms.next() {
                    let tuple = logic::tuple_of(first, terms);
                    self.rule(logic::unify(node_var(exp.id), tuple), head, exp.id);
                }
                for exp in exps {
                    self.exp(exp, head)?;
                }
                Ok(())
            }

            ExpKind::List(exps) => {
                let elem = self.fresh();
                for exp in exps {
                    self.exp(exp, head)?;
                }
                self.rule(
                    logic::unify(node_var(exp.id), logic::list_of(elem.clone())),
                    head,
                    exp.id,
                );
                let mut terms: Vec<LTerm> = exps.iter().map(|e| node_var(e.id)).collect();
                terms.push(elem);
                self.rule(logic::unify_all(terms), head, exp.id);
                Ok(())
            }

            ExpKind::Var { canonical_name, .. } | ExpKind::Con { canonical_name, .. } => {
                let name = canonical(canonical_name, exp.id)?;
                if name == "builtin_unit" {
                    self.rule(
                        logic::unify(node_var(exp.id), LTerm::atom("builtin_Top")),
                        head,
                        exp.id,
                    );
                } else if name == "builtin_bottom" {
                    // Bottom inhabits every type: no constraint.
                } else if name == head.name {
                    // Recursive reference to the head under construction.
                    self.rule(
                        logic::unify(node_var(exp.id), logic::head_var()),
                        head,
                        exp.id,
                    );
                } else if name == "builtin_cons" || self.declarations.contains(name) {
                    let name = name.to_string();
                    for term in self.type_of(&name, node_var(exp.id), head) {
                        self.rule(term, head, exp.id);
                    }
                } else {
                    let body = logic::unify(node_var(exp.id), LTerm::var(format!("_{name}")));
                    self.rule(body, head, exp.id);
                }
                Ok(())
            }

            ExpKind::EnumFrom { from: e } | ExpKind::EnumTo { to: e } => {
                self.rule(
                    logic::unify(node_var(exp.id), logic::list_of(node_var(e.id))),
                    head,
                    exp.id,
                );
                self.rule(logic::has_class(node_var(e.id), "p_Enum"), head, exp.id);
                self.exp(e, head)
            }

            ExpKind::EnumFromTo { from, to } => {
                self.rule(
                    logic::unify_all(vec![
                        node_var(exp.id),
                        logic::list_of(node_var(from.id)),
                        logic::list_of(node_var(to.id)),
                    ]),
                    head,
                    exp.id,
                );
                self.rule(logic::has_class(node_var(from.id), "p_Enum"), head, exp.id);
                self.rule(logic::has_class(node_var(to.id), "p_Enum"), head, exp.id);
                self.exp(from, head)?;
                self.exp(to, head)
            }

            ExpKind::Comprehension {
                body,
                quantifiers,
                guards,
            } => {
                for quantifier in quantifiers {
                    let StmtKind::Generator { pat, exp: source } = &quantifier.kind else {
                        continue;
                    };
                    self.rule(
                        logic::unify(logic::list_of(node_var(pat.id)), node_var(source.id)),
                        head,
                        exp.id,
                    );
                    self.pat(pat, head)?;
                    self.exp(source, head)?;
                }
                self.rule(
                    logic::unify(node_var(exp.id), logic::list_of(node_var(body.id))),
                    head,
                    exp.id,
                );
                self.exp(body, head)?;
                for guard in guards {
                    self.rule(
                        logic::unify(node_var(guard.id), LTerm::atom("p_Bool")),
                        head,
                        exp.id,
                    );
                    self.exp(guard, head)?;
                }
                Ok(())
            }

            ExpKind::Do { stmts } => {
                let monad = self.fresh();
                let result = self.fresh();
                self.rule(logic::has_class(monad.clone(), "p_Monad"), head, exp.id);
                self.rule(
                    logic::unify(
                        node_var(exp.id),
                        logic::pair(monad.clone(), [result.clone()]),
                    ),
                    head,
                    exp.id,
                );
                let Some((last, init)) = stmts.split_last() else {
                    return Ok(());
                };
                for stmt in init {
                    let monadic = logic::pair(monad.clone(), [logic::wildcard()]);
                    self.rule(logic::unify(node_var(stmt.id), monadic), head, exp.id);
                    self.stmt(stmt, head)?;
                }
                self.rule(
                    logic::unify(node_var(last.id), logic::pair(monad, [result])),
                    head,
                    exp.id,
                );
                self.stmt(last, head)
            }

            ExpKind::Lit(kind) => {
                self.lit(*kind, exp.id, head);
                Ok(())
            }
        }
    }
}

fn head_ty_vars(head: &DeclHead) -> impl Iterator<Item = &str> {
    head.ty_vars.iter().filter_map(|v| match &v.kind {
        TyKind::Var { name, .. } => Some(name.as_str()),
        _ => None,
    })
}
