//! Lowers tree-sitter concrete syntax trees into the internal AST.
//!
//! Every produced node takes a fresh id from the bundle-wide counter.
//! Function bindings `f p1 p2 = e` are desugared here into a pattern binding
//! whose right-hand side is a lambda over the parameter list; the lambda's
//! range spans from the parameter list's start to the right-hand side's end.

use crate::ast::*;
use crate::error::ParseError;
use crate::span::{Point, Range};
use tree_sitter::Node;

pub fn lower_module(
    root: Node<'_>,
    src: &str,
    fallback_name: &str,
    ids: &mut NodeIdGen,
) -> Result<Module, ParseError> {
    if let Some(bad) = find_error(root).or_else(|| find_missing(root)) {
        return Err(fail(bad));
    }
    let mut lower = Lower { src, ids };
    lower.module(root, fallback_name)
}

fn find_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() {
        return Some(node);
    }
    for i in 0..node.child_count() {
        if let Some(found) = node.child(i).and_then(find_error) {
            return Some(found);
        }
    }
    None
}

fn find_missing(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_missing() {
        return Some(node);
    }
    for i in 0..node.child_count() {
        if let Some(found) = node.child(i).and_then(find_missing) {
            return Some(found);
        }
    }
    None
}

fn node_loc(node: Node<'_>) -> Range {
    Range::new(
        Point::new(node.start_position().row, node.start_position().column),
        Point::new(node.end_position().row, node.end_position().column),
    )
}

fn merged_loc(from: Node<'_>, to: Node<'_>) -> Range {
    Range::new(
        Point::new(from.start_position().row, from.start_position().column),
        Point::new(to.end_position().row, to.end_position().column),
    )
}

fn fail(node: Node<'_>) -> ParseError {
    ParseError {
        loc: node_loc(node),
    }
}

fn field<'t>(node: Node<'t>, name: &str) -> Result<Node<'t>, ParseError> {
    node.child_by_field_name(name).ok_or_else(|| fail(node))
}

fn fields<'t>(node: Node<'t>, name: &str) -> Vec<Node<'t>> {
    let mut cursor = node.walk();
    node.children_by_field_name(name, &mut cursor).collect()
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|n| n.kind() != "comment" && n.kind() != "haddock")
        .collect()
}

struct Lower<'a> {
    src: &'a str,
    ids: &'a mut NodeIdGen,
}

impl<'a> Lower<'a> {
    fn text(&self, node: Node<'_>) -> Result<&'a str, ParseError> {
        node.utf8_text(self.src.as_bytes()).map_err(|_| fail(node))
    }

    fn module(&mut self, node: Node<'_>, fallback: &str) -> Result<Module, ParseError> {
        let mut decls = Vec::new();
        if let Some(decl_node) = node.child_by_field_name("declarations") {
            for child in named_children(decl_node) {
                decls.push(self.decl(child)?);
            }
        }

        let mut imports = Vec::new();
        if let Some(import_node) = node.child_by_field_name("imports") {
            for child in named_children(import_node) {
                imports.push(self.import_name(child)?);
            }
        }

        let mut name = String::new();
        for child in named_children(node) {
            if child.kind() == "header" {
                if let Some(module_node) = child.child_by_field_name("module") {
                    name = self.dotted_name(module_node)?;
                }
                break;
            }
        }
        if name.is_empty() {
            name = fallback.to_string();
        }

        Ok(Module {
            id: self.ids.next_id(),
            loc: node_loc(node),
            name,
            imports,
            decls,
        })
    }

    fn dotted_name(&self, module_node: Node<'_>) -> Result<String, ParseError> {
        let mut parts = Vec::new();
        for child in named_children(module_node) {
            parts.push(self.text(child)?);
        }
        Ok(parts.join("."))
    }

    fn import_name(&self, node: Node<'_>) -> Result<String, ParseError> {
        self.dotted_name(field(node, "module")?)
    }

    fn decl(&mut self, node: Node<'_>) -> Result<Decl, ParseError> {
        if node.is_missing() {
            return Err(fail(node));
        }
        match node.kind() {
            "signature" => {
                let name_nodes = match node.child_by_field_name("names") {
                    Some(names) => fields(names, "name"),
                    None => vec![field(node, "name")?],
                };
                let mut names = Vec::new();
                for child in name_nodes {
                    if child.kind() == "prefix_id" {
                        let inner = child.named_child(0).ok_or_else(|| fail(child))?;
                        names.push(self.text(inner)?.to_string());
                    } else {
                        names.push(self.text(child)?.to_string());
                    }
                }
                let ty = self.ty(field(node, "type")?, true)?;
                Ok(Decl {
                    id: self.ids.next_id(),
                    loc: node_loc(node),
                    kind: DeclKind::Sig {
                        names,
                        canonical_names: Vec::new(),
                        ty,
                    },
                })
            }

            "type_synomym" | "type_synonym" => {
                let head = self.decl_head(node)?;
                let body = node
                    .child_by_field_name("synonym")
                    .or_else(|| node.child_by_field_name("type"))
                    .or_else(|| named_children(node).into_iter().last())
                    .ok_or_else(|| fail(node))?;
                let ty = self.ty(body, false)?;
                Ok(Decl {
                    id: self.ids.next_id(),
                    loc: node_loc(node),
                    kind: DeclKind::Synonym { head, ty },
                })
            }

            "data_type" => {
                let head = self.decl_head(node)?;
                let mut constructors = Vec::new();
                if let Some(cons_node) = node.child_by_field_name("constructors") {
                    for wrapper in fields(cons_node, "constructor") {
                        let con_node = field(wrapper, "constructor")?;
                        let name = self.text(field(con_node, "name")?)?.to_string();
                        let mut tys = Vec::new();
                        for field_node in fields(con_node, "field") {
                            tys.push(self.ty(field_node, true)?);
                        }
                        constructors.push(DataCon {
                            id: self.ids.next_id(),
                            loc: node_loc(wrapper),
                            name,
                            canonical_name: None,
                            tys,
                        });
                    }
                }
                let mut deriving = Vec::new();
                for child in named_children(node) {
                    if child.kind() == "deriving" {
                        self.deriving_classes(child, &mut deriving)?;
                    }
                }
                Ok(Decl {
                    id: self.ids.next_id(),
                    loc: node_loc(node),
                    kind: DeclKind::Data {
                        head,
                        constructors,
                        deriving,
                    },
                })
            }

            "class" => {
                let context = match node.child_by_field_name("context") {
                    Some(ctx_node) => Some(self.context(field(ctx_node, "context")?, false)?),
                    None => None,
                };
                let head = self.decl_head(node)?;
                let mut decls = Vec::new();
                if let Some(decl_node) = node.child_by_field_name("declarations") {
                    for child in named_children(decl_node) {
                        decls.push(self.decl(child)?);
                    }
                }
                Ok(Decl {
                    id: self.ids.next_id(),
                    loc: node_loc(node),
                    kind: DeclKind::Class {
                        context,
                        head,
                        decls,
                    },
                })
            }

            "instance" => {
                let context = match node.child_by_field_name("context") {
                    Some(ctx_node) => Some(self.context(field(ctx_node, "context")?, false)?),
                    None => None,
                };
                let name_node = field(node, "name")?;
                let (name, module) = if name_node.kind() == "qualified" {
                    (
                        self.text(field(name_node, "id")?)?.to_string(),
                        Some(self.text(field(name_node, "module")?)?.to_string()),
                    )
                } else {
                    (self.text(name_node)?.to_string(), None)
                };
                let mut tys = Vec::new();
                if let Some(patterns) = node.child_by_field_name("patterns") {
                    for child in named_children(patterns) {
                        tys.push(self.ty(child, false)?);
                    }
                }
                let mut body = Vec::new();
                if let Some(decl_node) = node.child_by_field_name("declarations") {
                    for child in named_children(decl_node) {
                        body.push(self.decl(child)?);
                    }
                }
                Ok(Decl {
                    id: self.ids.next_id(),
                    loc: node_loc(node),
                    kind: DeclKind::Instance {
                        context,
                        name,
                        module,
                        canonical_name: None,
                        tys,
                        body,
                    },
                })
            }

            "function" | "bind" => {
                let variable_node = node.named_child(0).ok_or_else(|| fail(node))?;
                let pat = self.pat(variable_node)?;
                let rhs = self.rhs(node)?;
                Ok(Decl {
                    id: self.ids.next_id(),
                    loc: node_loc(node),
                    kind: DeclKind::PatBind { pat, rhs },
                })
            }

            _ => Err(fail(node)),
        }
    }

    fn deriving_classes(
        &mut self,
        node: Node<'_>,
        deriving: &mut Vec<Ty>,
    ) -> Result<(), ParseError> {
        let Some(classes) = node.child_by_field_name("classes") else {
            return Ok(());
        };
        match classes.kind() {
            "name" => deriving.push(self.derived_class(classes)?),
            "tuple" | "parens" => {
                for child in named_children(classes) {
                    if child.kind() == "name" {
                        deriving.push(self.derived_class(child)?);
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn derived_class(&mut self, node: Node<'_>) -> Result<Ty, ParseError> {
        Ok(Ty {
            id: self.ids.next_id(),
            loc: node_loc(node),
            axiom: false,
            kind: TyKind::Con {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
            },
        })
    }

    fn decl_head(&mut self, node: Node<'_>) -> Result<DeclHead, ParseError> {
        let name = self.text(field(node, "name")?)?.to_string();
        let mut ty_vars = Vec::new();
        if let Some(patterns) = node.child_by_field_name("patterns") {
            for bind in fields(patterns, "bind") {
                ty_vars.push(self.ty(bind, false)?);
            }
        }
        Ok(DeclHead {
            id: self.ids.next_id(),
            loc: node_loc(node),
            name,
            canonical_name: None,
            ty_vars,
        })
    }

    fn rhs(&mut self, node: Node<'_>) -> Result<Rhs, ParseError> {
        let match_nodes = fields(node, "match");
        let mut wheres = Vec::new();
        if let Some(binds) = node.child_by_field_name("binds") {
            for decl in fields(binds, "decl") {
                wheres.push(self.decl(decl)?);
            }
        }
        let patterns_node = node.child_by_field_name("patterns");
        let first = *match_nodes.first().ok_or_else(|| fail(node))?;

        if first.child_by_field_name("guards").is_none() {
            let exp = self.rhs_exp(patterns_node, first)?;
            let mut loc = node_loc(first);
            // The match node starts at the `=`; the rhs range starts after it.
            if self.text(first)?.starts_with('=') {
                loc.start.col += 1;
            }
            return Ok(Rhs {
                id: self.ids.next_id(),
                loc,
                kind: RhsKind::Unguarded { exp, wheres },
            });
        }

        let mut branches = Vec::new();
        for match_node in match_nodes {
            let exp = self.rhs_exp(patterns_node, match_node)?;
            let guards_node = field(match_node, "guards")?;
            let mut guards = Vec::new();
            for guard in fields(guards_node, "guard") {
                let inner = guard.named_child(0).ok_or_else(|| fail(guard))?;
                guards.push(self.exp(inner)?);
            }
            branches.push(GuardBranch {
                id: self.ids.next_id(),
                loc: node_loc(match_node),
                guards,
                exp,
            });
        }
        Ok(Rhs {
            id: self.ids.next_id(),
            loc: node_loc(node),
            kind: RhsKind::Guarded { branches, wheres },
        })
    }

    /// Body of one equation. With a parameter list present this is a function
    /// binding, desugared to a lambda spanning parameters through body. Each
    /// guarded equation gets its own lambda with freshly lowered patterns.
    fn rhs_exp(
        &mut self,
        patterns_node: Option<Node<'_>>,
        match_node: Node<'_>,
    ) -> Result<Exp, ParseError> {
        let Some(pats_node) = patterns_node else {
            return self.exp(field(match_node, "expression")?);
        };
        let mut pats = Vec::new();
        for child in named_children(pats_node) {
            pats.push(self.pat(child)?);
        }
        let body = self.exp(field(match_node, "expression")?)?;
        Ok(Exp {
            id: self.ids.next_id(),
            loc: merged_loc(pats_node, match_node),
            kind: ExpKind::Lambda {
                pats,
                body: Box::new(body),
            },
        })
    }

    fn lit_kind(&self, node: Node<'_>) -> Result<LitKind, ParseError> {
        if node.is_missing() {
            return Err(fail(node));
        }
        match node.kind() {
            "integer" => Ok(LitKind::Int),
            "string" => Ok(LitKind::Str),
            "char" => Ok(LitKind::Char),
            "float" => Ok(LitKind::Frac),
            _ => Err(fail(node)),
        }
    }

    fn pat(&mut self, node: Node<'_>) -> Result<Pat, ParseError> {
        if node.is_missing() {
            return Err(fail(node));
        }
        let loc = node_loc(node);
        let kind = match node.kind() {
            "qualified" => PatKind::App {
                name: self.text(field(node, "id")?)?.to_string(),
                module: Some(self.text(field(node, "module")?)?.to_string()),
                canonical_name: None,
                pats: Vec::new(),
            },
            "prefix_id" => {
                let operator = node.named_child(0).ok_or_else(|| fail(node))?;
                PatKind::Var {
                    name: self.text(operator)?.to_string(),
                    canonical_name: None,
                }
            }
            "variable" => PatKind::Var {
                name: self.text(node)?.to_string(),
                canonical_name: None,
            },
            "constructor" => PatKind::App {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
                pats: Vec::new(),
            },
            "literal" => {
                let inner = node.named_child(0).ok_or_else(|| fail(node))?;
                PatKind::Lit(self.lit_kind(inner)?)
            }
            "tuple" => {
                let mut pats = Vec::new();
                for child in fields(node, "element") {
                    pats.push(self.pat(child)?);
                }
                PatKind::Tuple(pats)
            }
            "parens" => return self.pat(field(node, "pattern")?),
            "wildcard" => PatKind::Wildcard,
            "apply" => {
                // Peel the application spine down to the constructor.
                let mut spine = Vec::new();
                let mut current = node;
                loop {
                    if current.kind() == "apply" {
                        let arg = current.named_child(1).ok_or_else(|| fail(current))?;
                        spine.push(self.pat(arg)?);
                        current = current.named_child(0).ok_or_else(|| fail(current))?;
                    } else {
                        spine.push(self.pat(current)?);
                        break;
                    }
                }
                spine.reverse();
                let head = spine.remove(0);
                let PatKind::App { name, module, .. } = head.kind else {
                    return Err(fail(node));
                };
                PatKind::App {
                    name,
                    module,
                    canonical_name: None,
                    pats: spine,
                }
            }
            "infix" => {
                let left = self.pat(field(node, "left_operand")?)?;
                let right = self.pat(field(node, "right_operand")?)?;
                let op_node = field(node, "operator")?;
                let (name, module) = match op_node.kind() {
                    "variable" | "constructor_operator" | "operator" => {
                        (self.text(op_node)?.to_string(), None)
                    }
                    "qualified" => (
                        self.text(field(op_node, "id")?)?.to_string(),
                        Some(self.text(field(op_node, "module")?)?.to_string()),
                    ),
                    _ => return Err(fail(op_node)),
                };
                PatKind::Infix {
                    left: Box::new(left),
                    name,
                    module,
                    canonical_name: None,
                    right: Box::new(right),
                }
            }
            "list" => {
                let mut pats = Vec::new();
                for child in fields(node, "element") {
                    pats.push(self.pat(child)?);
                }
                PatKind::List(pats)
            }
            _ => return Err(fail(node)),
        };
        Ok(Pat {
            id: self.ids.next_id(),
            loc,
            kind,
        })
    }

    fn alt(&mut self, node: Node<'_>) -> Result<Alt, ParseError> {
        let pat = self.pat(field(node, "pattern")?)?;
        let match_node = field(node, "match")?;
        let exp = self.exp(field(match_node, "expression")?)?;
        let mut binds = Vec::new();
        if let Some(binds_node) = node.child_by_field_name("binds") {
            for decl in fields(binds_node, "decl") {
                binds.push(self.decl(decl)?);
            }
        }
        Ok(Alt {
            id: self.ids.next_id(),
            loc: node_loc(node),
            pat,
            exp,
            binds,
        })
    }

    /// Lower the operator of an infix application or section into a variable
    /// expression, resolving qualified and backtick forms.
    fn operator_exp(&mut self, node: Node<'_>) -> Result<Exp, ParseError> {
        let loc = node_loc(node);
        let kind = match node.kind() {
            "operator" | "constructor_operator" | "variable" => ExpKind::Var {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
            },
            "qualified" => ExpKind::Var {
                name: self.text(field(node, "id")?)?.to_string(),
                module: Some(self.text(field(node, "module")?)?.to_string()),
                canonical_name: None,
            },
            "infix_id" => {
                let inner = node.named_child(0).ok_or_else(|| fail(node))?;
                return self.operator_exp(inner);
            }
            _ => return Err(fail(node)),
        };
        Ok(Exp {
            id: self.ids.next_id(),
            loc,
            kind,
        })
    }

    fn exp(&mut self, node: Node<'_>) -> Result<Exp, ParseError> {
        if node.is_missing() {
            return Err(fail(node));
        }
        let loc = node_loc(node);
        let kind = match node.kind() {
            "qualified" => {
                let module = Some(self.text(field(node, "module")?)?.to_string());
                let ident = field(node, "id")?;
                let name = self.text(ident)?.to_string();
                match ident.kind() {
                    "variable" => ExpKind::Var {
                        name,
                        module,
                        canonical_name: None,
                    },
                    "constructor" => ExpKind::Con {
                        name,
                        module,
                        canonical_name: None,
                    },
                    _ => return Err(fail(ident)),
                }
            }
            "variable" => ExpKind::Var {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
            },
            "parens" => return self.exp(field(node, "expression")?),
            "unit" => ExpKind::Con {
                name: "unit".to_string(),
                module: None,
                canonical_name: None,
            },
            "constructor" => ExpKind::Con {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
            },
            "prefix_id" => {
                let inner = node.named_child(0).ok_or_else(|| fail(node))?;
                return self.exp(inner);
            }
            "operator" | "constructor_operator" => ExpKind::Var {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
            },
            "apply" => {
                let fun = node.named_child(0).ok_or_else(|| fail(node))?;
                let arg = node.named_child(1).ok_or_else(|| fail(node))?;
                ExpKind::App {
                    fun: Box::new(self.exp(fun)?),
                    arg: Box::new(self.exp(arg)?),
                }
            }
            "infix" => {
                let left = self.exp(field(node, "left_operand")?)?;
                let right = self.exp(field(node, "right_operand")?)?;
                let op = self.operator_exp(field(node, "operator")?)?;
                ExpKind::InfixApp {
                    left: Box::new(left),
                    op: Box::new(op),
                    right: Box::new(right),
                }
            }
            "left_section" => {
                let left = self.exp(field(node, "left_operand")?)?;
                let op = self.operator_exp(field(node, "operator")?)?;
                ExpKind::LeftSection {
                    left: Box::new(left),
                    op: Box::new(op),
                }
            }
            "right_section" => {
                let op = self.operator_exp(field(node, "operator")?)?;
                let right = self.exp(field(node, "right_operand")?)?;
                ExpKind::RightSection {
                    op: Box::new(op),
                    right: Box::new(right),
                }
            }
            "lambda" => {
                let patterns = field(node, "patterns")?;
                let mut pats = Vec::new();
                for child in named_children(patterns) {
                    pats.push(self.pat(child)?);
                }
                let body = self.exp(field(node, "expression")?)?;
                ExpKind::Lambda {
                    pats,
                    body: Box::new(body),
                }
            }
            "let_in" => {
                let mut binds = Vec::new();
                if let Some(binds_node) = node.child_by_field_name("binds") {
                    for decl in fields(binds_node, "decl") {
                        binds.push(self.decl(decl)?);
                    }
                }
                let body = self.exp(field(node, "expression")?)?;
                ExpKind::Let {
                    binds,
                    body: Box::new(body),
                }
            }
            "conditional" => ExpKind::If {
                cond: Box::new(self.exp(field(node, "if")?)?),
                then_branch: Box::new(self.exp(field(node, "then")?)?),
                else_branch: Box::new(self.exp(field(node, "else")?)?),
            },
            "case" => {
                let scrutinee = node.named_child(0).ok_or_else(|| fail(node))?;
                let scrutinee = self.exp(scrutinee)?;
                let alts_node = field(node, "alternatives")?;
                let mut alts = Vec::new();
                for child in named_children(alts_node) {
                    if child.kind() == "alternative" {
                        alts.push(self.alt(child)?);
                    }
                }
                ExpKind::Case {
                    scrutinee: Box::new(scrutinee),
                    alts,
                }
            }
            "do" => {
                let mut stmts = Vec::new();
                for child in fields(node, "statement") {
                    match child.kind() {
                        "exp" => {
                            let inner = child.named_child(0).ok_or_else(|| fail(child))?;
                            let exp = self.exp(inner)?;
                            stmts.push(Stmt {
                                id: self.ids.next_id(),
                                loc: node_loc(child),
                                kind: StmtKind::Qualifier { exp },
                            });
                        }
                        "bind" => {
                            let pat = self.pat(field(child, "pattern")?)?;
                            let exp = self.exp(field(child, "expression")?)?;
                            stmts.push(Stmt {
                                id: self.ids.next_id(),
                                loc: node_loc(child),
                                kind: StmtKind::Generator { pat, exp },
                            });
                        }
                        "let" => {
                            let mut binds = Vec::new();
                            if let Some(binds_node) = child.child_by_field_name("binds") {
                                for decl in fields(binds_node, "decl") {
                                    binds.push(self.decl(decl)?);
                                }
                            }
                            stmts.push(Stmt {
                                id: self.ids.next_id(),
                                loc: node_loc(child),
                                kind: StmtKind::Let { binds },
                            });
                        }
                        _ => {}
                    }
                }
                ExpKind::Do { stmts }
            }
            "tuple" => {
                let mut exps = Vec::new();
                for child in fields(node, "element") {
                    exps.push(self.exp(child)?);
                }
                ExpKind::Tuple(exps)
            }
            "list" => {
                let mut exps = Vec::new();
                for child in fields(node, "element") {
                    exps.push(self.exp(child)?);
                }
                ExpKind::List(exps)
            }
            "arithmetic_sequence" => {
                let from = node.child_by_field_name("from");
                let to = node.child_by_field_name("to");
                match (from, to) {
                    (Some(from), Some(to)) => ExpKind::EnumFromTo {
                        from: Box::new(self.exp(from)?),
                        to: Box::new(self.exp(to)?),
                    },
                    (Some(from), None) => ExpKind::EnumFrom {
                        from: Box::new(self.exp(from)?),
                    },
                    (None, Some(to)) => ExpKind::EnumTo {
                        to: Box::new(self.exp(to)?),
                    },
                    (None, None) => return Err(fail(node)),
                }
            }
            "list_comprehension" => {
                let mut quantifiers = Vec::new();
                let mut guards = Vec::new();
                if let Some(quals) = node.child_by_field_name("qualifiers") {
                    for child in named_children(quals) {
                        match child.kind() {
                            "generator" => {
                                let pat = self.pat(field(child, "pattern")?)?;
                                let exp = self.exp(field(child, "expression")?)?;
                                quantifiers.push(Stmt {
                                    id: self.ids.next_id(),
                                    loc: node_loc(child),
                                    kind: StmtKind::Generator { pat, exp },
                                });
                            }
                            "let" => return Err(fail(child)),
                            "boolean" | "exp" => {
                                let inner = child.named_child(0).ok_or_else(|| fail(child))?;
                                guards.push(self.exp(inner)?);
                            }
                            _ => guards.push(self.exp(child)?),
                        }
                    }
                }
                let body = self.exp(field(node, "expression")?)?;
                ExpKind::Comprehension {
                    body: Box::new(body),
                    quantifiers,
                    guards,
                }
            }
            "literal" => {
                let inner = node.named_child(0).ok_or_else(|| fail(node))?;
                ExpKind::Lit(self.lit_kind(inner)?)
            }
            _ => return Err(fail(node)),
        };
        Ok(Exp {
            id: self.ids.next_id(),
            loc,
            kind,
        })
    }

    fn context(&mut self, node: Node<'_>, axiom: bool) -> Result<Context, ParseError> {
        if node.is_missing() {
            return Err(fail(node));
        }
        let assertions = match node.kind() {
            "parens" => {
                let inner = node.named_child(0).ok_or_else(|| fail(node))?;
                vec![self.ty(inner, axiom)?]
            }
            "tuple" => {
                let mut tys = Vec::new();
                for child in named_children(node) {
                    tys.push(self.ty(child, axiom)?);
                }
                tys
            }
            "apply" => vec![self.ty(node, axiom)?],
            _ => return Err(fail(node)),
        };
        Ok(Context {
            id: self.ids.next_id(),
            loc: node_loc(node),
            assertions,
        })
    }

    fn ty(&mut self, node: Node<'_>, axiom: bool) -> Result<Ty, ParseError> {
        if node.is_missing() {
            return Err(fail(node));
        }
        let loc = node_loc(node);
        let kind = match node.kind() {
            "qualified" => TyKind::Con {
                name: self.text(field(node, "id")?)?.to_string(),
                module: Some(self.text(field(node, "module")?)?.to_string()),
                canonical_name: None,
            },
            "context" => {
                // A constrained type `ctx => τ`.
                let context = self.context(field(node, "context")?, axiom)?;
                let ty = self.ty(field(node, "type")?, axiom)?;
                TyKind::Forall {
                    context: Some(context),
                    ty: Box::new(ty),
                }
            }
            "unit" => TyKind::Con {
                name: "Top".to_string(),
                module: None,
                canonical_name: None,
            },
            "name" => TyKind::Con {
                name: self.text(node)?.to_string(),
                module: None,
                canonical_name: None,
            },
            "variable" => TyKind::Var {
                name: self.text(node)?.to_string(),
                canonical_name: None,
            },
            "apply" => TyKind::App {
                fun: Box::new(self.ty(field(node, "constructor")?, axiom)?),
                arg: Box::new(self.ty(field(node, "argument")?, axiom)?),
            },
            "parens" => return self.ty(field(node, "type")?, axiom),
            "function" => TyKind::Fun {
                from: Box::new(self.ty(field(node, "parameter")?, axiom)?),
                to: Box::new(self.ty(field(node, "result")?, axiom)?),
            },
            "tuple" => {
                let mut tys = Vec::new();
                for child in fields(node, "element") {
                    tys.push(self.ty(child, axiom)?);
                }
                TyKind::Tuple(tys)
            }
            "list" => TyKind::List(Box::new(self.ty(field(node, "element")?, axiom)?)),
            "prefix_list" => TyKind::PrefixList,
            "prefix_tuple" => TyKind::PrefixTuple {
                arity: self.text(node)?.matches(',').count() + 1,
            },
            "prefix_function" => TyKind::PrefixFun,
            _ => return Err(fail(node)),
        };
        Ok(Ty {
            id: self.ids.next_id(),
            loc,
            axiom,
            kind,
        })
    }
}
