use std::collections::HashSet;

use crate::ast::*;
use crate::span::Point;
use crate::tests::common::{lower_source, try_lower};
use crate::visit::{NodeRef, Visitor, walk_module};

fn first_patbind(module: &Module) -> (&Pat, &Rhs) {
    for decl in &module.decls {
        if let DeclKind::PatBind { pat, rhs } = &decl.kind {
            return (pat, rhs);
        }
    }
    panic!("no pattern binding in module");
}

#[test]
fn test_simple_binding() {
    let module = lower_source("x = 1");
    assert_eq!(module.name, "Main");
    assert_eq!(module.decls.len(), 1);
    let (pat, rhs) = first_patbind(&module);
    assert!(matches!(&pat.kind, PatKind::Var { name, .. } if name == "x"));
    let RhsKind::Unguarded { exp, wheres } = &rhs.kind else {
        panic!("expected unguarded rhs");
    };
    assert!(wheres.is_empty());
    assert!(matches!(exp.kind, ExpKind::Lit(LitKind::Int)));
    // The rhs range starts just past the `=`.
    assert_eq!(rhs.loc.start, Point::new(0, 3));
}

#[test]
fn test_function_binding_desugars_to_lambda() {
    let module = lower_source("f x y = x");
    let (_, rhs) = first_patbind(&module);
    let RhsKind::Unguarded { exp, .. } = &rhs.kind else {
        panic!("expected unguarded rhs");
    };
    let ExpKind::Lambda { pats, body } = &exp.kind else {
        panic!("expected a lambda, got {:?}", exp.kind);
    };
    assert_eq!(pats.len(), 2);
    assert!(matches!(&body.kind, ExpKind::Var { name, .. } if name == "x"));
    // The lambda spans from the parameter list to the equation's end.
    assert_eq!(exp.loc.start, Point::new(0, 2));
    assert_eq!(exp.loc.end, Point::new(0, 9));
}

#[test]
fn test_guarded_equations_lower_per_branch() {
    let module = lower_source("f x\n  | x = 1\n  | 1 = 2");
    let (_, rhs) = first_patbind(&module);
    let RhsKind::Guarded { branches, .. } = &rhs.kind else {
        panic!("expected guarded rhs");
    };
    assert_eq!(branches.len(), 2);
    for branch in branches {
        assert_eq!(branch.guards.len(), 1);
        // Each guarded equation re-lowers the parameters into its own lambda.
        assert!(matches!(branch.exp.kind, ExpKind::Lambda { .. }));
    }
}

#[test]
fn test_do_statements() {
    let module = lower_source("main = do\n  x <- f\n  let y = 1\n  x");
    let (_, rhs) = first_patbind(&module);
    let RhsKind::Unguarded { exp, .. } = &rhs.kind else {
        panic!("expected unguarded rhs");
    };
    let ExpKind::Do { stmts } = &exp.kind else {
        panic!("expected a do block, got {:?}", exp.kind);
    };
    assert_eq!(stmts.len(), 3);
    assert!(matches!(stmts[0].kind, StmtKind::Generator { .. }));
    assert!(matches!(stmts[1].kind, StmtKind::Let { .. }));
    assert!(matches!(stmts[2].kind, StmtKind::Qualifier { .. }));
}

#[test]
fn test_sections() {
    let module = lower_source("f = (1 +)\ng = (+ 1)");
    let mut kinds = Vec::new();
    for decl in &module.decls {
        if let DeclKind::PatBind { rhs, .. } = &decl.kind {
            if let RhsKind::Unguarded { exp, .. } = &rhs.kind {
                kinds.push(&exp.kind);
            }
        }
    }
    assert!(matches!(kinds[0], ExpKind::LeftSection { .. }));
    assert!(matches!(kinds[1], ExpKind::RightSection { .. }));
}

#[test]
fn test_infix_operator_is_a_sub_expression() {
    let module = lower_source("y = 1 + 2");
    let (_, rhs) = first_patbind(&module);
    let RhsKind::Unguarded { exp, .. } = &rhs.kind else {
        panic!("expected unguarded rhs");
    };
    let ExpKind::InfixApp { op, .. } = &exp.kind else {
        panic!("expected infix application, got {:?}", exp.kind);
    };
    assert!(matches!(&op.kind, ExpKind::Var { name, .. } if name == "+"));
}

#[test]
fn test_enumerations() {
    let module = lower_source("xs = [1 ..]\nys = [1 .. 9]");
    let mut kinds = Vec::new();
    for decl in &module.decls {
        if let DeclKind::PatBind { rhs, .. } = &decl.kind {
            if let RhsKind::Unguarded { exp, .. } = &rhs.kind {
                kinds.push(&exp.kind);
            }
        }
    }
    assert!(matches!(kinds[0], ExpKind::EnumFrom { .. }));
    assert!(matches!(kinds[1], ExpKind::EnumFromTo { .. }));
}

#[test]
fn test_unit_expression() {
    let module = lower_source("u = ()");
    let (_, rhs) = first_patbind(&module);
    let RhsKind::Unguarded { exp, .. } = &rhs.kind else {
        panic!("expected unguarded rhs");
    };
    assert!(matches!(&exp.kind, ExpKind::Con { name, .. } if name == "unit"));
}

#[test]
fn test_multi_name_signature() {
    let module = lower_source("(==), (/=) :: a -> a");
    let DeclKind::Sig { names, ty, .. } = &module.decls[0].kind else {
        panic!("expected a signature");
    };
    assert_eq!(names, &["==", "/="]);
    assert!(ty.axiom);
    assert!(matches!(ty.kind, TyKind::Fun { .. }));
}

#[test]
fn test_synonym_declaration() {
    let module = lower_source("type Age = Int\ntype P a = [a]");
    let DeclKind::Synonym { head, ty } = &module.decls[0].kind else {
        panic!("expected a synonym");
    };
    assert_eq!(head.name, "Age");
    assert!(head.ty_vars.is_empty());
    assert!(matches!(&ty.kind, TyKind::Con { name, .. } if name == "Int"));
    let DeclKind::Synonym { head, .. } = &module.decls[1].kind else {
        panic!("expected a synonym");
    };
    assert_eq!(head.ty_vars.len(), 1);
}

#[test]
fn test_class_and_instance() {
    let module = lower_source(
        "data Bool = True | False\nclass Eq a where\n  eq :: a -> a -> Bool\ninstance Eq Int",
    );
    let DeclKind::Data { constructors, .. } = &module.decls[0].kind else {
        panic!("expected a data declaration");
    };
    assert_eq!(constructors.len(), 2);
    let DeclKind::Class { head, decls, .. } = &module.decls[1].kind else {
        panic!("expected a class declaration");
    };
    assert_eq!(head.name, "Eq");
    assert_eq!(decls.len(), 1);
    let DeclKind::Instance { name, tys, .. } = &module.decls[2].kind else {
        panic!("expected an instance declaration");
    };
    assert_eq!(name, "Eq");
    assert_eq!(tys.len(), 1);
    assert!(!tys[0].axiom);
}

#[test]
fn test_parse_error_carries_range() {
    let err = try_lower("x = (", &mut NodeIdGen::default()).unwrap_err();
    assert_eq!(err.loc.start.line, 0);
}

#[test]
fn test_node_ids_unique() {
    let module = lower_source(
        "f x = case x of\n  0 -> [1, 2]\n  y -> (y, 1)\ng = \\a -> if a then 1 else 2",
    );
    struct Ids {
        seen: HashSet<NodeId>,
        duplicated: bool,
    }
    impl Visitor for Ids {
        fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
            if !self.seen.insert(node.id()) {
                self.duplicated = true;
            }
        }
    }
    let mut ids = Ids {
        seen: HashSet::new(),
        duplicated: false,
    };
    walk_module(&mut ids, &module);
    assert!(!ids.duplicated);
    assert!(ids.seen.len() > 20);
}
