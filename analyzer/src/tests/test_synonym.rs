use crate::ast::*;
use crate::error::FatalError;
use crate::synonym::expand_synonyms;
use crate::tests::common::try_lower;

fn expand(src: &str) -> Result<Vec<Module>, FatalError> {
    let mut ids = NodeIdGen::default();
    let module = try_lower(src, &mut ids).unwrap();
    expand_synonyms(vec![module], &mut ids)
}

fn sig_ty(module: &Module) -> &Ty {
    for decl in &module.decls {
        if let DeclKind::Sig { ty, .. } = &decl.kind {
            return ty;
        }
    }
    panic!("no signature in module");
}

#[test]
fn test_nullary_synonym_inlines() {
    let modules = expand("type Age = Int\nf :: Age -> Age\nf x = x").unwrap();
    let module = &modules[0];
    assert!(
        !module
            .decls
            .iter()
            .any(|d| matches!(d.kind, DeclKind::Synonym { .. })),
        "synonym declarations must be removed"
    );
    let ty = sig_ty(module);
    let TyKind::Fun { from, to } = &ty.kind else {
        panic!("expected a function type");
    };
    for side in [from, to] {
        assert!(matches!(&side.kind, TyKind::Con { name, .. } if name == "Int"));
        // Substituted top levels are attributable, not axioms.
        assert!(!side.axiom);
    }
    assert!(ty.axiom, "the surrounding signature type stays an axiom");
}

#[test]
fn test_applied_synonym_substitutes_arguments() {
    let modules = expand("type P a = [a]\nf :: P Int -> Int\nf x = 1").unwrap();
    let ty = sig_ty(&modules[0]);
    let TyKind::Fun { from, .. } = &ty.kind else {
        panic!("expected a function type");
    };
    let TyKind::List(elem) = &from.kind else {
        panic!("expected the synonym to expand to a list, got {:?}", from.kind);
    };
    assert!(!from.axiom);
    assert!(matches!(&elem.kind, TyKind::Con { name, .. } if name == "Int"));
    // The substituted argument is an established interior position.
    assert!(elem.axiom);
}

#[test]
fn test_chained_synonyms_converge() {
    let modules = expand("type A = B\ntype B = Int\nx :: A\nx = 1").unwrap();
    let ty = sig_ty(&modules[0]);
    assert!(matches!(&ty.kind, TyKind::Con { name, .. } if name == "Int"));
}

#[test]
fn test_cyclic_synonyms_rejected() {
    let err = expand("type A = B\ntype B = A\nx :: A\nx = 1").unwrap_err();
    assert!(matches!(err, FatalError::CyclicSynonym(_)));
}

#[test]
fn test_arity_mismatch_rejected() {
    let err = expand("type P a = [a]\nx :: P\nx = 1").unwrap_err();
    assert!(matches!(err, FatalError::SynonymArity { .. }));

    let err = expand("type P a = [a]\nx :: P Int Int\nx = 1").unwrap_err();
    assert!(matches!(err, FatalError::SynonymArity { .. }));
}

#[test]
fn test_expansion_keeps_fresh_ids_unique() {
    let mut ids = NodeIdGen::default();
    let module = try_lower("type Age = Int\nf :: Age -> Age\nf x = x", &mut ids).unwrap();
    let before = ids.next_id();
    let modules = expand_synonyms(vec![module], &mut ids).unwrap();
    let ty = sig_ty(&modules[0]);
    let TyKind::Fun { from, .. } = &ty.kind else {
        panic!("expected a function type");
    };
    assert!(from.id > before, "substituted nodes take fresh ids");
}
