use crate::ast::{DeclKind, RhsKind};
use crate::constraint::HeadKind;
use crate::tests::common::{
    analyze_main, analyze_with_prelude, any_body_contains, bodies, rules_for,
};

#[test]
fn test_value_binding_rules() {
    let analysis = analyze_main("x = 1");
    assert_eq!(analysis.declarations, vec!["m0_x".to_string()]);

    let DeclKind::PatBind { rhs, .. } = &analysis.modules[0].decls[0].kind else {
        panic!("expected a pattern binding");
    };
    let RhsKind::Unguarded { exp, .. } = &rhs.kind else {
        panic!("expected an unguarded rhs");
    };

    let rules = rules_for(&analysis, "m0_x");
    let bodies = bodies(&rules);
    // The declaration contributes `T = rhs` unconditionally...
    let axiom = rules
        .iter()
        .find(|r| r.axiom && r.body.to_string() == format!("T = _{}", rhs.id))
        .expect("missing declaration axiom");
    assert_eq!(axiom.node_id, None);
    assert_eq!(axiom.head.kind, HeadKind::Type);
    assert_eq!(axiom.head.id, 0);
    // ...the rhs equals its expression, and the literal is an Int.
    assert!(bodies.contains(&format!("_{} = _{}", rhs.id, exp.id)));
    let lit = rules
        .iter()
        .find(|r| r.body.to_string() == format!("_{} = builtin_Int", exp.id))
        .expect("missing literal rule");
    assert!(!lit.axiom);
    assert_eq!(lit.node_id, Some(exp.id));
}

#[test]
fn test_operator_reference_and_arguments() {
    let analysis = analyze_with_prelude("f x = x + x");
    assert!(analysis.import_errors.is_empty(), "{:?}", analysis.import_errors);
    assert_eq!(analysis.declarations[0], "m0_f");
    assert_eq!(
        analysis.arguments.get("m0_f"),
        Some(&vec!["m0_x_0_2".to_string()])
    );
    // The operator resolves to the prelude's (+) and is referenced through a
    // six-argument call carrying a fresh collector.
    assert!(any_body_contains(&analysis, "p_XOp("));
    assert!(any_body_contains(&analysis, "Calls_"));
    assert!(!analysis.collectors.get("m0_f").unwrap().is_empty());
}

#[test]
fn test_unresolved_name_halts_generation() {
    let analysis = analyze_main("x = y");
    assert_eq!(analysis.import_errors.len(), 1);
    assert_eq!(analysis.import_errors[0].name, "y");
    assert!(analysis.rules.is_empty());
    assert!(analysis.declarations.is_empty());
}

#[test]
fn test_synonym_expansion_feeds_generation() {
    let analysis = analyze_main("type Age = Int\nf :: Age -> Age\nf x = x");
    assert!(analysis.import_errors.is_empty());
    let rules = rules_for(&analysis, "m0_f");
    // The expanded Int positions are attributable rules, not axioms.
    let int_rules: Vec<_> = rules
        .iter()
        .filter(|r| !r.axiom && r.body.to_string().ends_with("= builtin_Int"))
        .collect();
    assert_eq!(int_rules.len(), 2);
    for rule in int_rules {
        assert!(rule.node_id.is_some());
    }
    // The signature itself still asserts `T = type` unconditionally.
    assert!(rules.iter().any(|r| r.axiom && r.body.to_string().starts_with("T = _")));
}

#[test]
fn test_class_and_instance_rules() {
    let analysis = analyze_main(
        "data Bool = True | False\nclass Eq a where\n  eq :: a -> a -> Bool\ninstance Eq Int",
    );
    assert!(analysis.import_errors.is_empty(), "{:?}", analysis.import_errors);

    // The method's type rule asserts membership of the class variable.
    let eq_rules = rules_for(&analysis, "m0_eq");
    assert!(
        eq_rules
            .iter()
            .any(|r| r.axiom
                && r.body.to_string() == "once(member(with(m0_Eq, _m0_eq_a), _Classes))")
    );

    // The instance contributes a rule head keyed on (class, instance id).
    let instance_decl = analysis
        .modules[0]
        .decls
        .iter()
        .find(|d| matches!(d.kind, DeclKind::Instance { .. }))
        .unwrap();
    let instance_rules: Vec<_> = analysis
        .rules
        .iter()
        .filter(|r| r.head.kind == HeadKind::Instance)
        .collect();
    assert!(!instance_rules.is_empty());
    for rule in &instance_rules {
        assert_eq!(rule.head.name, "m0_Eq");
        assert_eq!(rule.head.id, instance_decl.id);
    }
    assert!(instance_rules.iter().any(|r| r.axiom && r.body.to_string().starts_with("T = _")));
    // The instance head type unifies with builtin_Int, attributably.
    assert!(
        instance_rules
            .iter()
            .any(|r| !r.axiom && r.body.to_string().ends_with("= builtin_Int"))
    );
}

#[test]
fn test_nested_reference_threads_zeta() {
    let analysis = analyze_main("f = let g = 1 in g");
    assert!(analysis.import_errors.is_empty());
    let rules = rules_for(&analysis, "m0_f");
    // Referencing the nested g from f binds the captured-argument prefix.
    assert!(
        rules
            .iter()
            .any(|r| r.body.to_string().starts_with("once(append(Zeta, _, "))
    );
    assert!(rules.iter().any(|r| r.body.to_string().starts_with("m0_g_")));
}

#[test]
fn test_sibling_reference_does_not_thread_zeta() {
    let analysis = analyze_main("g = 1\nf = g");
    assert!(analysis.import_errors.is_empty());
    let rules = rules_for(&analysis, "m0_f");
    assert!(rules.iter().any(|r| r.body.to_string().starts_with("m0_g(")));
    assert!(!rules.iter().any(|r| r.body.to_string().contains("append(Zeta")));
}

#[test]
fn test_do_block_monad_obligations() {
    let analysis = analyze_main("main = do\n  let x = 1\n  x");
    assert!(analysis.import_errors.is_empty());
    assert!(any_body_contains(&analysis, "once(member(with(p_Monad, "));
    // Every statement is a monadic value; the block equals `m a`.
    assert!(any_body_contains(&analysis, "= pair("));
    // The do-let binding opens its own rule head.
    assert!(analysis.rules.iter().any(|r| r.head.name.starts_with("m0_x_")));
}

#[test]
fn test_if_branches_unify() {
    let analysis = analyze_main("f = if 1 then 2 else 3");
    assert!(any_body_contains(&analysis, "= p_Bool"));
    assert!(any_body_contains(&analysis, "all_equal(["));
}

#[test]
fn test_guards_are_boolean() {
    let analysis = analyze_main("f\n  | 1 = 2");
    let rules = rules_for(&analysis, "m0_f");
    assert!(rules.iter().any(|r| r.axiom && r.body.to_string().ends_with("= p_Bool")));
}

#[test]
fn test_recursive_reference_uses_head_type() {
    let analysis = analyze_main("f = f");
    let rules = rules_for(&analysis, "m0_f");
    assert!(rules.iter().any(|r| r.body.to_string().ends_with(" = T")));
}

#[test]
fn test_constructor_rules() {
    let analysis = analyze_main("data Maybe a = Nothing | Just a\nx = Just");
    assert!(analysis.import_errors.is_empty());
    // Each constructor opens a type rule shaped fields -> data type.
    let just_rules = rules_for(&analysis, "m0_Just");
    assert!(
        just_rules
            .iter()
            .any(|r| r.axiom && r.body.to_string().contains("pair(m0_Maybe, _m0_Just_a)"))
    );
    // Referencing the constructor is a call, like any known declaration.
    let x_rules = rules_for(&analysis, "m0_x");
    assert!(x_rules.iter().any(|r| r.body.to_string().starts_with("m0_Just(")));
}

#[test]
fn test_enumeration_requires_enum_class() {
    let analysis = analyze_main("xs = [1 ..]");
    assert!(any_body_contains(&analysis, "once(member(with(p_Enum, "));
    assert!(any_body_contains(&analysis, "pair(list, "));
}

#[test]
fn test_bottom_and_unit() {
    let analysis = analyze_main("u = ()\nb = undefined");
    assert!(analysis.import_errors.is_empty());
    assert!(any_body_contains(&analysis, "= builtin_Top"));
    // Bottom contributes nothing beyond the binding skeleton.
    let b_rules = rules_for(&analysis, "m0_b");
    assert_eq!(b_rules.len(), 2);
}

#[test]
fn test_string_literal_is_char_list() {
    let analysis = analyze_main("s = \"hi\"");
    assert!(any_body_contains(&analysis, "= pair(list, builtin_Char)"));
}

#[test]
fn test_multi_parameter_class_rejected() {
    let files = vec![("Main".to_string(), "class Pair a b".to_string())];
    let err = crate::analyze_bundle(&files).unwrap_err();
    assert!(matches!(err, crate::FatalError::MultiParamClass { .. }));
}
