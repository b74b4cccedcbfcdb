use std::collections::BTreeSet;

use crate::ast::{DeclKind, TyKind};
use crate::gather::gather_node_graph;
use crate::tests::common::analyze_main;

#[test]
fn test_node_depth_and_max() {
    let analysis = analyze_main("x = 1");
    let module_id = analysis.modules[0].id;
    let decl_id = analysis.modules[0].decls[0].id;
    assert_eq!(analysis.node_depth.get(&module_id), Some(&0));
    assert_eq!(analysis.node_depth.get(&decl_id), Some(&1));
    assert!(analysis.max_depth >= 3);
    assert_eq!(
        analysis.max_depth,
        *analysis.node_depth.values().max().unwrap()
    );
}

#[test]
fn test_node_table_covers_every_graph_edge() {
    let analysis = analyze_main("f x = x\ny = (1, 2)");
    assert!(!analysis.node_graph.is_empty());
    for (parent, child) in &analysis.node_graph {
        assert!(analysis.node_table.contains_key(parent));
        assert!(analysis.node_table.contains_key(child));
    }
}

#[test]
fn test_node_graph_excludes_axiom_types() {
    let analysis = analyze_main("f :: Int -> Int\nf x = x");
    let DeclKind::Sig { ty, .. } = &analysis.modules[0].decls[0].kind else {
        panic!("expected a signature");
    };
    assert!(ty.axiom);
    let TyKind::Fun { from, .. } = &ty.kind else {
        panic!("expected a function type");
    };
    // The attribution graph leaves axiom-marked type nodes out...
    assert!(
        !analysis
            .node_graph
            .iter()
            .any(|(p, c)| *p == ty.id || *c == ty.id || *c == from.id)
    );
    // ...while the unfiltered variant keeps them.
    let full = gather_node_graph(&analysis.modules, true);
    assert!(full.iter().any(|(p, _)| *p == ty.id));
}

#[test]
fn test_closures_record_enclosing_declarations() {
    let analysis = analyze_main("f = let g = 1 in g");
    let (name, parents) = analysis
        .closures
        .iter()
        .find(|(name, _)| name.starts_with("m0_g"))
        .expect("missing closure for g");
    assert!(name.starts_with("m0_g_0_"));
    assert_eq!(parents, &vec!["m0_f".to_string()]);
    assert_eq!(analysis.closures.get("m0_f"), Some(&Vec::new()));
}

#[test]
fn test_arguments_inherit_from_ancestors() {
    let analysis = analyze_main("f x = let g = \\y -> y in g");
    assert!(analysis.import_errors.is_empty());
    let f_args = analysis.arguments.get("m0_f").unwrap();
    assert_eq!(f_args, &vec!["m0_x_0_2".to_string()]);

    let (_, g_args) = analysis
        .arguments
        .iter()
        .find(|(name, _)| name.starts_with("m0_g"))
        .expect("missing arguments for g");
    // g sees its own lambda parameter plus the enclosing f's.
    assert!(g_args.contains(&"m0_x_0_2".to_string()));
    assert!(g_args.iter().any(|a| a.starts_with("m0_y")));
}

#[test]
fn test_superclass_closure_is_transitive() {
    let analysis = analyze_main("class A a\nclass A a => B a\nclass B a => C a");
    let expect =
        |names: &[&str]| -> BTreeSet<String> { names.iter().map(|s| s.to_string()).collect() };
    assert_eq!(analysis.classes.get("m0_A"), Some(&expect(&[])));
    assert_eq!(analysis.classes.get("m0_B"), Some(&expect(&["m0_A"])));
    assert_eq!(analysis.classes.get("m0_C"), Some(&expect(&["m0_A", "m0_B"])));
}

#[test]
fn test_cyclic_class_hierarchy_rejected() {
    let files = vec![(
        "Main".to_string(),
        "class B a => A a\nclass A a => B a".to_string(),
    )];
    let err = crate::analyze_bundle(&files).unwrap_err();
    assert!(matches!(err, crate::FatalError::CyclicClassHierarchy));
}

#[test]
fn test_type_vars_from_context_and_superclasses() {
    let analysis = analyze_main(
        "class Eq a\nclass Eq a => Ord a\nsort :: Ord a => a -> a\nsort = sort",
    );
    assert!(analysis.import_errors.is_empty());
    let per_var = analysis.type_vars.get("m0_sort").expect("missing sort");
    let classes = per_var.get("a").expect("missing type variable a");
    assert!(classes.contains("m0_Ord"));
    // Superclass closure folds Eq in as well.
    assert!(classes.contains("m0_Eq"));
}

#[test]
fn test_type_vars_from_class_methods() {
    let analysis = analyze_main("data Bool = True | False\nclass Eq a where\n  eq :: a -> a -> Bool");
    let per_var = analysis.type_vars.get("m0_eq").expect("missing eq");
    let classes = per_var.get("a").expect("missing type variable a");
    assert!(classes.contains("m0_Eq"));
}
