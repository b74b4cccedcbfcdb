use std::collections::HashSet;

use crate::tests::common::{MINI_PRELUDE, analyze, analyze_with_prelude};
use crate::visit::{NodeRef, Visitor, walk_modules};
use crate::{parse_bundle, rename};

#[test]
fn test_pipeline_is_deterministic() {
    let run = || {
        let analysis = analyze_with_prelude("f x = x + x\ng = f 1");
        let rules: Vec<String> = analysis
            .rules
            .iter()
            .map(|r| format!("{}/{}/{:?}/{}", r.head.name, r.axiom, r.node_id, r.body))
            .collect();
        (
            analysis.declarations.clone(),
            rules,
            analysis.node_table.clone(),
            analysis.collectors.clone(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn test_node_ids_unique_across_modules() {
    let analysis = analyze(&[("Main", "f x = x + x\ng = f 1"), ("Prelude", MINI_PRELUDE)]);
    struct Ids {
        seen: HashSet<crate::NodeId>,
        duplicates: Vec<crate::NodeId>,
    }
    impl Visitor for Ids {
        fn enter(&mut self, node: NodeRef<'_>, _parent: Option<NodeRef<'_>>) {
            if !self.seen.insert(node.id()) {
                self.duplicates.push(node.id());
            }
        }
    }
    let mut ids = Ids {
        seen: HashSet::new(),
        duplicates: Vec::new(),
    };
    walk_modules(&mut ids, &analysis.modules);
    assert!(ids.duplicates.is_empty(), "{:?}", ids.duplicates);
}

#[test]
fn test_rename_is_idempotent() {
    let files = vec![
        ("Main".to_string(), "f x = x + x".to_string()),
        ("Prelude".to_string(), MINI_PRELUDE.to_string()),
    ];
    let mut analysis = parse_bundle(&files).unwrap();
    assert!(analysis.import_errors.is_empty());
    let before = format!("{:?}", analysis.modules);
    let (vendors, buyers) = (analysis.vendors.clone(), analysis.buyers.clone());
    rename::rename_modules(&mut analysis.modules, &vendors, &buyers);
    assert_eq!(format!("{:?}", analysis.modules), before);
}

#[test]
fn test_every_reference_is_renamed() {
    let analysis = analyze_with_prelude("f x = x + x\ng = f 1");
    assert!(analysis.import_errors.is_empty());
    for buyer in &analysis.buyers {
        assert!(
            buyer.canonical_name.is_some(),
            "buyer {} left unresolved",
            buyer.name
        );
    }
}

#[test]
fn test_declarations_sorted_and_deduplicated() {
    // The signature and the binding produce the same canonical name once.
    let analysis = analyze_main_with_sig();
    let f_count = analysis
        .declarations
        .iter()
        .filter(|d| *d == "m0_f")
        .count();
    assert_eq!(f_count, 1);
    // Main's declarations come before the prelude's.
    let f_pos = analysis.declarations.iter().position(|d| d == "m0_f");
    let otherwise_pos = analysis.declarations.iter().position(|d| d == "p_otherwise");
    assert!(f_pos < otherwise_pos, "{:?}", analysis.declarations);
    assert!(otherwise_pos.is_some());
}

fn analyze_main_with_sig() -> crate::Analysis {
    analyze_with_prelude("f :: Int -> Int\nf x = x")
}

#[test]
fn test_parse_error_short_circuits() {
    let analysis = analyze(&[("Main", "f = ("), ("Prelude", MINI_PRELUDE)]);
    assert_eq!(analysis.parsing_errors.len(), 1);
    assert!(analysis.modules.is_empty());
    assert!(analysis.rules.is_empty());
    assert!(analysis.vendors.is_empty());
    assert!(analysis.declarations.is_empty());
}
