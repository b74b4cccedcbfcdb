//! Compiler front-end of a type-error explanation service for a lazy,
//! Hindley–Milner-typed functional language.
//!
//! Pipeline, strictly linear: lower the tree-sitter syntax trees to an AST →
//! expand type synonyms → collect binding and use sites → allocate → rename →
//! gather auxiliary tables → generate logic rules. Coordinates everywhere are
//! zero-based (line, column) pairs into the original source.
//!
//! Parsing and name-resolution failures are collected per bundle (see
//! [`Analysis`]); programmer mistakes that cannot be localized (cyclic
//! synonyms, multi-parameter classes, ...) surface as [`FatalError`].

use std::collections::{HashMap, HashSet};

mod ast;
mod constraint;
mod encode;
mod error;
mod gather;
mod logic;
mod lower;
mod rename;
mod scope;
mod span;
mod state;
mod synonym;
mod tests;
mod visit;

pub use ast::{
    Alt, Context, DataCon, Decl, DeclHead, DeclKind, Exp, ExpKind, GuardBranch, LitKind, Module,
    NodeId, NodeIdGen, Pat, PatKind, Rhs, RhsKind, Stmt, StmtKind, Ty, TyKind,
};
pub use constraint::{Collectors, HeadKind, Rule, RuleHead};
pub use encode::{decode, encode};
pub use error::{FatalError, ParseError};
pub use gather::{Arguments, Closures, SuperClasses, TypeVars, gather_node_graph};
pub use logic::LTerm;
pub use scope::{Buyer, Namespace, Scope, Vendor};
pub use span::{Point, Range};
pub use state::Analysis;
pub use visit::{NodeRef, Visitor, walk_module, walk_modules};

fn haskell_parser() -> Result<tree_sitter::Parser, FatalError> {
    let mut parser = tree_sitter::Parser::new();
    let language: tree_sitter::Language = tree_sitter_haskell::LANGUAGE.into();
    parser
        .set_language(&language)
        .map_err(|e| FatalError::Grammar(e.to_string()))?;
    Ok(parser)
}

/// Parse a bundle of `(module name, source text)` pairs and resolve names.
///
/// Returns early (with later fields empty) on the first parsing error, or
/// after collecting every unresolved name as an import error.
pub fn parse_bundle(files: &[(String, String)]) -> Result<Analysis, FatalError> {
    let mut analysis = Analysis::default();
    let mut ids = NodeIdGen::default();
    let mut parser = haskell_parser()?;
    let mut modules = Vec::new();
    let mut import_map: HashMap<String, Vec<String>> = HashMap::new();

    for (index, (module_name, source)) in files.iter().enumerate() {
        let Some(tree) = parser.parse(source, None) else {
            analysis
                .parsing_errors
                .push(Range::new(Point::new(0, 0), Point::new(0, 0)));
            break;
        };
        match lower::lower_module(tree.root_node(), source, module_name, &mut ids) {
            Ok(mut module) => {
                tracing::debug!(module = %module.name, decls = module.decls.len(), "lowered module");
                // The prelude is injected into every other module's imports.
                if module.name != "Prelude" && !module.imports.iter().any(|i| i == "Prelude") {
                    module.imports.push("Prelude".to_string());
                }
                import_map.insert(module.name.clone(), module.imports.clone());
                let tag = if module.name == "Prelude" {
                    "p".to_string()
                } else {
                    format!("m{index}")
                };
                analysis.module_tags.insert(module.name.clone(), tag);
                analysis.module_order.push(module.name.clone());
                modules.push(module);
            }
            Err(e) => {
                analysis.parsing_errors.push(e.loc);
                break;
            }
        }
    }
    if !analysis.parsing_errors.is_empty() {
        return Ok(analysis);
    }

    let modules = synonym::expand_synonyms(modules, &mut ids)?;

    let vendors = scope::collect_vendors(&modules, &analysis.module_tags)?;
    let buyers = scope::collect_buyers(&modules);
    let (buyers, import_errors) = scope::allocate(&vendors, buyers, &import_map);
    tracing::debug!(
        vendors = vendors.len(),
        buyers = buyers.len(),
        unresolved = import_errors.len(),
        "allocated names"
    );
    analysis.import_errors = import_errors;
    if !analysis.import_errors.is_empty() {
        analysis.vendors = vendors;
        return Ok(analysis);
    }

    let mut modules = modules;
    rename::rename_modules(&mut modules, &vendors, &buyers);

    analysis.node_table = gather::gather_node_table(&modules);
    analysis.declarations =
        declaration_names(&vendors, &analysis.module_order, &analysis.node_table);
    analysis.vendors = vendors;
    analysis.buyers = buyers;
    analysis.modules = modules;
    Ok(analysis)
}

/// Canonical names of term declarations, sorted by (module input order,
/// binding start point), first occurrence kept.
fn declaration_names(
    vendors: &[Vendor],
    module_order: &[String],
    node_table: &std::collections::BTreeMap<NodeId, Range>,
) -> Vec<String> {
    let mut entries: Vec<(usize, Point, &str)> = vendors
        .iter()
        .filter(|v| v.namespace == Namespace::Term && v.is_declaration)
        .map(|v| {
            let module = module_order
                .iter()
                .position(|m| *m == v.module)
                .unwrap_or(usize::MAX);
            let start = node_table
                .get(&v.node_id)
                .map_or(Point::new(0, 0), |range| range.start);
            (module, start, v.canonical_name.as_str())
        })
        .collect();
    entries.sort_by(|a, b| (a.0, a.1).cmp(&(b.0, b.1)));

    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for (_, _, name) in entries {
        if seen.insert(name) {
            names.push(name.to_string());
        }
    }
    names
}

fn static_analysis(analysis: &mut Analysis) -> Result<(), FatalError> {
    analysis.node_depth = gather::gather_node_depth(&analysis.modules);
    analysis.max_depth = analysis.node_depth.values().copied().max().unwrap_or(0);
    analysis.node_graph = gather::gather_node_graph(&analysis.modules, false);

    // The generator's ancestor test consumes closures, so they come first.
    analysis.closures = gather::gather_closures(&analysis.modules);
    analysis.arguments = gather::gather_arguments(&analysis.modules, &analysis.closures);
    analysis.classes = gather::gather_classes(&analysis.modules)?;
    analysis.type_vars = gather::gather_type_vars(&analysis.modules, &analysis.classes);

    let declared: HashSet<String> = analysis.declarations.iter().cloned().collect();
    let (rules, collectors) =
        constraint::generate_constraints(&analysis.modules, &declared, &analysis.closures)?;
    analysis.rules = rules;
    analysis.collectors = collectors;
    Ok(())
}

/// Run the full pipeline over a bundle.
pub fn analyze_bundle(files: &[(String, String)]) -> Result<Analysis, FatalError> {
    let mut analysis = parse_bundle(files)?;
    if !analysis.parsing_errors.is_empty() || !analysis.import_errors.is_empty() {
        return Ok(analysis);
    }
    static_analysis(&mut analysis)?;
    Ok(analysis)
}
