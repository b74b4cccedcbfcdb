//! JSON-facing output record for the constraint front-end.
//!
//! Assembles an [`analyzer::Analysis`] into a serializable
//! [`ConstraintProgram`]; rule bodies are pretty-printed (`=` infix for `eq`,
//! `functor(a, b)` otherwise, `[a, b]` for lists).

mod prelude;

pub use prelude::PRELUDE;

use std::collections::{BTreeMap, BTreeSet};

use analyzer::{Analysis, Buyer, FatalError, HeadKind, Namespace, NodeId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRange {
    pub from_line: usize,
    pub to_line: usize,
    pub from_col: usize,
    pub to_col: usize,
}

impl From<analyzer::Range> for NodeRange {
    fn from(range: analyzer::Range) -> Self {
        Self {
            from_line: range.start.line,
            to_line: range.end.line,
            from_col: range.start.col,
            to_col: range.end.col,
        }
    }
}

/// An unresolved name, reported back to the client in full.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnknownName {
    pub node_id: NodeId,
    pub name: String,
    pub node_range: NodeRange,
    pub is_type: bool,
    pub is_term: bool,
}

impl From<&Buyer> for UnknownName {
    fn from(buyer: &Buyer) -> Self {
        Self {
            node_id: buyer.node_id,
            name: buyer.name.clone(),
            node_range: buyer.usage_loc.into(),
            is_type: buyer.namespace == Namespace::Type,
            is_term: buyer.namespace == Namespace::Term,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    Type,
    Instance,
}

impl From<HeadKind> for RuleKind {
    fn from(kind: HeadKind) -> Self {
        match kind {
            HeadKind::Type => RuleKind::Type,
            HeadKind::Instance => RuleKind::Instance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleHead {
    pub kind: RuleKind,
    pub name: String,
    pub module: String,
    pub id: NodeId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub head: RuleHead,
    pub id: Option<NodeId>,
    pub axiom: bool,
    pub body: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub parent: NodeId,
    pub child: NodeId,
}

/// The constraint program handed to the logic engine, plus the bookkeeping
/// tables error attribution needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintProgram {
    pub declarations: Vec<String>,
    pub rules: Vec<Rule>,
    pub arguments: BTreeMap<String, Vec<String>>,
    pub classes: BTreeMap<String, BTreeSet<String>>,
    pub type_vars: BTreeMap<String, BTreeMap<String, BTreeSet<String>>>,
    pub node_depth: BTreeMap<NodeId, usize>,
    pub node_graph: Vec<Edge>,
    pub node_range: BTreeMap<NodeId, NodeRange>,
    pub max_depth: usize,
    pub collectors: BTreeMap<String, Vec<String>>,
    pub parsing_errors: Vec<NodeRange>,
    pub import_errors: Vec<UnknownName>,
}

pub fn assemble(analysis: &Analysis) -> ConstraintProgram {
    ConstraintProgram {
        declarations: analysis.declarations.clone(),
        rules: analysis
            .rules
            .iter()
            .map(|rule| Rule {
                head: RuleHead {
                    kind: rule.head.kind.into(),
                    name: rule.head.name.clone(),
                    module: rule.head.module.clone(),
                    id: rule.head.id,
                },
                id: rule.node_id,
                axiom: rule.axiom,
                body: rule.body.to_string(),
            })
            .collect(),
        arguments: analysis.arguments.clone(),
        classes: analysis.classes.clone(),
        type_vars: analysis.type_vars.clone(),
        node_depth: analysis.node_depth.clone(),
        node_graph: analysis
            .node_graph
            .iter()
            .map(|&(parent, child)| Edge { parent, child })
            .collect(),
        node_range: analysis
            .node_table
            .iter()
            .map(|(&id, &range)| (id, range.into()))
            .collect(),
        max_depth: analysis.max_depth,
        collectors: analysis.collectors.clone(),
        parsing_errors: analysis
            .parsing_errors
            .iter()
            .map(|&range| range.into())
            .collect(),
        import_errors: analysis.import_errors.iter().map(UnknownName::from).collect(),
    }
}

/// Run the pipeline over a bundle and assemble the wire record.
pub fn translate(files: &[(String, String)]) -> Result<ConstraintProgram, FatalError> {
    Ok(assemble(&analyzer::analyze_bundle(files)?))
}

/// Translate a single user module against the standard prelude, the way the
/// service composes its requests.
pub fn translate_source(body: &str) -> Result<ConstraintProgram, FatalError> {
    translate(&[
        ("Main".to_string(), body.to_string()),
        ("Prelude".to_string(), PRELUDE.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble_simple_binding() {
        let program = translate(&[("Main".to_string(), "x = 1".to_string())]).unwrap();
        assert_eq!(program.declarations, vec!["m0_x".to_string()]);
        assert!(program.parsing_errors.is_empty());
        assert!(program.import_errors.is_empty());
        assert!(program.max_depth > 0);

        let axiom = program
            .rules
            .iter()
            .find(|r| r.axiom && r.head.name == "m0_x")
            .expect("missing declaration axiom");
        assert!(axiom.body.starts_with("T = _"));
        assert_eq!(axiom.id, None);
        assert_eq!(axiom.head.kind, RuleKind::Type);

        let literal = program
            .rules
            .iter()
            .find(|r| r.body.ends_with("= builtin_Int"))
            .expect("missing literal rule");
        assert!(!literal.axiom);
        assert!(literal.id.is_some());
    }

    #[test]
    fn test_unknown_name_record() {
        let program = translate(&[("Main".to_string(), "x = y".to_string())]).unwrap();
        assert!(program.rules.is_empty());
        assert_eq!(program.import_errors.len(), 1);
        let unknown = &program.import_errors[0];
        assert_eq!(unknown.name, "y");
        assert!(unknown.is_term);
        assert!(!unknown.is_type);
    }

    #[test]
    fn test_parse_error_record() {
        let program = translate(&[("Main".to_string(), "x = (".to_string())]).unwrap();
        assert_eq!(program.parsing_errors.len(), 1);
        assert!(program.rules.is_empty());
        assert!(program.declarations.is_empty());
    }

    #[test]
    fn test_json_shape() {
        let program = translate(&[("Main".to_string(), "x = 1".to_string())]).unwrap();
        let json = serde_json::to_value(&program).unwrap();
        assert!(json["declarations"].is_array());
        assert!(json["rules"][0]["head"]["kind"].is_string());
        assert_eq!(json["rules"][0]["head"]["kind"], "type");
        assert!(json["node_range"].is_object());
        // Round-trips through serde.
        let back: ConstraintProgram = serde_json::from_value(json).unwrap();
        assert_eq!(back, program);
    }

    #[test]
    fn test_translate_source_uses_prelude() {
        let program = translate_source("f x = x + x").unwrap();
        assert!(program.import_errors.is_empty(), "{:?}", program.import_errors);
        assert!(program.declarations.contains(&"m0_f".to_string()));
        // The operator resolves to the prelude's (+).
        assert!(program.rules.iter().any(|r| r.body.contains("p_XOp(")));
    }
}
