use crate::ast::NodeId;
use crate::span::Range;
use thiserror::Error;

/// The surface parser produced an error or missing node.
///
/// Carries the offending node's range; the pipeline records the first one per
/// bundle and returns with empty downstream fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("parse error at {loc}")]
pub struct ParseError {
    pub loc: Range,
}

/// Unrecoverable failures. These are programmer mistakes in the input (or
/// broken internal invariants) that cannot be localized to a source node, so
/// they propagate as errors instead of joining the per-bundle error lists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FatalError {
    #[error("possible cyclic definition in a type synonym of module `{0}`")]
    CyclicSynonym(String),
    #[error("the kind of synonym `{name}` does not match its usage")]
    SynonymArity { name: String },
    #[error("multi-parameter type class `{name}` is not supported")]
    MultiParamClass { name: String },
    #[error("identifier `{0}` cannot be represented in a canonical name")]
    UnencodableName(String),
    #[error("the class hierarchy contains a cycle")]
    CyclicClassHierarchy,
    #[error("node {node_id} reached constraint generation without a canonical name")]
    Unresolved { node_id: NodeId },
    #[error("failed to load the surface grammar: {0}")]
    Grammar(String),
}
