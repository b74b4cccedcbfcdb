use std::collections::{BTreeMap, HashMap};

use crate::ast::{Module, NodeId};
use crate::constraint::{Collectors, Rule};
use crate::gather::{Arguments, Closures, SuperClasses, TypeVars};
use crate::scope::{Buyer, Vendor};
use crate::span::Range;

/// Everything a bundle run produces.
///
/// When `parsing_errors` or `import_errors` is non-empty the pipeline halted
/// at that stage and all later fields are empty.
#[derive(Debug, Default)]
pub struct Analysis {
    pub modules: Vec<Module>,
    /// Module name to canonical-name tag: `p` for the prelude, `m0`, `m1`,
    /// ... for user modules in input order.
    pub module_tags: HashMap<String, String>,
    /// Module names in input order.
    pub module_order: Vec<String>,
    pub vendors: Vec<Vendor>,
    pub buyers: Vec<Buyer>,
    pub parsing_errors: Vec<Range>,
    pub import_errors: Vec<Buyer>,
    /// Canonical names of term declarations, ordered by (module, start) and
    /// deduplicated keeping the first occurrence.
    pub declarations: Vec<String>,
    pub rules: Vec<Rule>,
    pub arguments: Arguments,
    pub closures: Closures,
    pub classes: SuperClasses,
    pub collectors: Collectors,
    pub type_vars: TypeVars,
    pub node_depth: BTreeMap<NodeId, usize>,
    pub node_graph: Vec<(NodeId, NodeId)>,
    pub node_table: BTreeMap<NodeId, Range>,
    pub max_depth: usize,
}
