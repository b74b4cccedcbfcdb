//! One-pass collectors over the renamed AST: source bookkeeping tables and
//! the relations the constraint generator consumes.

mod arguments;
mod classes;
mod closure;
mod depth;
mod graph;
mod table;
mod type_vars;

pub use arguments::{Arguments, gather_arguments};
pub use classes::{SuperClasses, gather_classes};
pub use closure::{Closures, gather_closures};
pub use depth::gather_node_depth;
pub use graph::gather_node_graph;
pub use table::gather_node_table;
pub use type_vars::{TypeVars, gather_type_vars};
