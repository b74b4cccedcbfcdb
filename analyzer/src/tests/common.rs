use crate::ast::{Module, NodeIdGen};
use crate::error::ParseError;
use crate::{Analysis, Rule, analyze_bundle};

/// A prelude just large enough for the arithmetic-flavoured tests.
pub const MINI_PRELUDE: &str = "
data Bool = True | False
class Num a
instance Num Int
(+),(-),(*) :: Num a => a -> a -> a
otherwise = True
";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .try_init();
}

pub fn analyze(files: &[(&str, &str)]) -> Analysis {
    init_tracing();
    let files: Vec<(String, String)> = files
        .iter()
        .map(|(name, text)| (name.to_string(), text.to_string()))
        .collect();
    analyze_bundle(&files).unwrap()
}

/// Analyze a single module named `Main`, no prelude.
pub fn analyze_main(src: &str) -> Analysis {
    analyze(&[("Main", src)])
}

/// Analyze `Main` against [`MINI_PRELUDE`].
pub fn analyze_with_prelude(src: &str) -> Analysis {
    analyze(&[("Main", src), ("Prelude", MINI_PRELUDE)])
}

pub fn try_lower(src: &str, ids: &mut NodeIdGen) -> Result<Module, ParseError> {
    init_tracing();
    let mut parser = tree_sitter::Parser::new();
    let language: tree_sitter::Language = tree_sitter_haskell::LANGUAGE.into();
    parser.set_language(&language).unwrap();
    let tree = parser.parse(src, None).unwrap();
    crate::lower::lower_module(tree.root_node(), src, "Main", ids)
}

pub fn lower_source(src: &str) -> Module {
    try_lower(src, &mut NodeIdGen::default()).unwrap()
}

pub fn rules_for<'a>(analysis: &'a Analysis, head_name: &str) -> Vec<&'a Rule> {
    analysis
        .rules
        .iter()
        .filter(|r| r.head.name == head_name)
        .collect()
}

pub fn bodies(rules: &[&Rule]) -> Vec<String> {
    rules.iter().map(|r| r.body.to_string()).collect()
}

pub fn any_body_contains(analysis: &Analysis, needle: &str) -> bool {
    analysis
        .rules
        .iter()
        .any(|r| r.body.to_string().contains(needle))
}
