//! The Herbrand term algebra constraint rules are written in, plus the
//! well-known variables and helper shapes every emission site agrees on.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LTerm {
    Var(String),
    Atom(String),
    Struct { functor: String, args: Vec<LTerm> },
    List(Vec<LTerm>),
}

impl LTerm {
    pub fn var(name: impl Into<String>) -> Self {
        Self::Var(name.into())
    }

    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(name.into())
    }

    pub fn app(functor: impl Into<String>, args: Vec<LTerm>) -> Self {
        Self::Struct {
            functor: functor.into(),
            args,
        }
    }
}

/// `T`, the type of the current rule head.
pub fn head_var() -> LTerm {
    LTerm::var("T")
}

/// `Calls_`, the call-chain tail threaded through every function reference.
pub fn calls_var() -> LTerm {
    LTerm::var("Calls_")
}

/// `Zeta`, the captured-argument prefix asserted for nested references.
pub fn zeta_var() -> LTerm {
    LTerm::var("Zeta")
}

/// `_Classes`, the solver-side class store consulted by [`has_class`].
fn classes_var() -> LTerm {
    LTerm::var("_Classes")
}

/// The anonymous variable.
pub fn wildcard() -> LTerm {
    LTerm::var("_")
}

/// `eq(a, b)`, pretty-printed infix.
pub fn unify(a: LTerm, b: LTerm) -> LTerm {
    LTerm::app("eq", vec![a, b])
}

/// `all_equal([t, ...])`.
pub fn unify_all(terms: Vec<LTerm>) -> LTerm {
    LTerm::app("all_equal", vec![LTerm::List(terms)])
}

pub fn once(term: LTerm) -> LTerm {
    LTerm::app("once", vec![term])
}

/// `once(member(with(class, v), _Classes))`.
pub fn has_class(v: LTerm, class_name: &str) -> LTerm {
    once(LTerm::app(
        "member",
        vec![
            LTerm::app("with", vec![LTerm::atom(class_name), v]),
            classes_var(),
        ],
    ))
}

/// Left-nested pair spine: `pair(a, [b, c])` is `pair(pair(a, b), c)`.
pub fn pair(first: LTerm, rest: impl IntoIterator<Item = LTerm>) -> LTerm {
    rest.into_iter()
        .fold(first, |acc, t| LTerm::app("pair", vec![acc, t]))
}

/// `pair(list, elem)`.
pub fn list_of(elem: LTerm) -> LTerm {
    pair(LTerm::atom("list"), [elem])
}

/// Right-associative function shape over nested pairs:
/// `a -> b -> c` is `pair(pair(function, a), pair(pair(function, b), c))`.
/// With no parameters the result is returned unchanged.
pub fn fun_of(params: Vec<LTerm>, result: LTerm) -> LTerm {
    params
        .into_iter()
        .rev()
        .fold(result, |acc, p| pair(pair(LTerm::atom("function"), [p]), [acc]))
}

/// Left-associative tuple shape headed by the `tuple` atom:
/// `(a, b, c)` is `pair(pair(pair(tuple, a), b), c)`.
pub fn tuple_of(first: LTerm, rest: impl IntoIterator<Item = LTerm>) -> LTerm {
    rest.into_iter()
        .fold(pair(LTerm::atom("tuple"), [first]), |acc, t| pair(acc, [t]))
}

impl fmt::Display for LTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LTerm::Var(value) | LTerm::Atom(value) => write!(f, "{value}"),
            LTerm::Struct { functor, args } if functor == "eq" && args.len() == 2 => {
                write!(f, "{} = {}", args[0], args[1])
            }
            LTerm::Struct { functor, args } => {
                write!(f, "{functor}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            LTerm::List(elems) => {
                write!(f, "[")?;
                for (i, elem) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{elem}")?;
                }
                write!(f, "]")
            }
        }
    }
}
