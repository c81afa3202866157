//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use std::{ io, ops::Range, path::PathBuf };
use thiserror::Error;

/// Returned when a function is called with the wrong number of arguments.
#[derive(Debug, Error)]
#[error("{name}() takes {expected} argument(s) but {got} were given")]
pub struct ArityError {
    pub name: String,
    pub expected: String,
    pub got: usize,
}

impl ArityError {
    pub(crate) fn check(name: &str, min: usize, max: usize, got: usize)
        -> Result<(), Self>
    {
        let expected
            = if min == max {
                min.to_string()
            } else if max == usize::MAX {
                format!("at least {min}")
            } else {
                format!("{min} to {max}")
            };
        (min..=max).contains(&got).then_some(())
            .ok_or(Self { name: name.to_string(), expected, got })
    }
}

/// Returned from the expression lexer, parser, and interpreter.
#[derive(Debug, Error)]
pub enum ExprError {
    /// Returned when the lexer encounters a character sequence that isn't part
    /// of the expression language.
    #[error("unrecognized input '{text}' at {}..{}", .span.start, .span.end)]
    Lex { text: String, span: Range<usize> },

    /// Returned when a token appears where the grammar doesn't allow it.
    #[error("expected {expected} at {}..{}; found '{found}'", .span.start, .span.end)]
    Syntax { expected: &'static str, found: String, span: Range<usize> },

    /// Returned when an expression ends early.
    #[error("unexpected end of expression; expected {0}")]
    Eof(&'static str),

    /// Returned when a name is resolved in neither the local scope, the
    /// parameter environment, nor the built-ins.
    #[error("name '{0}' is not defined")]
    Undefined(String),

    /// Returned when an attribute access misses.
    #[error("'{0}' has no attribute '{1}'")]
    NoAttribute(&'static str, String),

    /// Returned when a binary operator is applied to unsupported operands.
    #[error("unsupported operand type(s) for {op}: '{lhs}' and '{rhs}'")]
    Operands { op: &'static str, lhs: &'static str, rhs: &'static str },

    /// Returned when a unary operator is applied to an unsupported operand.
    #[error("bad operand type for unary {op}: '{ty}'")]
    Operand { op: &'static str, ty: &'static str },

    /// Returned when a value has the wrong type for its context.
    #[error("expected {expected}; got '{got}'")]
    Type { expected: &'static str, got: &'static str },

    /// Returned when calling a value that isn't a function.
    #[error("'{0}' object is not callable")]
    NotCallable(&'static str),

    /// Returned when subscripting past the end of a sequence.
    #[error("index {index} out of range for sequence of length {len}")]
    Index { index: i64, len: usize },

    #[error("division by zero")]
    ZeroDivision,

    /// Returned when an expression is nested, or a function recurses, past
    /// the given depth.
    #[error("maximum recursion depth of {0} exceeded")]
    TooDeep(usize),

    /// [`ArityError`]
    #[error("{0}")]
    Arity(#[from] ArityError),
}

pub type ExprResult<T> = Result<T, ExprError>;

/// Returned from loading, compiling, and evaluating a
/// [`Potential`][crate::Potential].
#[derive(Debug, Error)]
pub enum PotError {
    /// Returned when the configuration file can't be read.
    #[error("cannot read potential configuration '{}': {source}", .path.display())]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Returned when the configuration file isn't valid section/key-value
    /// text.
    #[error("malformed potential configuration '{}': {source}", .path.display())]
    ConfigSyntax {
        path: PathBuf,
        #[source]
        source: ini::ParseError,
    },

    /// Returned when a section appears more than once in the configuration.
    #[error("section [{section}] appears more than once in '{}'", .path.display())]
    DuplicateSection { path: PathBuf, section: String },

    /// Returned when a key appears more than once within a section.
    #[error("key '{key}' appears more than once in section [{section}] of '{}'", .path.display())]
    DuplicateKey { path: PathBuf, section: String, key: String },

    /// Returned when a parameter is asked for as a number but holds something
    /// else.
    #[error("parameter '{name}' is not a number; got '{got}'")]
    NotNumeric { name: String, got: &'static str },

    /// Returned when the configuration has no `[regions]` section.
    #[error("[regions] is required to define a potential ('{}')", .0.display())]
    MissingRegions(PathBuf),

    /// Returned when a region entry isn't of the form `<domain>|<value>`.
    #[error("region '{label}' must be of the form '<domain>|<value>'; got '{spec}'")]
    MalformedRegion { label: String, spec: String },

    /// Returned when a region's domain doesn't evaluate to a pair of numbers.
    #[error("domain of region '{label}' must be a pair of numbers; got {got}")]
    BadDomain { label: String, got: String },

    /// Returned when a region's value is neither a number nor a function.
    #[error("value of region '{label}' must be a number or a unary function; got {got}")]
    BadRule { label: String, got: String },

    /// Returned when a parameter, domain, or value expression fails to parse
    /// or evaluate.
    #[error("cannot evaluate {what} '{text}': {source}")]
    Expr {
        what: String,
        text: String,
        #[source]
        source: ExprError,
    },

    /// Returned when the potential is queried with something that is neither
    /// a number nor a sequence of numbers.
    #[error("only numbers and sequences of numbers can be evaluated by the potential; got '{0}'")]
    InvalidInput(&'static str),

    /// Returned when asking for a parameter that isn't defined.
    #[error("'{name}' is not a parameter of the potential defined in '{}'", .path.display())]
    UnknownAttribute { name: String, path: PathBuf },

    /// Returned when a region's function fails at a particular point.
    #[error("region '{label}' failed at x = {x}: {source}")]
    Rule {
        label: String,
        x: f64,
        #[source]
        source: ExprError,
    },
}

impl PotError {
    pub(crate) fn expr<W, T>(what: W, text: T) -> impl FnOnce(ExprError) -> Self
    where
        W: Into<String>,
        T: Into<String>,
    {
        move |source| Self::Expr { what: what.into(), text: text.into(), source }
    }
}

pub type PotResult<T> = Result<T, PotError>;
