//! Dynamically typed values produced by expressions.

use std::{ fmt, sync::Arc };
use crate::{
    builtins::{ Builtin, Namespace },
    error::{ ExprError, ExprResult },
    eval::Params,
    parser::{ BinOp, CmpOp, LambdaDef },
};

/// A `lambda` together with the environment it was created in.
#[derive(Clone, Debug)]
pub struct Closure {
    pub(crate) def: Arc<LambdaDef>,
    pub(crate) env: Arc<Params>,
}

impl Closure {
    /// Number of parameters the function takes.
    pub fn arity(&self) -> usize { self.def.params.len() }
}

/// Result of evaluating an expression.
#[derive(Clone, Debug)]
pub enum Value {
    None,
    Bool(bool),
    Num(f64),
    Str(String),
    /// Tuple or list.
    Seq(Vec<Value>),
    Func(Closure),
    Builtin(Builtin),
    Namespace(Namespace),
}

impl Value {
    /// Name of the value's type, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::None => "NoneType",
            Self::Bool(_) => "bool",
            Self::Num(_) => "float",
            Self::Str(_) => "str",
            Self::Seq(_) => "sequence",
            Self::Func(_) => "function",
            Self::Builtin(_) => "builtin_function",
            Self::Namespace(_) => "module",
        }
    }

    /// Numeric view of the value; booleans count as `0` and `1`.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Self::Num(x) => Some(*x),
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub(crate) fn expect_num(&self) -> ExprResult<f64> {
        self.as_num()
            .ok_or(ExprError::Type { expected: "a number", got: self.type_name() })
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Self::Func(_) | Self::Builtin(_))
    }

    pub fn truthy(&self) -> bool {
        match self {
            Self::None => false,
            Self::Bool(b) => *b,
            Self::Num(x) => *x != 0.0,
            Self::Str(s) => !s.is_empty(),
            Self::Seq(items) => !items.is_empty(),
            Self::Func(_) | Self::Builtin(_) | Self::Namespace(_) => true,
        }
    }

    /// Look up an attribute; only namespaces have any.
    pub fn attr(&self, name: &str) -> ExprResult<Value> {
        match self {
            Self::Namespace(ns) => ns.attr(name)
                .ok_or_else(|| ExprError::NoAttribute(ns.name(), name.to_string())),
            other => Err(ExprError::NoAttribute(other.type_name(), name.to_string())),
        }
    }

    /// Subscript a sequence; negative indices count from the end.
    pub fn index(&self, idx: &Value) -> ExprResult<Value> {
        let Self::Seq(items) = self else {
            return Err(ExprError::Type { expected: "a sequence", got: self.type_name() });
        };
        let i = idx.expect_num()?;
        let len = items.len();
        let k = i as i64;
        if k as f64 != i {
            return Err(ExprError::Type { expected: "an integer index", got: "float" });
        }
        let pos = if k < 0 { k + len as i64 } else { k };
        usize::try_from(pos).ok()
            .and_then(|pos| items.get(pos))
            .cloned()
            .ok_or(ExprError::Index { index: k, len })
    }

    /// Apply a binary arithmetic operator.
    pub fn binary(op: BinOp, lhs: &Value, rhs: &Value) -> ExprResult<Value> {
        if let (Some(a), Some(b)) = (lhs.as_num(), rhs.as_num()) {
            return arith(op, a, b).map(Value::Num);
        }
        match (op, lhs, rhs) {
            (BinOp::Add, Self::Str(a), Self::Str(b))
                => Ok(Self::Str(format!("{a}{b}"))),
            (BinOp::Add, Self::Seq(a), Self::Seq(b))
                => Ok(Self::Seq(a.iter().chain(b).cloned().collect())),
            _ => Err(ExprError::Operands {
                op: op.symbol(),
                lhs: lhs.type_name(),
                rhs: rhs.type_name(),
            }),
        }
    }

    /// Apply a comparison operator.
    pub fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> ExprResult<bool> {
        match op {
            CmpOp::Eq => Ok(lhs == rhs),
            CmpOp::Ne => Ok(lhs != rhs),
            _ => {
                let ord
                    = match (lhs, rhs) {
                        (Self::Str(a), Self::Str(b)) => a.partial_cmp(b),
                        _ => match (lhs.as_num(), rhs.as_num()) {
                            (Some(a), Some(b)) => a.partial_cmp(&b),
                            _ => {
                                return Err(ExprError::Operands {
                                    op: op.symbol(),
                                    lhs: lhs.type_name(),
                                    rhs: rhs.type_name(),
                                });
                            },
                        },
                    };
                // NaN compares false against everything
                Ok(ord.is_some_and(|ord| match op {
                    CmpOp::Lt => ord.is_lt(),
                    CmpOp::Le => ord.is_le(),
                    CmpOp::Gt => ord.is_gt(),
                    CmpOp::Ge => ord.is_ge(),
                    CmpOp::Eq | CmpOp::Ne => unreachable!(),
                }))
            },
        }
    }

    pub fn neg(&self) -> ExprResult<Value> {
        self.as_num().map(|x| Self::Num(-x))
            .ok_or(ExprError::Operand { op: "-", ty: self.type_name() })
    }

    pub fn pos(&self) -> ExprResult<Value> {
        self.as_num().map(Self::Num)
            .ok_or(ExprError::Operand { op: "+", ty: self.type_name() })
    }
}

// floored division and modulo, matching the sign of the divisor
fn arith(op: BinOp, a: f64, b: f64) -> ExprResult<f64> {
    match op {
        BinOp::Add => Ok(a + b),
        BinOp::Sub => Ok(a - b),
        BinOp::Mul => Ok(a * b),
        BinOp::Div => {
            if b == 0.0 { return Err(ExprError::ZeroDivision); }
            Ok(a / b)
        },
        BinOp::FloorDiv => {
            if b == 0.0 { return Err(ExprError::ZeroDivision); }
            Ok((a / b).floor())
        },
        BinOp::Mod => {
            if b == 0.0 { return Err(ExprError::ZeroDivision); }
            let r = a % b;
            Ok(if r != 0.0 && (r < 0.0) != (b < 0.0) { r + b } else { r })
        },
        BinOp::Pow => {
            if a == 0.0 && b < 0.0 { return Err(ExprError::ZeroDivision); }
            if b.fract() == 0.0 && b.abs() <= i32::MAX as f64 {
                Ok(a.powi(b as i32))
            } else {
                Ok(a.powf(b))
            }
        },
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::None, Self::None) => true,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Seq(a), Self::Seq(b)) => a == b,
            (Self::Func(a), Self::Func(b))
                => Arc::ptr_eq(&a.def, &b.def) && Arc::ptr_eq(&a.env, &b.env),
            (Self::Builtin(a), Self::Builtin(b)) => a == b,
            (Self::Namespace(a), Self::Namespace(b)) => a == b,
            (a, b) => match (a.as_num(), b.as_num()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Self::Num(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "'{s}'"),
            Self::Seq(items) => {
                write!(f, "(")?;
                for (k, item) in items.iter().enumerate() {
                    if k > 0 { write!(f, ", ")?; }
                    write!(f, "{item}")?;
                }
                write!(f, ")")
            },
            Self::Func(closure) => {
                write!(f, "<lambda {}>", closure.def.params.join(", "))
            },
            Self::Builtin(b) => write!(f, "<built-in function {}>", b.name()),
            Self::Namespace(ns) => write!(f, "<module '{}'>", ns.name()),
        }
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self { Self::Num(x) }
}

impl From<i32> for Value {
    fn from(x: i32) -> Self { Self::Num(x.into()) }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self { Self::Bool(b) }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self { Self::Str(s.to_string()) }
}

impl From<String> for Value {
    fn from(s: String) -> Self { Self::Str(s) }
}

impl<T> From<Vec<T>> for Value
where T: Into<Value>
{
    fn from(items: Vec<T>) -> Self {
        Self::Seq(items.into_iter().map(Into::into).collect())
    }
}
