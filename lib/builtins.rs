//! The fixed set of functions, constants, and namespaces available to every
//! expression.
//!
//! Globals: `abs`, `min`, `max`, `float`, `int`, `round`, `pow`, and the
//! namespaces `numpy` (alias `np`), `math`, and `operator`. Parameters with the
//! same name take precedence over any of these.

use std::f64::consts;
use crate::{
    error::{ ArityError, ExprError, ExprResult },
    parser::{ BinOp, CmpOp },
    value::Value,
};

/// A built-in namespace, reachable through attribute access.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Namespace {
    Numpy,
    Math,
    Operator,
}

impl Namespace {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Numpy => "numpy",
            Self::Math => "math",
            Self::Operator => "operator",
        }
    }

    /// Resolve `self.<name>`.
    pub fn attr(&self, name: &str) -> Option<Value> {
        use Builtin::*;
        let constant
            = match (self, name) {
                (Self::Numpy | Self::Math, "pi") => Some(consts::PI),
                (Self::Numpy | Self::Math, "e") => Some(consts::E),
                (Self::Numpy | Self::Math, "inf") => Some(f64::INFINITY),
                (Self::Numpy | Self::Math, "nan") => Some(f64::NAN),
                (Self::Math, "tau") => Some(consts::TAU),
                _ => None,
            };
        if let Some(x) = constant { return Some(Value::Num(x)); }
        let func
            = match (self, name) {
                (Self::Numpy | Self::Math, "sqrt") => Sqrt,
                (Self::Numpy | Self::Math, "exp") => Exp,
                (Self::Numpy | Self::Math, "log") => Log,
                (Self::Numpy | Self::Math, "log10") => Log10,
                (Self::Numpy | Self::Math, "sin") => Sin,
                (Self::Numpy | Self::Math, "cos") => Cos,
                (Self::Numpy | Self::Math, "tan") => Tan,
                (Self::Numpy, "arcsin") | (Self::Math, "asin") => Asin,
                (Self::Numpy, "arccos") | (Self::Math, "acos") => Acos,
                (Self::Numpy, "arctan") | (Self::Math, "atan") => Atan,
                (Self::Numpy, "arctan2") | (Self::Math, "atan2") => Atan2,
                (Self::Numpy | Self::Math, "sinh") => Sinh,
                (Self::Numpy | Self::Math, "cosh") => Cosh,
                (Self::Numpy | Self::Math, "tanh") => Tanh,
                (Self::Numpy | Self::Math, "floor") => Floor,
                (Self::Numpy | Self::Math, "ceil") => Ceil,
                (Self::Numpy, "abs" | "absolute") | (Self::Math, "fabs") => Abs,
                (Self::Numpy, "sign") => Sign,
                (Self::Numpy, "power") | (Self::Math, "pow") => Pow,
                (Self::Numpy, "where") => Where,
                (Self::Numpy, "heaviside") => Heaviside,
                (Self::Numpy, "minimum") => Min,
                (Self::Numpy, "maximum") => Max,
                (Self::Operator, "lt") => Cmp(CmpOp::Lt),
                (Self::Operator, "le") => Cmp(CmpOp::Le),
                (Self::Operator, "gt") => Cmp(CmpOp::Gt),
                (Self::Operator, "ge") => Cmp(CmpOp::Ge),
                (Self::Operator, "eq") => Cmp(CmpOp::Eq),
                (Self::Operator, "ne") => Cmp(CmpOp::Ne),
                (Self::Operator, "add") => Arith(BinOp::Add),
                (Self::Operator, "sub") => Arith(BinOp::Sub),
                (Self::Operator, "mul") => Arith(BinOp::Mul),
                (Self::Operator, "truediv") => Arith(BinOp::Div),
                (Self::Operator, "floordiv") => Arith(BinOp::FloorDiv),
                (Self::Operator, "mod") => Arith(BinOp::Mod),
                (Self::Operator, "pow") => Arith(BinOp::Pow),
                (Self::Operator, "neg") => Neg,
                (Self::Operator, "pos") => Pos,
                (Self::Operator, "abs") => Abs,
                (Self::Operator, "not_") => Not,
                (Self::Operator, "and_") => And,
                (Self::Operator, "or_") => Or,
                _ => { return None; },
            };
        Some(Value::Builtin(func))
    }
}

/// A built-in function.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Builtin {
    Abs,
    Min,
    Max,
    Float,
    Int,
    Round,
    Pow,
    Sqrt,
    Exp,
    Log,
    Log10,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Atan2,
    Sinh,
    Cosh,
    Tanh,
    Floor,
    Ceil,
    Sign,
    /// `where(cond, a, b)`
    Where,
    /// `heaviside(x, h0)`
    Heaviside,
    Cmp(CmpOp),
    Arith(BinOp),
    Neg,
    Pos,
    Not,
    And,
    Or,
}

/// Resolve a global built-in name.
pub fn global(name: &str) -> Option<Value> {
    let value
        = match name {
            "numpy" | "np" => Value::Namespace(Namespace::Numpy),
            "math" => Value::Namespace(Namespace::Math),
            "operator" => Value::Namespace(Namespace::Operator),
            "abs" => Value::Builtin(Builtin::Abs),
            "min" => Value::Builtin(Builtin::Min),
            "max" => Value::Builtin(Builtin::Max),
            "float" => Value::Builtin(Builtin::Float),
            "int" => Value::Builtin(Builtin::Int),
            "round" => Value::Builtin(Builtin::Round),
            "pow" => Value::Builtin(Builtin::Pow),
            _ => { return None; },
        };
    Some(value)
}

impl Builtin {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Abs => "abs",
            Self::Min => "min",
            Self::Max => "max",
            Self::Float => "float",
            Self::Int => "int",
            Self::Round => "round",
            Self::Pow => "pow",
            Self::Sqrt => "sqrt",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Log10 => "log10",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "arcsin",
            Self::Acos => "arccos",
            Self::Atan => "arctan",
            Self::Atan2 => "arctan2",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Sign => "sign",
            Self::Where => "where",
            Self::Heaviside => "heaviside",
            Self::Cmp(CmpOp::Lt) => "lt",
            Self::Cmp(CmpOp::Le) => "le",
            Self::Cmp(CmpOp::Gt) => "gt",
            Self::Cmp(CmpOp::Ge) => "ge",
            Self::Cmp(CmpOp::Eq) => "eq",
            Self::Cmp(CmpOp::Ne) => "ne",
            Self::Arith(BinOp::Add) => "add",
            Self::Arith(BinOp::Sub) => "sub",
            Self::Arith(BinOp::Mul) => "mul",
            Self::Arith(BinOp::Div) => "truediv",
            Self::Arith(BinOp::FloorDiv) => "floordiv",
            Self::Arith(BinOp::Mod) => "mod",
            Self::Arith(BinOp::Pow) => "pow",
            Self::Neg => "neg",
            Self::Pos => "pos",
            Self::Not => "not_",
            Self::And => "and_",
            Self::Or => "or_",
        }
    }

    /// Allowed argument counts, `(min, max)`.
    pub fn arity(&self) -> (usize, usize) {
        match self {
            Self::Min | Self::Max => (1, usize::MAX),
            Self::Round => (1, 2),
            Self::Pow | Self::Atan2 | Self::Heaviside
                | Self::Cmp(_) | Self::Arith(_) | Self::And | Self::Or => (2, 2),
            Self::Where => (3, 3),
            _ => (1, 1),
        }
    }

    /// Whether the function can be called with exactly one argument.
    pub fn is_unary(&self) -> bool {
        let (min, max) = self.arity();
        min <= 1 && 1 <= max
    }

    pub fn call(&self, args: &[Value]) -> ExprResult<Value> {
        let (min, max) = self.arity();
        ArityError::check(self.name(), min, max, args.len())?;
        let unary = |f: fn(f64) -> f64| -> ExprResult<Value> {
            Ok(Value::Num(f(args[0].expect_num()?)))
        };
        match self {
            Self::Abs => unary(f64::abs),
            Self::Float => unary(|x| x),
            Self::Int => unary(f64::trunc),
            Self::Sqrt => unary(f64::sqrt),
            Self::Exp => unary(f64::exp),
            Self::Log => unary(f64::ln),
            Self::Log10 => unary(f64::log10),
            Self::Sin => unary(f64::sin),
            Self::Cos => unary(f64::cos),
            Self::Tan => unary(f64::tan),
            Self::Asin => unary(f64::asin),
            Self::Acos => unary(f64::acos),
            Self::Atan => unary(f64::atan),
            Self::Sinh => unary(f64::sinh),
            Self::Cosh => unary(f64::cosh),
            Self::Tanh => unary(f64::tanh),
            Self::Floor => unary(f64::floor),
            Self::Ceil => unary(f64::ceil),
            Self::Sign => unary(|x| {
                if x.is_nan() { x } else if x == 0.0 { 0.0 } else { x.signum() }
            }),
            Self::Round => round(args),
            Self::Min | Self::Max => extremum(*self == Self::Max, args),
            Self::Pow => Value::binary(BinOp::Pow, &args[0], &args[1]),
            Self::Atan2 => {
                let y = args[0].expect_num()?;
                let x = args[1].expect_num()?;
                Ok(Value::Num(y.atan2(x)))
            },
            Self::Heaviside => {
                let x = args[0].expect_num()?;
                let h0 = args[1].expect_num()?;
                let h
                    = if x.is_nan() { x }
                    else if x < 0.0 { 0.0 }
                    else if x > 0.0 { 1.0 }
                    else { h0 };
                Ok(Value::Num(h))
            },
            Self::Where => {
                let pick = if args[0].truthy() { &args[1] } else { &args[2] };
                Ok(pick.clone())
            },
            Self::Cmp(op) => Value::compare(*op, &args[0], &args[1]).map(Value::Bool),
            Self::Arith(op) => Value::binary(*op, &args[0], &args[1]),
            Self::Neg => args[0].neg(),
            Self::Pos => args[0].pos(),
            Self::Not => Ok(Value::Bool(!args[0].truthy())),
            Self::And => {
                let a = args[0].expect_num()?;
                let b = args[1].expect_num()?;
                Ok(Value::Bool(a != 0.0 && b != 0.0))
            },
            Self::Or => {
                let a = args[0].expect_num()?;
                let b = args[1].expect_num()?;
                Ok(Value::Bool(a != 0.0 || b != 0.0))
            },
        }
    }
}

// round half to even
fn round(args: &[Value]) -> ExprResult<Value> {
    let x = args[0].expect_num()?;
    let scale
        = match args.get(1) {
            Some(nd) => 10.0_f64.powi(nd.expect_num()? as i32),
            None => 1.0,
        };
    let y = x * scale;
    let r = y.round();
    let r = if (y - y.trunc()).abs() == 0.5 { 2.0 * (y / 2.0).round() } else { r };
    Ok(Value::Num(r / scale))
}

fn extremum(max: bool, args: &[Value]) -> ExprResult<Value> {
    let items: &[Value]
        = match args {
            [Value::Seq(items)] => items.as_slice(),
            [single] => {
                return Err(ExprError::Type {
                    expected: "a sequence",
                    got: single.type_name(),
                });
            },
            many => many,
        };
    let mut best: Option<f64> = None;
    for item in items {
        let x = item.expect_num()?;
        best = Some(match best {
            Some(b) if (max && b >= x) || (!max && b <= x) => b,
            _ => x,
        });
    }
    best.map(Value::Num)
        .ok_or(ExprError::Type { expected: "a non-empty sequence", got: "sequence" })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(f: Builtin, args: &[f64]) -> Value {
        let args: Vec<Value> = args.iter().copied().map(Value::Num).collect();
        f.call(&args).unwrap()
    }

    #[test]
    fn namespaces_resolve() {
        assert_eq!(Namespace::Numpy.attr("pi"), Some(Value::Num(consts::PI)));
        assert_eq!(Namespace::Math.attr("asin"), Some(Value::Builtin(Builtin::Asin)));
        assert_eq!(
            Namespace::Operator.attr("lt"),
            Some(Value::Builtin(Builtin::Cmp(CmpOp::Lt))),
        );
        assert_eq!(Namespace::Operator.attr("pi"), None);
        assert_eq!(Namespace::Numpy.attr("asin"), None);
    }

    #[test]
    fn arity_is_checked() {
        assert!(matches!(
            Builtin::Sqrt.call(&[]),
            Err(ExprError::Arity(ArityError { got: 0, .. })),
        ));
        assert!(Builtin::Where.call(&[Value::Num(1.0)]).is_err());
    }

    #[test]
    fn round_half_to_even() {
        assert_eq!(call(Builtin::Round, &[2.5]), Value::Num(2.0));
        assert_eq!(call(Builtin::Round, &[3.5]), Value::Num(4.0));
        assert_eq!(call(Builtin::Round, &[-2.6]), Value::Num(-3.0));
        assert_eq!(call(Builtin::Round, &[1.25, 1.0]), Value::Num(1.2));
    }

    #[test]
    fn min_max() {
        assert_eq!(call(Builtin::Max, &[1.0, 3.0, 2.0]), Value::Num(3.0));
        assert_eq!(call(Builtin::Min, &[1.0, 3.0, -2.0]), Value::Num(-2.0));
        let seq = Value::from(vec![4.0, 5.0]);
        assert_eq!(Builtin::Max.call(&[seq]).unwrap(), Value::Num(5.0));
        assert!(Builtin::Max.call(&[Value::Num(1.0)]).is_err());
    }

    #[test]
    fn operator_helpers() {
        assert_eq!(call(Builtin::Cmp(CmpOp::Lt), &[1.0, 2.0]), Value::Bool(true));
        assert_eq!(call(Builtin::Arith(BinOp::Mul), &[3.0, 2.0]), Value::Num(6.0));
        assert_eq!(call(Builtin::Where, &[0.0, 1.0, 2.0]), Value::Num(2.0));
        assert_eq!(call(Builtin::Heaviside, &[0.0, 0.5]), Value::Num(0.5));
    }
}
