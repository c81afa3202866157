//! Tree-walking interpreter for parsed expressions, and the parameter
//! environment expressions are evaluated in.

use std::{ cell::Cell, collections::BTreeMap, ops::Index, sync::Arc };
use crate::{
    builtins,
    error::{ ArityError, ExprError, ExprResult },
    parser::{ parse, Expr, UnOp },
    value::{ Closure, Value },
};

/// Named parameter values; the namespace for region expressions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Params {
    vars: BTreeMap<String, Value>,
}

impl Params {
    pub fn new() -> Self { Self::default() }

    pub fn get(&self, name: &str) -> Option<&Value> { self.vars.get(name) }

    pub fn contains(&self, name: &str) -> bool { self.vars.contains_key(name) }

    /// Set a value, returning the previous one if present.
    pub fn insert<K>(&mut self, name: K, value: Value) -> Option<Value>
    where K: Into<String>
    {
        self.vars.insert(name.into(), value)
    }

    pub fn len(&self) -> usize { self.vars.len() }

    pub fn is_empty(&self) -> bool { self.vars.is_empty() }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl Index<&str> for Params {
    type Output = Value;

    /// *Panics if `name` is not present*.
    fn index(&self, name: &str) -> &Value {
        self.vars.get(name)
            .unwrap_or_else(|| panic!("no parameter named '{name}'"))
    }
}

impl<K> FromIterator<(K, Value)> for Params
where K: Into<String>
{
    fn from_iter<I>(iter: I) -> Self
    where I: IntoIterator<Item = (K, Value)>
    {
        Self { vars: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

/// Maximum depth of evaluation, counting both nested subexpressions and
/// function calls.
pub const MAX_DEPTH: usize = 200;

/// Parse and evaluate `src` in `env`.
pub fn eval_str(src: &str, env: &Arc<Params>) -> ExprResult<Value> {
    evaluate(&parse(src)?, env)
}

/// Evaluate a parsed expression in `env`.
pub fn evaluate(expr: &Expr, env: &Arc<Params>) -> ExprResult<Value> {
    Frame { env, locals: &[], depth: &Cell::new(0) }.eval(expr)
}

impl Value {
    /// Call a function value.
    pub fn call(&self, args: Vec<Value>) -> ExprResult<Value> {
        self.call_at(args, &Cell::new(0))
    }

    fn call_at(&self, args: Vec<Value>, depth: &Cell<usize>)
        -> ExprResult<Value>
    {
        match self {
            Self::Func(closure) => {
                let params = &closure.def.params;
                ArityError::check("<lambda>", params.len(), params.len(), args.len())?;
                let locals: Vec<(String, Value)>
                    = params.iter().cloned().zip(args).collect();
                Frame { env: &closure.env, locals: &locals, depth }
                    .eval(&closure.def.body)
            },
            Self::Builtin(func) => func.call(&args),
            other => Err(ExprError::NotCallable(other.type_name())),
        }
    }
}

// name resolution: lambda locals, then parameters, then built-ins; `depth` is
// shared by every frame of one top-level evaluation
struct Frame<'a> {
    env: &'a Arc<Params>,
    locals: &'a [(String, Value)],
    depth: &'a Cell<usize>,
}

impl<'a> Frame<'a> {
    fn lookup(&self, name: &str) -> ExprResult<Value> {
        self.locals.iter().rev()
            .find(|(local, _)| local == name)
            .map(|(_, value)| value.clone())
            .or_else(|| self.env.get(name).cloned())
            .or_else(|| builtins::global(name))
            .ok_or_else(|| ExprError::Undefined(name.to_string()))
    }

    // closures see the environment as it is now, including enclosing locals
    fn capture(&self) -> Arc<Params> {
        if self.locals.is_empty() {
            Arc::clone(self.env)
        } else {
            let mut env: Params = (**self.env).clone();
            self.locals.iter()
                .for_each(|(name, value)| { env.insert(name.as_str(), value.clone()); });
            Arc::new(env)
        }
    }

    fn eval_all(&self, exprs: &[Expr]) -> ExprResult<Vec<Value>> {
        exprs.iter().map(|expr| self.eval(expr)).collect()
    }

    fn eval(&self, expr: &Expr) -> ExprResult<Value> {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH { return Err(ExprError::TooDeep(MAX_DEPTH)); }
        self.depth.set(depth + 1);
        let value = self.eval_node(expr);
        self.depth.set(depth);
        value
    }

    fn eval_node(&self, expr: &Expr) -> ExprResult<Value> {
        match expr {
            Expr::Num(x) => Ok(Value::Num(*x)),
            Expr::Bool(b) => Ok(Value::Bool(*b)),
            Expr::Str(s) => Ok(Value::Str(s.clone())),
            Expr::None => Ok(Value::None),
            Expr::Name(name) => self.lookup(name),
            Expr::Tuple(items) | Expr::List(items)
                => self.eval_all(items).map(Value::Seq),
            Expr::Attr(base, name) => self.eval(base)?.attr(name),
            Expr::Index(base, idx) => {
                let base = self.eval(base)?;
                let idx = self.eval(idx)?;
                base.index(&idx)
            },
            Expr::Call(func, args) => {
                let func = self.eval(func)?;
                let args = self.eval_all(args)?;
                func.call_at(args, self.depth)
            },
            Expr::Unary(op, operand) => {
                let operand = self.eval(operand)?;
                match op {
                    UnOp::Neg => operand.neg(),
                    UnOp::Pos => operand.pos(),
                    UnOp::Not => Ok(Value::Bool(!operand.truthy())),
                }
            },
            Expr::Binary(op, lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                let rhs = self.eval(rhs)?;
                Value::binary(*op, &lhs, &rhs)
            },
            Expr::Compare(first, rest) => {
                let mut lhs = self.eval(first)?;
                for (op, rhs) in rest.iter() {
                    let rhs = self.eval(rhs)?;
                    if !Value::compare(*op, &lhs, &rhs)? {
                        return Ok(Value::Bool(false));
                    }
                    lhs = rhs;
                }
                Ok(Value::Bool(true))
            },
            Expr::And(lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                if lhs.truthy() { self.eval(rhs) } else { Ok(lhs) }
            },
            Expr::Or(lhs, rhs) => {
                let lhs = self.eval(lhs)?;
                if lhs.truthy() { Ok(lhs) } else { self.eval(rhs) }
            },
            Expr::IfElse { cond, then, otherwise } => {
                if self.eval(cond)?.truthy() {
                    self.eval(then)
                } else {
                    self.eval(otherwise)
                }
            },
            Expr::Lambda(def) => {
                Ok(Value::Func(Closure { def: Arc::clone(def), env: self.capture() }))
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, f64)]) -> Arc<Params> {
        Arc::new(pairs.iter().map(|(k, v)| (*k, Value::Num(*v))).collect())
    }

    fn eval(src: &str, env: &Arc<Params>) -> Value {
        eval_str(src, env).unwrap()
    }

    #[test]
    fn arithmetic_with_parameters() {
        let env = env(&[("a", 2.0), ("w", 1.0)]);
        assert_eq!(eval("w + (a - w) / 2.", &env), Value::Num(1.5));
        assert_eq!(eval("-a**2", &env), Value::Num(-4.0));
        assert_eq!(eval("2**-1", &env), Value::Num(0.5));
    }

    #[test]
    fn domains_are_pairs() {
        let env = env(&[("a", 2.0), ("w", 1.0)]);
        assert_eq!(eval("-a, -w", &env), Value::from(vec![-2.0, -1.0]));
        assert_eq!(eval("(w, a)", &env), Value::from(vec![1.0, 2.0]));
    }

    #[test]
    fn lambdas_close_over_parameters() {
        let env = env(&[("v0", 15.0)]);
        let f = eval("lambda x: v0 * x", &env);
        assert_eq!(f.call(vec![Value::Num(2.0)]).unwrap(), Value::Num(30.0));
        assert!(matches!(
            f.call(vec![]),
            Err(ExprError::Arity(ArityError { got: 0, .. })),
        ));
    }

    #[test]
    fn closure_environment_is_a_snapshot() {
        let before = env(&[("v0", 1.0)]);
        let f = eval("lambda x: v0", &before);
        let after = env(&[("v0", 2.0)]);
        let g = eval("lambda x: v0", &after);
        assert_eq!(f.call(vec![Value::Num(0.0)]).unwrap(), Value::Num(1.0));
        assert_eq!(g.call(vec![Value::Num(0.0)]).unwrap(), Value::Num(2.0));
    }

    #[test]
    fn nested_lambdas_capture_locals() {
        let env = env(&[]);
        let adder = eval("lambda a: lambda b: a + b", &env);
        let add2 = adder.call(vec![Value::Num(2.0)]).unwrap();
        assert_eq!(add2.call(vec![Value::Num(3.0)]).unwrap(), Value::Num(5.0));
    }

    #[test]
    fn namespaces_and_operators() {
        let env = env(&[("v0", 3.0)]);
        assert_eq!(eval("numpy.sqrt(4.)", &env), Value::Num(2.0));
        assert_eq!(eval("np.pi", &env), Value::Num(std::f64::consts::PI));
        assert_eq!(eval("operator.lt(1, 2)", &env), Value::Bool(true));
        assert_eq!(
            eval("(lambda x: numpy.where(operator.lt(x, 0.5), v0, 0.))(0.2)", &env),
            Value::Num(3.0),
        );
    }

    #[test]
    fn parameters_shadow_builtins() {
        let env = Arc::new(Params::from_iter([("abs", Value::Num(7.0))]));
        assert_eq!(eval("abs", &env), Value::Num(7.0));
    }

    #[test]
    fn short_circuit_and_chains() {
        let env = env(&[("x", 0.5)]);
        assert_eq!(eval("0 < x < 1", &env), Value::Bool(true));
        assert_eq!(eval("0 < x > 1", &env), Value::Bool(false));
        assert_eq!(eval("0 and undefined_name", &env), Value::Num(0.0));
        assert_eq!(eval("x or undefined_name", &env), Value::Num(0.5));
        assert_eq!(eval("1 if x > 0 else 2", &env), Value::Num(1.0));
        assert_eq!(eval("not x", &env), Value::Bool(false));
    }

    #[test]
    fn resolution_errors() {
        let env = env(&[]);
        assert!(matches!(eval_str("q", &env), Err(ExprError::Undefined(n)) if n == "q"));
        assert!(matches!(
            eval_str("numpy.nope", &env),
            Err(ExprError::NoAttribute("numpy", _)),
        ));
        assert!(matches!(eval_str("2(3)", &env), Err(ExprError::NotCallable("float"))));
    }

    #[test]
    fn recursion_is_bounded() {
        let env = env(&[]);
        assert!(matches!(
            eval_str("(lambda f: f(f))(lambda f: f(f))", &env),
            Err(ExprError::TooDeep(MAX_DEPTH)),
        ));

        let fact = "(lambda f, n: f(f, n))(lambda f, n: 1 if n <= 1 else n * f(f, n - 1), 10)";
        assert_eq!(eval(fact, &env), Value::Num(3628800.0));

        let long_sum = vec!["1"; 1000].join(" + ");
        assert!(matches!(eval_str(&long_sum, &env), Err(ExprError::TooDeep(_))));

        let f = eval("lambda x: x", &env);
        assert_eq!(f.call(vec![Value::Num(1.0)]).unwrap(), Value::Num(1.0));
    }
}
