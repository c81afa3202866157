//! The [`Potential`] aggregate: a configuration's parameters together with its
//! compiled regions.
//!
//! ```
//! use xpotential::Potential;
//!
//! let mut pot = Potential::from_str("\
//! [parameters]
//! a = 2.
//! w = 1.
//! v0 = 15.
//!
//! [regions]
//! left = (-a, -w)|v0
//! right = (w, a)|v0
//! ").unwrap();
//! assert_eq!(pot.eval(1.5).unwrap(), 15.0);
//!
//! pot.adjust([("v0", 10.0)]).unwrap();
//! assert_eq!(pot.eval(1.5).unwrap(), 10.0);
//! assert_eq!(pot.param_f64("v0").unwrap(), 10.0);
//! ```

use std::{
    path::{ Path, PathBuf },
    sync::Arc,
};
use ndarray as nd;
use num_traits::ToPrimitive;
use tracing::warn;
use crate::{
    config::{ Config, MEMORY_PATH },
    error::{ PotError, PotResult },
    eval::Params,
    region::RegionTable,
    value::Value,
    Arr1,
};

/// Output of [`Potential::call`].
#[derive(Clone, Debug, PartialEq)]
pub enum Sampled {
    Scalar(f64),
    Array(nd::Array1<f64>),
}

impl Sampled {
    pub fn len(&self) -> usize {
        match self {
            Self::Scalar(_) => 1,
            Self::Array(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::Scalar(v) => Some(*v),
            Self::Array(_) => None,
        }
    }

    pub fn array(&self) -> Option<&nd::Array1<f64>> {
        match self {
            Self::Scalar(_) => None,
            Self::Array(v) => Some(v),
        }
    }
}

/// A one-dimensional potential defined piecewise over a set of regions.
///
/// Parameter values are fixed at construction time and changed only through
/// [`adjust`][Self::adjust], which recompiles every region against the new
/// values.
#[derive(Clone, Debug)]
pub struct Potential {
    config: Config,
    params: Arc<Params>,
    regions: RegionTable,
}

impl Potential {
    /// Read and compile the configuration at `path`.
    pub fn new<P>(path: P) -> PotResult<Self>
    where P: AsRef<Path>
    {
        Self::compile(Config::read(path)?)
    }

    /// Compile a configuration held in memory.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> PotResult<Self> {
        Self::compile(Config::parse(text, PathBuf::from(MEMORY_PATH))?)
    }

    fn compile(config: Config) -> PotResult<Self> {
        let params = Arc::new(config.eval_params()?);
        let regions = config.compile_regions(&params)?;
        Ok(Self { config, params, regions })
    }

    /// Where the configuration came from: the file's canonical path if it could
    /// be resolved, the path as given otherwise, or `<memory>` for
    /// configurations built with [`from_str`][Self::from_str].
    pub fn path(&self) -> &Path { &self.config.path }

    /// The parameter environment.
    pub fn params(&self) -> &Params { &self.params }

    /// The compiled regions.
    pub fn regions(&self) -> &RegionTable { &self.regions }

    /// Look up a parameter by name.
    pub fn param(&self, name: &str) -> PotResult<&Value> {
        self.params.get(name)
            .ok_or_else(|| PotError::UnknownAttribute {
                name: name.to_string(),
                path: self.config.path.clone(),
            })
    }

    /// Look up a numerical parameter by name.
    pub fn param_f64(&self, name: &str) -> PotResult<f64> {
        let value = self.param(name)?;
        value.as_num()
            .ok_or_else(|| PotError::NotNumeric {
                name: name.to_string(),
                got: value.type_name(),
            })
    }

    /// Evaluate the potential at a single point.
    ///
    /// The first region whose domain contains `x` supplies the value; points
    /// outside every region give [`DEF_VALUE`][crate::DEF_VALUE].
    pub fn eval(&self, x: f64) -> PotResult<f64> {
        self.regions.eval(x)
    }

    /// Evaluate the potential at every point of `x`.
    pub fn eval_array<S, A>(&self, x: &Arr1<S>) -> PotResult<nd::Array1<f64>>
    where
        S: nd::Data<Elem = A>,
        A: ToPrimitive,
    {
        x.iter()
            .map(|xk| {
                xk.to_f64()
                    .ok_or(PotError::InvalidInput("non-float number"))
                    .and_then(|xk| self.eval(xk))
            })
            .collect()
    }

    /// Evaluate the potential at a dynamically typed argument: a number gives
    /// a number, a flat sequence of numbers gives an array of the same length,
    /// and anything else is an error.
    pub fn call(&self, x: &Value) -> PotResult<Sampled> {
        match x {
            Value::Num(xk) => self.eval(*xk).map(Sampled::Scalar),
            Value::Seq(items) => {
                items.iter()
                    .map(|item| match item {
                        Value::Num(xk) => self.eval(*xk),
                        other => Err(PotError::InvalidInput(other.type_name())),
                    })
                    .collect::<PotResult<nd::Array1<f64>>>()
                    .map(Sampled::Array)
            },
            other => Err(PotError::InvalidInput(other.type_name())),
        }
    }

    /// Evaluate the potential on `n` evenly spaced points from `start` to
    /// `end`, inclusive, returning the points and the values.
    pub fn sample(&self, start: f64, end: f64, n: usize)
        -> PotResult<(nd::Array1<f64>, nd::Array1<f64>)>
    {
        let x: nd::Array1<f64> = nd::Array1::linspace(start, end, n);
        let v = self.eval_array(&x)?;
        Ok((x, v))
    }

    /// Overwrite parameter values and recompile every region.
    ///
    /// Names that aren't already parameters are reported with a warning and
    /// skipped. The update is all-or-nothing: if any region fails to compile
    /// with the new values, the error is returned and the potential is left
    /// as it was.
    pub fn adjust<I, K, V>(&mut self, changes: I) -> PotResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<Value>,
    {
        let mut params: Params = (*self.params).clone();
        for (name, value) in changes.into_iter() {
            let name = name.as_ref();
            if params.contains(name) {
                params.insert(name, value.into());
            } else {
                warn!(
                    parameter = name,
                    path = %self.config.path.display(),
                    "not a valid parameter; ignoring"
                );
            }
        }
        let params = Arc::new(params);
        let regions = self.config.compile_regions(&params)?;
        self.params = params;
        self.regions = regions;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExprError;

    const KRONIG_PENNEY: &str = "\
[parameters]
l = 1.
w = 0.25
v0 = 10.
n = 3

[regions]
lattice = (-n * l, n * l)|lambda x: v0 if x % l < w else 0.
";

    #[test]
    fn periodic_function_rule() {
        let pot = Potential::from_str(KRONIG_PENNEY).unwrap();
        assert_eq!(pot.eval(0.1).unwrap(), 10.0);
        assert_eq!(pot.eval(0.5).unwrap(), 0.0);
        assert_eq!(pot.eval(-0.9).unwrap(), 10.0);
        assert_eq!(pot.eval(2.1).unwrap(), 10.0);
        assert_eq!(pot.eval(3.1).unwrap(), 0.0);
    }

    #[test]
    fn unknown_parameters_are_skipped() {
        let mut pot = Potential::from_str(KRONIG_PENNEY).unwrap();
        pot.adjust([("bogus", 1.0), ("v0", 2.0)]).unwrap();
        assert!(!pot.params().contains("bogus"));
        assert!(matches!(pot.param("bogus"), Err(PotError::UnknownAttribute { .. })));
        assert_eq!(pot.eval(0.1).unwrap(), 2.0);
    }

    #[test]
    fn failed_adjust_leaves_potential_unchanged() {
        let mut pot = Potential::from_str(KRONIG_PENNEY).unwrap();
        let before = pot.regions().clone();
        let err = pot.adjust([("l", "wide")]).unwrap_err();
        assert!(matches!(err, PotError::Expr { .. }));
        assert_eq!(pot.param_f64("l").unwrap(), 1.0);
        assert_eq!(pot.regions(), &before);
        assert_eq!(pot.eval(0.1).unwrap(), 10.0);
    }

    #[test]
    fn numeric_parameters() {
        let pot = Potential::from_str(
            "[parameters]\nv0 = 2.\nname = 'well'\n[regions]\nr = (0, 1)|v0\n"
        ).unwrap();
        assert_eq!(pot.param_f64("v0").unwrap(), 2.0);
        assert!(matches!(
            pot.param_f64("name"),
            Err(PotError::NotNumeric { name, got: "str" }) if name == "name"
        ));
        assert!(matches!(pot.param_f64("w"), Err(PotError::UnknownAttribute { .. })));
        assert_eq!(pot.path(), Path::new(MEMORY_PATH));
    }

    #[test]
    fn runaway_expressions_are_errors() {
        let deep = format!(
            "[regions]\nr = (0, 1)|{}1.{}\n",
            "(".repeat(200),
            ")".repeat(200),
        );
        assert!(matches!(
            Potential::from_str(&deep),
            Err(PotError::Expr { source: ExprError::TooDeep(_), .. })
        ));
        assert!(matches!(
            Potential::from_str("[regions]\nr = (0, 1)|(lambda f: f(f))(lambda f: f(f))\n"),
            Err(PotError::Expr { source: ExprError::TooDeep(_), .. })
        ));
        let pot = Potential::from_str(
            "[regions]\nr = (0, 1)|lambda x: (lambda f: f(f))(lambda f: f(f))\n"
        ).unwrap();
        assert!(matches!(
            pot.eval(0.5),
            Err(PotError::Rule { source: ExprError::TooDeep(_), .. })
        ));
    }

    #[test]
    fn integer_arrays() {
        let pot = Potential::from_str(KRONIG_PENNEY).unwrap();
        let x: nd::Array1<i32> = nd::array![-4, 0, 1, 4];
        assert_eq!(pot.eval_array(&x).unwrap(), nd::array![0.0, 10.0, 10.0, 0.0]);
    }

    #[test]
    fn dynamic_calls() {
        let pot = Potential::from_str(KRONIG_PENNEY).unwrap();
        assert_eq!(pot.call(&Value::Num(0.1)).unwrap(), Sampled::Scalar(10.0));
        let v = pot.call(&Value::from(vec![0.1, 0.5])).unwrap();
        assert_eq!(v.array(), Some(&nd::array![10.0, 0.0]));
        assert!(matches!(pot.call(&Value::from("a")), Err(PotError::InvalidInput("str"))));
        assert!(matches!(pot.call(&Value::Bool(true)), Err(PotError::InvalidInput("bool"))));
        let nested = Value::Seq(vec![Value::from(vec![0.1])]);
        assert!(matches!(pot.call(&nested), Err(PotError::InvalidInput("sequence"))));
    }
}
