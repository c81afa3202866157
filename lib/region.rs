//! Compiled regions: half-open domains paired with the rule that gives the
//! potential's value inside them.
//!
//! Regions are kept in configuration order and searched front to back, so
//! where domains overlap the earliest region wins. A region whose domain is
//! identical to an earlier one replaces it in place.

use std::{ fmt, sync::Arc };
use tracing::debug;
use crate::{
    error::{ ExprResult, PotError, PotResult },
    eval::{ eval_str, Params },
    value::Value,
    DEF_VALUE,
};

/// Separator between the domain and value parts of a region entry.
pub const SEPARATOR: char = '|';

/// Half-open interval `[start, end)`.
///
/// `start < end` is expected but not enforced; an inverted domain simply
/// contains nothing.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Domain {
    pub start: f64,
    pub end: f64,
}

impl Domain {
    pub fn new(start: f64, end: f64) -> Self { Self { start, end } }

    /// `start <= x < end`
    pub fn contains(&self, x: f64) -> bool { self.start <= x && x < self.end }

    fn from_value(label: &str, value: &Value) -> PotResult<Self> {
        let bad = || PotError::BadDomain {
            label: label.to_string(),
            got: value.to_string(),
        };
        match value {
            Value::Seq(items) if items.len() == 2 => {
                let start = items[0].as_num().ok_or_else(bad)?;
                let end = items[1].as_num().ok_or_else(bad)?;
                Ok(Self { start, end })
            },
            _ => Err(bad()),
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// How the potential is computed inside a region.
#[derive(Clone, Debug, PartialEq)]
pub enum Rule {
    /// A fixed value.
    Constant(f64),
    /// A function of one argument, closed over the parameters as they were
    /// when the region was compiled.
    Function(Value),
}

impl Rule {
    fn from_value(label: &str, value: Value) -> PotResult<Self> {
        let unary
            = match &value {
                Value::Func(closure) => closure.arity() == 1,
                Value::Builtin(func) => func.is_unary(),
                _ => false,
            };
        if unary { return Ok(Self::Function(value)); }
        value.as_num()
            .map(Self::Constant)
            .ok_or_else(|| PotError::BadRule {
                label: label.to_string(),
                got: value.to_string(),
            })
    }

    /// Compute the rule's value at `x`.
    pub fn apply(&self, x: f64) -> ExprResult<f64> {
        match self {
            Self::Constant(v) => Ok(*v),
            Self::Function(f) => f.call(vec![Value::Num(x)])?.expect_num(),
        }
    }
}

/// A labeled domain and its rule.
#[derive(Clone, Debug, PartialEq)]
pub struct Region {
    pub label: String,
    pub domain: Domain,
    pub rule: Rule,
}

impl Region {
    /// Compile a single `<domain>|<value>` entry against `params`.
    pub fn compile(label: &str, spec: &str, params: &Arc<Params>)
        -> PotResult<Self>
    {
        let parts: Vec<&str> = spec.split(SEPARATOR).collect();
        let &[domain_src, value_src] = parts.as_slice() else {
            return Err(PotError::MalformedRegion {
                label: label.to_string(),
                spec: spec.to_string(),
            });
        };
        let domain_src = domain_src.trim();
        let value_src = value_src.trim();
        let domain
            = eval_str(domain_src, params)
            .map_err(PotError::expr(format!("domain of region '{label}'"), domain_src))?;
        let domain = Domain::from_value(label, &domain)?;
        let rule
            = eval_str(value_src, params)
            .map_err(PotError::expr(format!("value of region '{label}'"), value_src))?;
        let rule = Rule::from_value(label, rule)?;
        debug!(region = label, %domain, "compiled region");
        Ok(Self { label: label.to_string(), domain, rule })
    }
}

/// Ordered collection of regions.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RegionTable {
    regions: Vec<Region>,
}

impl RegionTable {
    /// Compile every `(label, spec)` entry, in order.
    pub fn compile<'a, I>(specs: I, params: &Arc<Params>) -> PotResult<Self>
    where I: IntoIterator<Item = (&'a str, &'a str)>
    {
        let mut regions: Vec<Region> = Vec::new();
        for (label, spec) in specs.into_iter() {
            let region = Region::compile(label, spec, params)?;
            match regions.iter_mut().find(|r| r.domain == region.domain) {
                Some(prev) => {
                    debug!(
                        region = label,
                        replaced = prev.label.as_str(),
                        domain = %region.domain,
                        "replaced region with identical domain"
                    );
                    *prev = region;
                },
                None => { regions.push(region); },
            }
        }
        Ok(Self { regions })
    }

    /// Return the first region whose domain contains `x`.
    pub fn lookup(&self, x: f64) -> Option<&Region> {
        self.regions.iter().find(|region| region.domain.contains(x))
    }

    /// Evaluate at `x`, giving [`DEF_VALUE`] outside every region.
    pub fn eval(&self, x: f64) -> PotResult<f64> {
        match self.lookup(x) {
            Some(region) => {
                region.rule.apply(x)
                    .map_err(|source| PotError::Rule {
                        label: region.label.clone(),
                        x,
                        source,
                    })
            },
            None => Ok(DEF_VALUE),
        }
    }

    pub fn len(&self) -> usize { self.regions.len() }

    pub fn is_empty(&self) -> bool { self.regions.is_empty() }

    pub fn iter(&self) -> std::slice::Iter<'_, Region> { self.regions.iter() }
}

impl<'a> IntoIterator for &'a RegionTable {
    type Item = &'a Region;
    type IntoIter = std::slice::Iter<'a, Region>;

    fn into_iter(self) -> Self::IntoIter { self.regions.iter() }
}
