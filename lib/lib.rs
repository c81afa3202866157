//! Provides piecewise-defined, one-dimensional scalar potentials for use in
//! numerical quantum-mechanics studies (simple harmonic oscillators, square
//! wells with bumps, Kronig-Penney lattices, ...).
//!
//! A potential is declared in a small configuration file holding a set of named
//! parameters and a set of regions, each region pairing a half-open domain
//! `[start, end)` with either a constant value or a unary function:
//! ```text
//! [parameters]
//! a = 2.
//! w = 1.
//! v0 = 15.
//!
//! [regions]
//! left = (-a, -w)|v0
//! center = (-w, w)|lambda x: 0.5 * x**2
//! right = (w, a)|v0
//! ```
//! Loading the file compiles every region into a [`region::RegionTable`];
//! evaluation looks up the first region containing the query point and applies
//! its rule, falling back to [`DEF_VALUE`] everywhere else.
//!
//! ```
//! use ndarray as nd;
//! use xpotential::Potential;
//!
//! let pot = Potential::from_str(
//!     "[parameters]\nw = 1.\n[regions]\nwell = (-w, w)|lambda x: w * x**2\n"
//! ).unwrap();
//! assert_eq!(pot.eval(0.5).unwrap(), 0.25);
//! assert_eq!(pot.eval(1.0).unwrap(), 0.0);
//!
//! let x: nd::Array1<f64> = nd::Array1::linspace(-2.0, 2.0, 100);
//! let v = pot.eval_array(&x).unwrap();
//! assert_eq!(v.len(), 100);
//! ```
//!
//! See [`docs`] for the configuration format and the expression language.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod value;
pub mod builtins;
pub mod eval;
pub mod config;
pub mod region;
pub mod potential;

pub mod docs;

pub use error::{ ExprError, PotError, PotResult };
pub use eval::Params;
pub use potential::{ Potential, Sampled };
pub use value::Value;

/// Value returned for points not covered by any region.
pub const DEF_VALUE: f64 = 0.0;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
