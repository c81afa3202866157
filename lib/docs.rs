//! Configuration format and expression language reference.
//!
//! # Contents
//! - [Configuration files](#configuration-files)
//! - [Evaluation](#evaluation)
//! - [Expressions](#expressions)
//! - [Built-ins](#built-ins)
//! - [Adjusting parameters](#adjusting-parameters)
//!
//! # Configuration files
//! A potential *V*(*x*) is described by a section/key-value text file with two
//! sections:
//! ```text
//! [parameters]
//! a = 2.
//! w = 1.
//! v0 = 15.
//!
//! [regions]
//! left = (-a, -w)|v0
//! center = (-w, w)|lambda x: 0.
//! right = (w, a)|v0
//! ```
//! Each entry of `[parameters]` binds a name to the value of an expression.
//! These expressions are evaluated *bare*: only the [built-ins](#built-ins)
//! are in scope, so one parameter can't be defined in terms of another. The
//! section may be omitted entirely.
//!
//! Each entry of `[regions]` is a label (used only in diagnostics) followed by
//! a region specification of the form
//! ```text
//! <domain>|<value>
//! ```
//! with exactly one `|`. `<domain>` must evaluate to a pair of numbers
//! `(start, end)`, and `<value>` must evaluate either to a number or to a
//! function of one argument. Both are evaluated with the parameters in scope.
//! The section is required; a configuration without it is rejected.
//!
//! Keys are case-sensitive, and values are taken verbatim (no quote or escape
//! processing). A section may appear only once, and a key only once within its
//! section. Two regions with the same domain are allowed; the later one
//! replaces the earlier.
//!
//! # Evaluation
//! Each region covers the half-open interval *start* ≤ *x* < *end*. To compute
//! *V*(*x*), regions are checked in the order they appear in the file and the
//! first one containing *x* is used:
//! - if its value is a number, that number is *V*(*x*);
//! - if its value is a function *f*, *V*(*x*) = *f*(*x*).
//!
//! Points contained in no region give *V*(*x*) = 0. In the example above,
//! *V*(−*w*) = 0 and *V*(*w*) = *v*₀, while *V*(*a*) = 0.
//!
//! # Expressions
//! Expressions use a small infix syntax with anonymous functions. All numbers are 64-bit
//! floats.
//!
//! | form                        | example                          |
//! |-----------------------------|----------------------------------|
//! | number                      | `15.`, `.5`, `1e-3`              |
//! | string                      | `'abc'`, `"abc"`                 |
//! | constant                    | `True`, `False`, `None`          |
//! | tuple / list                | `(-a, a)`, `-a, a`, `[1, 2]`     |
//! | subscript                   | `t[0]`, `t[-1]`                  |
//! | arithmetic                  | `+ - * / // % **`                |
//! | comparison (chainable)      | `< <= > >= == !=`, `0 <= x < w`  |
//! | boolean                     | `and`, `or`, `not`               |
//! | conditional                 | `v0 if x % l < w else 0.`        |
//! | function                    | `lambda x: 0.5 * w**2 * x**2`    |
//! | call / attribute            | `numpy.sqrt(x)`, `math.pi`       |
//!
//! `//` and `%` round toward negative infinity, so `x % l` always has the sign
//! of `l`; this makes periodic potentials straightforward:
//! ```text
//! lattice = (-n * l, n * l)|lambda x: v0 if x % l < w else 0.
//! ```
//! A `lambda` captures the parameters as they are when it's evaluated, i.e.
//! when its region is compiled.
//!
//! Nesting is limited to [`MAX_NESTING`][crate::parser::MAX_NESTING] levels
//! when parsing and [`MAX_DEPTH`][crate::eval::MAX_DEPTH] levels (including
//! function calls) when evaluating; deeper expressions are errors.
//!
//! # Built-ins
//! Always in scope (parameters with the same name take precedence):
//! - `abs`, `min`, `max`, `float`, `int`, `round`, `pow`
//! - `numpy` (also `np`): `pi`, `e`, `inf`, `nan`, `sqrt`, `exp`, `log`,
//!   `log10`, `sin`, `cos`, `tan`, `arcsin`, `arccos`, `arctan`, `arctan2`,
//!   `sinh`, `cosh`, `tanh`, `floor`, `ceil`, `abs`, `absolute`, `sign`,
//!   `power`, `minimum`, `maximum`, `where`, `heaviside`
//! - `math`: as `numpy`, but with `asin`, `acos`, `atan`, `atan2`, `fabs`,
//!   `pow`, and `tau`
//! - `operator`: `lt`, `le`, `gt`, `ge`, `eq`, `ne`, `add`, `sub`, `mul`,
//!   `truediv`, `floordiv`, `mod`, `pow`, `neg`, `pos`, `abs`, `not_`,
//!   `and_`, `or_`
//!
//! Built-in functions that take exactly one argument may be used directly as
//! region values, e.g. `(0, 1)|numpy.sqrt`.
//!
//! # Adjusting parameters
//! [`Potential::adjust`][crate::Potential::adjust] overwrites existing
//! parameters and recompiles *every* region from its source text. Names that
//! aren't already parameters are logged at `WARN` level and ignored. If
//! recompilation fails, nothing changes.
